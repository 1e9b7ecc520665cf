use crate::errors::AppError;
use crate::format::greeting;
use crate::listing::{
    CompletedRow, MonthSection, ScheduledRow, completed_sections, scheduled_sections,
};
use crate::models::EditPayload;
use crate::state::{AppState, UPCOMING_RUNS};
use crate::stats_bar::{BarView, Pressed, StatsBar, StatsInput};
use crate::ui::{render_completed, render_index, render_scheduled};
use axum::{
    Form, Json,
    extract::State,
    response::{Html, Redirect},
};
use chrono::{Local, Timelike};
use serde::Serialize;
use tracing::{debug, error, info, warn};

#[derive(Debug, Serialize)]
pub struct StatsBarResponse {
    pub bar: Option<BarView>,
}

/// Page load: fetch today's run and reset the stats bar.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    reload_today(&state).await;
    render_today(&state).await
}

/// The bar as it stands, without reloading. Form presses land here.
pub async fn today(State(state): State<AppState>) -> Html<String> {
    render_today(&state).await
}

pub async fn today_action(
    State(state): State<AppState>,
    Form(input): Form<StatsInput>,
) -> Redirect {
    if let Err(err) = press(&state, &input).await {
        warn!("stats bar press rejected: {}", err.message);
    }
    Redirect::to("/today")
}

pub async fn get_stats_bar(State(state): State<AppState>) -> Json<StatsBarResponse> {
    let page = state.today.lock().await;
    Json(StatsBarResponse {
        bar: page.bar.as_ref().map(StatsBar::view),
    })
}

pub async fn stats_bar_action(
    State(state): State<AppState>,
    Json(input): Json<StatsInput>,
) -> Result<Json<BarView>, AppError> {
    let pressed = press(&state, &input).await;

    let mut page = state.today.lock().await;
    let view = page.bar.as_ref().map(StatsBar::view);
    if let Some(bar) = page.bar.as_mut() {
        bar.clear_notice();
    }

    pressed?;
    view.map(Json)
        .ok_or_else(|| AppError::not_found("no run loaded for today"))
}

pub async fn scheduled_runs(State(state): State<AppState>) -> Html<String> {
    let (sections, load_failed) = match state.client.scheduled_runs().await {
        Ok(records) => (scheduled_sections(records), false),
        Err(err) => {
            error!("failed to load scheduled runs: {err}");
            (Vec::new(), true)
        }
    };
    Html(render_scheduled(&sections, load_failed))
}

pub async fn completed_runs(State(state): State<AppState>) -> Html<String> {
    let (sections, load_failed) = match state.client.completed_runs().await {
        Ok(entries) => (completed_sections(entries), false),
        Err(err) => {
            error!("failed to load completed runs: {err}");
            (Vec::new(), true)
        }
    };
    Html(render_completed(&sections, load_failed))
}

pub async fn get_scheduled_runs(
    State(state): State<AppState>,
) -> Result<Json<Vec<MonthSection<ScheduledRow>>>, AppError> {
    let records = state.client.scheduled_runs().await?;
    Ok(Json(scheduled_sections(records)))
}

pub async fn get_completed_runs(
    State(state): State<AppState>,
) -> Result<Json<Vec<MonthSection<CompletedRow>>>, AppError> {
    let entries = state.client.completed_runs().await?;
    Ok(Json(completed_sections(entries)))
}

async fn reload_today(state: &AppState) {
    if state.today.lock().await.is_saving() {
        return;
    }

    let (today, upcoming) = tokio::join!(state.client.todays_run(), state.client.scheduled_runs());

    let mut page = state.today.lock().await;
    if page.is_saving() {
        return;
    }

    page.load_failed = false;
    let run = match today {
        Ok(run) => run,
        Err(err) => {
            error!("failed to load today's run: {err}");
            page.load_failed = true;
            None
        }
    };
    page.upcoming = match upcoming {
        Ok(records) => records.into_iter().take(UPCOMING_RUNS).collect(),
        Err(err) => {
            error!("failed to load upcoming runs: {err}");
            Vec::new()
        }
    };
    page.bar = run.as_ref().map(StatsBar::new);
    page.run = run;
}

/// Drive the stats bar one step. A valid save releases the lock while the
/// backend is called; the bar stays in `Saving` meanwhile.
async fn press(state: &AppState, input: &StatsInput) -> Result<(), AppError> {
    let payload = {
        let mut page = state.today.lock().await;
        let bar = page
            .bar
            .as_mut()
            .ok_or_else(|| AppError::not_found("no run loaded for today"))?;
        match bar.press(input)? {
            Pressed::Submit(payload) => payload,
            Pressed::Editing => {
                debug!("stats bar switched to edit mode");
                return Ok(());
            }
            Pressed::Invalid(fields) => {
                warn!(?fields, "run stats failed validation");
                return Ok(());
            }
        }
    };

    // The save outlives the request: a client that hangs up mid-save must not
    // strand the bar in `Saving`.
    let save = tokio::spawn(finish_save(state.clone(), payload));
    if let Err(err) = save.await {
        error!("save task did not finish: {err}");
        let mut page = state.today.lock().await;
        if let Some(bar) = page.bar.as_mut().filter(|bar| bar.is_saving()) {
            bar.fail_save();
        }
        return Err(AppError::internal("saving run stats failed"));
    }
    Ok(())
}

async fn finish_save(state: AppState, payload: EditPayload) {
    let outcome = state.client.update_completed_run(&payload).await;

    let mut page = state.today.lock().await;
    let Some(bar) = page.bar.as_mut() else {
        return;
    };
    match outcome {
        Ok(saved) => {
            info!(
                run_id = payload.run_id,
                distance = saved.distance,
                duration = saved.duration,
                "run stats saved"
            );
            bar.complete_save(&saved);
        }
        Err(err) => {
            error!("failed to save run stats: {err}");
            bar.fail_save();
        }
    }
}

async fn render_today(state: &AppState) -> Html<String> {
    let hour = Local::now().hour();
    let mut page = state.today.lock().await;
    let html = render_index(greeting(hour), &page);
    if let Some(bar) = page.bar.as_mut() {
        bar.clear_notice();
    }
    Html(html)
}
