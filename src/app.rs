use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/today", get(handlers::today))
        .route("/today/action", post(handlers::today_action))
        .route("/scheduled-runs", get(handlers::scheduled_runs))
        .route("/completed-runs", get(handlers::completed_runs))
        .route("/api/stats-bar", get(handlers::get_stats_bar))
        .route("/api/stats-bar/action", post(handlers::stats_bar_action))
        .route("/api/scheduled-runs", get(handlers::get_scheduled_runs))
        .route("/api/completed-runs", get(handlers::get_completed_runs))
        .with_state(state)
}
