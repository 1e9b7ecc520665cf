use crate::format::format_date;
use crate::listing::{CompletedRow, MonthSection, ScheduledRow, scheduled_row};
use crate::state::TodayPage;
use crate::stats_bar::{BarMode, BarView, FieldView, NoticeKind};

pub fn render_index(greeting: &str, page: &TodayPage) -> String {
    let title = page
        .run
        .as_ref()
        .and_then(|run| run.title.as_deref())
        .unwrap_or("Today's run");
    let dict_id = page.run.as_ref().and_then(|run| run.dict_id);

    let body = match (&page.bar, page.load_failed) {
        (Some(bar), _) => render_stats_bar(&bar.view()),
        (None, true) => status_line("Today's run could not be loaded."),
        (None, false) => r#"<p class="muted">No run scheduled for today.</p>"#.to_string(),
    };

    let today = format!(
        r#"<section id="todays-run" class="run-box {background}">
      <h2>{title}</h2>
      {body}
    </section>"#,
        background = background_class(dict_id),
        title = escape_html(title),
    );

    let upcoming = if page.upcoming.is_empty() {
        String::new()
    } else {
        let rows: String = page
            .upcoming
            .iter()
            .map(|record| {
                let date = format_date(&record.date).unwrap_or_else(|| record.date.clone());
                render_scheduled_row(&scheduled_row(record.clone(), date))
            })
            .collect();
        format!(r#"<section class="upcoming"><h2>Coming up</h2>{rows}</section>"#)
    };

    let content = format!(
        r#"<header>
      <h1>Good {greeting}</h1>
      <p class="subtitle">Here is your training for today.</p>
    </header>
    {today}
    {upcoming}"#,
        greeting = escape_html(greeting),
    );

    render_page("Today", &content)
}

pub fn render_stats_bar(view: &BarView) -> String {
    let mut html = String::new();

    if let Some(notice) = &view.notice {
        let kind = match notice.kind {
            NoticeKind::Success => "success",
            NoticeKind::Failure => "failure",
        };
        html.push_str(&format!(
            r#"<div class="toast toast-{kind}" role="status">{}</div>"#,
            escape_html(&notice.message)
        ));
    }

    if let Some(banner) = &view.banner {
        html.push_str(&format!(
            r#"<div id="run-completed" class="banner">{}</div>"#,
            escape_html(banner)
        ));
    }

    if view.rest_day {
        html.push_str(r#"<div id="info-bar--rest" class="info-bar">Enjoy your rest day</div>"#);
        return html;
    }

    let fields = view
        .fields
        .iter()
        .map(render_field)
        .collect::<Vec<_>>()
        .join(r#"<div class="vr"></div>"#);

    let button = view
        .button
        .as_deref()
        .map(|label| {
            let hint = view
                .hint
                .as_deref()
                .map(|hint| {
                    format!(
                        r#"<small id="mark-complete-label" class="muted">{}</small>"#,
                        escape_html(hint)
                    )
                })
                .unwrap_or_default();
            let (disabled, spinner) = if view.button_disabled {
                (" disabled", r#"<span class="spinner" aria-hidden="true"></span>"#)
            } else {
                ("", "")
            };
            format!(
                r#"<div class="actions">{hint}<button id="mark-complete" type="submit"{disabled}>{spinner}{}</button></div>"#,
                escape_html(label)
            )
        })
        .unwrap_or_default();

    html.push_str(&format!(
        r#"<form id="stats-bar-form" method="post" action="/today/action">
        <div id="run-info-bar" class="info-bar" data-mode="{mode}">{fields}</div>
        {button}
      </form>"#,
        mode = mode_name(view),
    ));
    html
}

fn render_field(field: &FieldView) -> String {
    let key = field.key.as_str();
    let class = if field.invalid { "value invalid" } else { "value" };
    let value = escape_html(&field.value);
    let control = if field.editable {
        format!(
            r#"<textarea id="{key}--edit" name="{key}" class="{class}" rows="1">{value}</textarea>"#
        )
    } else {
        format!(r#"<span id="{key}--edit" class="{class}">{value}</span>"#)
    };
    let unit = field
        .unit
        .as_deref()
        .map(|unit| format!("&nbsp;{unit}"))
        .unwrap_or_default();
    format!(
        r#"<div id="info-bar--{key}" class="stat">{}:&nbsp;{control}{unit}</div>"#,
        escape_html(&field.label)
    )
}

fn mode_name(view: &BarView) -> &'static str {
    match view.mode {
        BarMode::View => "view",
        BarMode::Edit => "edit",
        BarMode::Saving => "saving",
    }
}

pub fn render_scheduled(sections: &[MonthSection<ScheduledRow>], load_failed: bool) -> String {
    let list = render_sections(sections, render_scheduled_row);
    let content = format!(
        r#"<header><h1>Scheduled runs</h1></header>
    {status}
    <section id="scheduled-runs-container">{list}</section>"#,
        status = list_status(load_failed, sections.is_empty(), "No upcoming runs."),
    );
    render_page("Scheduled runs", &content)
}

pub fn render_completed(sections: &[MonthSection<CompletedRow>], load_failed: bool) -> String {
    let list = render_sections(sections, render_completed_row);
    let content = format!(
        r##"<header id="top"><h1>Completed runs</h1></header>
    {status}
    <section id="completed-runs-container">{list}</section>
    <a id="completed-top-btn" class="top-link" href="#top">Back to top</a>"##,
        status = list_status(load_failed, sections.is_empty(), "No completed runs yet."),
    );
    render_page("Completed runs", &content)
}

fn render_sections<T>(sections: &[MonthSection<T>], row: fn(&T) -> String) -> String {
    sections
        .iter()
        .map(|section| {
            let rows: String = section.rows.iter().map(row).collect();
            format!(r#"<h3 class="month">{}</h3>{rows}"#, section.month)
        })
        .collect()
}

fn render_scheduled_row(row: &ScheduledRow) -> String {
    format!(
        r#"<div id="{id}" class="run-row {background}"><span>{run} | <small class="muted">{feel}</small></span><span>{date}</span></div>"#,
        id = escape_html(&row.element_id),
        background = background_class(row.dict_id),
        run = escape_html(&row.run),
        feel = escape_html(&row.run_feel),
        date = escape_html(&row.date),
    )
}

fn render_completed_row(row: &CompletedRow) -> String {
    let id = row
        .element_id
        .as_deref()
        .map(|id| format!(r#" id="{}""#, escape_html(id)))
        .unwrap_or_default();
    format!(
        r#"<div{id} class="run-row {background}"><span>{run} | <small class="muted">{distance}km | {duration} minutes | Avg Pace: {pace}</small></span><span>{date}</span></div>"#,
        background = background_class(row.dict_id),
        run = escape_html(&row.run),
        distance = row.distance,
        duration = row.duration,
        pace = escape_html(&row.pace),
        date = escape_html(&row.date),
    )
}

fn list_status(load_failed: bool, empty: bool, empty_message: &str) -> String {
    if load_failed {
        status_line("Runs could not be loaded.")
    } else if empty {
        format!(r#"<p class="muted">{empty_message}</p>"#)
    } else {
        String::new()
    }
}

fn status_line(message: &str) -> String {
    format!(r#"<p class="status" data-type="error">{message}</p>"#)
}

fn background_class(dict_id: Option<u32>) -> String {
    dict_id
        .map(|id| format!("bg-grad-{id}"))
        .unwrap_or_else(|| "bg-plain".to_string())
}

fn render_page(title: &str, content: &str) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{CONTENT}}", content)
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} | Marathon Mentor</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 18px 48px;
    }

    nav {
      width: min(860px, 100%);
      display: flex;
      gap: 18px;
      margin-bottom: 18px;
    }

    nav a {
      color: var(--accent-2);
      font-weight: 600;
      text-decoration: none;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle, .muted {
      margin: 0;
      color: #5f5c57;
    }

    .run-box, .run-row {
      border-radius: 18px;
      border: 1px solid rgba(47, 72, 88, 0.12);
      background: white;
    }

    .run-box {
      padding: 20px;
      display: grid;
      gap: 14px;
    }

    .run-row {
      display: flex;
      justify-content: space-between;
      padding: 10px 14px;
      margin: 8px 0;
    }

    .bg-grad-1 { background: linear-gradient(135deg, #fff, #ffe0d6); }
    .bg-grad-2 { background: linear-gradient(135deg, #fff, #d9ecf2); }
    .bg-grad-3 { background: linear-gradient(135deg, #fff, #e4f2d9); }
    .bg-grad-4 { background: linear-gradient(135deg, #fff, #efe0f5); }
    .bg-grad-5 { background: linear-gradient(135deg, #fff, #fff2c7); }

    .month {
      font-family: "Fraunces", "Georgia", serif;
      font-size: 1.6rem;
      margin: 18px 0 4px;
    }

    .info-bar {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      gap: 12px;
      font-size: 1.1rem;
    }

    .vr {
      width: 1px;
      align-self: stretch;
      background: rgba(47, 72, 88, 0.25);
    }

    .stat .value {
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat textarea {
      width: 5.5em;
      resize: none;
      font: inherit;
      border-radius: 8px;
      border: 1px solid rgba(47, 72, 88, 0.3);
      padding: 2px 6px;
    }

    .value.invalid {
      color: #c63b2b;
      border-color: #c63b2b;
      text-decoration: underline wavy #c63b2b;
    }

    .actions {
      display: flex;
      align-items: center;
      justify-content: flex-end;
      gap: 12px;
      margin-top: 12px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent-2);
      color: white;
      display: inline-flex;
      align-items: center;
      gap: 10px;
    }

    button[disabled] {
      opacity: 0.6;
      cursor: progress;
    }

    .spinner {
      width: 14px;
      height: 14px;
      border-radius: 50%;
      border: 2px solid rgba(255, 255, 255, 0.4);
      border-top-color: white;
      animation: spin 800ms linear infinite;
    }

    .banner {
      padding: 10px 14px;
      border-radius: 12px;
      background: #e3f4e8;
      color: #2d7a4b;
      font-weight: 600;
    }

    .toast {
      padding: 10px 14px;
      border-radius: 12px;
      color: white;
    }

    .toast-success {
      background: #2d7a4b;
    }

    .toast-failure {
      background: #c63b2b;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .top-link {
      justify-self: end;
      color: var(--accent);
    }

    @keyframes spin {
      to {
        transform: rotate(360deg);
      }
    }
  </style>
</head>
<body>
  <nav>
    <a href="/">Today</a>
    <a href="/scheduled-runs">Scheduled runs</a>
    <a href="/completed-runs">Completed runs</a>
  </nav>
  <main class="app">
    {{CONTENT}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RunRecord, TodayRun, TodayRunStats};
    use crate::stats_bar::{StatsBar, StatsInput};

    fn page_with(stats: TodayRunStats) -> TodayPage {
        let run = TodayRun {
            run_id: Some(5),
            date: "2026-03-05".into(),
            dict_id: Some(2),
            title: Some("Long <slow> run".into()),
            stats,
            completed: None,
        };
        TodayPage {
            bar: Some(StatsBar::new(&run)),
            run: Some(run),
            upcoming: vec![RunRecord {
                id: 9,
                dict_id: Some(4),
                run: "Tempo".into(),
                run_feel: "Comfortably hard".into(),
                date: "2026-03-06".into(),
            }],
            load_failed: false,
        }
    }

    fn distance() -> TodayRunStats {
        TodayRunStats::Distance {
            distance: 8,
            est_duration: 35,
            est_avg_pace: Some("0:04:17.352941".into()),
        }
    }

    #[test]
    fn index_shows_spans_and_background() {
        let html = render_index("morning", &page_with(distance()));
        assert!(html.contains("Good morning"));
        assert!(html.contains(r#"class="run-box bg-grad-2""#));
        assert!(html.contains(r#"<span id="distance--edit" class="value">8</span>"#));
        assert!(html.contains("Estimated Pace:&nbsp;"));
        assert!(html.contains("Mark As Completed"));
        assert!(html.contains("Long &lt;slow&gt; run"));
        assert!(html.contains(r#"id="9-upcoming-run-4""#));
        assert!(html.contains("06/03/26"));
        assert!(!html.contains("<textarea"));
    }

    #[test]
    fn edit_mode_renders_textareas() {
        let mut page = page_with(distance());
        page.bar
            .as_mut()
            .unwrap()
            .press(&StatsInput::default())
            .unwrap();
        let html = render_index("evening", &page);
        assert!(html.contains(
            r#"<textarea id="pace--edit" name="pace" class="value" rows="1">04:17</textarea>"#
        ));
        assert!(html.contains(">Save</button>"));
        assert!(!html.contains("Estimated"));
    }

    #[test]
    fn interval_edit_drops_working_time_and_its_rule() {
        let mut page = page_with(TodayRunStats::Interval {
            sets: 6,
            on: 5,
            off: 3,
            est_avg_pace: None,
        });
        let before = render_index("night", &page);
        assert!(before.contains("Working Time"));
        assert_eq!(before.matches(r#"<div class="vr">"#).count(), 3);

        page.bar.as_mut().unwrap().begin_edit().unwrap();
        let after = render_index("night", &page);
        assert!(!after.contains("Working Time"));
        assert_eq!(after.matches(r#"<div class="vr">"#).count(), 2);
        assert_eq!(after.matches("<textarea").count(), 3);
    }

    #[test]
    fn rest_day_has_no_button() {
        let html = render_index("morning", &page_with(TodayRunStats::Rest));
        assert!(html.contains("Enjoy your rest day"));
        assert!(!html.contains("mark-complete"));
    }

    #[test]
    fn failed_list_load_shows_status() {
        let html = render_scheduled(&[], true);
        assert!(html.contains("Runs could not be loaded."));
        let html = render_completed(&[], false);
        assert!(html.contains("No completed runs yet."));
        assert!(html.contains("completed-top-btn"));
    }

    #[test]
    fn escape_covers_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
