use crate::format::{format_date, format_pace_or_raw, month_name, month_of};
use crate::models::{CompletedRunEntry, RunRecord};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthSection<T> {
    pub month: &'static str,
    pub rows: Vec<T>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScheduledRow {
    pub element_id: String,
    pub dict_id: Option<u32>,
    pub run: String,
    pub run_feel: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletedRow {
    pub element_id: Option<String>,
    pub dict_id: Option<u32>,
    pub run: String,
    pub distance: u32,
    pub duration: u32,
    pub pace: String,
    pub date: String,
}

/// Start a new section whenever the month differs from the previous row's.
/// Input order is kept; the same month reappearing later gets a new heading.
pub fn group_by_month<T>(rows: impl IntoIterator<Item = (u32, T)>) -> Vec<MonthSection<T>> {
    let mut sections: Vec<MonthSection<T>> = Vec::new();
    let mut current = None;

    for (month, row) in rows {
        let Some(name) = month_name(month) else {
            continue;
        };
        if current == Some(month) {
            if let Some(section) = sections.last_mut() {
                section.rows.push(row);
                continue;
            }
        }
        current = Some(month);
        sections.push(MonthSection {
            month: name,
            rows: vec![row],
        });
    }

    sections
}

pub fn scheduled_sections(records: Vec<RunRecord>) -> Vec<MonthSection<ScheduledRow>> {
    let rows = records.into_iter().filter_map(|record| {
        let (Some(month), Some(date)) = (month_of(&record.date), format_date(&record.date)) else {
            warn!(id = record.id, date = %record.date, "skipping scheduled run with bad date");
            return None;
        };
        Some((month, scheduled_row(record, date)))
    });
    group_by_month(rows)
}

pub fn scheduled_row(record: RunRecord, date: String) -> ScheduledRow {
    ScheduledRow {
        element_id: upcoming_element_id(record.id, record.dict_id),
        dict_id: record.dict_id,
        run: record.run,
        run_feel: record.run_feel,
        date,
    }
}

pub fn upcoming_element_id(id: u64, dict_id: Option<u32>) -> String {
    match dict_id {
        Some(dict_id) => format!("{id}-upcoming-run-{dict_id}"),
        None => format!("{id}-upcoming-run"),
    }
}

pub fn completed_sections(entries: Vec<CompletedRunEntry>) -> Vec<MonthSection<CompletedRow>> {
    let rows = entries.into_iter().filter_map(|entry| {
        let done = entry.completed_run;
        let (Some(month), Some(date)) = (month_of(&done.date), format_date(&done.date)) else {
            warn!(date = %done.date, "skipping completed run with bad date");
            return None;
        };
        let row = CompletedRow {
            element_id: done.id.map(|id| format!("{id}-completed-run")),
            dict_id: entry.scheduled_run.dict_id,
            run: entry.scheduled_run.run,
            distance: done.distance,
            duration: done.duration,
            pace: done
                .avg_pace
                .as_deref()
                .map(format_pace_or_raw)
                .unwrap_or_else(|| "--:--".to_string()),
            date,
        };
        Some((month, row))
    });
    group_by_month(rows)
}
