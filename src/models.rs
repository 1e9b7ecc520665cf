use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub id: u64,
    #[serde(default)]
    pub dict_id: Option<u32>,
    pub run: String,
    #[serde(default)]
    pub run_feel: String,
    pub date: String,
}

/// The slice of the scheduled run the completed-runs endpoint embeds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledRunSummary {
    #[serde(default)]
    pub dict_id: Option<u32>,
    pub run: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletedRunRecord {
    #[serde(default)]
    pub id: Option<u64>,
    pub date: String,
    pub distance: u32,
    pub duration: u32,
    #[serde(default)]
    pub avg_pace: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletedRunEntry {
    pub completed_run: CompletedRunRecord,
    pub scheduled_run: ScheduledRunSummary,
}

#[derive(Debug, Deserialize)]
pub struct ScheduledRunsResponse {
    #[serde(default)]
    pub all_scheduled_runs: Option<Vec<RunRecord>>,
}

#[derive(Debug, Deserialize)]
pub struct CompletedRunsResponse {
    #[serde(default)]
    pub all_completed_runs: Option<Vec<CompletedRunEntry>>,
}

/// Flat shape of `/api/get-todays-run`. The backend serializes either the
/// scheduled run or, once stats are saved, the completed run, and tags the
/// object with `completed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodayRunResponse {
    #[serde(default)]
    pub run_id: Option<u64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub dict_id: Option<u32>,
    #[serde(default)]
    pub run: Option<String>,
    #[serde(default)]
    pub run_feel: Option<String>,
    #[serde(default)]
    pub scheduled_run: Option<u64>,
    #[serde(default)]
    pub distance: Option<u32>,
    #[serde(default)]
    pub est_duration: Option<u32>,
    #[serde(default)]
    pub est_avg_pace: Option<String>,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub on: Option<u32>,
    #[serde(default)]
    pub off: Option<u32>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub avg_pace: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TodayRunStats {
    Distance {
        distance: u32,
        est_duration: u32,
        est_avg_pace: Option<String>,
    },
    Interval {
        sets: u32,
        on: u32,
        off: u32,
        est_avg_pace: Option<String>,
    },
    Rest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedStats {
    pub distance: u32,
    pub duration: u32,
    pub avg_pace: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodayRun {
    /// Id of the scheduled run, which is what the update endpoint keys on.
    pub run_id: Option<u64>,
    pub date: String,
    pub dict_id: Option<u32>,
    pub title: Option<String>,
    pub stats: TodayRunStats,
    pub completed: Option<CompletedStats>,
}

impl TodayRun {
    /// A completed run comes back without its title or gradient.
    pub fn lacks_title(&self) -> bool {
        self.completed.is_some() && self.title.is_none()
    }

    /// Borrow the title and gradient from the completed-runs entry for the
    /// same day.
    pub fn fill_from_completed(&mut self, entries: &[CompletedRunEntry]) {
        let Some(entry) = entries
            .iter()
            .find(|entry| date_part(&entry.completed_run.date) == self.date)
        else {
            return;
        };
        if self.title.is_none() {
            self.title = Some(entry.scheduled_run.run.clone());
        }
        if self.dict_id.is_none() {
            self.dict_id = entry.scheduled_run.dict_id;
        }
    }
}

impl TodayRunResponse {
    /// `fallback_date` is used when the backend omits the date.
    pub fn into_today_run(self, fallback_date: &str) -> TodayRun {
        let date = self
            .date
            .as_deref()
            .map(date_part)
            .unwrap_or(fallback_date)
            .to_string();

        if self.completed {
            let distance = self.distance.unwrap_or_default();
            let duration = self.duration.unwrap_or_default();
            return TodayRun {
                run_id: self.scheduled_run.or(self.run_id),
                date,
                dict_id: self.dict_id,
                title: self.run,
                stats: TodayRunStats::Distance {
                    distance,
                    est_duration: duration,
                    est_avg_pace: self.avg_pace.clone(),
                },
                completed: Some(CompletedStats {
                    distance,
                    duration,
                    avg_pace: self.avg_pace,
                }),
            };
        }

        let distance = self.distance.unwrap_or_default();
        let sets = self.sets.unwrap_or_default();
        let stats = if distance > 0 {
            TodayRunStats::Distance {
                distance,
                est_duration: self.est_duration.unwrap_or_default(),
                est_avg_pace: self.est_avg_pace,
            }
        } else if sets > 0 {
            TodayRunStats::Interval {
                sets,
                on: self.on.unwrap_or_default(),
                off: self.off.unwrap_or_default(),
                est_avg_pace: self.est_avg_pace,
            }
        } else {
            TodayRunStats::Rest
        };

        TodayRun {
            run_id: self.run_id,
            date,
            dict_id: self.dict_id,
            title: self.run,
            stats,
            completed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditPayload {
    pub run_id: u64,
    pub date: String,
    pub distance: u32,
    pub duration: u32,
    pub pace: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateRequest<'a> {
    pub payload: &'a EditPayload,
}

/// Echo of a saved run. The backend returns the stored values, so the date
/// may carry a time suffix and the pace is a serialized duration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SavedStats {
    #[serde(default)]
    pub run_id: Option<u64>,
    pub date: String,
    pub distance: u32,
    pub duration: u32,
    #[serde(alias = "pace")]
    pub avg_pace: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateResponse {
    pub payload: SavedStats,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `2024-03-05T00:00:00` and `2024-03-05` both yield `2024-03-05`.
pub fn date_part(raw: &str) -> &str {
    raw.split_once('T').map(|(date, _)| date).unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> TodayRun {
        let raw: TodayRunResponse = serde_json::from_str(json).unwrap();
        raw.into_today_run("2026-01-01")
    }

    #[test]
    fn distance_run_is_detected() {
        let run = parse(
            r#"{"run_id": 12, "dict_id": 3, "run": "Easy run", "date": "2026-03-05",
                "distance": 8, "est_duration": 35, "est_avg_pace": "0:04:17.352941",
                "on": 0, "off": 0, "sets": 0, "completed": false}"#,
        );
        assert_eq!(run.run_id, Some(12));
        assert_eq!(run.date, "2026-03-05");
        assert!(run.completed.is_none());
        assert_eq!(
            run.stats,
            TodayRunStats::Distance {
                distance: 8,
                est_duration: 35,
                est_avg_pace: Some("0:04:17.352941".into()),
            }
        );
    }

    #[test]
    fn zero_distance_with_sets_is_interval() {
        let run = parse(
            r#"{"run_id": 4, "date": "2026-03-05", "distance": 0, "est_duration": 0,
                "sets": 6, "on": 5, "off": 3, "est_avg_pace": "0:04:00", "completed": false}"#,
        );
        assert!(matches!(
            run.stats,
            TodayRunStats::Interval { sets: 6, on: 5, off: 3, .. }
        ));
    }

    #[test]
    fn all_zero_is_rest() {
        let run = parse(r#"{"run_id": 9, "distance": 0, "sets": 0, "completed": false}"#);
        assert_eq!(run.stats, TodayRunStats::Rest);
        assert_eq!(run.date, "2026-01-01");
    }

    #[test]
    fn completed_run_uses_scheduled_run_id() {
        let run = parse(
            r#"{"run_id": 77, "scheduled_run": 12, "date": "2026-03-05",
                "distance": 9, "duration": 41, "avg_pace": "P0DT00H04M33S", "completed": true}"#,
        );
        assert_eq!(run.run_id, Some(12));
        let completed = run.completed.expect("completed stats");
        assert_eq!(completed.distance, 9);
        assert_eq!(completed.duration, 41);
        assert_eq!(completed.avg_pace.as_deref(), Some("P0DT00H04M33S"));
    }

    #[test]
    fn completed_run_borrows_title_from_same_day_entry() {
        let mut run = parse(
            r#"{"run_id": 77, "scheduled_run": 12, "date": "2026-03-05",
                "distance": 9, "duration": 41, "completed": true}"#,
        );
        assert!(run.lacks_title());

        let entry = |date: &str, dict_id: u32, title: &str| CompletedRunEntry {
            completed_run: CompletedRunRecord {
                id: None,
                date: date.into(),
                distance: 9,
                duration: 41,
                avg_pace: None,
            },
            scheduled_run: ScheduledRunSummary {
                dict_id: Some(dict_id),
                run: title.into(),
            },
        };
        run.fill_from_completed(&[
            entry("2026-03-04", 1, "Recovery"),
            entry("2026-03-05T00:00:00", 3, "Tempo"),
        ]);

        assert_eq!(run.title.as_deref(), Some("Tempo"));
        assert_eq!(run.dict_id, Some(3));
        assert!(!run.lacks_title());
    }

    #[test]
    fn saved_stats_accepts_pace_alias() {
        let saved: UpdateResponse = serde_json::from_str(
            r#"{"message": "ok", "payload": {"run_id": 3, "date": "2026-03-05T00:00:00",
                "distance": 8, "duration": 35, "pace": "04:17"}}"#,
        )
        .unwrap();
        assert_eq!(saved.payload.avg_pace, "04:17");
        assert_eq!(date_part(&saved.payload.date), "2026-03-05");
    }
}
