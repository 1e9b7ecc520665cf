//! Stats bar for today's run.
//!
//! The bar moves `View -> Edit -> Saving -> View`. A validation failure keeps
//! it in `Edit` with the offending fields flagged; a failed save returns it to
//! `Edit` holding what the user typed. Pages render from [`BarView`], never
//! from the bar's internals.

use crate::errors::TransitionError;
use crate::format::format_pace_or_raw;
use crate::models::{EditPayload, SavedStats, TodayRun, TodayRunStats, date_part};
use crate::validate;
use serde::{Deserialize, Serialize};

const MARK_COMPLETE: &str = "Mark As Completed";
const EDIT_STATS: &str = "Edit Stats";
const SAVE: &str = "Save";
const SAVING: &str = "Saving...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Distance,
    Duration,
    Pace,
    Sets,
    On,
    Off,
}

impl FieldKey {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Distance => "distance",
            FieldKey::Duration => "duration",
            FieldKey::Pace => "pace",
            FieldKey::Sets => "sets",
            FieldKey::On => "on",
            FieldKey::Off => "off",
        }
    }

    pub fn unit(self) -> Option<&'static str> {
        match self {
            FieldKey::Distance => Some("km"),
            FieldKey::Duration | FieldKey::On | FieldKey::Off => Some("minutes"),
            FieldKey::Pace | FieldKey::Sets => None,
        }
    }

    fn label(self, estimated: bool) -> &'static str {
        match (self, estimated) {
            (FieldKey::Distance, _) => "Distance",
            (FieldKey::Duration, true) => "Estimated Duration",
            (FieldKey::Duration, false) => "Duration",
            (FieldKey::Pace, true) => "Estimated Pace",
            (FieldKey::Pace, false) => "Pace",
            (FieldKey::Sets, _) => "Sets",
            (FieldKey::On, _) => "Working Time",
            (FieldKey::Off, _) => "Rest Time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    View,
    Edit,
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct StatField {
    key: FieldKey,
    value: String,
    invalid: bool,
}

impl StatField {
    fn new(key: FieldKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
            invalid: false,
        }
    }
}

/// Raw textarea contents submitted with a press.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsInput {
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub pace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pressed {
    /// Spans became textareas.
    Editing,
    /// Input was valid; the bar is saving and the payload must be sent.
    Submit(EditPayload),
    /// Input failed validation; the listed fields are flagged.
    Invalid(Vec<FieldKey>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub key: FieldKey,
    pub label: String,
    pub value: String,
    pub unit: Option<String>,
    pub editable: bool,
    pub invalid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarView {
    pub mode: BarMode,
    pub completed: bool,
    pub rest_day: bool,
    pub button: Option<String>,
    pub button_disabled: bool,
    pub hint: Option<String>,
    pub fields: Vec<FieldView>,
    pub summary: String,
    pub banner: Option<String>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone)]
pub struct StatsBar {
    run_id: Option<u64>,
    date: String,
    rest_day: bool,
    completed: bool,
    mode: BarMode,
    fields: Vec<StatField>,
    notice: Option<Notice>,
}

impl StatsBar {
    pub fn new(run: &TodayRun) -> Self {
        let (fields, rest_day) = match (&run.completed, &run.stats) {
            (Some(done), _) => (
                vec![
                    StatField::new(FieldKey::Distance, done.distance.to_string()),
                    StatField::new(FieldKey::Duration, done.duration.to_string()),
                    StatField::new(FieldKey::Pace, pace_text(done.avg_pace.as_deref())),
                ],
                false,
            ),
            (
                None,
                TodayRunStats::Distance {
                    distance,
                    est_duration,
                    est_avg_pace,
                },
            ) => (
                vec![
                    StatField::new(FieldKey::Distance, distance.to_string()),
                    StatField::new(FieldKey::Duration, est_duration.to_string()),
                    StatField::new(FieldKey::Pace, pace_text(est_avg_pace.as_deref())),
                ],
                false,
            ),
            (
                None,
                TodayRunStats::Interval {
                    sets,
                    on,
                    off,
                    est_avg_pace,
                },
            ) => (
                vec![
                    StatField::new(FieldKey::On, on.to_string()),
                    StatField::new(FieldKey::Off, off.to_string()),
                    StatField::new(FieldKey::Sets, sets.to_string()),
                    StatField::new(FieldKey::Pace, pace_text(est_avg_pace.as_deref())),
                ],
                false,
            ),
            (None, TodayRunStats::Rest) => (Vec::new(), true),
        };

        Self {
            run_id: run.run_id,
            date: run.date.clone(),
            rest_day,
            completed: run.completed.is_some(),
            mode: BarMode::View,
            fields,
            notice: None,
        }
    }

    pub fn mode(&self) -> BarMode {
        self.mode
    }

    pub fn is_saving(&self) -> bool {
        self.mode == BarMode::Saving
    }

    /// The action button. Dispatches on the current mode.
    pub fn press(&mut self, input: &StatsInput) -> Result<Pressed, TransitionError> {
        match self.mode {
            BarMode::View => self.begin_edit().map(|()| Pressed::Editing),
            BarMode::Edit => self.submit(input),
            BarMode::Saving => Err(self.reject(TransitionError::SaveInFlight)),
        }
    }

    pub fn begin_edit(&mut self) -> Result<(), TransitionError> {
        if self.rest_day {
            return Err(self.reject(TransitionError::RestDay));
        }
        if self.mode == BarMode::Saving {
            return Err(self.reject(TransitionError::SaveInFlight));
        }
        self.reshape_interval();
        self.mode = BarMode::Edit;
        Ok(())
    }

    // Valid input moves the bar to `Saving` and yields the payload to send.
    fn submit(&mut self, input: &StatsInput) -> Result<Pressed, TransitionError> {
        for (key, raw) in [
            (FieldKey::Distance, &input.distance),
            (FieldKey::Duration, &input.duration),
            (FieldKey::Pace, &input.pace),
        ] {
            if let (Some(field), Some(raw)) = (self.field_mut(key), raw) {
                field.value = raw.trim().to_string();
            }
        }

        let distance = self.field_value(FieldKey::Distance).and_then(validate::whole_number);
        let duration = self.field_value(FieldKey::Duration).and_then(validate::whole_number);
        let pace = self.field_value(FieldKey::Pace).and_then(validate::pace);

        let mut invalid = Vec::new();
        for (key, ok) in [
            (FieldKey::Distance, distance.is_some()),
            (FieldKey::Duration, duration.is_some()),
            (FieldKey::Pace, pace.is_some()),
        ] {
            if let Some(field) = self.field_mut(key) {
                field.invalid = !ok;
            }
            if !ok {
                invalid.push(key);
            }
        }

        let (Some(distance), Some(duration), Some(pace)) = (distance, duration, pace) else {
            self.notice = Some(Notice::failure("Please check the highlighted stats and try again"));
            return Ok(Pressed::Invalid(invalid));
        };

        let Some(run_id) = self.run_id else {
            return Err(self.reject(TransitionError::MissingRunId));
        };

        self.set_value(FieldKey::Distance, distance.to_string());
        self.set_value(FieldKey::Duration, duration.to_string());
        self.set_value(FieldKey::Pace, pace.clone());
        self.mode = BarMode::Saving;

        Ok(Pressed::Submit(EditPayload {
            run_id,
            date: self.date.clone(),
            distance,
            duration,
            pace,
        }))
    }

    /// The backend stored the run; show what it echoed.
    pub fn complete_save(&mut self, saved: &SavedStats) {
        self.set_value(FieldKey::Distance, saved.distance.to_string());
        self.set_value(FieldKey::Duration, saved.duration.to_string());
        self.set_value(FieldKey::Pace, format_pace_or_raw(&saved.avg_pace));
        self.date = date_part(&saved.date).to_string();
        if let Some(run_id) = saved.run_id {
            self.run_id = Some(run_id);
        }
        self.completed = true;
        self.mode = BarMode::View;
        self.notice = Some(Notice::success("Run stats saved"));
    }

    /// The save did not go through. The entered values stay for correction.
    pub fn fail_save(&mut self) {
        self.mode = BarMode::Edit;
        self.notice = Some(Notice::failure("Could not save your run stats, please try again"));
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn view(&self) -> BarView {
        let estimated = self.mode == BarMode::View && !self.completed;
        let editable = self.mode == BarMode::Edit;

        let fields: Vec<FieldView> = self
            .fields
            .iter()
            .map(|field| FieldView {
                key: field.key,
                label: field.key.label(estimated).to_string(),
                value: field.value.clone(),
                unit: field.key.unit().map(str::to_string),
                editable,
                invalid: field.invalid,
            })
            .collect();

        let summary = if self.rest_day {
            "Enjoy your rest day".to_string()
        } else {
            fields
                .iter()
                .map(|field| match &field.unit {
                    Some(unit) => format!("{}: {} {}", field.label, field.value, unit),
                    None => format!("{}: {}", field.label, field.value),
                })
                .collect::<Vec<_>>()
                .join(" | ")
        };

        let (button, hint) = match (self.rest_day, self.mode, self.completed) {
            (true, _, _) => (None, None),
            (false, BarMode::View, false) => (
                Some(MARK_COMPLETE),
                Some("Mark as completed to enter your stats"),
            ),
            (false, BarMode::View, true) => (
                Some(EDIT_STATS),
                Some("Edit your stats to correct the recorded run"),
            ),
            (false, BarMode::Edit, _) => (
                Some(SAVE),
                Some("Press save to record the completed run and update the run stats"),
            ),
            (false, BarMode::Saving, _) => (Some(SAVING), None),
        };

        BarView {
            mode: self.mode,
            completed: self.completed,
            rest_day: self.rest_day,
            button: button.map(str::to_string),
            button_disabled: self.mode == BarMode::Saving,
            hint: hint.map(str::to_string),
            fields,
            summary,
            banner: self.completed.then(|| "Run completed".to_string()),
            notice: self.notice.clone(),
        }
    }

    // Interval bars become distance bars before they can be completed:
    // `on` goes, `off` becomes an empty distance, `sets` an empty duration.
    fn reshape_interval(&mut self) {
        if !self.fields.iter().any(|field| field.key == FieldKey::Sets) {
            return;
        }
        self.fields.retain(|field| field.key != FieldKey::On);
        for field in &mut self.fields {
            match field.key {
                FieldKey::Off => *field = StatField::new(FieldKey::Distance, ""),
                FieldKey::Sets => *field = StatField::new(FieldKey::Duration, ""),
                _ => {}
            }
        }
    }

    fn reject(&mut self, err: TransitionError) -> TransitionError {
        self.notice = Some(Notice::failure(err.to_string()));
        err
    }

    fn field_mut(&mut self, key: FieldKey) -> Option<&mut StatField> {
        self.fields.iter_mut().find(|field| field.key == key)
    }

    fn field_value(&self, key: FieldKey) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .map(|field| field.value.as_str())
    }

    fn set_value(&mut self, key: FieldKey, value: String) {
        if let Some(field) = self.field_mut(key) {
            field.value = value;
            field.invalid = false;
        }
    }
}

fn pace_text(raw: Option<&str>) -> String {
    raw.map(format_pace_or_raw).unwrap_or_default()
}
