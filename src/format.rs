use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// H:MM:SS[.ffffff], optionally prefixed with "N day(s), ".
static CLOCK_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+) days?, )?(\d+):(\d{1,2}):(\d{1,2}(?:\.\d+)?)$")
        .expect("clock duration pattern")
});

static SHORT_DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):(\d{1,2}(?:\.\d+)?)$").expect("short duration pattern"));

// P0DT00H04M17.352941S
static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$")
        .expect("iso duration pattern")
});

pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// `2024-03-05` -> `05/03/24`
pub fn format_date(raw: &str) -> Option<String> {
    parse_iso_date(raw).map(|date| date.format("%d/%m/%y").to_string())
}

pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}

pub fn month_of(raw: &str) -> Option<u32> {
    parse_iso_date(raw).map(|date| date.month())
}

/// Total seconds in a serialized duration. Accepts the `H:MM:SS.ffffff`
/// form, plain `MM:SS`, and ISO-8601 `P..DT..H..M..S`.
pub fn duration_seconds(raw: &str) -> Option<f64> {
    let raw = raw.trim();

    if let Some(caps) = CLOCK_DURATION.captures(raw) {
        let days = caps.get(1).map_or(Ok(0.0), |m| m.as_str().parse::<f64>()).ok()?;
        let hours: f64 = caps[2].parse().ok()?;
        let minutes: f64 = caps[3].parse().ok()?;
        let seconds: f64 = caps[4].parse().ok()?;
        return Some(((days * 24.0 + hours) * 60.0 + minutes) * 60.0 + seconds);
    }

    if let Some(caps) = SHORT_DURATION.captures(raw) {
        let minutes: f64 = caps[1].parse().ok()?;
        let seconds: f64 = caps[2].parse().ok()?;
        return Some(minutes * 60.0 + seconds);
    }

    let caps = ISO_DURATION.captures(raw)?;
    if raw == "P" || raw.ends_with('T') {
        return None;
    }
    let part = |index: usize| -> Option<f64> {
        caps.get(index).map_or(Some(0.0), |m| m.as_str().parse().ok())
    };
    let total = ((part(1)? * 24.0 + part(2)?) * 60.0 + part(3)?) * 60.0 + part(4)?;
    Some(total)
}

/// Reduce a duration to `MM:SS`, rounding to the nearest second. Hours fold
/// into the minutes.
pub fn format_pace(raw: &str) -> Option<String> {
    let seconds = duration_seconds(raw)?;
    let total = seconds.round() as u64;
    Some(format!("{:02}:{:02}", total / 60, total % 60))
}

pub fn format_pace_or_raw(raw: &str) -> String {
    format_pace(raw).unwrap_or_else(|| raw.to_string())
}

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        4..=11 => "morning",
        12..=16 => "afternoon",
        17..=22 => "evening",
        _ => "night",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_use_two_digit_years() {
        assert_eq!(format_date("2024-03-05").as_deref(), Some("05/03/24"));
        assert_eq!(format_date("1999-12-31").as_deref(), Some("31/12/99"));
        assert_eq!(format_date("2100-01-09").as_deref(), Some("09/01/00"));
        assert_eq!(format_date("05/03/2024"), None);
        assert_eq!(format_date("2024-13-01"), None);
    }

    #[test]
    fn months_map_to_english_names() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
        assert_eq!(month_of("2024-07-14"), Some(7));
    }

    #[test]
    fn pace_rounds_fractional_seconds() {
        assert_eq!(format_pace("0:04:17.352941").as_deref(), Some("04:17"));
        assert_eq!(format_pace("0:05:02.5").as_deref(), Some("05:03"));
        assert_eq!(format_pace("0:06:00").as_deref(), Some("06:00"));
    }

    #[test]
    fn pace_carries_rounded_minute() {
        assert_eq!(format_pace("0:04:59.6").as_deref(), Some("05:00"));
    }

    #[test]
    fn pace_folds_hours_into_minutes() {
        assert_eq!(format_pace("1:02:03").as_deref(), Some("62:03"));
    }

    #[test]
    fn pace_reads_iso_durations() {
        assert_eq!(format_pace("P0DT00H04M17.352941S").as_deref(), Some("04:17"));
        assert_eq!(format_pace("PT5M").as_deref(), Some("05:00"));
        assert_eq!(format_pace("P"), None);
        assert_eq!(format_pace("PT"), None);
    }

    #[test]
    fn pace_reads_short_form() {
        assert_eq!(format_pace("4:07").as_deref(), Some("04:07"));
        assert_eq!(format_pace("garbage"), None);
        assert_eq!(format_pace_or_raw("garbage"), "garbage");
    }

    #[test]
    fn greeting_follows_time_of_day() {
        assert_eq!(greeting(4), "morning");
        assert_eq!(greeting(12), "afternoon");
        assert_eq!(greeting(17), "evening");
        assert_eq!(greeting(23), "night");
        assert_eq!(greeting(2), "night");
    }
}
