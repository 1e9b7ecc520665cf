use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(?:\.\d+)?$").expect("number pattern"));

static PACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2})$").expect("pace pattern"));

/// Integer or decimal, floored to a whole number. Surrounding whitespace
/// (a textarea's trailing newline) is ignored.
pub fn whole_number(raw: &str) -> Option<u32> {
    let caps = NUMBER.captures(raw.trim())?;
    caps[1].parse().ok()
}

/// `m:ss` or `mm:ss`, re-padded to `mm:ss`. Seconds must be below 60.
pub fn pace(raw: &str) -> Option<String> {
    let caps = PACE.captures(raw.trim())?;
    let minutes: u32 = caps[1].parse().ok()?;
    let seconds: u32 = caps[2].parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    Some(format!("{minutes:02}:{seconds:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_number_accepts_integers_and_decimals() {
        assert_eq!(whole_number("8"), Some(8));
        assert_eq!(whole_number("8.0"), Some(8));
        assert_eq!(whole_number("8.9"), Some(8));
        assert_eq!(whole_number(" 12\n"), Some(12));
    }

    #[test]
    fn whole_number_rejects_garbage() {
        for raw in ["", "abc", "-3", "   ", "8.", ".5", "8 0", "1e3", "99999999999"] {
            assert_eq!(whole_number(raw), None, "{raw:?} should be rejected");
        }
    }

    #[test]
    fn pace_pads_components() {
        assert_eq!(pace("04:17").as_deref(), Some("04:17"));
        assert_eq!(pace("4:7").as_deref(), Some("04:07"));
        assert_eq!(pace("12:05\n").as_deref(), Some("12:05"));
    }

    #[test]
    fn pace_rejects_anything_else() {
        for raw in ["4 17", "-4:17", "4:17:00", "", "417", "4:60", "4 :17", "abc:de", "123:45"] {
            assert_eq!(pace(raw), None, "{raw:?} should be rejected");
        }
    }
}
