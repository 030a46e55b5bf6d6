//! Best-effort token normalizers.
//!
//! None of these functions fail. When a token cannot be understood the
//! original text is returned (trimmed) so the record still carries what the
//! report printed.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use incident_report_models::YesNo;
use regex::Regex;

/// Canonical bare date format.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Canonical date-time display format.
pub const DATETIME_FORMAT: &str = "%m/%d/%Y %I:%M %p";

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<month>\d{1,2})/(?P<day>\d{1,2})/(?P<year>\d{4}|\d{2})$").expect("valid regex")
});

static TIMEZONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(?\b(?:[ECMP][SD]T|UTC|GMT)\b\)?").expect("valid regex")
});

static TWELVE_HOUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<date>\d{1,2}/\d{1,2}/\d{2,4})\s+(?P<hour>\d{1,2}):(?P<minute>\d{2})\s*(?P<meridiem>[AaPp])\.?\s*[Mm]\.?$",
    )
    .expect("valid regex")
});

static TWENTY_FOUR_HOUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<date>\d{1,2}/\d{1,2}/\d{2,4})\s+(?P<hour>\d{1,2}):(?P<minute>\d{2})$")
        .expect("valid regex")
});

/// Parses `M/D/YYYY`, `M/D/YY` (and zero-padded variants) into a date.
///
/// Two-digit years map to 2000 + year.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let caps = DATE_RE.captures(raw.trim())?;
    let month: u32 = caps["month"].parse().ok()?;
    let day: u32 = caps["day"].parse().ok()?;
    let mut year: i32 = caps["year"].parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalizes a bare date to `MM/DD/YYYY`, or returns the trimmed input
/// unchanged when it is not a valid calendar date.
#[must_use]
pub fn normalize_date(raw: &str) -> String {
    parse_date(raw).map_or_else(
        || raw.trim().to_string(),
        |date| date.format(DATE_FORMAT).to_string(),
    )
}

/// A normalized incident date-time.
///
/// `display` and `instant` always come from the same source token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDateTime {
    /// Canonical display string, or the trimmed input if unparseable.
    pub display: String,
    /// Parsed instant, if the token was understood.
    pub instant: Option<NaiveDateTime>,
}

impl NormalizedDateTime {
    fn unparsed(raw: &str) -> Self {
        Self {
            display: raw.trim().to_string(),
            instant: None,
        }
    }
}

/// Normalizes `date HH:MM AM|PM` or `date HH:MM` (24-hour) text.
///
/// A timezone marker such as `EST` or `(CDT)` is stripped first.
#[must_use]
pub fn normalize_datetime(raw: &str) -> NormalizedDateTime {
    let stripped = TIMEZONE_RE.replace_all(raw, "");
    let text = stripped.trim();

    parse_twelve_hour(text)
        .or_else(|| parse_twenty_four_hour(text))
        .map_or_else(
            || NormalizedDateTime::unparsed(raw),
            |instant| NormalizedDateTime {
                display: instant.format(DATETIME_FORMAT).to_string(),
                instant: Some(instant),
            },
        )
}

fn parse_twelve_hour(text: &str) -> Option<NaiveDateTime> {
    let caps = TWELVE_HOUR_RE.captures(text)?;
    let date = parse_date(&caps["date"])?;
    let hour: u32 = caps["hour"].parse().ok()?;
    let minute: u32 = caps["minute"].parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let pm = caps["meridiem"].eq_ignore_ascii_case("p");
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Some(date.and_time(NaiveTime::from_hms_opt(hour, minute, 0)?))
}

fn parse_twenty_four_hour(text: &str) -> Option<NaiveDateTime> {
    let caps = TWENTY_FOUR_HOUR_RE.captures(text)?;
    let date = parse_date(&caps["date"])?;
    let hour: u32 = caps["hour"].parse().ok()?;
    let minute: u32 = caps["minute"].parse().ok()?;
    Some(date.and_time(NaiveTime::from_hms_opt(hour, minute, 0)?))
}

/// Recognizes a Y/N-ish token, returning `None` for anything else.
#[must_use]
pub fn parse_yes_no(raw: &str) -> Option<YesNo> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(YesNo::Y),
        "n" | "no" => Some(YesNo::N),
        _ => None,
    }
}

/// Maps a Y/N-ish token to [`YesNo`]; unrecognized text is
/// [`YesNo::Unknown`].
#[must_use]
pub fn normalize_yes_no(raw: &str) -> YesNo {
    parse_yes_no(raw).unwrap_or_default()
}
