//! Entry start lines and their layout.
//!
//! Every entry starts with `Name (ID)`. What follows the closing parenthesis
//! decides the layout: report vendors either pack the admission date,
//! incident date-time, location and room onto that same line (inline), or
//! spread them over the following lines (multi-line).

use std::sync::LazyLock;

use regex::Regex;

use crate::ReportError;

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Admission date immediately followed by an incident date-time. Adjacent
/// dates may be fused with no whitespace between them.
static INLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<admission>\d{1,2}/\d{1,2}/\d{2,4})\s*(?P<incident>\d{1,2}/\d{1,2}/\d{2,4}\s+\d{1,2}:\d{2}(?:\s*[AaPp]\.?[Mm]\b\.?)?(?:\s*\(?(?:[ECMP][SD]T|UTC|GMT)\b\)?)?)(?P<trailing>.*)$",
    )
    .expect("valid regex")
});

static LEADING_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<date>\d{1,2}/\d{1,2}/\d{2,4})(?P<rest>.*)$").expect("valid regex")
});

/// The parts of an entry start line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHead {
    /// Text before the first `(`.
    pub resident_name: String,
    /// First run of digits inside the parentheses, or empty.
    pub resident_id: String,
    /// Text after the closing parenthesis.
    pub rest: String,
}

/// Splits an entry start line into name, identifier and remainder.
///
/// A missing closing parenthesis leaves the remainder empty; a missing
/// digit run leaves the identifier empty.
#[must_use]
pub fn split_head(line: &str) -> EntryHead {
    let line = line.trim();
    let Some((name, after_open)) = line.split_once('(') else {
        return EntryHead {
            resident_name: line.to_string(),
            resident_id: String::new(),
            rest: String::new(),
        };
    };

    let (inside, rest) = after_open
        .split_once(')')
        .unwrap_or((after_open, ""));

    EntryHead {
        resident_name: name.trim().to_string(),
        resident_id: DIGITS_RE
            .find(inside)
            .map_or_else(String::new, |m| m.as_str().to_string()),
        rest: rest.trim().to_string(),
    }
}

/// How an entry's positional fields are laid out.
///
/// A start line carrying both dates but no location text is multi-line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Everything on the start line.
    Inline {
        /// Raw admission date token.
        admission: String,
        /// Raw incident date-time token.
        incident: String,
        /// Location, possibly fused with the room suffix.
        trailing: String,
    },
    /// Fields on the following lines. A leading date on the start line is
    /// the admission date, and any text after it is the incident date-time.
    MultiLine {
        /// Admission date found on the start line, if any.
        admission: Option<String>,
        /// Incident date-time text found on the start line, if any.
        incident: Option<String>,
    },
}

impl Layout {
    /// Returns `true` for [`Layout::Inline`].
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }
}

/// Decides the layout from the text after the closing parenthesis.
#[must_use]
pub fn detect_layout(rest: &str) -> Layout {
    if let Some(caps) = INLINE_RE.captures(rest) {
        let admission = caps["admission"].to_string();
        let incident = caps["incident"].trim().to_string();
        let trailing = caps["trailing"].trim();
        // Both dates but nothing after them: location and room follow on
        // their own lines.
        if trailing.is_empty() {
            return Layout::MultiLine {
                admission: Some(admission),
                incident: Some(incident),
            };
        }
        return Layout::Inline {
            admission,
            incident,
            trailing: trailing.to_string(),
        };
    }

    if let Some(caps) = LEADING_DATE_RE.captures(rest) {
        let incident = caps["rest"].trim();
        return Layout::MultiLine {
            admission: Some(caps["date"].to_string()),
            incident: (!incident.is_empty()).then(|| incident.to_string()),
        };
    }

    Layout::MultiLine {
        admission: None,
        incident: None,
    }
}

fn room_pattern_source(alternation: &str) -> String {
    format!(r"(?P<wing>{alternation})\s*(?P<number>\d+(?:-\d+)?)\s*$")
}

/// Room pattern for the stock `East`/`West` wings.
static DEFAULT_ROOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&room_pattern_source("East|West")).expect("valid regex"));

/// Splits a trailing `<Wing> <number>[-<number>]` room suffix off a
/// location string.
#[derive(Debug, Clone)]
pub struct RoomPattern {
    re: Regex,
}

impl Default for RoomPattern {
    /// The pattern for the default `East` and `West` wings.
    fn default() -> Self {
        Self {
            re: DEFAULT_ROOM_RE.clone(),
        }
    }
}

impl RoomPattern {
    /// Builds the pattern for the given wing names.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`] if no wings are given or the
    /// pattern cannot be compiled.
    pub fn new<S: AsRef<str>>(wings: &[S]) -> Result<Self, ReportError> {
        if wings.is_empty() {
            return Err(ReportError::InvalidConfig {
                message: "at least one room wing is required".to_string(),
            });
        }
        let alternation = wings
            .iter()
            .map(|w| regex::escape(w.as_ref().trim()))
            .collect::<Vec<_>>()
            .join("|");
        let re = Regex::new(&room_pattern_source(&alternation)).map_err(|e| ReportError::InvalidConfig {
            message: format!("invalid room pattern: {e}"),
        })?;
        Ok(Self { re })
    }

    /// Splits `text` into `(location, room)`.
    ///
    /// Without a room suffix the whole text is the location and the room is
    /// `None`. The room is rendered as `"<Wing> <number>"` whether or not
    /// the source separated the two.
    #[must_use]
    pub fn split(&self, text: &str) -> (String, Option<String>) {
        let text = text.trim();
        let Some(caps) = self.re.captures(text) else {
            return (text.to_string(), None);
        };
        let Some(whole) = caps.get(0) else {
            return (text.to_string(), None);
        };
        let room = format!("{} {}", &caps["wing"], &caps["number"]);
        (text[..whole.start()].trim().to_string(), Some(room))
    }
}
