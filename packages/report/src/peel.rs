//! Backward peeling of an entry's pre-section block.
//!
//! The lines before the "Nursing Description" marker end with a fixed
//! sequence of positional fields. Read from the bottom up:
//!
//! 1. zero or more lines of during-incident injuries,
//! 2. an optional sent-to-hospital Y/N token,
//! 3. the room line,
//! 4. an optional witnessed Y/N token,
//! 5. the location line.
//!
//! Whatever remains above those is free text. Each field is a [`PeelStep`]
//! so a vendor variant can use its own sequence; [`Peeler::MULTI_LINE`] and
//! [`Peeler::INLINE`] cover the known layouts.
//!
//! The room and location steps are positional: they take the last
//! remaining line whatever it contains. On a short block this can put the
//! location text into the room field.

use incident_report_models::YesNo;

use crate::normalize::parse_yes_no;
use crate::vocabulary::Lookup;

/// Fields peeled off a pre-section block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Peeled {
    /// Canonical injury labels, in top-to-bottom source order.
    pub injuries: Vec<&'static str>,
    /// Sent-to-hospital flag.
    pub sent_to_hospital: YesNo,
    /// Room line, if one was consumed.
    pub room: Option<String>,
    /// Witnessed flag.
    pub witnessed: YesNo,
    /// Location line, if one was consumed.
    pub location: Option<String>,
    /// Remaining free-text lines, in source order.
    pub remainder: Vec<String>,
}

/// Pops trailing lines whose every comma-separated phrase is a known
/// injury, returning the canonical labels in source order.
pub fn trailing_injuries(block: &mut &[String], lookup: &Lookup) -> Vec<&'static str> {
    let mut injuries = Vec::new();
    while let Some((last, rest)) = block.split_last() {
        let Some(mut labels) = injury_line(last, lookup) else {
            break;
        };
        labels.append(&mut injuries);
        injuries = labels;
        *block = rest;
    }
    injuries
}

fn injury_line(line: &str, lookup: &Lookup) -> Option<Vec<&'static str>> {
    let labels = line
        .split(',')
        .map(|phrase| lookup.get(phrase).map(|entry| entry.label))
        .collect::<Option<Vec<_>>>()?;
    (!labels.is_empty()).then_some(labels)
}

/// Pops the last line if it is a Y/N token.
pub fn yes_no_flag(block: &mut &[String]) -> YesNo {
    let Some((last, rest)) = block.split_last() else {
        return YesNo::Unknown;
    };
    match parse_yes_no(last) {
        Some(flag) => {
            *block = rest;
            flag
        }
        None => YesNo::Unknown,
    }
}

/// Pops the last line unconditionally.
pub fn positional(block: &mut &[String]) -> Option<String> {
    let (last, rest) = block.split_last()?;
    *block = rest;
    Some(last.trim().to_string())
}

/// One named peeling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeelStep {
    /// [`trailing_injuries`]
    Injuries,
    /// [`yes_no_flag`] into the sent-to-hospital field.
    SentToHospital,
    /// [`positional`] into the room field.
    Room,
    /// [`yes_no_flag`] into the witnessed field.
    Witnessed,
    /// [`positional`] into the location field.
    Location,
}

impl PeelStep {
    fn apply(self, block: &mut &[String], injuries: &Lookup, out: &mut Peeled) {
        match self {
            Self::Injuries => out.injuries = trailing_injuries(block, injuries),
            Self::SentToHospital => out.sent_to_hospital = yes_no_flag(block),
            Self::Room => out.room = positional(block),
            Self::Witnessed => out.witnessed = yes_no_flag(block),
            Self::Location => out.location = positional(block),
        }
    }
}

/// An ordered sequence of [`PeelStep`]s applied from the end of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peeler {
    steps: &'static [PeelStep],
}

impl Peeler {
    /// Multi-line layout: room and location sit above the flags.
    pub const MULTI_LINE: Self = Self::new(&[
        PeelStep::Injuries,
        PeelStep::SentToHospital,
        PeelStep::Room,
        PeelStep::Witnessed,
        PeelStep::Location,
    ]);

    /// Inline layout: room and location were already read from the start
    /// line, so only the flags and injuries are peeled.
    pub const INLINE: Self = Self::new(&[
        PeelStep::Injuries,
        PeelStep::SentToHospital,
        PeelStep::Witnessed,
    ]);

    /// Creates a peeler from an explicit step sequence.
    #[must_use]
    pub const fn new(steps: &'static [PeelStep]) -> Self {
        Self { steps }
    }

    /// Runs every step against `lines` and returns the peeled fields.
    #[must_use]
    pub fn peel(&self, lines: &[String], injuries: &Lookup) -> Peeled {
        let mut block = lines;
        let mut out = Peeled::default();
        for step in self.steps {
            step.apply(&mut block, injuries, &mut out);
        }
        out.remainder = block.to_vec();
        out
    }
}
