#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record types recovered from fall-incident report text.
//!
//! A single conversion run produces one [`ReportMetadata`] and an ordered
//! list of [`IncidentEntry`] values. The [`schema`] module defines the fixed
//! spreadsheet column layout that serialization strategies must honour.

pub mod schema;

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A tri-state Y/N marker as printed on the report.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum YesNo {
    /// The report did not carry a recognizable Y/N value.
    #[default]
    #[serde(rename = "unknown")]
    #[strum(serialize = "unknown")]
    Unknown,
    /// Yes
    Y,
    /// No
    N,
}

/// Header fields printed once at the top of the report.
///
/// Every field defaults to an empty string when the report does not carry
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Report print date (`Date:` line).
    pub date: String,
    /// Report print time (`Time:` line).
    pub time: String,
    /// Operator who ran the report (`User:` line).
    pub operator: String,
    /// Facility name, the first plain line after the operator line.
    pub facility: String,
    /// Resident status filter line, verbatim.
    pub resident_status: String,
    /// Incident status filter line, verbatim.
    pub incident_status: String,
    /// Reporting period line, verbatim.
    pub reporting_period: String,
}

/// Predisposing factors checked on an incident, split by checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredisposingFactors {
    /// Canonical environmental factor labels.
    pub environmental: BTreeSet<String>,
    /// Canonical physiological factor labels.
    pub physiological: BTreeSet<String>,
    /// Canonical situational factor labels.
    pub situational: BTreeSet<String>,
}

impl PredisposingFactors {
    /// Returns `true` when no factor of any kind was recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.environmental.is_empty() && self.physiological.is_empty() && self.situational.is_empty()
    }
}

/// One incident record.
///
/// Set members are always canonical checklist labels from
/// [`schema::COLUMNS`], never raw report text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentEntry {
    /// Resident name as printed before the parenthesized identifier.
    pub resident_name: String,
    /// Digits from the parenthesized identifier, or empty.
    pub resident_id: String,
    /// Admission date, normalized when parseable.
    pub admission_date: String,
    /// Incident date-time display string.
    pub incident_datetime: String,
    /// Parsed incident instant. `None` when the display string could not be
    /// parsed; the display string is then kept verbatim.
    pub incident_at: Option<NaiveDateTime>,
    /// Incident location.
    pub location: String,
    /// Room number, e.g. `West 100-1`.
    pub room: String,
    /// Free text following the "Nursing Description" marker.
    pub immediate_action: String,
    /// Free text left over in the pre-section block.
    pub nursing_description: String,
    /// 1-based position after ordering. `None` until the entry list is
    /// assembled.
    pub incident_number: Option<u32>,
    /// Incident status. Not printed on the report, so always empty.
    pub incident_status: String,
    /// Incident type label.
    pub incident_type: String,
    /// Whether the incident was witnessed.
    pub witnessed: YesNo,
    /// Whether the resident was sent to hospital.
    pub sent_to_hospital: YesNo,
    /// Canonical injuries noted during the incident.
    pub injuries_during: BTreeSet<String>,
    /// Canonical injuries noted post incident. Reserved; always empty.
    pub injuries_post: BTreeSet<String>,
    /// Predisposing factors.
    pub factors: PredisposingFactors,
}

impl IncidentEntry {
    /// Returns the sort key instant, treating a missing instant as the
    /// Unix epoch so undated entries order as the oldest.
    #[must_use]
    pub fn sort_instant(&self) -> NaiveDateTime {
        self.incident_at.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_display_matches_report_values() {
        assert_eq!(YesNo::Y.to_string(), "Y");
        assert_eq!(YesNo::N.to_string(), "N");
        assert_eq!(YesNo::Unknown.to_string(), "unknown");
        assert_eq!(YesNo::default(), YesNo::Unknown);
    }

    #[test]
    fn yes_no_serializes_lowercase_unknown() {
        let json = serde_json::to_string(&YesNo::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");
    }

    #[test]
    fn missing_instant_sorts_as_epoch() {
        let entry = IncidentEntry {
            resident_name: String::new(),
            resident_id: String::new(),
            admission_date: String::new(),
            incident_datetime: "garbage".to_string(),
            incident_at: None,
            location: String::new(),
            room: String::new(),
            immediate_action: String::new(),
            nursing_description: String::new(),
            incident_number: None,
            incident_status: String::new(),
            incident_type: String::new(),
            witnessed: YesNo::Unknown,
            sent_to_hospital: YesNo::Unknown,
            injuries_during: BTreeSet::new(),
            injuries_post: BTreeSet::new(),
            factors: PredisposingFactors::default(),
        };
        assert_eq!(entry.sort_instant().to_string(), "1970-01-01 00:00:00");
    }
}
