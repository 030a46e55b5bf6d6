//! Report header extraction.
//!
//! The header block carries the print date/time, the operator, the facility
//! name and a few filter lines. Each field is taken from its first
//! occurrence; missing fields stay empty.

use std::sync::LazyLock;

use incident_report_models::ReportMetadata;
use regex::Regex;

use crate::lines::{is_page_marker, starts_with_ignore_case};

const DATE_PREFIX: &str = "Date:";
const TIME_PREFIX: &str = "Time:";
const USER_PREFIX: &str = "User:";

const RESIDENT_STATUS_LABELS: &[&str] = &["Resident Status"];
const INCIDENT_STATUS_LABELS: &[&str] = &["Incident Status"];
const REPORTING_PERIOD_LABELS: &[&str] = &["Reporting Period", "Incident Date Range", "Date Range"];

static LABEL_COLON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*:\s*").expect("valid regex"));

/// Tidies the spacing around a label's colon and collapses runs of
/// whitespace: `"Resident Status :Current"` becomes
/// `"Resident Status: Current"`.
#[must_use]
pub fn normalize_label_spacing(line: &str) -> String {
    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
    LABEL_COLON_RE
        .replacen(&collapsed, 1, ": ")
        .trim()
        .to_string()
}

fn labeled_value<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix).map(str::trim)
}

fn has_any_label(line: &str, labels: &[&str]) -> bool {
    labels.iter().any(|label| starts_with_ignore_case(line, label))
}

fn is_facility_candidate(line: &str) -> bool {
    !line.contains(':') && !line.contains("Incident") && !is_page_marker(line)
}

/// Scans the line stream once for header fields.
///
/// The facility is only accepted after the operator line has been seen, so
/// a name-like line earlier in the header is never mistaken for it. The scan
/// stops as soon as both the reporting period and the facility are known.
#[must_use]
pub fn extract_metadata<S: AsRef<str>>(lines: &[S]) -> ReportMetadata {
    let mut meta = ReportMetadata::default();
    let mut seen_operator = false;

    for raw in lines {
        let line = raw.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        if let Some(value) = labeled_value(line, DATE_PREFIX) {
            if meta.date.is_empty() {
                meta.date = value.to_string();
            }
        } else if let Some(value) = labeled_value(line, TIME_PREFIX) {
            if meta.time.is_empty() {
                meta.time = value.to_string();
            }
        } else if let Some(value) = labeled_value(line, USER_PREFIX) {
            if !seen_operator {
                meta.operator = value.to_string();
                seen_operator = true;
            }
        } else if has_any_label(line, RESIDENT_STATUS_LABELS) {
            if meta.resident_status.is_empty() {
                meta.resident_status = normalize_label_spacing(line);
            }
        } else if has_any_label(line, INCIDENT_STATUS_LABELS) {
            if meta.incident_status.is_empty() {
                meta.incident_status = normalize_label_spacing(line);
            }
        } else if has_any_label(line, REPORTING_PERIOD_LABELS) {
            if meta.reporting_period.is_empty() {
                meta.reporting_period = normalize_label_spacing(line);
            }
        } else if seen_operator && meta.facility.is_empty() && is_facility_candidate(line) {
            meta.facility = line.to_string();
        }

        if !meta.reporting_period.is_empty() && !meta.facility.is_empty() {
            break;
        }
    }

    log::debug!(
        "Extracted report metadata: facility={:?} operator={:?} period={:?}",
        meta.facility,
        meta.operator,
        meta.reporting_period
    );

    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<&'static str> {
        vec![
            "Incident by Incident Type",
            "Date: 03/05/2024",
            "Time: 9:14 AM",
            "",
            "User: Pat Smith",
            "Sunrise Care Center",
            "Resident Status :  Current",
            "Incident Status:All",
            "Reporting Period: 02/01/2024 - 02/29/2024",
            "Jane Doe (12345)",
        ]
    }

    #[test]
    fn extracts_all_header_fields() {
        let meta = extract_metadata(&header());
        assert_eq!(meta.date, "03/05/2024");
        assert_eq!(meta.time, "9:14 AM");
        assert_eq!(meta.operator, "Pat Smith");
        assert_eq!(meta.facility, "Sunrise Care Center");
        assert_eq!(meta.resident_status, "Resident Status: Current");
        assert_eq!(meta.incident_status, "Incident Status: All");
        assert_eq!(
            meta.reporting_period,
            "Reporting Period: 02/01/2024 - 02/29/2024"
        );
    }

    #[test]
    fn facility_requires_operator_first() {
        let meta = extract_metadata(&["Oak Manor", "User: Kim", "Page 1 of 2", "Maple Grove"]);
        assert_eq!(meta.facility, "Maple Grove");
        assert_eq!(meta.operator, "Kim");
    }

    #[test]
    fn facility_skips_incident_and_labeled_lines() {
        let meta = extract_metadata(&["User: Kim", "Incident by Type", "Unit: 2", "Maple Grove"]);
        assert_eq!(meta.facility, "Maple Grove");
    }

    #[test]
    fn first_occurrence_wins() {
        let meta = extract_metadata(&["Date: 1/1/2024", "Date: 2/2/2024", "User: A", "User: B"]);
        assert_eq!(meta.date, "1/1/2024");
        assert_eq!(meta.operator, "A");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let meta = extract_metadata::<&str>(&[]);
        assert_eq!(meta, ReportMetadata::default());
    }

    #[test]
    fn stops_after_period_and_facility() {
        let mut lines = header();
        lines.push("Resident Status: Discharged");
        let meta = extract_metadata(&lines);
        assert_eq!(meta.resident_status, "Resident Status: Current");
    }
}
