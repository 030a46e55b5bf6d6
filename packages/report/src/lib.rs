#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Heuristic parser for fall-incident report text.
//!
//! Incident reports arrive as PDF documents whose extracted text has no
//! field delimiters. This crate recovers a [`ReportMetadata`] header and a
//! list of [`IncidentEntry`] records from that line stream using token
//! shape (dates, Y/N markers, parenthesized IDs), checklist vocabulary
//! lookups and positional rules for the known vendor layouts.
//!
//! The primary entry point is [`ReportParser`]. It holds only immutable
//! configuration, so one parser can convert many documents concurrently.

pub mod assemble;
pub mod boundary;
pub mod config;
pub mod entry;
pub mod factors;
pub mod lines;
pub mod metadata;
pub mod normalize;
pub mod peel;
pub mod vocabulary;

use incident_report_models::{IncidentEntry, ReportMetadata};
use serde::Serialize;

pub use config::ParserConfig;

use crate::boundary::RoomPattern;
use crate::vocabulary::VOCABULARY;

/// Errors surfaced by the parser.
///
/// Malformed fields never produce an error; they degrade to empty or
/// best-effort values. Only a whole document can be rejected.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The leading entries all lack a parseable value for `field`, so the
    /// document is probably an unrecognized layout.
    #[error(
        "{source_id}: could not read {field} for rows {rows:?}{}",
        merged_hint(.merged_columns)
    )]
    Unparseable {
        /// Identifier of the source document.
        source_id: String,
        /// 1-based rows (in source order) that were inspected.
        rows: Vec<usize>,
        /// Name of the missing field.
        field: &'static str,
        /// Whether the failure looks like the merged-columns layout, where
        /// adjacent date columns are extracted with no gap between them.
        merged_columns: bool,
    },

    /// A configuration value cannot drive the parser.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },

    /// The configuration file is not valid TOML for [`ParserConfig`].
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn merged_hint(merged_columns: &bool) -> &'static str {
    if *merged_columns {
        " (date columns appear merged; this report layout is not supported)"
    } else {
        ""
    }
}

/// A parsed report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedReport {
    /// Header fields.
    pub metadata: ReportMetadata,
    /// Incident entries.
    pub entries: Vec<IncidentEntry>,
}

/// Converts extracted report lines into records.
#[derive(Debug, Clone)]
pub struct ReportParser {
    config: ParserConfig,
    rooms: RoomPattern,
}

impl Default for ReportParser {
    fn default() -> Self {
        Self {
            config: ParserConfig::default(),
            rooms: RoomPattern::default(),
        }
    }
}

impl ReportParser {
    /// Creates a parser for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`] if the configuration is
    /// unusable.
    pub fn new(config: ParserConfig) -> Result<Self, ReportError> {
        config.validate()?;
        let rooms = RoomPattern::new(&config.room_wings)?;
        Ok(Self { config, rooms })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses header fields and entries, leaving entries in source order and
    /// unnumbered.
    #[must_use]
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> ParsedReport {
        let lines: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
        let metadata = crate::metadata::extract_metadata(&lines);

        let mut entries = Vec::new();
        let mut index = 0;
        while index < lines.len() {
            if !crate::lines::is_entry_boundary(lines[index]) {
                index += 1;
                continue;
            }
            let parsed = crate::entry::parse_entry(
                &lines,
                index,
                &self.rooms,
                &VOCABULARY,
                &self.config.incident_type,
            );
            entries.push(parsed.entry);
            index = parsed.next;
        }

        ParsedReport { metadata, entries }
    }

    /// Parses, validates and orders a document's lines.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Unparseable`] when the first
    /// [`ParserConfig::validation_sample`] entries all lack a parseable
    /// incident date-time.
    pub fn convert<S: AsRef<str>>(
        &self,
        source_id: &str,
        lines: &[S],
    ) -> Result<ParsedReport, ReportError> {
        let ParsedReport { metadata, entries } = self.parse(lines);
        assemble::validate_entries(source_id, &entries, self.config.validation_sample)?;
        let entries = assemble::order_entries(entries);

        log::info!(
            "{source_id}: parsed {} entries for facility {:?}",
            entries.len(),
            metadata.facility
        );

        Ok(ParsedReport { metadata, entries })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn inline_report() -> Vec<&'static str> {
        vec![
            "Incident by Incident Type",
            "Date: 03/05/2024",
            "Time: 9:14 AM",
            "User: Pat Smith",
            "Sunrise Care Center",
            "Reporting Period: 02/01/2024 - 02/29/2024",
            "Resident Name Admission Date Incident Date/Time Location",
            "Jane Doe (12345)3/1/2024 3/2/2024 2:15PM Common RoomWest 100-1",
            "Resident found on floor near chair.",
            "Y",
            "N",
            "Nursing Description",
            "Assisted to chair, no distress noted.",
            "Notes",
            "Predisposing Environmental Factors: Wet Floor, Poor Lighting",
            "Page 1 of 1",
            "Total Falls: 1",
        ]
    }

    fn undated_entry(name: &str, id: u32) -> Vec<String> {
        vec![
            format!("{name} ({id})"),
            "unknown".to_string(),
            "not recorded".to_string(),
            "Hallway".to_string(),
            "East 1".to_string(),
            "Nursing Description".to_string(),
            "Notes".to_string(),
        ]
    }

    #[test]
    fn converts_single_inline_entry() {
        let report = ReportParser::default()
            .convert("inline.pdf", &inline_report())
            .unwrap();
        assert_eq!(report.metadata.facility, "Sunrise Care Center");
        assert_eq!(report.entries.len(), 1);

        let entry = &report.entries[0];
        assert_eq!(entry.resident_id, "12345");
        assert_eq!(entry.location, "Common Room");
        assert_eq!(entry.room, "West 100-1");
        assert_eq!(
            entry.factors.environmental,
            ["Wet Floor", "Poor Lighting"]
                .into_iter()
                .map(String::from)
                .collect::<BTreeSet<_>>()
        );
        assert_eq!(entry.incident_number, Some(1));
    }

    #[test]
    fn narrative_with_parenthesized_numbers_stays_one_entry() {
        let lines = [
            "Jane Doe (12345)3/1/2024 3/2/2024 2:15PM Common RoomWest 100-1",
            "Nursing Description",
            "Vitals taken (BP 120/80), resident assisted to bed.",
            "Notes",
            "Predisposing Environmental Factors: Wet Floor",
        ];
        let report = ReportParser::default().convert("vitals.pdf", &lines).unwrap();
        assert_eq!(report.entries.len(), 1);
        let entry = &report.entries[0];
        assert_eq!(entry.resident_name, "Jane Doe");
        assert_eq!(
            entry.immediate_action,
            "Vitals taken (BP 120/80), resident assisted to bed."
        );
        assert!(entry.factors.environmental.contains("Wet Floor"));
    }

    #[test]
    fn timezone_suffixed_datetimes_do_not_split_entries() {
        let lines: Vec<String> = (0..5)
            .flat_map(|i| {
                vec![
                    format!("Resident {i} ({})", 100 + i),
                    "1/5/2024".to_string(),
                    format!("2/{}/2024 6:30 PM (EST)", 10 + i),
                    "Bathroom".to_string(),
                    "East 2".to_string(),
                    "Nursing Description".to_string(),
                    "Notes".to_string(),
                ]
            })
            .collect();
        let report = ReportParser::default().convert("tz.pdf", &lines).unwrap();
        assert_eq!(report.entries.len(), 5);
        assert!(report.entries.iter().all(|e| e.incident_at.is_some()));
        assert_eq!(report.entries[0].resident_name, "Resident 4");
    }

    #[test]
    fn default_parser_matches_default_config() {
        let from_config = ReportParser::new(ParserConfig::default()).unwrap();
        let lines = inline_report();
        assert_eq!(
            ReportParser::default().convert("a.pdf", &lines).unwrap(),
            from_config.convert("a.pdf", &lines).unwrap()
        );
    }

    #[test]
    fn rejects_five_undated_entries() {
        let lines: Vec<String> = (0..5)
            .flat_map(|i| undated_entry(&format!("Resident {i}"), 100 + i))
            .collect();
        let err = ReportParser::default().convert("bad.pdf", &lines).unwrap_err();
        assert!(matches!(err, ReportError::Unparseable { ref rows, .. } if rows.len() == 5));
    }

    #[test]
    fn one_dated_entry_rescues_document() {
        let mut lines: Vec<String> = (0..5)
            .flat_map(|i| undated_entry(&format!("Resident {i}"), 100 + i))
            .collect();
        lines[2] = "3/4/2024 10:30 AM".to_string();
        let report = ReportParser::default().convert("ok.pdf", &lines).unwrap();
        assert_eq!(report.entries.len(), 5);
        assert_eq!(report.entries[0].resident_name, "Resident 0");
        assert_eq!(report.entries[0].incident_number, Some(1));
        assert_eq!(report.entries[1].resident_name, "Resident 4");
    }

    #[test]
    fn parsing_is_repeatable() {
        let parser = ReportParser::default();
        let first = parser.convert("a.pdf", &inline_report()).unwrap();
        let second = parser.convert("a.pdf", &inline_report()).unwrap();
        assert_eq!(first, second);
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    #[test]
    fn parse_leaves_entries_unnumbered() {
        let report = ReportParser::default().parse(&inline_report());
        assert_eq!(report.entries[0].incident_number, None);
    }

    #[test]
    fn configured_incident_type_is_stamped() {
        let config = ParserConfig {
            incident_type: "Falls - Witnessed".to_string(),
            ..ParserConfig::default()
        };
        let report = ReportParser::new(config).unwrap().parse(&inline_report());
        assert_eq!(report.entries[0].incident_type, "Falls - Witnessed");
    }

    #[test]
    fn rejects_blank_wing_config() {
        let config = ParserConfig {
            room_wings: vec![" ".to_string()],
            ..ParserConfig::default()
        };
        assert!(matches!(
            ReportParser::new(config),
            Err(ReportError::InvalidConfig { .. })
        ));
    }
}
