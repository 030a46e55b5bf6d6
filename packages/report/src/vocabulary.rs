//! Checklist vocabulary lookups built from the column schema.
//!
//! Each checklist printed on the report (injuries during the incident and
//! the three predisposing-factor lists) maps a normalized phrase to the
//! column slot and canonical label it fills. The tables are built once per
//! process and are read-only afterwards.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::LazyLock;

use incident_report_models::schema::{
    COLUMNS, DURING_INJURY, ENVIRONMENTAL, PHYSIOLOGICAL, SITUATIONAL,
};
use strum_macros::Display;

/// Process-wide vocabulary built from [`COLUMNS`].
pub static VOCABULARY: LazyLock<Vocabulary> = LazyLock::new(|| Vocabulary::from_schema(COLUMNS));

/// Collapses internal whitespace, trims and lowercases a phrase.
#[must_use]
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Column slot and canonical label for one checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyEntry {
    /// Index of the item's column in the schema.
    pub column: usize,
    /// Canonical label as printed in the schema.
    pub label: &'static str,
}

/// One checklist's normalized-phrase lookup table.
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    entries: BTreeMap<String, VocabularyEntry>,
}

impl Lookup {
    /// Builds a lookup from the non-blank labels in `columns[range]`.
    ///
    /// On a normalized-key collision the later column wins.
    #[must_use]
    pub fn build(columns: &[&'static str], range: Range<usize>) -> Self {
        let mut entries = BTreeMap::new();
        let end = range.end.min(columns.len());
        for column in range.start.min(end)..end {
            let label = columns[column];
            if label.trim().is_empty() {
                continue;
            }
            entries.insert(normalize_phrase(label), VocabularyEntry { column, label });
        }
        Self { entries }
    }

    /// Looks up a raw phrase after normalizing it.
    #[must_use]
    pub fn get(&self, phrase: &str) -> Option<&VocabularyEntry> {
        self.entries.get(&normalize_phrase(phrase))
    }

    /// Number of phrases in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no phrases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which predisposing-factor checklist a phrase belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FactorKind {
    /// Environmental factors (floor, lighting, furniture...).
    Environmental,
    /// Physiological factors (confusion, weakness...).
    Physiological,
    /// Situational factors (what the resident was doing).
    Situational,
}

/// All four checklist lookup tables.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    /// Injuries noted during the incident.
    pub during_injury: Lookup,
    /// Predisposing environmental factors.
    pub environmental: Lookup,
    /// Predisposing physiological factors.
    pub physiological: Lookup,
    /// Predisposing situational factors.
    pub situational: Lookup,
}

impl Vocabulary {
    /// Builds all tables from an ordered column schema.
    #[must_use]
    pub fn from_schema(columns: &[&'static str]) -> Self {
        Self {
            during_injury: Lookup::build(columns, DURING_INJURY),
            environmental: Lookup::build(columns, ENVIRONMENTAL),
            physiological: Lookup::build(columns, PHYSIOLOGICAL),
            situational: Lookup::build(columns, SITUATIONAL),
        }
    }

    /// Returns the table for a factor checklist.
    #[must_use]
    pub const fn factors(&self, kind: FactorKind) -> &Lookup {
        match kind {
            FactorKind::Environmental => &self.environmental,
            FactorKind::Physiological => &self.physiological,
            FactorKind::Situational => &self.situational,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whitespace_and_case() {
        assert_eq!(normalize_phrase("  Wet\t  FLOOR "), "wet floor");
        assert_eq!(normalize_phrase(""), "");
    }

    #[test]
    fn every_schema_label_round_trips_through_its_table() {
        let vocab = &*VOCABULARY;
        for (table, range) in [
            (&vocab.during_injury, DURING_INJURY),
            (&vocab.environmental, ENVIRONMENTAL),
            (&vocab.physiological, PHYSIOLOGICAL),
            (&vocab.situational, SITUATIONAL),
        ] {
            for column in range {
                let label = COLUMNS[column];
                if label.is_empty() {
                    continue;
                }
                let noisy = format!("  {}  ", label.to_uppercase().replace(' ', "   "));
                let hit = table.get(&noisy).unwrap();
                assert_eq!(hit.label, label);
                assert_eq!(hit.column, column);
            }
        }
    }

    #[test]
    fn skips_spacer_columns() {
        let vocab = &*VOCABULARY;
        assert_eq!(vocab.environmental.len(), 15);
        assert!(vocab.environmental.get("").is_none());
    }

    #[test]
    fn tables_are_independent() {
        let vocab = &*VOCABULARY;
        assert!(vocab.environmental.get("wet floor").is_some());
        assert!(vocab.physiological.get("wet floor").is_none());
        assert_eq!(
            vocab.factors(FactorKind::Physiological).get("pain").unwrap().column,
            78
        );
        assert_eq!(vocab.during_injury.get("pain").unwrap().column, 22);
    }

    #[test]
    fn later_label_wins_on_collision() {
        let columns: &[&'static str] = &["", "Fall", "FALL"];
        let lookup = Lookup::build(columns, 0..3);
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.get("fall").unwrap().column, 2);
    }

    #[test]
    fn factor_kind_names() {
        assert_eq!(FactorKind::Environmental.to_string(), "environmental");
    }
}
