//! Predisposing-factor section collector.
//!
//! After an entry's `Notes` marker the report prints up to three labeled
//! checklist sections ("Predisposing Environmental Factors: ...", etc.)
//! whose items may wrap onto continuation lines. The collector walks those
//! lines as a small state machine and stops, without consuming it, at the
//! next entry's start line.

use std::collections::BTreeSet;

use incident_report_models::PredisposingFactors;

use crate::lines::{NOTES_MARKER, is_entry_boundary, is_marker, is_noise};
use crate::vocabulary::{FactorKind, Vocabulary};

/// Section headers and the checklist each one opens.
const SECTION_HEADERS: &[(&str, FactorKind)] = &[
    ("predisposing environmental", FactorKind::Environmental),
    ("predisposing physiological", FactorKind::Physiological),
    ("predisposing situation", FactorKind::Situational),
];

/// Result of scanning one entry's factor sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactorScan {
    /// Recognized factors.
    pub factors: PredisposingFactors,
    /// Index of the first line the collector did not consume: the next
    /// entry's start line, or the end of input.
    pub resume_at: usize,
}

fn section_header(line: &str) -> Option<FactorKind> {
    let lower = line.to_ascii_lowercase();
    SECTION_HEADERS
        .iter()
        .find(|(header, _)| lower.contains(header))
        .map(|(_, kind)| *kind)
}

fn after_colon(line: &str) -> &str {
    line.split_once(':').map_or(line, |(_, rest)| rest)
}

fn factor_set(factors: &mut PredisposingFactors, kind: FactorKind) -> &mut BTreeSet<String> {
    match kind {
        FactorKind::Environmental => &mut factors.environmental,
        FactorKind::Physiological => &mut factors.physiological,
        FactorKind::Situational => &mut factors.situational,
    }
}

/// Looks up each comma-separated phrase of `text` in the `kind` checklist
/// and adds canonical hits to the matching set.
fn add_phrases(
    text: &str,
    kind: FactorKind,
    vocabulary: &Vocabulary,
    factors: &mut PredisposingFactors,
) {
    let lookup = vocabulary.factors(kind);
    for phrase in text.split(',') {
        let phrase = phrase.trim().trim_end_matches(['.', ';']);
        if phrase.is_empty() {
            continue;
        }
        match lookup.get(phrase) {
            Some(entry) => {
                factor_set(factors, kind).insert(entry.label.to_string());
            }
            None => log::debug!("Unrecognized {kind} factor phrase {phrase:?}"),
        }
    }
}

/// Scans factor sections starting at `start`.
///
/// Blank lines, page furniture and stray `Notes` markers are skipped. Text
/// outside any section is ignored.
#[must_use]
pub fn scan_factors<S: AsRef<str>>(
    lines: &[S],
    start: usize,
    vocabulary: &Vocabulary,
) -> FactorScan {
    let mut factors = PredisposingFactors::default();
    let mut section: Option<FactorKind> = None;

    for (index, raw) in lines.iter().enumerate().skip(start) {
        let line = raw.as_ref().trim();
        if line.is_empty() || is_noise(line) {
            continue;
        }

        if let Some(kind) = section_header(line) {
            section = Some(kind);
            if line.contains(':') {
                add_phrases(after_colon(line), kind, vocabulary, &mut factors);
            }
            continue;
        }

        if is_marker(line, NOTES_MARKER) {
            continue;
        }

        if is_entry_boundary(line) {
            return FactorScan {
                factors,
                resume_at: index,
            };
        }

        if let Some(kind) = section {
            add_phrases(after_colon(line), kind, vocabulary, &mut factors);
        }
    }

    FactorScan {
        factors,
        resume_at: lines.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::VOCABULARY;

    #[test]
    fn collects_sections_and_continuations() {
        let lines = [
            "Resident states she slipped.",
            "Predisposing Environmental Factors: Wet Floor, Poor Lighting",
            "Clutter",
            "Page 2 of 3",
            "Predisposing Physiological Factors:",
            "Confused, Weakness, Hungry",
            "Predisposing Situation Factors: Toileting",
            "",
            "Total Falls: 2",
        ];
        let scan = scan_factors(&lines, 0, &VOCABULARY);
        assert_eq!(scan.resume_at, lines.len());
        assert_eq!(
            scan.factors.environmental.iter().collect::<Vec<_>>(),
            ["Clutter", "Poor Lighting", "Wet Floor"]
        );
        assert_eq!(
            scan.factors.physiological.iter().collect::<Vec<_>>(),
            ["Confused", "Weakness"]
        );
        assert_eq!(
            scan.factors.situational.iter().collect::<Vec<_>>(),
            ["Toileting"]
        );
    }

    #[test]
    fn stops_at_next_entry_without_consuming_it() {
        let lines = [
            "Notes",
            "Predisposing Environmental Factors: Noise",
            "John Roe (777)",
            "Predisposing Environmental Factors: Clutter",
        ];
        let scan = scan_factors(&lines, 1, &VOCABULARY);
        assert_eq!(scan.resume_at, 2);
        assert_eq!(
            scan.factors.environmental.iter().collect::<Vec<_>>(),
            ["Noise"]
        );
    }

    #[test]
    fn ignores_text_before_any_section() {
        let lines = ["Wet Floor", "Notes", "Predisposing Situation: Reaching."];
        let scan = scan_factors(&lines, 0, &VOCABULARY);
        assert!(scan.factors.environmental.is_empty());
        assert_eq!(
            scan.factors.situational.iter().collect::<Vec<_>>(),
            ["Reaching"]
        );
    }

    #[test]
    fn phrases_only_match_their_own_checklist() {
        let lines = ["Predisposing Environmental Factors: Confused"];
        let scan = scan_factors(&lines, 0, &VOCABULARY);
        assert!(scan.factors.is_empty());
    }

    #[test]
    fn start_past_end_resumes_at_end() {
        let lines = ["Predisposing Environmental Factors: Noise"];
        let scan = scan_factors(&lines, 5, &VOCABULARY);
        assert_eq!(scan.resume_at, 1);
        assert!(scan.factors.is_empty());
    }
}
