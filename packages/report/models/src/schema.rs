//! Fixed spreadsheet column schema.
//!
//! [`COLUMNS`] is the ordered list of output column labels. Blank labels are
//! spacer slots reserved for merged group-header cells. The checklist ranges
//! below are half-open index ranges into [`COLUMNS`]; each range starts at
//! its spacer slot.

use std::ops::Range;

/// Ordered output column labels.
pub const COLUMNS: &[&str] = &[
    // ── Incident (0..13) ─────────────────────────────────
    "Incident #",
    "Resident Name",
    "Resident ID",
    "Admission Date",
    "Incident Date/Time",
    "Location",
    "Room",
    "Incident Status",
    "Incident Type",
    "Witnessed",
    "Sent to Hospital",
    "Immediate Action",
    "Nursing Description",
    // ── Injuries noted during incident (13..30) ──────────
    "",
    "No Injuries Observed",
    "Abrasion",
    "Bruise",
    "Burn",
    "Dislocation",
    "Fracture",
    "Hematoma",
    "Laceration",
    "Pain",
    "Redness",
    "Skin Tear",
    "Sprain",
    "Swelling",
    "Head Injury",
    "Puncture",
    "Other Injury",
    // ── Injuries noted post incident (30..47) ────────────
    "",
    "No Injuries Observed",
    "Abrasion",
    "Bruise",
    "Burn",
    "Dislocation",
    "Fracture",
    "Hematoma",
    "Laceration",
    "Pain",
    "Redness",
    "Skin Tear",
    "Sprain",
    "Swelling",
    "Head Injury",
    "Puncture",
    "Other Injury",
    // ── Predisposing environmental (47..63) ──────────────
    "",
    "Wet Floor",
    "Poor Lighting",
    "Clutter",
    "Furniture",
    "Equipment Malfunction",
    "Improper Footwear",
    "Bed Height",
    "Wheelchair",
    "Call Light Not in Reach",
    "Side Rails",
    "Uneven Surface",
    "Noise",
    "Weather",
    "Unfamiliar Environment",
    "Other Environmental",
    // ── Predisposing physiological (63..82) ──────────────
    "",
    "Impaired Memory",
    "Confused",
    "Dizziness",
    "Weakness",
    "Incontinent",
    "Impaired Vision",
    "Impaired Hearing",
    "Gait Imbalance",
    "Hypotension",
    "Recent Illness",
    "Medication Change",
    "Poor Balance",
    "Drowsy",
    "Agitated",
    "Pain",
    "Dehydration",
    "Hypoglycemia",
    "Other Physiological",
    // ── Predisposing situational (82..100) ───────────────
    "",
    "Ambulating without Assist",
    "Ambulating with Assist",
    "Transferring",
    "Toileting",
    "Reaching",
    "Sitting",
    "Standing",
    "Bathing",
    "Dressing",
    "Exiting Bed",
    "Wandering",
    "Unattended in Wheelchair",
    "During Therapy",
    "Restraint Removed",
    "Using Walker",
    "Night Time",
    "Other Situational",
];

/// Injuries noted during the incident.
pub const DURING_INJURY: Range<usize> = 13..30;

/// Injuries noted post incident (reserved, never populated by the parser).
pub const POST_INJURY: Range<usize> = 30..47;

/// Predisposing environmental factors.
pub const ENVIRONMENTAL: Range<usize> = 47..63;

/// Predisposing physiological factors.
pub const PHYSIOLOGICAL: Range<usize> = 63..82;

/// Predisposing situational factors.
pub const SITUATIONAL: Range<usize> = 82..100;

/// Number of leading scalar columns (everything before the first checklist).
pub const SCALAR_COLUMNS: usize = 13;

/// A group-header band spanning several adjacent columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSpan {
    /// Index of the first column covered by the band.
    pub start: usize,
    /// Number of columns covered.
    pub span: usize,
    /// Band title.
    pub title: &'static str,
}

/// Group-header bands, ordered by starting column.
pub const MERGES: &[MergeSpan] = &[
    MergeSpan {
        start: 0,
        span: SCALAR_COLUMNS,
        title: "Incident",
    },
    MergeSpan {
        start: DURING_INJURY.start + 1,
        span: DURING_INJURY.end - DURING_INJURY.start - 1,
        title: "Injuries Noted During Incident",
    },
    MergeSpan {
        start: POST_INJURY.start + 1,
        span: POST_INJURY.end - POST_INJURY.start - 1,
        title: "Injuries Noted Post Incident",
    },
    MergeSpan {
        start: ENVIRONMENTAL.start + 1,
        span: ENVIRONMENTAL.end - ENVIRONMENTAL.start - 1,
        title: "Predisposing Environmental Factors",
    },
    MergeSpan {
        start: PHYSIOLOGICAL.start + 1,
        span: PHYSIOLOGICAL.end - PHYSIOLOGICAL.start - 1,
        title: "Predisposing Physiological Factors",
    },
    MergeSpan {
        start: SITUATIONAL.start + 1,
        span: SITUATIONAL.end - SITUATIONAL.start - 1,
        title: "Predisposing Situational Factors",
    },
];

/// Returns the merge band that starts at `column`, if any.
#[must_use]
pub fn merge_at(column: usize) -> Option<&'static MergeSpan> {
    MERGES.iter().find(|m| m.start == column)
}

/// Preferred display width (in characters) for a column.
#[must_use]
pub fn column_width(column: usize) -> u16 {
    match column {
        0 => 10,
        1 => 26,
        2 | 6..=10 => 12,
        3 => 14,
        4 => 20,
        5 => 24,
        11 | 12 => 60,
        _ => match COLUMNS.get(column) {
            Some(label) if !label.is_empty() => {
                u16::try_from(label.len().clamp(6, 24)).unwrap_or(24)
            }
            _ => 3,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_expected_width() {
        assert_eq!(COLUMNS.len(), SITUATIONAL.end);
    }

    #[test]
    fn checklist_ranges_start_on_spacers() {
        for range in [
            DURING_INJURY,
            POST_INJURY,
            ENVIRONMENTAL,
            PHYSIOLOGICAL,
            SITUATIONAL,
        ] {
            assert_eq!(COLUMNS[range.start], "");
            assert!(!COLUMNS[range.end - 1].is_empty());
        }
    }

    #[test]
    fn ranges_are_contiguous() {
        assert_eq!(SCALAR_COLUMNS, DURING_INJURY.start);
        assert_eq!(DURING_INJURY.end, POST_INJURY.start);
        assert_eq!(POST_INJURY.end, ENVIRONMENTAL.start);
        assert_eq!(ENVIRONMENTAL.end, PHYSIOLOGICAL.start);
        assert_eq!(PHYSIOLOGICAL.end, SITUATIONAL.start);
    }

    #[test]
    fn merge_bands_cover_labels_only() {
        let band = merge_at(ENVIRONMENTAL.start + 1).unwrap();
        assert_eq!(COLUMNS[band.start], "Wet Floor");
        assert_eq!(COLUMNS[band.start + band.span - 1], "Other Environmental");
        assert!(merge_at(ENVIRONMENTAL.start).is_none());
    }

    #[test]
    fn spacer_columns_are_narrow() {
        assert_eq!(column_width(DURING_INJURY.start), 3);
        assert_eq!(column_width(11), 60);
        assert_eq!(column_width(ENVIRONMENTAL.start + 1), 9);
    }
}
