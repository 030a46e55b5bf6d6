//! Single-entry field parser.
//!
//! Given the index of an entry's start line, reads the positional fields,
//! the pre-section block, the narrative block and the factor sections, and
//! returns the entry together with the index where the next entry begins.

use std::collections::BTreeSet;

use incident_report_models::IncidentEntry;

use crate::boundary::{Layout, RoomPattern, detect_layout, split_head};
use crate::factors::scan_factors;
use crate::lines::{
    NOTES_MARKER, NURSING_DESCRIPTION_MARKER, is_entry_start, is_marker, is_page_furniture,
};
use crate::normalize::{normalize_date, normalize_datetime};
use crate::peel::Peeler;
use crate::vocabulary::Vocabulary;

/// An entry plus the index of the first line after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// The parsed entry, not yet numbered.
    pub entry: IncidentEntry,
    /// Index of the next entry's start line, or the end of input.
    pub next: usize,
}

/// Returns the next non-blank line at or after `*cursor` and advances past
/// it. Markers and `Name (digits)` start lines are never consumed.
fn next_field_line<'a>(lines: &[&'a str], cursor: &mut usize) -> Option<&'a str> {
    while let Some(line) = lines.get(*cursor) {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_page_furniture(trimmed) {
            *cursor += 1;
            continue;
        }
        if is_marker(trimmed, NURSING_DESCRIPTION_MARKER)
            || is_marker(trimmed, NOTES_MARKER)
            || is_entry_start(trimmed)
        {
            return None;
        }
        *cursor += 1;
        return Some(trimmed);
    }
    None
}

/// Collects non-blank lines up to `marker`, consuming the marker itself.
///
/// Page furniture is skipped. A `Name (digits)` start line ends the block
/// without being consumed, so a missing marker cannot swallow the following
/// entries.
fn collect_until(lines: &[&str], cursor: &mut usize, marker: &str) -> Vec<String> {
    let mut block = Vec::new();
    while let Some(line) = lines.get(*cursor) {
        let trimmed = line.trim();
        if is_marker(trimmed, marker) {
            *cursor += 1;
            break;
        }
        if is_entry_start(trimmed) {
            break;
        }
        *cursor += 1;
        if !trimmed.is_empty() && !is_page_furniture(trimmed) {
            block.push(trimmed.to_string());
        }
    }
    block
}

/// Parses the entry whose start line is `lines[start]`.
#[must_use]
pub fn parse_entry(
    lines: &[&str],
    start: usize,
    rooms: &RoomPattern,
    vocabulary: &Vocabulary,
    incident_type: &str,
) -> ParsedEntry {
    let head = split_head(lines.get(start).copied().unwrap_or_default());
    let mut cursor = start + 1;

    let layout = detect_layout(&head.rest);
    let inline = layout.is_inline();

    let (admission_raw, incident_raw, mut location, mut room) = match layout {
        Layout::Inline {
            admission,
            incident,
            trailing,
        } => {
            let (location, room) = rooms.split(&trailing);
            (admission, incident, location, room.unwrap_or_default())
        }
        Layout::MultiLine {
            admission,
            incident,
        } => {
            let admission = admission
                .or_else(|| next_field_line(lines, &mut cursor).map(str::to_string))
                .unwrap_or_default();
            let incident = incident
                .or_else(|| next_field_line(lines, &mut cursor).map(str::to_string))
                .unwrap_or_default();
            (admission, incident, String::new(), String::new())
        }
    };

    let admission_date = normalize_date(&admission_raw);
    let incident = normalize_datetime(&incident_raw);
    if incident.instant.is_none() {
        log::warn!(
            "Could not parse incident date/time {:?} for {:?} ({})",
            incident_raw,
            head.resident_name,
            head.resident_id
        );
    }

    let pre_section = collect_until(lines, &mut cursor, NURSING_DESCRIPTION_MARKER);
    let peeler = if inline {
        Peeler::INLINE
    } else {
        Peeler::MULTI_LINE
    };
    let peeled = peeler.peel(&pre_section, &vocabulary.during_injury);

    if !inline {
        location = peeled.location.unwrap_or_default();
        room = peeled.room.unwrap_or_default();
        if location.is_empty() {
            // Some vendors fuse the last location word with the room on one
            // line, which the positional room step takes whole.
            if let (prefix, Some(suffix)) = rooms.split(&room) {
                location = prefix;
                room = suffix;
            }
        }
    }

    let narrative = collect_until(lines, &mut cursor, NOTES_MARKER);
    let scan = scan_factors(lines, cursor, vocabulary);

    log::debug!(
        "Parsed {} entry for {:?} ({}) at line {start}, next entry at line {}",
        if inline { "inline" } else { "multi-line" },
        head.resident_name,
        head.resident_id,
        scan.resume_at
    );

    ParsedEntry {
        entry: IncidentEntry {
            resident_name: head.resident_name,
            resident_id: head.resident_id,
            admission_date,
            incident_datetime: incident.display,
            incident_at: incident.instant,
            location,
            room,
            immediate_action: narrative.join(" "),
            nursing_description: peeled.remainder.join(" "),
            incident_number: None,
            incident_status: String::new(),
            incident_type: incident_type.to_string(),
            witnessed: peeled.witnessed,
            sent_to_hospital: peeled.sent_to_hospital,
            injuries_during: peeled.injuries.iter().map(ToString::to_string).collect(),
            injuries_post: BTreeSet::new(),
            factors: scan.factors,
        },
        next: scan.resume_at.max(start + 1),
    }
}
