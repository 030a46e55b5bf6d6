//! Full-schema CSV layout.
//!
//! Every row is exactly [`COLUMNS`] wide so the file imports cleanly into a
//! spreadsheet. From top to bottom: a title row, a metadata row, the group
//! band row, the column label row, one row per entry and a footer
//! disclaimer.

use std::collections::BTreeSet;
use std::io::Write;

use incident_report_models::schema::{
    COLUMNS, DURING_INJURY, ENVIRONMENTAL, MERGES, PHYSIOLOGICAL, POST_INJURY, SITUATIONAL,
};
use incident_report_models::{IncidentEntry, ReportMetadata};

use crate::{ExportError, OutputFormat, ReportWriter, scalar_cells};

/// Title printed in the first cell of the file.
pub const REPORT_TITLE: &str = "Incident by Incident Type";

/// Text of the final row.
pub const DISCLAIMER: &str = "Generated from extracted report text. Fields were recovered heuristically; verify against the source document before relying on them.";

const CHECKED: &str = "X";

/// Writes the full-schema layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentLayoutWriter;

fn row_with(cells: impl IntoIterator<Item = (usize, String)>) -> Vec<String> {
    let mut row = vec![String::new(); COLUMNS.len()];
    for (column, value) in cells {
        if let Some(slot) = row.get_mut(column) {
            *slot = value;
        }
    }
    row
}

fn metadata_row(metadata: &ReportMetadata) -> Vec<String> {
    let printed = format!("{} {}", metadata.date, metadata.time);
    row_with([
        (0, format!("Facility: {}", metadata.facility)),
        (2, format!("Printed: {}", printed.trim())),
        (4, format!("User: {}", metadata.operator)),
        (5, metadata.reporting_period.clone()),
        (6, metadata.resident_status.clone()),
        (8, metadata.incident_status.clone()),
    ])
}

fn band_row() -> Vec<String> {
    row_with(MERGES.iter().map(|m| (m.start, m.title.to_string())))
}

/// The set whose members are marked in `column`, if the column is a
/// checklist slot.
fn checklist(entry: &IncidentEntry, column: usize) -> Option<&BTreeSet<String>> {
    if DURING_INJURY.contains(&column) {
        Some(&entry.injuries_during)
    } else if POST_INJURY.contains(&column) {
        Some(&entry.injuries_post)
    } else if ENVIRONMENTAL.contains(&column) {
        Some(&entry.factors.environmental)
    } else if PHYSIOLOGICAL.contains(&column) {
        Some(&entry.factors.physiological)
    } else if SITUATIONAL.contains(&column) {
        Some(&entry.factors.situational)
    } else {
        None
    }
}

fn entry_row(entry: &IncidentEntry) -> Vec<String> {
    let mut row = scalar_cells(entry);
    row.extend((row.len()..COLUMNS.len()).map(|column| {
        let label = COLUMNS[column];
        let checked = !label.is_empty()
            && checklist(entry, column).is_some_and(|set| set.contains(label));
        if checked {
            CHECKED.to_string()
        } else {
            String::new()
        }
    }));
    row
}

impl ReportWriter for CurrentLayoutWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Current
    }

    fn write(
        &self,
        metadata: &ReportMetadata,
        entries: &[IncidentEntry],
        out: &mut dyn Write,
    ) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_writer(out);

        writer.write_record(row_with([(0, REPORT_TITLE.to_string())]))?;
        writer.write_record(metadata_row(metadata))?;
        writer.write_record(band_row())?;
        writer.write_record(COLUMNS)?;
        for entry in entries {
            writer.write_record(entry_row(entry))?;
        }
        writer.write_record(row_with([(0, DISCLAIMER.to_string())]))?;
        writer.flush()?;

        log::debug!("Wrote {} entries in the current layout", entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{entry, metadata};

    fn records(entries: &[IncidentEntry]) -> Vec<csv::StringRecord> {
        let mut buf = Vec::new();
        CurrentLayoutWriter
            .write(&metadata(), entries, &mut buf)
            .unwrap();
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(buf.as_slice())
            .records()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn every_row_spans_the_schema() {
        let rows = records(&[entry(), entry()]);
        assert_eq!(rows.len(), 7);
        assert!(rows.iter().all(|r| r.len() == COLUMNS.len()));
        assert_eq!(&rows[0][0], REPORT_TITLE);
        assert_eq!(&rows[1][0], "Facility: Sunrise Care Center");
        assert_eq!(&rows[3][1], "Resident Name");
        assert_eq!(&rows[6][0], DISCLAIMER);
    }

    #[test]
    fn band_titles_sit_at_merge_starts() {
        let rows = records(&[]);
        let band = &rows[2];
        for merge in MERGES {
            assert_eq!(&band[merge.start], merge.title);
        }
        assert_eq!(&band[DURING_INJURY.start], "");
    }

    #[test]
    fn marks_checklist_membership_in_its_own_range() {
        let rows = records(&[entry()]);
        let row = &rows[4];
        assert_eq!(&row[1], "Jane Doe");
        assert_eq!(&row[6], "West 100-1");

        let marked: Vec<usize> = (0..row.len()).filter(|&c| &row[c] == "X").collect();
        let labels: Vec<&str> = marked.iter().map(|&c| COLUMNS[c]).collect();
        assert_eq!(labels, ["Bruise", "Skin Tear", "Wet Floor", "Pain"]);

        // "Pain" is both an injury and a physiological factor; only the
        // physiological slot is marked.
        assert!(PHYSIOLOGICAL.contains(&marked[3]));
    }
}
