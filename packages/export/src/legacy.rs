//! Compact CSV layout: one header row, then one row per entry.

use std::collections::BTreeSet;
use std::io::Write;

use incident_report_models::{IncidentEntry, ReportMetadata};

use crate::{ExportError, OutputFormat, ReportWriter, scalar_cells, scalar_labels};

const SET_SEPARATOR: &str = "; ";

const SET_LABELS: &[&str] = &[
    "Injuries During Incident",
    "Injuries Post Incident",
    "Environmental Factors",
    "Physiological Factors",
    "Situational Factors",
];

/// Writes the compact layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyLayoutWriter;

fn joined(set: &BTreeSet<String>) -> String {
    set.iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(SET_SEPARATOR)
}

impl ReportWriter for LegacyLayoutWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Legacy
    }

    fn write(
        &self,
        _metadata: &ReportMetadata,
        entries: &[IncidentEntry],
        out: &mut dyn Write,
    ) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(scalar_labels().iter().chain(SET_LABELS))?;

        for entry in entries {
            let mut row = scalar_cells(entry);
            row.extend([
                joined(&entry.injuries_during),
                joined(&entry.injuries_post),
                joined(&entry.factors.environmental),
                joined(&entry.factors.physiological),
                joined(&entry.factors.situational),
            ]);
            writer.write_record(&row)?;
        }
        writer.flush()?;

        log::debug!("Wrote {} entries in the legacy layout", entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{entry, metadata};

    #[test]
    fn joins_sets_in_one_column_each() {
        let mut buf = Vec::new();
        LegacyLayoutWriter
            .write(&metadata(), &[entry()], &mut buf)
            .unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 18);
        assert_eq!(&headers[13], "Injuries During Incident");

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "Jane Doe");
        assert_eq!(&rows[0][13], "Bruise; Skin Tear");
        assert_eq!(&rows[0][14], "");
        assert_eq!(&rows[0][15], "Wet Floor");
    }

    #[test]
    fn empty_report_is_just_a_header() {
        let mut buf = Vec::new();
        LegacyLayoutWriter.write(&metadata(), &[], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Incident #,Resident Name,"));
    }
}
