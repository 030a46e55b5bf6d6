//! JSON output.

use std::io::Write;

use incident_report_models::{IncidentEntry, ReportMetadata};
use serde::Serialize;

use crate::{ExportError, OutputFormat, ReportWriter};

#[derive(Serialize)]
struct Document<'a> {
    metadata: &'a ReportMetadata,
    entries: &'a [IncidentEntry],
}

/// Writes `{ "metadata": ..., "entries": [...] }`, pretty-printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl ReportWriter for JsonWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn write(
        &self,
        metadata: &ReportMetadata,
        entries: &[IncidentEntry],
        out: &mut dyn Write,
    ) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(&mut *out, &Document { metadata, entries })?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}
