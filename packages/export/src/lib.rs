#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output strategies for parsed incident reports.
//!
//! Parsing happens once; the caller then picks a [`ReportWriter`] by
//! [`OutputFormat`]. The `current` layout follows the full column schema in
//! [`incident_report_models::schema`], the `legacy` layout is a compact
//! one-column-per-field CSV, and `json` dumps the records as-is.

pub mod current;
pub mod json;
pub mod legacy;

use std::io::Write;

use incident_report_models::schema::{COLUMNS, SCALAR_COLUMNS};
use incident_report_models::{IncidentEntry, ReportMetadata, YesNo};
use strum_macros::{AsRefStr, Display, EnumString};

pub use current::CurrentLayoutWriter;
pub use json::JsonWriter;
pub use legacy::LegacyLayoutWriter;

/// Errors that can occur while writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Selects a [`ReportWriter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Full schema CSV with header bands and checklist columns.
    #[default]
    Current,
    /// One column per field, sets joined with `"; "`.
    Legacy,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// All formats, in display order.
    pub const ALL: &[Self] = &[Self::Current, Self::Legacy, Self::Json];

    /// File extension for output in this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Current | Self::Legacy => "csv",
            Self::Json => "json",
        }
    }
}

/// Writes a parsed report to a byte sink.
pub trait ReportWriter: Send + Sync {
    /// The format this writer produces.
    fn format(&self) -> OutputFormat;

    /// Serializes `metadata` and `entries` to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if serialization or the underlying write
    /// fails.
    fn write(
        &self,
        metadata: &ReportMetadata,
        entries: &[IncidentEntry],
        out: &mut dyn Write,
    ) -> Result<(), ExportError>;
}

/// Returns the writer for `format`.
#[must_use]
pub fn writer_for(format: OutputFormat) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Current => Box::new(CurrentLayoutWriter),
        OutputFormat::Legacy => Box::new(LegacyLayoutWriter),
        OutputFormat::Json => Box::new(JsonWriter),
    }
}

fn yes_no_cell(value: YesNo) -> String {
    match value {
        YesNo::Unknown => String::new(),
        YesNo::Y | YesNo::N => value.to_string(),
    }
}

/// The leading scalar cells of an entry row, in [`COLUMNS`] order.
pub(crate) fn scalar_cells(entry: &IncidentEntry) -> Vec<String> {
    let cells = vec![
        entry
            .incident_number
            .map_or_else(String::new, |n| n.to_string()),
        entry.resident_name.clone(),
        entry.resident_id.clone(),
        entry.admission_date.clone(),
        entry.incident_datetime.clone(),
        entry.location.clone(),
        entry.room.clone(),
        entry.incident_status.clone(),
        entry.incident_type.clone(),
        yes_no_cell(entry.witnessed),
        yes_no_cell(entry.sent_to_hospital),
        entry.immediate_action.clone(),
        entry.nursing_description.clone(),
    ];
    debug_assert_eq!(cells.len(), SCALAR_COLUMNS);
    cells
}

/// Labels of the leading scalar columns.
pub(crate) fn scalar_labels() -> &'static [&'static str] {
    &COLUMNS[..SCALAR_COLUMNS]
}
