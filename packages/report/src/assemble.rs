//! Entry ordering and document-level validation.

use std::sync::LazyLock;

use incident_report_models::IncidentEntry;
use regex::Regex;

use crate::ReportError;

/// Field name reported when the leading entries lack incident date-times.
pub const INCIDENT_DATETIME_FIELD: &str = "incident date/time";

/// Two date tokens with no gap between them, or a date fused to the time
/// that follows it.
static MERGED_COLUMNS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}/\d{1,2}/\d{4}\d|\d{1,2}/\d{1,2}/\d{2,4}\d{1,2}/\d{1,2}/")
        .expect("valid regex")
});

/// Sorts entries newest first and numbers them `1..=N`.
///
/// Entries without a parsed instant sort as the oldest. Ties are broken by
/// resident name, descending.
#[must_use]
pub fn order_entries(mut entries: Vec<IncidentEntry>) -> Vec<IncidentEntry> {
    entries.sort_by(|a, b| {
        b.sort_instant()
            .cmp(&a.sort_instant())
            .then_with(|| b.resident_name.cmp(&a.resident_name))
    });
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.incident_number = Some(u32::try_from(index + 1).unwrap_or(u32::MAX));
    }
    entries
}

fn looks_merged(entry: &IncidentEntry) -> bool {
    MERGED_COLUMNS_RE.is_match(&entry.incident_datetime)
        || MERGED_COLUMNS_RE.is_match(&entry.admission_date)
}

/// Rejects a document whose first `sample` entries all lack a parsed
/// incident date-time.
///
/// Entries are checked in source order. An empty document or a `sample` of
/// zero always passes.
///
/// # Errors
///
/// Returns [`ReportError::Unparseable`] naming the affected 1-based rows.
pub fn validate_entries(
    source_id: &str,
    entries: &[IncidentEntry],
    sample: usize,
) -> Result<(), ReportError> {
    let window = &entries[..sample.min(entries.len())];
    if window.is_empty() || window.iter().any(|e| e.incident_at.is_some()) {
        return Ok(());
    }

    let merged_columns = window.iter().any(looks_merged);
    log::warn!(
        "{source_id}: first {} entries have no parseable {INCIDENT_DATETIME_FIELD} (merged columns suspected: {merged_columns})",
        window.len()
    );

    Err(ReportError::Unparseable {
        source_id: source_id.to_string(),
        rows: (1..=window.len()).collect(),
        field: INCIDENT_DATETIME_FIELD,
        merged_columns,
    })
}
