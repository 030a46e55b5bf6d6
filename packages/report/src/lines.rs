//! Line classification shared by every pass over the report text.
//!
//! Extracted report text repeats page furniture (page markers, column
//! headers, confidentiality footers, totals) at every page break, and a page
//! break can land anywhere inside an entry. These predicates let each
//! collector skip that furniture without changing its own state.

use std::sync::LazyLock;

use regex::Regex;

/// Marker line that ends an entry's pre-section block.
pub const NURSING_DESCRIPTION_MARKER: &str = "Nursing Description";

/// Marker line that ends an entry's narrative block.
pub const NOTES_MARKER: &str = "Notes";

/// Prefixes of lines that carry a parenthesis and digits but never start an
/// entry.
const NON_ENTRY_PREFIXES: &[&str] = &["Total", "Page"];

/// Prefixes of the column-header line repeated at the top of each page.
const COLUMN_HEADER_PREFIXES: &[&str] = &[
    "Resident Name",
    "Resident (ID)",
    "Admission Date",
    "Incident Date",
];

static PAGE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^page\s*\d+(?:\s*of\s*\d+)?").expect("valid regex"));

/// A page marker that is the whole line.
static PAGE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^page\s*\d+(?:\s*of\s*\d+)?$").expect("valid regex")
});

/// The confidentiality footer printed at the bottom of each page.
static CONFIDENTIALITY_FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:this (?:report|document) (?:is|contains) )?confidential\b")
        .expect("valid regex")
});

/// `Name (12345)` at the very start of a line: a name without digits or
/// parentheses followed by an identifier made only of digits.
static ENTRY_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[[:alpha:]][^()\d]*\(\s*\d+\s*\)").expect("valid regex")
});

/// Case-insensitive ASCII prefix test.
#[must_use]
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Returns `true` for `Page 3` / `Page 3 of 12` lines.
#[must_use]
pub fn is_page_marker(line: &str) -> bool {
    PAGE_MARKER_RE.is_match(line.trim())
}

/// Returns `true` for `Total ...` summary lines.
#[must_use]
pub fn is_total_line(line: &str) -> bool {
    starts_with_ignore_case(line.trim(), "Total")
}

/// Returns `true` for the confidentiality footer.
#[must_use]
pub fn is_confidentiality_notice(line: &str) -> bool {
    line.to_ascii_lowercase().contains("confidential")
}

/// Returns `true` for a repeated column-header line.
#[must_use]
pub fn is_column_header(line: &str) -> bool {
    let trimmed = line.trim();
    COLUMN_HEADER_PREFIXES
        .iter()
        .any(|prefix| starts_with_ignore_case(trimmed, prefix))
}

/// Returns `true` for any page furniture that collectors skip.
#[must_use]
pub fn is_noise(line: &str) -> bool {
    is_page_marker(line)
        || is_total_line(line)
        || is_confidentiality_notice(line)
        || is_column_header(line)
}

/// Returns `true` when `line` looks like the first line of a new entry.
///
/// A boundary line carries an opening parenthesis (around the resident
/// identifier) and at least one digit, and is not a totals or page line.
#[must_use]
pub fn is_entry_boundary(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('(')
        && trimmed.chars().any(|c| c.is_ascii_digit())
        && !NON_ENTRY_PREFIXES
            .iter()
            .any(|prefix| starts_with_ignore_case(trimmed, prefix))
}

/// Returns `true` for the column-header row repeated after a page break:
/// a line carrying at least two of the column labels.
#[must_use]
pub fn is_column_header_row(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    COLUMN_HEADER_PREFIXES
        .iter()
        .filter(|label| lower.contains(&label.to_ascii_lowercase()))
        .count()
        >= 2
}

/// Returns `true` for page furniture that can interrupt an entry's text
/// blocks: a bare page marker, a repeated column-header row or the
/// confidentiality footer.
///
/// Narrower than [`is_noise`], since narrative text may legitimately start
/// with words such as "Total".
#[must_use]
pub fn is_page_furniture(line: &str) -> bool {
    let trimmed = line.trim();
    PAGE_LINE_RE.is_match(trimmed)
        || is_column_header_row(trimmed)
        || CONFIDENTIALITY_FOOTER_RE.is_match(trimmed)
}

/// Returns `true` for an unmistakable entry start line, `Name (digits)`.
///
/// Stricter than [`is_entry_boundary`]; used to stop an entry's text
/// blocks when a marker is missing without cutting narrative text that
/// merely contains a parenthesized number.
#[must_use]
pub fn is_entry_start(line: &str) -> bool {
    let trimmed = line.trim();
    ENTRY_START_RE.is_match(trimmed)
        && !NON_ENTRY_PREFIXES
            .iter()
            .any(|prefix| starts_with_ignore_case(trimmed, prefix))
}

/// Returns `true` when the trimmed line equals `marker` exactly.
#[must_use]
pub fn is_marker(line: &str, marker: &str) -> bool {
    line.trim() == marker
}
