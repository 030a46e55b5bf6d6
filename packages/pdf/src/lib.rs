#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Line sources for incident report documents.
//!
//! The report parser consumes an ordered sequence of text lines. This crate
//! produces that sequence either from a PDF, using pure-Rust text
//! extraction ([`pdf_extract`]), or from text that was extracted earlier and
//! saved to disk.
//!
//! Both implement [`LineSource`], so callers pick one by file type and treat
//! the rest of the pipeline uniformly.

use std::path::{Path, PathBuf};

/// Errors specific to producing report lines.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that yields a document's text as lines.
pub trait LineSource {
    /// Identifier used in log messages and errors (usually the file path).
    fn source_id(&self) -> String;

    /// Reads the document and returns its lines.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the document cannot be read.
    fn lines(&self) -> Result<Vec<String>, PdfError>;
}

/// Splits extracted text into lines, dropping trailing carriage returns and
/// trailing whitespace.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim_end().to_owned()).collect()
}

/// A PDF report on disk.
#[derive(Debug, Clone)]
pub struct PdfLineSource {
    path: PathBuf,
}

impl PdfLineSource {
    /// Creates a source for the PDF at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Extracts the text of an in-memory PDF.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Extraction`] if the bytes are not a readable PDF.
    pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))
    }
}

impl LineSource for PdfLineSource {
    fn source_id(&self) -> String {
        self.path.display().to_string()
    }

    fn lines(&self) -> Result<Vec<String>, PdfError> {
        let bytes = std::fs::read(&self.path)?;
        log::debug!("Read {} bytes from {}", bytes.len(), self.path.display());

        let text = Self::extract_text(&bytes)?;
        log::debug!(
            "Extracted {} characters of text from {}",
            text.len(),
            self.path.display()
        );

        Ok(split_lines(&text))
    }
}

/// Report text that was already extracted to a plain-text file.
#[derive(Debug, Clone)]
pub struct TextLineSource {
    path: PathBuf,
}

impl TextLineSource {
    /// Creates a source for the text file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LineSource for TextLineSource {
    fn source_id(&self) -> String {
        self.path.display().to_string()
    }

    fn lines(&self) -> Result<Vec<String>, PdfError> {
        let text = std::fs::read_to_string(&self.path)?;
        Ok(split_lines(&text))
    }
}

/// Picks a line source by file extension: `.txt` files are read as
/// pre-extracted text, anything else as PDF.
#[must_use]
pub fn source_for_path(path: &Path) -> Box<dyn LineSource + Send + Sync> {
    let is_text = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if is_text {
        Box::new(TextLineSource::new(path))
    } else {
        Box::new(PdfLineSource::new(path))
    }
}
