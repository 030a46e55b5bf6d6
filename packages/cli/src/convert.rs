//! Single-document and batch conversion.

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use incident_report_cli_utils::ProgressCallback;
use incident_report_export::{ExportError, OutputFormat, ReportWriter, writer_for};
use incident_report_parser::{ParserConfig, ReportError, ReportParser};
use incident_report_pdf::{LineSource, PdfError, source_for_path};

/// Errors that can occur while converting a document.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The document or configuration was rejected by the parser.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// The document could not be read.
    #[error(transparent)]
    Source(#[from] PdfError),

    /// The output could not be written.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking conversion task panicked or was cancelled.
    #[error("Conversion task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Builds a parser from an optional TOML config file.
///
/// # Errors
///
/// Returns [`ConvertError::Report`] if the file cannot be read or holds an
/// unusable configuration.
pub fn load_parser(config: Option<&Path>) -> Result<ReportParser, ConvertError> {
    let config = match config {
        Some(path) => ParserConfig::load(path)?,
        None => ParserConfig::default(),
    };
    Ok(ReportParser::new(config)?)
}

/// Reads, parses and serializes one document. Returns the number of
/// entries written.
///
/// `source_id` names the document in logs and errors.
///
/// # Errors
///
/// Returns [`ConvertError`] if any stage fails.
pub fn convert_document(
    parser: &ReportParser,
    source_id: &str,
    source: &dyn LineSource,
    writer: &dyn ReportWriter,
    out: &mut dyn Write,
) -> Result<usize, ConvertError> {
    let lines = source.lines()?;
    let report = parser.convert(source_id, &lines)?;
    writer.write(&report.metadata, &report.entries, out)?;
    Ok(report.entries.len())
}

/// Converts `input` into the file at `output`.
///
/// Output is buffered in memory so a failed conversion never leaves a
/// partial file behind.
///
/// # Errors
///
/// Returns [`ConvertError`] if any stage fails.
pub fn convert_file(
    parser: &ReportParser,
    input: &Path,
    output: &Path,
    format: OutputFormat,
) -> Result<usize, ConvertError> {
    let source = source_for_path(input);
    let mut buf = Vec::new();
    let count = convert_document(
        parser,
        &source.source_id(),
        source.as_ref(),
        writer_for(format).as_ref(),
        &mut buf,
    )?;
    std::fs::write(output, buf)?;
    Ok(count)
}

/// Output path for `input` inside `output_dir`: the input's file stem with
/// the format's extension.
#[must_use]
pub fn output_path(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let mut name = input
        .file_stem()
        .unwrap_or_else(|| OsStr::new("report"))
        .to_os_string();
    name.push(".");
    name.push(format.extension());
    output_dir.join(name)
}

/// Output paths for a batch, one per input and in input order.
///
/// Inputs that share a file stem get `-2`, `-3`, ... suffixes so no two
/// documents write the same file.
#[must_use]
pub fn output_paths(inputs: &[PathBuf], output_dir: &Path, format: OutputFormat) -> Vec<PathBuf> {
    let mut taken = BTreeSet::new();
    inputs
        .iter()
        .map(|input| {
            let first = output_path(input, output_dir, format);
            let mut path = first.clone();
            let mut n = 2;
            while !taken.insert(path.clone()) {
                let stem = first.file_stem().unwrap_or_else(|| OsStr::new("report"));
                let mut name = OsString::from(stem);
                name.push(format!("-{n}."));
                name.push(format.extension());
                path = output_dir.join(name);
                n += 1;
            }
            if path != first {
                log::warn!(
                    "{} shares an output name with an earlier input; writing {}",
                    input.display(),
                    path.display()
                );
            }
            path
        })
        .collect()
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Number of documents converted.
    pub converted: usize,
    /// Documents that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Converts every input concurrently on the blocking thread pool, writing
/// one output file per input into `output_dir`.
///
/// A failing document is logged and recorded in the summary; it does not
/// stop the others.
///
/// # Errors
///
/// Returns [`ConvertError`] if the output directory cannot be created or a
/// conversion task panics.
pub async fn run_batch(
    parser: Arc<ReportParser>,
    inputs: Vec<PathBuf>,
    output_dir: &Path,
    format: OutputFormat,
    progress: Arc<dyn ProgressCallback>,
) -> Result<BatchSummary, ConvertError> {
    std::fs::create_dir_all(output_dir)?;
    progress.set_total(inputs.len() as u64);

    let outputs = output_paths(&inputs, output_dir, format);
    let mut handles = Vec::with_capacity(inputs.len());
    for (input, output) in inputs.into_iter().zip(outputs) {
        let parser = Arc::clone(&parser);
        let progress = Arc::clone(&progress);
        let path = input.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let result = convert_file(&parser, &path, &output, format).map(|count| (count, output));
            progress.inc(1);
            result
        });
        handles.push((input, handle));
    }

    let mut summary = BatchSummary::default();
    for (input, handle) in handles {
        match handle.await? {
            Ok((count, output)) => {
                log::info!(
                    "Converted {} ({count} entries) -> {}",
                    input.display(),
                    output.display()
                );
                summary.converted += 1;
            }
            Err(e) => {
                log::error!("Failed to convert {}: {e}", input.display());
                summary.failed.push((input, e.to_string()));
            }
        }
    }

    progress.finish(format!(
        "Converted {} of {} documents",
        summary.converted,
        summary.converted + summary.failed.len()
    ));

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use incident_report_cli_utils::null_progress;
    use incident_report_pdf::TextLineSource;

    use super::*;

    const REPORT: &str = "\
Incident by Incident Type
Date: 03/05/2024
Time: 9:14 AM
User: Pat Smith
Sunrise Care Center
Jane Doe (12345)3/1/2024 3/2/2024 2:15PM Common RoomWest 100-1
Resident found on floor near chair.
Nursing Description
Assisted to chair.
Notes
";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("incident_report_cli_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn output_path_keeps_inner_dots() {
        let path = output_path(
            Path::new("/in/falls.2024-03.pdf"),
            Path::new("/out"),
            OutputFormat::Json,
        );
        assert_eq!(path, PathBuf::from("/out/falls.2024-03.json"));
    }

    #[test]
    fn converts_text_document_to_json() {
        let dir = scratch_dir("single");
        let input = dir.join("report.txt");
        std::fs::write(&input, REPORT).unwrap();

        let mut buf = Vec::new();
        let count = convert_document(
            &ReportParser::default(),
            "falls-march",
            &TextLineSource::new(&input),
            writer_for(OutputFormat::Json).as_ref(),
            &mut buf,
        )
        .unwrap();
        assert_eq!(count, 1);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"residentId\": \"12345\""));
    }

    #[tokio::test]
    async fn batch_records_failures_and_continues() {
        let dir = scratch_dir("batch");
        let good = dir.join("good.txt");
        std::fs::write(&good, REPORT).unwrap();
        let missing = dir.join("missing.txt");
        let out = dir.join("out");

        let summary = run_batch(
            Arc::new(ReportParser::default()),
            vec![good, missing.clone()],
            &out,
            OutputFormat::Legacy,
            null_progress(),
        )
        .await
        .unwrap();

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, missing);
        assert!(out.join("good.csv").exists());
        assert!(!out.join("missing.csv").exists());
    }

    #[test]
    fn shared_stems_get_numbered_outputs() {
        let inputs = vec![
            PathBuf::from("/a/report.pdf"),
            PathBuf::from("/b/report.pdf"),
            PathBuf::from("/c/report.txt"),
            PathBuf::from("/c/other.pdf"),
        ];
        let paths = output_paths(&inputs, Path::new("/out"), OutputFormat::Current);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/out/report.csv"),
                PathBuf::from("/out/report-2.csv"),
                PathBuf::from("/out/report-3.csv"),
                PathBuf::from("/out/other.csv"),
            ]
        );
    }

    #[tokio::test]
    async fn batch_keeps_every_output_when_stems_collide() {
        let dir = scratch_dir("collide");
        let first = dir.join("a").join("report.txt");
        let second = dir.join("b").join("report.txt");
        for input in [&first, &second] {
            std::fs::create_dir_all(input.parent().unwrap()).unwrap();
        }
        std::fs::write(&first, REPORT).unwrap();
        std::fs::write(&second, REPORT.replace("Jane Doe (12345)", "John Roe (777)")).unwrap();
        let out = dir.join("out");

        let summary = run_batch(
            Arc::new(ReportParser::default()),
            vec![first, second],
            &out,
            OutputFormat::Legacy,
            null_progress(),
        )
        .await
        .unwrap();

        assert_eq!(summary.converted, 2);
        let a = std::fs::read_to_string(out.join("report.csv")).unwrap();
        let b = std::fs::read_to_string(out.join("report-2.csv")).unwrap();
        assert!(a.contains("12345"));
        assert!(b.contains("777"));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = load_parser(Some(Path::new("/nonexistent/parser.toml"))).unwrap_err();
        assert!(matches!(err, ConvertError::Report(ReportError::Io(_))));
    }
}
