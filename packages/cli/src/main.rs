#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line converter for fall-incident report PDFs.
//!
//! Uses `indicatif-log-bridge` (via [`incident_report_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the batch progress bar never fight for the terminal.

mod convert;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use incident_report_cli_utils::IndicatifProgress;
use incident_report_export::{OutputFormat, writer_for};
use incident_report_models::schema::{COLUMNS, column_width, merge_at};
use incident_report_pdf::source_for_path;

#[derive(Parser)]
#[command(
    name = "incident_report",
    about = "Convert fall-incident report PDFs into spreadsheet-ready files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one report. `.txt` inputs are read as pre-extracted text.
    Convert {
        /// Report PDF (or extracted text file)
        input: PathBuf,
        /// Output file. Writes to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format: current, legacy or json
        #[arg(long, default_value_t = OutputFormat::Current)]
        format: OutputFormat,
        /// Parser config TOML file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Name used for the document in logs and errors (defaults to the
        /// input path)
        #[arg(long)]
        source_id: Option<String>,
    },
    /// Convert many reports concurrently, one output file per input
    Batch {
        /// Report PDFs (or extracted text files)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory that receives the converted files
        #[arg(long)]
        output_dir: PathBuf,
        /// Output format: current, legacy or json
        #[arg(long, default_value_t = OutputFormat::Current)]
        format: OutputFormat,
        /// Parser config TOML file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the extracted text lines of a report, numbered
    Lines {
        /// Report PDF (or extracted text file)
        input: PathBuf,
    },
    /// Print the output column schema
    Schema,
}

fn print_schema() {
    println!("{:>4}  {:>5}  {:<40} BAND", "COL", "WIDTH", "LABEL");
    println!("{}", "-".repeat(70));
    for (index, label) in COLUMNS.iter().enumerate() {
        let band = merge_at(index).map_or_else(String::new, |m| {
            format!("{} ({} columns)", m.title, m.span)
        });
        println!("{index:>4}  {:>5}  {label:<40} {band}", column_width(index));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = incident_report_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            config,
            source_id,
        } => {
            let parser = convert::load_parser(config.as_deref())?;
            let source = source_for_path(&input);
            let source_id = source_id.unwrap_or_else(|| source.source_id());

            let mut buf = Vec::new();
            let count = convert::convert_document(
                &parser,
                &source_id,
                source.as_ref(),
                writer_for(format).as_ref(),
                &mut buf,
            )?;

            if let Some(output) = output {
                std::fs::write(&output, &buf)?;
                log::info!("Wrote {count} entries to {}", output.display());
            } else {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&buf)?;
                stdout.flush()?;
            }
        }
        Commands::Batch {
            inputs,
            output_dir,
            format,
            config,
        } => {
            let parser = Arc::new(convert::load_parser(config.as_deref())?);
            let progress =
                IndicatifProgress::documents_bar(&multi, "Converting", inputs.len() as u64);
            let summary =
                convert::run_batch(parser, inputs, &output_dir, format, progress).await?;

            if !summary.failed.is_empty() {
                for (input, reason) in &summary.failed {
                    eprintln!("{}: {reason}", input.display());
                }
                return Err(format!(
                    "{} of {} documents failed to convert",
                    summary.failed.len(),
                    summary.converted + summary.failed.len()
                )
                .into());
            }
        }
        Commands::Lines { input } => {
            let lines = source_for_path(&input).lines()?;
            for (index, line) in lines.iter().enumerate() {
                println!("{index:>5}  {line}");
            }
        }
        Commands::Schema => print_schema(),
    }

    Ok(())
}
