//! Batch processing command for multiple receipt PDFs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use termo_core::{ExtractedRecord, Pipeline};

use super::load_config;
use super::process::{CSV_HEADER, OutputFormat, build_pipeline, csv_row, format_document};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input PDFs
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue when a file yields no text
    #[arg(long)]
    continue_on_error: bool,

    /// Skip OCR and use only the embedded text layer
    #[arg(long)]
    no_ocr: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<ExtractedRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.no_ocr {
        config.ocr.enabled = false;
    }

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pipeline = build_pipeline(&config)?;

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &pipeline, &args);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(record) => results.push(ProcessResult {
                path,
                record: Some(record),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        record: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful = results.iter().filter(|r| r.record.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Process one file and write its output when an output directory is set.
/// A PDF that yields no text at all counts as a failure.
fn process_single_file(
    path: &Path,
    pipeline: &Pipeline,
    args: &BatchArgs,
) -> anyhow::Result<ExtractedRecord> {
    let processed = pipeline.process_file(path);
    if processed.raw_text.is_blank() {
        anyhow::bail!("No text extracted from PDF");
    }

    if let Some(output_dir) = &args.output_dir {
        let output_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("termo");
        let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

        fs::write(&output_path, format_document(&processed, args.format, false)?)?;
        debug!("Wrote output to {}", output_path.display());
    }

    Ok(processed.record)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(CSV_HEADER);
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let mut row = vec![filename.to_string()];
        match &result.record {
            Some(record) => {
                row.push("success".to_string());
                row.extend(csv_row(record));
            }
            None => {
                row.push("error".to_string());
                row.extend(std::iter::repeat_n(String::new(), CSV_HEADER.len()));
            }
        }
        row.push(result.processing_time_ms.to_string());
        row.push(result.error.clone().unwrap_or_default());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termo_core::EquipmentItem;

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let results = vec![
            ProcessResult {
                path: PathBuf::from("/in/a.pdf"),
                record: Some(ExtractedRecord {
                    nome: Some("ana".to_string()),
                    equipamentos: vec![EquipmentItem::new("mouse")],
                    ..Default::default()
                }),
                error: None,
                processing_time_ms: 3,
            },
            ProcessResult {
                path: PathBuf::from("/in/b.pdf"),
                record: None,
                error: Some("No text extracted from PDF".to_string()),
                processing_time_ms: 1,
            },
        ];

        write_summary(&path, &results).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(
            lines[0],
            "filename,status,nome,matricula,funcao,empregador,rg,cpf,data,equipamentos,processing_time_ms,error"
        );
        assert_eq!(lines[1], "a.pdf,success,ana,,,,,,,mouse,3,");
        assert_eq!(lines[2], "b.pdf,error,,,,,,,,,1,No text extracted from PDF");
    }
}
