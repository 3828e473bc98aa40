//! Process command - extract fields from a single receipt PDF.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use termo_core::{EquipmentItem, ExtractedRecord, Pipeline, ProcessedDocument, TermoConfig};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Skip OCR and use only the embedded text layer
    #[arg(long)]
    no_ocr: bool,

    /// Include the acquired text in the output
    #[arg(long)]
    raw_text: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

#[derive(Serialize)]
struct ProcessOutput<'a> {
    #[serde(flatten)]
    record: &'a ExtractedRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_text: Option<&'a str>,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.no_ocr {
        config.ocr.enabled = false;
    }

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    ensure_pdf(&args.input)?;

    info!("Processing file: {}", args.input.display());

    let pipeline = build_pipeline(&config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message(format!("Processing {}...", args.input.display()));

    let processed = pipeline.process_file(&args.input);

    pb.finish_and_clear();

    for warning in &processed.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = format_document(&processed, args.format, args.raw_text)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Reject inputs without a `.pdf` extension.
pub fn ensure_pdf(path: &Path) -> anyhow::Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension != "pdf" {
        anyhow::bail!("Unsupported file format: {}", extension);
    }
    Ok(())
}

/// Build the pipeline, pointing at `--no-ocr` when the OCR tools are missing.
pub fn build_pipeline(config: &TermoConfig) -> anyhow::Result<Pipeline> {
    Pipeline::from_config(config).map_err(|e| {
        anyhow::anyhow!(
            "{}\n\nRun 'termo doctor' to check the OCR tools, or pass --no-ocr.",
            e
        )
    })
}

pub fn format_document(
    processed: &ProcessedDocument,
    format: OutputFormat,
    include_raw_text: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let output = ProcessOutput {
                record: &processed.record,
                raw_text: include_raw_text.then(|| processed.raw_text.as_str()),
            };
            Ok(serde_json::to_string(&output)?)
        }
        OutputFormat::Csv => format_csv(&processed.record),
        OutputFormat::Text => {
            let mut output = format_text(&processed.record);
            if include_raw_text {
                output.push_str("\nRaw text:\n");
                output.push_str(processed.raw_text.as_str());
            }
            Ok(output)
        }
    }
}

pub const CSV_HEADER: [&str; 8] = [
    "nome",
    "matricula",
    "funcao",
    "empregador",
    "rg",
    "cpf",
    "data",
    "equipamentos",
];

/// Field values in [`CSV_HEADER`] order.
pub fn csv_row(record: &ExtractedRecord) -> [String; 8] {
    [
        record.nome.clone().unwrap_or_default(),
        record.matricula.clone().unwrap_or_default(),
        record.funcao.clone().unwrap_or_default(),
        record.empregador.clone().unwrap_or_default(),
        record.rg.clone().unwrap_or_default(),
        record.cpf.clone().unwrap_or_default(),
        record.data.clone().unwrap_or_default(),
        equipment_summary(&record.equipamentos),
    ]
}

fn format_csv(record: &ExtractedRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(record))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Equipment as `name (imei: x, patrimonio: y)` joined by `; `.
pub fn equipment_summary(items: &[EquipmentItem]) -> String {
    items
        .iter()
        .map(|item| {
            let tags: Vec<String> = [("imei", &item.imei), ("patrimonio", &item.patrimonio)]
                .into_iter()
                .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
                .collect();
            if tags.is_empty() {
                item.nome_equipamento.clone()
            } else {
                format!("{} ({})", item.nome_equipamento, tags.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn format_text(record: &ExtractedRecord) -> String {
    let mut output = String::new();
    let fields = [
        ("Nome", &record.nome),
        ("Matricula", &record.matricula),
        ("Funcao", &record.funcao),
        ("Empregador", &record.empregador),
        ("RG", &record.rg),
        ("CPF", &record.cpf),
        ("Data", &record.data),
    ];

    for (label, value) in fields {
        let label = format!("{}:", label);
        output.push_str(&format!("{:<12}{}\n", label, value.as_deref().unwrap_or("-")));
    }

    output.push('\n');
    if record.equipamentos.is_empty() {
        output.push_str("Equipamentos: -\n");
    } else {
        output.push_str("Equipamentos:\n");
        for item in &record.equipamentos {
            output.push_str(&format!("  - {}\n", equipment_summary(std::slice::from_ref(item))));
        }
    }

    output
}
