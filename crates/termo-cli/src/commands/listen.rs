//! Listen command - ingest receipts from the mail spool.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use termo_core::{JsonLinesStore, SpoolSource, ingest_mailbox};

use super::load_config;
use super::process::build_pipeline;

/// Arguments for the listen command.
#[derive(Args)]
pub struct ListenArgs {
    /// Spool directory holding `.eml` files (overrides config)
    #[arg(long)]
    inbox: Option<PathBuf>,

    /// Document store file (overrides config)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Directory for saved attachments (overrides config)
    #[arg(long)]
    attachments: Option<PathBuf>,

    /// Skip OCR and use only the embedded text layer
    #[arg(long)]
    no_ocr: bool,
}

pub async fn run(args: ListenArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if args.no_ocr {
        config.ocr.enabled = false;
    }

    let inbox = args.inbox.unwrap_or_else(|| config.mail.inbox_dir.clone());
    let store_path = args.store.unwrap_or_else(|| config.store.path.clone());
    let attachments_dir = args
        .attachments
        .unwrap_or_else(|| config.mail.attachments_dir.clone());

    if !inbox.is_dir() {
        anyhow::bail!("Inbox directory not found: {}", inbox.display());
    }

    let pipeline = build_pipeline(&config)?;
    let mut source = SpoolSource::new(&inbox).with_subject_keywords(&config.mail.subject_keywords);
    let mut store = JsonLinesStore::open(&store_path)?;

    info!("Checking inbox {}", inbox.display());
    let summary = ingest_mailbox(&pipeline, &mut source, &mut store, &attachments_dir)?;

    println!(
        "{} Stored {} documents from {} messages in {}",
        style("✓").green(),
        summary.stored.len(),
        summary.messages,
        store_path.display()
    );
    if summary.skipped > 0 {
        println!(
            "{} Skipped {} attachments stored by an earlier run",
            style("•").dim(),
            summary.skipped
        );
    }
    if summary.failures > 0 {
        println!(
            "{} {} failures, unacknowledged messages stay in the inbox",
            style("⚠").yellow(),
            summary.failures
        );
    }

    Ok(())
}
