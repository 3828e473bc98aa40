//! Search command - find stored documents.

use std::path::PathBuf;

use clap::Args;
use console::style;

use termo_core::{DocumentStore, JsonLinesStore};

use super::load_config;

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for (case and accent insensitive)
    #[arg(required = true)]
    query: String,

    /// Document store file (overrides config)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Print full documents as JSON lines
    #[arg(long)]
    json: bool,
}

pub async fn run(args: SearchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store_path = args.store.unwrap_or(config.store.path);

    let store = JsonLinesStore::open(&store_path)?;
    let documents = store.find_by_substring(&args.query)?;

    if documents.is_empty() {
        println!("{} No documents match '{}'", style("ℹ").blue(), args.query);
        return Ok(());
    }

    for stored in &documents {
        if args.json {
            println!("{}", serde_json::to_string(stored)?);
            continue;
        }

        let doc = &stored.document;
        println!(
            "{:>5}  {}  {}  {}  {}",
            stored.id.0,
            doc.processed_at.format("%Y-%m-%d %H:%M"),
            doc.record.nome.as_deref().unwrap_or("-"),
            doc.filename,
            doc.subject
        );
    }

    println!();
    println!("{} {} documents found", style("✓").green(), documents.len());

    Ok(())
}
