//! CLI application for equipment receipt processing.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, doctor, listen, process, search};

/// Equipment receipt OCR - Extract structured data from receipt/return forms
#[derive(Parser)]
#[command(name = "termo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single receipt PDF
    Process(process::ProcessArgs),

    /// Process multiple receipt PDFs
    Batch(batch::BatchArgs),

    /// Ingest receipts from the mail spool into the document store
    Listen(listen::ListenArgs),

    /// Search stored documents
    Search(search::SearchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Check the OCR tools
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Listen(args) => listen::run(args, config_path).await,
        Commands::Search(args) => search::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
        Commands::Doctor => doctor::run(config_path).await,
    }
}
