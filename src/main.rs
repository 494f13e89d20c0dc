//! `paperskim` CLI - Summarize PDFs section by section

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "paperskim")]
#[command(about = "Layout-aware PDF section summarizer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a document: short summary, per-section summaries, global synthesis
    Summarize {
        /// Path to the PDF file
        file: PathBuf,

        /// Write the full JSON result to this path (defaults to stdout summary only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Oracle model name
        #[arg(long)]
        model: Option<String>,

        /// Directory for the summary store (defaults to the platform data dir)
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// Per-call oracle timeout in seconds
        #[arg(long, default_value = "180")]
        timeout: u64,
    },

    /// Detect and print section structure without calling the oracle
    Sections {
        /// Path to the PDF file
        file: PathBuf,
    },

    /// Inspect the summary store
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Print all stored summaries for a file id
    Get {
        file_id: String,

        #[arg(long)]
        store_dir: Option<PathBuf>,
    },
    /// List stored documents
    List {
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize { file, output, model, store_dir, timeout } => {
            cmd::summarize::run(&file, output, model, store_dir, timeout).await?;
        }
        Commands::Sections { file } => {
            cmd::sections::run(&file)?;
        }
        Commands::Store { action } => match action {
            StoreAction::Get { file_id, store_dir } => {
                cmd::store::get(&file_id, store_dir).await?;
            }
            StoreAction::List { store_dir } => {
                cmd::store::list(store_dir).await?;
            }
        },
    }

    Ok(())
}
