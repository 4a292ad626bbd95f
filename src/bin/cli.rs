//! CLI binary for comcrawl.
//!
//! Search results are written to stdout as newline-delimited JSON, one
//! record per line. All tracing output goes to stderr.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use comcrawl::{ClientConfig, IndexClient, IndexId, IndexOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// comcrawl: search the Common Crawl URL indexes.
#[derive(Parser)]
#[command(name = "comcrawl", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// List the indexes the service offers.
    Indexes,

    /// Search indexes for a URL pattern.
    Search {
        /// URL pattern, e.g. `reddit.com/r/MachineLearning/*`.
        pattern: String,

        /// Index to search (repeatable). Defaults to the configured set, or all.
        #[arg(short, long = "index")]
        indexes: Vec<IndexId>,

        /// Result page; only used when a single index is searched without workers.
        /// Ignored, with a warning, otherwise.
        #[arg(short, long)]
        page: Option<u32>,

        /// Search indexes concurrently on this many workers. `0` turns off a
        /// configured pool.
        #[arg(short, long)]
        workers: Option<usize>,

        /// Print a per-index summary to stderr.
        #[arg(long)]
        detailed: bool,
    },

    /// Show how many result pages a pattern spans in one index.
    Pages {
        /// URL pattern.
        pattern: String,

        /// Index to ask.
        #[arg(short, long)]
        index: IndexId,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing to stderr only (stdout carries the records).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("comcrawl=info,cdx_search=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let client = IndexClient::new(&config)?;

    // Handle Ctrl+C: stop starting new index queries.
    let cancel = client.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, finishing in-flight queries...");
            cancel.cancel();
        }
    });

    match cli.command {
        Command::Indexes => list_indexes(&client).await,
        Command::Search {
            pattern,
            indexes,
            page,
            workers,
            detailed,
        } => run_search(&client, &pattern, indexes, page, workers, detailed).await,
        Command::Pages { pattern, index } => show_pages(&client, &pattern, &index).await,
    }
}

async fn list_indexes(client: &IndexClient) -> anyhow::Result<()> {
    let indexes = client.listed_indexes().await?;
    let mut out = std::io::stdout().lock();
    for (id, info) in &indexes {
        writeln!(out, "{id}\t{}", info.name)?;
    }
    Ok(())
}

async fn run_search(
    client: &IndexClient,
    pattern: &str,
    indexes: Vec<IndexId>,
    page: Option<u32>,
    workers: Option<usize>,
    detailed: bool,
) -> anyhow::Result<()> {
    let request = client.request(pattern, indexes, page, workers).await?;
    info!(indexes = request.indexes.len(), workers = ?request.worker_count, "searching");

    let report = client.search_detailed(&request).await?;
    if detailed {
        for entry in report.reports() {
            match &entry.outcome {
                Ok(IndexOutcome::Miss { status }) => eprintln!("{}\tmiss (HTTP {status})", entry.index),
                Ok(IndexOutcome::Hits(hits)) => eprintln!("{}\t{} results", entry.index, hits.len()),
                Err(err) => eprintln!("{}\terror: {err}", entry.index),
            }
        }
    }

    let mut out = std::io::stdout().lock();
    for result in report.results() {
        serde_json::to_writer(&mut out, result)?;
        writeln!(out)?;
    }
    out.flush()?;

    info!(results = report.total_results(), failures = report.failures().len(), "search finished");
    Ok(())
}

async fn show_pages(client: &IndexClient, pattern: &str, index: &IndexId) -> anyhow::Result<()> {
    let info = client.page_info(index, pattern).await?;
    println!(
        "{index}\tpages={}\tpage_size={}\tblocks={}",
        info.pages, info.page_size, info.blocks
    );
    Ok(())
}
