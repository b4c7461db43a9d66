//! get-papers-list - PubMed papers with non-academic authors
//!
//! Searches PubMed, keeps papers where at least one author affiliation looks
//! non-academic, and prints them or saves them as CSV.
//!
//! ## Usage
//!
//! ```bash
//! get-papers-list "cancer immunotherapy" --file results
//! get-papers-list "crispr" --debug
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use pubmed_papers::pubmed::{EutilsConfig, PubMedClient, SearchOptions};
use pubmed_papers::{export, pipeline};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Fetch research papers from PubMed.
#[derive(Parser)]
#[command(name = "get-papers-list")]
#[command(version, about, long_about = None)]
struct Cli {
    /// PubMed search query
    query: String,

    /// Output CSV filename (".csv" is appended if missing)
    #[arg(short, long)]
    file: Option<String>,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.debug {
        println!("Debug mode: Fetching papers for query: {}", cli.query);
    }

    let config = EutilsConfig::from_env().context("Invalid E-utilities configuration")?;
    let client = PubMedClient::new(&config).context("Failed to create PubMed client")?;

    let pmids = client
        .search(&cli.query, &SearchOptions::default())
        .await
        .context("PubMed search failed")?;

    let papers = pipeline::filter_papers(&client, &pmids).await;
    info!(found = pmids.len(), retained = papers.len(), "Pipeline complete");

    export::export(&papers, cli.file.as_deref()).context("Failed to export results")?;
    Ok(())
}
