//! ndtsearch - restricted literature search for the NDT circular-construction review
//!
//! ## Usage
//!
//! ```bash
//! ndtsearch search --mailto you@institution.edu
//! ndtsearch search --start-year 2018 --max-pages 1 -o ./review
//! ndtsearch terms
//! ```

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use ndtsearch::classifier::RelevanceClassifier;
use ndtsearch::config::{SearchConfig, OPENALEX_API_BASE};
use ndtsearch::openalex::OpenAlexClient;
use ndtsearch::search::Searcher;
use ndtsearch::stats::PrismaStats;
use ndtsearch::taxonomy::SEARCH_TERMS;
use ndtsearch::{export, report};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Restricted OpenAlex literature search for the NDT circular-construction review
#[derive(Parser)]
#[command(name = "ndtsearch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the search, print the PRISMA summary and export the results
    Search {
        /// First publication year included
        #[arg(long, default_value = "2014")]
        start_year: i32,

        /// Last publication year included
        #[arg(long, default_value = "2024")]
        end_year: i32,

        /// Pages fetched per query term
        #[arg(long, default_value = "3")]
        max_pages: u32,

        /// Results per page (OpenAlex allows up to 200)
        #[arg(long, default_value = "100")]
        per_page: u32,

        /// Pause between page fetches, in milliseconds
        #[arg(long, default_value = "100")]
        delay_ms: u64,

        /// Contact email for the OpenAlex polite pool
        #[arg(long)]
        mailto: Option<String>,

        /// OpenAlex API base URL
        #[arg(long, default_value = OPENALEX_API_BASE)]
        api_base: String,

        /// HTTP timeout, in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,

        /// Output directory
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },

    /// List the query terms with the review focus they target
    Terms,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    if cli.log_json {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .init();
    }

    match cli.command {
        Commands::Search {
            start_year,
            end_year,
            max_pages,
            per_page,
            delay_ms,
            mailto,
            api_base,
            timeout_secs,
            output,
        } => {
            let config = SearchConfig {
                start_year,
                end_year,
                max_pages_per_term: max_pages,
                per_page,
                page_delay: Duration::from_millis(delay_ms),
                mailto,
                api_base,
                http_timeout: Duration::from_secs(timeout_secs),
            };
            run_search(config, output).await
        }
        Commands::Terms => {
            list_terms();
            Ok(())
        }
    }
}

// ============================================================================
// Search Pipeline
// ============================================================================

async fn run_search(config: SearchConfig, output_dir: PathBuf) -> Result<()> {
    config.validate().context("Invalid search configuration")?;

    let rule = "=".repeat(60);
    println!("{}", rule);
    println!("RESTRICTED SYSTEMATIC LITERATURE SEARCH");
    println!("Date Range: {}", config.date_range());
    println!("Query terms: {}", SEARCH_TERMS.len());
    println!("{}", rule);

    let client = OpenAlexClient::new(&config).context("Failed to create OpenAlex client")?;
    let classifier = RelevanceClassifier::new().context("Failed to build keyword matchers")?;
    let mut searcher = Searcher::new(client, config, classifier);

    let terms: Vec<&str> = SEARCH_TERMS.iter().map(|t| t.query).collect();
    let outcome = searcher.run(&terms).await;

    let failed = outcome.terms.iter().filter(|t| t.error.is_some()).count();
    println!("\nFINAL COUNT: {} papers", outcome.accepted.len());
    println!("EXCLUDED: {} papers", outcome.excluded.len());
    if outcome.skipped > 0 {
        println!("SKIPPED (malformed): {} records", outcome.skipped);
    }
    if failed > 0 {
        println!("Terms ended early by errors: {}", failed);
    }

    let stats = PrismaStats::from_outcome(&outcome, searcher.config(), Local::now().date_naive());
    println!("\n{}", report::render_summary(&stats));

    if !outcome.exclusion_counts.is_empty() {
        println!("--- Top Exclusion Terms ---");
        print!("{}", report::render_exclusions(&outcome.exclusion_counts, 10));
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let output_folder = output_dir.join(format!("{}_ndt_review", timestamp));
    let paths = export::export_all(&output_folder, &outcome.accepted, &stats)
        .with_context(|| format!("Failed to export results to {}", output_folder.display()))?;

    info!(folder = %output_folder.display(), "Export complete");
    println!("\nFiles saved:");
    for path in [paths.csv.as_ref(), paths.bibtex.as_ref(), Some(&paths.summary)]
        .into_iter()
        .flatten()
    {
        println!("  - {}", path.display());
    }
    if paths.csv.is_none() {
        println!("  (no accepted papers, CSV and BibTeX skipped)");
    }

    Ok(())
}

fn list_terms() {
    let mut current = "";
    for term in SEARCH_TERMS {
        if term.focus != current {
            println!("\n[{}]", term.focus);
            current = term.focus;
        }
        println!("  {}", term.query);
    }
}
