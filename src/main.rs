//! Standings-Crawler main entry point
//!
//! This is the command-line interface for the standings crawler.

use anyhow::Context;
use clap::{Parser, Subcommand};
use standings_crawler::config::{load_config_with_hash, Config};
use standings_crawler::crawler::{Coordinator, RunReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Standings-Crawler: tie-aware contest standings
///
/// Sweeps a contest site's index for contests with ranked participants and
/// reconstructs each contest's full standings, one text file per contest.
#[derive(Parser, Debug)]
#[command(name = "standings-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Tie-aware contest standings crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep index pages and write the catalog file
    Catalog {
        /// Number of index pages to visit
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },

    /// Crawl standings for the given contests, or for the catalog file
    Standings {
        /// Contest id to crawl (repeatable); defaults to the catalog contents
        #[arg(long = "contest", value_name = "ID")]
        contests: Vec<u64>,

        /// Only crawl the last K contests of the catalog
        #[arg(long, value_name = "K", conflicts_with = "contests")]
        last: Option<usize>,
    },

    /// Sweep the catalog, then crawl standings for every contest in it
    Crawl {
        /// Number of index pages to visit
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },

    /// Validate the configuration and show what a run would do
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Check => {
            handle_check(&config);
            Ok(())
        }
        Command::Catalog { pages } => handle_catalog(config, pages).await,
        Command::Standings { contests, last } => handle_standings(config, contests, last).await,
        Command::Crawl { pages } => handle_crawl(config, pages).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("standings_crawler=info,warn"),
            1 => EnvFilter::new("standings_crawler=debug,info"),
            2 => EnvFilter::new("standings_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `check`: prints the effective configuration
fn handle_check(config: &Config) {
    println!("=== Standings-Crawler Check ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Retry delay: {}s", config.crawler.retry_delay_secs);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    println!("  Page size: {}", config.crawler.page_size);
    println!("  Pagination: {:?}", config.crawler.pagination);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nSource:");
    println!("  Base URL: {}", config.source.base_url);
    println!(
        "  Locale: {}",
        config.source.locale.as_deref().unwrap_or("(none)")
    );

    println!("\nOutput:");
    println!("  Standings directory: {}", config.output.standings_dir);
    println!("  Catalog: {}", config.output.catalog_path);

    println!("\n✓ Configuration is valid");
}

async fn handle_catalog(config: Config, pages: u32) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;
    let outcome = coordinator
        .run_catalog(pages)
        .await
        .context("catalog sweep failed")?;

    for (contest_id, reason) in &outcome.skipped {
        tracing::warn!("Candidate {} skipped: {}", contest_id, reason);
    }
    Ok(())
}

async fn handle_standings(
    config: Config,
    contests: Vec<u64>,
    last: Option<usize>,
) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;
    let contest_ids = if contests.is_empty() {
        coordinator
            .catalog_ids(last)
            .context("no --contest given and the catalog could not be read")?
    } else {
        contests
    };

    tracing::info!("Crawling standings for {} contests", contest_ids.len());
    finish(coordinator.save_standings(&contest_ids).await)
}

async fn handle_crawl(config: Config, pages: u32) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;
    let report = coordinator.run_crawl(pages).await.context("crawl failed")?;
    finish(report)
}

fn finish(report: RunReport) -> anyhow::Result<()> {
    report.log_summary();
    if report.is_success() {
        Ok(())
    } else {
        anyhow::bail!("{} contests failed", report.failed.len())
    }
}
