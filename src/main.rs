//! Bindery main entry point
//!
//! Command-line interface for the Bindery book harvester.

use anyhow::Context;
use bindery::config::load_config_with_hash;
use bindery::harvest::{build_http_client, discover, fetch_pending, harvest, run_pass};
use bindery::page::SelectorAdapter;
use bindery::store::{SqliteStore, Store};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Bindery: a resumable book harvester
///
/// Bindery walks a paginated book catalogue, records discovered chapters
/// in a SQLite work store, and fetches each chapter's body text into
/// plain-text files. Interrupted runs resume where they left off.
#[derive(Parser, Debug)]
#[command(name = "bindery")]
#[command(version = "1.0.0")]
#[command(about = "A resumable book harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Catalogue root URL of the book to harvest
    #[arg(value_name = "CATALOGUE_URL", required_unless_present_any = ["stats", "fetch_only"])]
    catalogue_url: Option<Url>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run a single pipeline pass without supervised retry
    #[arg(long)]
    once: bool,

    /// Walk the catalogue and persist entries, but fetch no chapter bodies
    #[arg(long, conflicts_with_all = ["fetch_only", "stats"])]
    discover_only: bool,

    /// Skip discovery and fetch pending chapters of --book
    #[arg(long, requires = "book", conflicts_with = "stats")]
    fetch_only: bool,

    /// Book name to fetch (only with --fetch-only)
    #[arg(long, value_name = "NAME")]
    book: Option<String>,

    /// Show per-book progress from the database and exit
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::debug!("Configuration loaded (hash: {})", config_hash);

    if cli.stats {
        return handle_stats(&config);
    }

    if cli.fetch_only {
        let book = cli.book.as_deref().context("--fetch-only requires --book")?;
        return handle_fetch(&config, book).await;
    }

    // clap guarantees the URL is present past this point
    let root = cli
        .catalogue_url
        .clone()
        .context("CATALOGUE_URL is required")?;

    if cli.discover_only {
        handle_discover(&config, &root).await?;
    } else if cli.once {
        let client = build_http_client(&config.source)?;
        let adapter = SelectorAdapter::from_config(&config.selectors)?;
        let summary = run_pass(&client, &adapter, &config, &config_hash, &root).await?;
        tracing::info!(
            book = %summary.book_name,
            fetched = summary.fetched,
            "single pass complete"
        );
    } else {
        harvest(&config, &config_hash, &root).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bindery=info,warn"),
            1 => EnvFilter::new("bindery=debug,info"),
            2 => EnvFilter::new("bindery=trace,debug"),
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

/// Handles --discover-only: walk the catalogue, persist, fetch nothing
async fn handle_discover(config: &bindery::Config, root: &Url) -> anyhow::Result<()> {
    let client = build_http_client(&config.source)?;
    let adapter = SelectorAdapter::from_config(&config.selectors)?;
    let mut store = SqliteStore::new(Path::new(&config.output.database_path))?;

    let book = discover(
        &client,
        &adapter,
        &mut store,
        root,
        config.limits.max_catalogue_pages,
    )
    .await?;

    println!("Discovered \"{}\" by {}", book.name, book.author);
    Ok(())
}

/// Handles --fetch-only: drain the pending queue for one named book
async fn handle_fetch(config: &bindery::Config, book_name: &str) -> anyhow::Result<()> {
    let client = build_http_client(&config.source)?;
    let adapter = SelectorAdapter::from_config(&config.selectors)?;
    let mut store = SqliteStore::new(Path::new(&config.output.database_path))?;

    let fetched = fetch_pending(
        &client,
        &adapter,
        &mut store,
        Path::new(&config.output.library_dir),
        book_name,
        config.limits.max_chapter_pages,
    )
    .await?;

    println!("Stored {} chapters of \"{}\"", fetched, book_name);
    Ok(())
}

/// Handles --stats: per-book progress counts from the database
fn handle_stats(config: &bindery::Config) -> anyhow::Result<()> {
    let store = SqliteStore::new(Path::new(&config.output.database_path))?;
    let summaries = store.book_summaries()?;

    if summaries.is_empty() {
        println!("No books discovered yet");
        return Ok(());
    }

    println!("Database: {}\n", config.output.database_path);
    for summary in summaries {
        println!(
            "{} ({}): {} chapters, {} fetched, {} failed, {} artifacts",
            summary.name,
            summary.book_id,
            summary.total_entries,
            summary.used,
            summary.failed,
            summary.artifacts
        );
    }

    Ok(())
}
