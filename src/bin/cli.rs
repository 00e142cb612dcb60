//! AFL news feed generator CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use afl_feed::{
    error::Result,
    models::Config,
    pipeline::{self, RunPaths},
    storage::LocalStorage,
    utils::http::HttpFetcher,
};
use clap::{Parser, Subcommand};

/// afl-feed - AFL.com.au news to RSS
#[derive(Parser, Debug)]
#[command(name = "afl-feed", version, about = "AFL.com.au news RSS feed generator")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yml")]
    config: PathBuf,

    /// Path to the run state file
    #[arg(short, long, default_value = "previously_scraped.json")]
    state: PathBuf,

    /// Path of the RSS feed to write
    #[arg(short, long, default_value = "feed.xml")]
    feed: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the listing and update the feed (default)
    Run {
        /// Override the page ceiling from the config
        #[arg(long)]
        max_pages: Option<usize>,

        /// Override the first listing page from the config
        #[arg(long)]
        seed_url: Option<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Show what the state file remembers
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = RunPaths {
        config: cli.config,
        state: cli.state,
        feed: cli.feed,
    };

    let result = match cli.command.unwrap_or(Command::Run {
        max_pages: None,
        seed_url: None,
    }) {
        Command::Run {
            max_pages,
            seed_url,
        } => run(&paths, max_pages, seed_url).await,
        Command::Validate => validate(&paths),
        Command::Info => info(&paths).await,
    };

    if let Err(e) = &result {
        log::error!("Error running AFL RSS feed generator: {e}");
    }
    result
}

async fn run(paths: &RunPaths, max_pages: Option<usize>, seed_url: Option<String>) -> Result<()> {
    let mut config = Config::load_or_create(&paths.config).config;
    if let Some(max_pages) = max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(seed_url) = seed_url {
        config.crawler.seed_url = seed_url;
    }

    log::info!(
        "Crawling {} (up to {} pages)",
        config.crawler.seed_url,
        config.crawler.max_pages
    );

    let storage = LocalStorage::new(&paths.state, &paths.feed);
    let fetcher = HttpFetcher::from_config(&config.crawler)?;
    let summary = pipeline::run_feed(&config, &storage, fetcher).await?;

    log::debug!("Run summary: {summary:?}");
    if summary.feed_written {
        log::info!("Feed written to {}", paths.feed.display());
    }
    Ok(())
}

fn validate(paths: &RunPaths) -> Result<()> {
    log::info!("Validating configuration...");

    let config = Config::load(&paths.config)?;
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    log::info!(
        "✓ Config OK ({} url patterns, {} title keywords)",
        config.filters.url_patterns.len(),
        config.filters.title_keywords.len()
    );
    Ok(())
}

async fn info(paths: &RunPaths) -> Result<()> {
    log::info!("State file: {}", paths.state.display());
    log::info!(
        "Feed: {}",
        if paths.feed.exists() {
            "exists"
        } else {
            "not found"
        }
    );

    let storage = LocalStorage::new(&paths.state, &paths.feed);
    match storage.read_state().await? {
        Some(state) => {
            log::info!("Last run: {}", state.last_run.to_rfc3339());
            log::info!("Known articles: {}", state.len());
            if let Some(newest) = state.known_articles.iter().max_by_key(|a| a.published) {
                log::info!("Newest: {} ({})", newest.url, newest.published.to_rfc3339());
            }
        }
        None => log::info!("No state file yet."),
    }
    Ok(())
}
