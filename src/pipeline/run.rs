// src/pipeline/run.rs

//! Feed generation pipeline.
//!
//! crawl → filter → emit feed → merge and prune state → save state.
//! Only a failed feed write aborts the run; everything else degrades.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{ArticleRecord, ArticleSelectors, Config, RunState};
use crate::services::{
    ArticleExtractor, ChannelInfo, CrawlStop, Crawler, FeedEmitter, FilterEngine, StateTracker,
};
use crate::storage::RunStorage;
use crate::utils::http::PageFetcher;

/// Locations of the files a run reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub config: PathBuf,
    pub state: PathBuf,
    pub feed: PathBuf,
}

impl Default for RunPaths {
    fn default() -> Self {
        Self {
            config: PathBuf::from("config.yml"),
            state: PathBuf::from("previously_scraped.json"),
            feed: PathBuf::from("feed.xml"),
        }
    }
}

/// What a run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub pages_fetched: usize,
    pub crawl_stop: CrawlStop,
    pub scraped: usize,
    pub published: Vec<ArticleRecord>,
    pub feed_written: bool,
    pub known_articles: usize,
    pub state_saved: bool,
}

/// Run the pipeline with the current time.
pub async fn run_feed<F: PageFetcher>(
    config: &Config,
    storage: &dyn RunStorage,
    fetcher: F,
) -> Result<RunSummary> {
    run_feed_at(config, storage, fetcher, Utc::now()).await
}

/// Run the pipeline as of `now`.
pub async fn run_feed_at<F: PageFetcher>(
    config: &Config,
    storage: &dyn RunStorage,
    fetcher: F,
    now: DateTime<Utc>,
) -> Result<RunSummary> {
    let mut state = storage.load_state(now).await.state;

    let extractor = build_extractor(&config.selectors)?;
    let crawler = Crawler::new(fetcher, extractor, config.crawler.max_pages);
    let outcome = crawler.crawl(&config.crawler.seed_url).await;
    if outcome.is_partial() {
        log::warn!(
            "Warning: crawl stopped early after {} page(s); continuing with {} articles",
            outcome.pages_fetched,
            outcome.articles.len()
        );
    }

    let filter = FilterEngine::new(&config.filters);
    let tracker = StateTracker::new(&config.retention);
    let accepted = select_articles(&outcome.articles, &filter, &tracker, &state, now);

    let feed_written = if accepted.is_empty() {
        log::info!("No new articles to add to feed.");
        false
    } else {
        let mut emitter = FeedEmitter::new(ChannelInfo::default());
        emitter.add_articles(&accepted);
        let bytes = emitter.render(now)?;
        storage.write_feed(&bytes).await?;
        log::info!("Feed generated with {} articles", emitter.len());
        true
    };

    tracker.merge_and_prune(&mut state, &accepted, now);
    let state_saved = save_state(storage, &state).await;

    if feed_written {
        log::info!(
            "Successfully added {} new articles to feed.",
            accepted.len()
        );
    }

    Ok(RunSummary {
        pages_fetched: outcome.pages_fetched,
        crawl_stop: outcome.stop,
        scraped: outcome.articles.len(),
        published: accepted,
        feed_written,
        known_articles: state.len(),
        state_saved,
    })
}

/// Keep articles that pass the filters, were not published before, are
/// recent, and are the first occurrence of their URL in this crawl.
pub fn select_articles(
    articles: &[ArticleRecord],
    filter: &FilterEngine,
    tracker: &StateTracker,
    state: &RunState,
    now: DateTime<Utc>,
) -> Vec<ArticleRecord> {
    let mut seen = HashSet::new();
    let mut accepted = Vec::new();

    for article in articles {
        if filter.should_exclude(article) {
            log::debug!("Filtered out {}", article.url);
            continue;
        }
        if !tracker.is_new(article, state) {
            log::debug!("Already published {}", article.url);
            continue;
        }
        if !tracker.is_recent(article, now) {
            log::debug!("Too old to publish {}", article.url);
            continue;
        }
        if seen.insert(article.url.as_str()) {
            accepted.push(article.clone());
        }
    }

    accepted
}

/// Compile the configured selectors, falling back to the defaults.
fn build_extractor(selectors: &ArticleSelectors) -> Result<ArticleExtractor> {
    ArticleExtractor::new(selectors).or_else(|e| {
        log::error!("Error in configured selectors ({e}); using default selectors");
        ArticleExtractor::new(&ArticleSelectors::default())
    })
}

async fn save_state(storage: &dyn RunStorage, state: &RunState) -> bool {
    match storage.save_state(state).await {
        Ok(()) => true,
        Err(e) => {
            log::error!("Error saving state file: {e}");
            false
        }
    }
}
