// src/services/crawler.rs

//! Listing crawler service.
//!
//! Walks the paginated news listing one page at a time, bounded only by the
//! page ceiling. A failed page ends the walk early; whatever was collected
//! before it is still returned.

use scraper::Html;
use url::Url;

use crate::models::ArticleRecord;
use crate::services::ArticleExtractor;
use crate::utils::http::PageFetcher;

/// Why a crawl stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlStop {
    /// The page ceiling was reached
    PageLimit,
    /// The last page had no pagination link
    NoNextPage,
    /// A page (or the seed URL itself) could not be fetched
    FetchFailed { url: String, reason: String },
}

/// Summary of a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub articles: Vec<ArticleRecord>,
    pub pages_fetched: usize,
    pub stop: CrawlStop,
}

impl CrawlOutcome {
    /// True if the walk ended because of a fetch failure.
    pub fn is_partial(&self) -> bool {
        matches!(self.stop, CrawlStop::FetchFailed { .. })
    }
}

/// Service for crawling the paginated news listing.
pub struct Crawler<F> {
    fetcher: F,
    extractor: ArticleExtractor,
    max_pages: usize,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, extractor: ArticleExtractor, max_pages: usize) -> Self {
        Self {
            fetcher,
            extractor,
            max_pages,
        }
    }

    /// Crawl from `seed_url`, fetching at most `max_pages` pages in sequence.
    pub async fn crawl(&self, seed_url: &str) -> CrawlOutcome {
        let mut articles = Vec::new();
        let mut pages_fetched = 0;

        let mut current = match Url::parse(seed_url) {
            Ok(url) => url,
            Err(e) => {
                log::error!("Error: invalid seed URL {seed_url}: {e}");
                return CrawlOutcome {
                    articles,
                    pages_fetched,
                    stop: CrawlStop::FetchFailed {
                        url: seed_url.to_string(),
                        reason: e.to_string(),
                    },
                };
            }
        };

        let stop = loop {
            if pages_fetched >= self.max_pages {
                break CrawlStop::PageLimit;
            }

            log::info!("Fetching page {}: {}", pages_fetched + 1, current);
            let body = match self.fetcher.fetch(current.as_str()).await {
                Ok(body) => body,
                Err(e) => {
                    log::error!("Error fetching {current}: {e}");
                    break CrawlStop::FetchFailed {
                        url: current.to_string(),
                        reason: e.to_string(),
                    };
                }
            };
            pages_fetched += 1;

            // Parsed markup is not Send; keep it out of the next await.
            let next = {
                let document = Html::parse_document(&body);
                let page_articles = self.extractor.extract_page(&document, &current);
                log::info!(
                    "Extracted {} articles from {}",
                    page_articles.len(),
                    current
                );
                articles.extend(page_articles);

                if pages_fetched >= self.max_pages {
                    break CrawlStop::PageLimit;
                }
                self.extractor.next_page(&document, &current)
            };

            let Some(next) = next else {
                break CrawlStop::NoNextPage;
            };
            current = match Url::parse(&next) {
                Ok(url) => url,
                Err(e) => {
                    log::warn!("Warning: unusable next page link {next}: {e}");
                    break CrawlStop::NoNextPage;
                }
            };
        };

        log::info!(
            "Crawl finished after {} page(s) with {} articles ({:?})",
            pages_fetched,
            articles.len(),
            stop
        );

        CrawlOutcome {
            articles,
            pages_fetched,
            stop,
        }
    }
}
