//! Service layer for the feed generator.
//!
//! This module contains the business logic for:
//! - Listing extraction (`ArticleExtractor`)
//! - Paginated crawling (`Crawler`)
//! - Exclusion rules (`FilterEngine`)
//! - Publication tracking (`StateTracker`)
//! - RSS output (`FeedEmitter`)

mod crawler;
mod extractor;
mod feed;
mod filter;
mod tracker;

pub use crawler::{CrawlOutcome, CrawlStop, Crawler};
pub use extractor::ArticleExtractor;
pub use feed::{ChannelInfo, FeedEmitter};
pub use filter::{FilterEngine, should_exclude};
pub use tracker::{StateTracker, is_new, is_recent, merge_and_prune};
