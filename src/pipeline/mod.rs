//! Pipeline entry points.
//!
//! - `run_feed`: crawl the listing, publish new articles, update state

pub mod run;

pub use run::{RunPaths, RunSummary, run_feed, run_feed_at, select_articles};
