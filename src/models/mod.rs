// src/models/mod.rs

//! Domain models for the feed generator.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod article;
mod config;
mod selectors;
mod state;

// Re-export all public types
pub use article::ArticleRecord;
pub use config::{Config, ConfigLoad, ConfigOrigin, CrawlerConfig, FilterConfig, RetentionConfig};
pub use selectors::{ArticleSelectors, parse_list, parse_selector};
pub use state::{KnownArticle, RunState};
