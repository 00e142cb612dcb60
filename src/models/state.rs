//! Persisted run state: which articles were already published.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::lenient;

/// One already-published article, remembered until it ages out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnownArticle {
    pub url: String,

    #[serde(rename = "pub_date", with = "lenient")]
    pub published: DateTime<Utc>,
}

/// State carried from one run to the next (`previously_scraped.json`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunState {
    /// When the last run finished
    #[serde(with = "lenient")]
    pub last_run: DateTime<Utc>,

    /// Published articles still inside the retention window, in insertion order
    #[serde(rename = "articles", default)]
    pub known_articles: Vec<KnownArticle>,
}

impl RunState {
    /// Empty state for a first run.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            last_run: now,
            known_articles: Vec::new(),
        }
    }

    /// Whether an article with this URL has been published before.
    pub fn contains(&self, url: &str) -> bool {
        self.known_articles.iter().any(|a| a.url == url)
    }

    pub fn len(&self) -> usize {
        self.known_articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known_articles.is_empty()
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::empty(Utc::now())
    }
}
