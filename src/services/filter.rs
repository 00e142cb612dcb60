//! Article filter.
//!
//! Nothing is excluded unless a rule fires: a blank field, a URL pattern, or
//! a title keyword. Rules are OR'd.

use crate::models::{ArticleRecord, FilterConfig};

/// Compiled form of [`FilterConfig`], with title keywords lowercased once.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    url_patterns: Vec<String>,
    title_keywords: Vec<String>,
}

impl FilterEngine {
    /// Empty rules are dropped with a warning; they would match everything.
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            url_patterns: non_empty(&config.url_patterns, "url_patterns"),
            title_keywords: non_empty(&config.title_keywords, "title_keywords")
                .into_iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// Whether the article should be left out of the feed.
    pub fn should_exclude(&self, article: &ArticleRecord) -> bool {
        if article.url.trim().is_empty() || article.title.trim().is_empty() {
            return true;
        }
        self.url_matches(&article.url) || self.title_matches(&article.title)
    }

    fn url_matches(&self, url: &str) -> bool {
        self.url_patterns.iter().any(|p| url.contains(p.as_str()))
    }

    fn title_matches(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.title_keywords.iter().any(|k| title.contains(k.as_str()))
    }
}

fn non_empty(rules: &[String], key: &str) -> Vec<String> {
    let kept: Vec<String> = rules.iter().filter(|r| !r.is_empty()).cloned().collect();
    let ignored = rules.len() - kept.len();
    if ignored > 0 {
        log::warn!("Warning: ignoring {ignored} empty entry(ies) in filters.{key}");
    }
    kept
}

/// One-shot form of [`FilterEngine::should_exclude`].
pub fn should_exclude(article: &ArticleRecord, config: &FilterConfig) -> bool {
    FilterEngine::new(config).should_exclude(article)
}
