// src/models/selectors.rs

//! CSS selectors for scraping the news listing.
//!
//! The listing markup is not under our control, so every field is a priority
//! list: candidates are tried in order and the first one that matches wins.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// CSS selectors for scraping a news listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArticleSelectors {
    /// Selector for each article card on the page
    pub item: String,

    /// Headline candidates within a card, highest priority first
    pub title: Vec<String>,

    /// Link candidates within a card
    pub link: Vec<String>,

    /// Teaser paragraph candidates within a card
    pub summary: Vec<String>,

    /// Timestamp element candidates within a card
    pub time: Vec<String>,

    /// Machine-readable attribute on the timestamp element
    pub time_attr: String,

    /// Candidates for the pagination anchor
    pub next_page: Vec<String>,

    /// Visible text of the pagination anchor when it carries no `rel`
    pub next_page_text: String,
}

impl Default for ArticleSelectors {
    fn default() -> Self {
        Self {
            item: "article".to_string(),
            title: vec!["h2".to_string(), "h3".to_string()],
            link: vec!["a".to_string()],
            summary: vec!["p".to_string()],
            time: vec!["time".to_string()],
            time_attr: "datetime".to_string(),
            next_page: vec![r#"a[rel~="next"]"#.to_string()],
            next_page_text: "Next".to_string(),
        }
    }
}

impl ArticleSelectors {
    /// Check that every selector parses.
    pub fn validate(&self) -> Result<()> {
        parse_selector(&self.item)?;
        for list in [
            &self.title,
            &self.link,
            &self.summary,
            &self.time,
            &self.next_page,
        ] {
            parse_list(list)?;
        }
        if self.title.is_empty() {
            return Err(AppError::validation("selectors.title is empty"));
        }
        if self.link.is_empty() {
            return Err(AppError::validation("selectors.link is empty"));
        }
        Ok(())
    }
}

/// Parse one CSS selector.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Parse a priority list of CSS selectors, keeping the order.
pub fn parse_list(list: &[String]) -> Result<Vec<Selector>> {
    list.iter().map(|s| parse_selector(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_are_valid() {
        assert!(ArticleSelectors::default().validate().is_ok());
    }

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("div.card").is_ok());
        assert!(parse_selector(r#"a[rel~="next"]"#).is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }

    #[test]
    fn test_validate_rejects_empty_title_list() {
        let selectors = ArticleSelectors {
            title: Vec::new(),
            ..ArticleSelectors::default()
        };
        assert!(selectors.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let selectors: ArticleSelectors =
            serde_yaml::from_str("item: div.news-card\ntitle: [h4]\n").unwrap();
        assert_eq!(selectors.item, "div.news-card");
        assert_eq!(selectors.title, vec!["h4".to_string()]);
        assert_eq!(selectors.link, vec!["a".to_string()]);
        assert_eq!(selectors.time_attr, "datetime");
    }
}
