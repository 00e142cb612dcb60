//! Article data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A news article scraped from a listing page.
///
/// `url` is absolute and is the only identity an article has: two records
/// with the same `url` are the same article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Headline text
    pub title: String,

    /// Absolute URL of the article
    pub url: String,

    /// Teaser text (empty string if the listing has none)
    pub description: String,

    /// Publication instant, or ingestion time when the page gave none
    pub published: DateTime<Utc>,
}

impl ArticleRecord {
    /// Build a record, trimming text and rejecting a blank title or URL.
    pub fn new(
        title: impl AsRef<str>,
        url: impl AsRef<str>,
        description: impl AsRef<str>,
        published: DateTime<Utc>,
    ) -> Result<Self> {
        let title = title.as_ref().trim();
        let url = url.as_ref().trim();

        if title.is_empty() {
            return Err(AppError::validation(format!("article at '{url}' has no title")));
        }
        if url.is_empty() {
            return Err(AppError::validation(format!("article '{title}' has no url")));
        }

        Ok(Self {
            title: title.to_string(),
            url: url.to_string(),
            description: description.as_ref().trim().to_string(),
            published,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_fields() {
        let now = Utc::now();
        let article = ArticleRecord::new(
            "  Match Report  ",
            " https://www.afl.com.au/news/1 ",
            "\n Summary \n",
            now,
        )
        .unwrap();

        assert_eq!(article.title, "Match Report");
        assert_eq!(article.url, "https://www.afl.com.au/news/1");
        assert_eq!(article.description, "Summary");
        assert_eq!(article.published, now);
    }

    #[test]
    fn test_new_allows_empty_description() {
        let article =
            ArticleRecord::new("Title", "https://www.afl.com.au/news/1", "", Utc::now()).unwrap();
        assert!(article.description.is_empty());
    }

    #[test]
    fn test_new_rejects_blank_title_or_url() {
        assert!(ArticleRecord::new("   ", "https://x.com/1", "", Utc::now()).is_err());
        assert!(ArticleRecord::new("Title", "", "", Utc::now()).is_err());
    }
}
