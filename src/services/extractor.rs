// src/services/extractor.rs

//! Article extraction service.
//!
//! Turns listing-page markup into [`ArticleRecord`]s using the configured
//! selector priority lists. A card that cannot produce a record is skipped;
//! nothing in here fails a page.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::Result;
use crate::models::{ArticleRecord, ArticleSelectors, parse_list, parse_selector};
use crate::utils::time::parse_timestamp;
use crate::utils::{normalize_whitespace, resolve_url};

/// Service for extracting article records from listing pages.
#[derive(Debug)]
pub struct ArticleExtractor {
    item: Selector,
    title: Vec<Selector>,
    link: Vec<Selector>,
    summary: Vec<Selector>,
    time: Vec<Selector>,
    time_attr: String,
    next_page: Vec<Selector>,
    next_page_text: String,
    anchor: Selector,
}

impl ArticleExtractor {
    /// Compile the selectors. Fails only if one of them does not parse.
    pub fn new(selectors: &ArticleSelectors) -> Result<Self> {
        Ok(Self {
            item: parse_selector(&selectors.item)?,
            title: parse_list(&selectors.title)?,
            link: parse_list(&selectors.link)?,
            summary: parse_list(&selectors.summary)?,
            time: parse_list(&selectors.time)?,
            time_attr: selectors.time_attr.clone(),
            next_page: parse_list(&selectors.next_page)?,
            next_page_text: selectors.next_page_text.trim().to_string(),
            anchor: parse_selector("a[href]")?,
        })
    }

    /// Extract every article card from a parsed page.
    pub fn extract_page(&self, document: &Html, page_url: &Url) -> Vec<ArticleRecord> {
        let mut articles = Vec::new();
        let mut skipped = 0usize;

        for item in document.select(&self.item) {
            match self.extract(item, page_url) {
                Some(article) => articles.push(article),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log::debug!("Skipped {skipped} incomplete article cards on {page_url}");
        }
        articles
    }

    /// Extract one article card.
    ///
    /// Title and link are required; description defaults to empty text and
    /// the timestamp to the current time.
    pub fn extract(&self, item: ElementRef<'_>, page_url: &Url) -> Option<ArticleRecord> {
        let title_elem = first_match(item, &self.title)?;
        let title = normalize_whitespace(&title_elem.text().collect::<String>());

        let href = self.link.iter().find_map(|sel| {
            item.select(sel)
                .filter_map(|a| a.value().attr("href"))
                .map(str::trim)
                .find(|href| !href.is_empty())
        })?;
        let url = resolve_url(page_url, href)?;

        let description = first_match(item, &self.summary)
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        let published = self.published_at(item).unwrap_or_else(|| {
            log::debug!("No usable timestamp for {url}; using ingestion time");
            Utc::now()
        });

        match ArticleRecord::new(&title, &url, &description, published) {
            Ok(article) => Some(article),
            Err(e) => {
                log::debug!("Skipping article card: {e}");
                None
            }
        }
    }

    /// Find the pagination link on a page, resolved to an absolute URL.
    pub fn next_page(&self, document: &Html, page_url: &Url) -> Option<String> {
        let by_rel = self.next_page.iter().find_map(|sel| {
            document
                .select(sel)
                .filter_map(|a| a.value().attr("href"))
                .map(str::trim)
                .find(|href| !href.is_empty())
        });

        let href = by_rel.or_else(|| {
            if self.next_page_text.is_empty() {
                return None;
            }
            document
                .select(&self.anchor)
                .filter(|a| {
                    normalize_whitespace(&a.text().collect::<String>())
                        .eq_ignore_ascii_case(&self.next_page_text)
                })
                .filter_map(|a| a.value().attr("href"))
                .map(str::trim)
                .find(|href| !href.is_empty())
        })?;

        resolve_url(page_url, href)
    }

    /// Machine-readable attribute first, then the element's visible text.
    fn published_at(&self, item: ElementRef<'_>) -> Option<DateTime<Utc>> {
        let time_elem = first_match(item, &self.time)?;

        time_elem
            .value()
            .attr(&self.time_attr)
            .and_then(parse_timestamp)
            .or_else(|| parse_timestamp(&time_elem.text().collect::<String>()))
    }
}

/// First element matched by the highest-priority selector that matches at all.
fn first_match<'a>(item: ElementRef<'a>, candidates: &[Selector]) -> Option<ElementRef<'a>> {
    candidates.iter().find_map(|sel| item.select(sel).next())
}
