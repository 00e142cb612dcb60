//! Application configuration structures.
//!
//! `config.yml` is repaired rather than rejected: a missing or unreadable
//! file becomes the seeded default, and a readable file with gaps keeps what
//! it has and fills the rest from defaults.

use std::fs;
use std::path::Path;

use chrono::Duration;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{AppError, Result};
use crate::models::ArticleSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Exclusion rules applied to scraped articles
    #[serde(default)]
    pub filters: FilterConfig,

    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Recency and retention windows
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Listing page selectors
    #[serde(default)]
    pub selectors: ArticleSelectors,
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Read from disk as-is (missing keys filled from defaults)
    File,
    /// No file existed; the default was synthesized
    Created,
    /// The file could not be parsed; the default was synthesized
    Replaced,
}

/// A configuration together with how it was obtained.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub origin: ConfigOrigin,
}

impl Config {
    /// Load configuration from a YAML file, repairing missing sections.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_yaml::from_str(&content)?;
        Self::from_value(value)
    }

    /// Load the configuration, synthesizing and persisting the default when
    /// the file is missing or malformed.
    pub fn load_or_create(path: impl AsRef<Path>) -> ConfigLoad {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("No config at {}; creating default", path.display());
            return ConfigLoad {
                config: Self::create_default(path),
                origin: ConfigOrigin::Created,
            };
        }

        match Self::load(path) {
            Ok(mut config) => {
                config.repair();
                ConfigLoad {
                    config,
                    origin: ConfigOrigin::File,
                }
            }
            Err(e) => {
                log::error!("Error parsing config file {}: {}", path.display(), e);
                ConfigLoad {
                    config: Self::create_default(path),
                    origin: ConfigOrigin::Replaced,
                }
            }
        }
    }

    /// Build the default configuration and try to write it to `path`.
    ///
    /// A failed write is logged; the default is returned either way.
    pub fn create_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let config = Self::default();
        if let Err(e) = config.save(path) {
            log::warn!(
                "Warning: Could not save default config to {}: {}",
                path.display(),
                e
            );
        }
        config
    }

    /// Write the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Build a configuration from an already-parsed YAML document.
    ///
    /// Only a document that is not a mapping at all is an error. Every
    /// section or key with the wrong shape falls back to its default.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Mapping(root) = value else {
            return Err(AppError::config("top level of config is not a mapping"));
        };

        Ok(Self {
            filters: FilterConfig::from_value(root.get("filters")),
            crawler: section_or_default(&root, "crawler"),
            retention: section_or_default(&root, "retention"),
            selectors: section_or_default(&root, "selectors"),
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.crawler.validate()?;
        self.retention.validate()?;
        self.selectors.validate()
    }

    /// Replace any crawler or retention section that fails validation with
    /// its default. The file on disk is left as written.
    pub fn repair(&mut self) {
        if let Err(e) = self.crawler.validate() {
            log::warn!("Warning: {e}; using default crawler settings");
            self.crawler = CrawlerConfig::default();
        }
        if let Err(e) = self.retention.validate() {
            log::warn!("Warning: {e}; using default retention windows");
            self.retention = RetentionConfig::default();
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filters: FilterConfig::seeded(),
            crawler: CrawlerConfig::default(),
            retention: RetentionConfig::default(),
            selectors: ArticleSelectors::default(),
        }
    }
}

/// Deserialize a top-level section, using its default when absent or invalid.
fn section_or_default<T>(root: &Mapping, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match root.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_yaml::from_value(value.clone()).unwrap_or_else(|e| {
            log::warn!("Warning: Invalid '{key}' section in config ({e}); using defaults");
            T::default()
        }),
    }
}

/// Exclusion rules. An empty rule list excludes nothing.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Case-sensitive substrings; a match anywhere in the URL excludes
    #[serde(default)]
    pub url_patterns: Vec<String>,

    /// Case-insensitive substrings; a match anywhere in the title excludes
    #[serde(default)]
    pub title_keywords: Vec<String>,
}

impl FilterConfig {
    /// The rules written into a freshly created config file.
    pub fn seeded() -> Self {
        Self {
            url_patterns: vec!["/aflw/".to_string()],
            title_keywords: vec!["AFLW".to_string()],
        }
    }

    fn from_value(value: Option<&Value>) -> Self {
        let Some(Value::Mapping(filters)) = value else {
            if value.is_some_and(|v| !v.is_null()) {
                log::warn!("Warning: 'filters' in config is not a mapping; using empty filters");
            }
            return Self::default();
        };

        Self {
            url_patterns: string_list(filters, "url_patterns"),
            title_keywords: string_list(filters, "title_keywords"),
        }
    }
}

fn string_list(filters: &Mapping, key: &str) -> Vec<String> {
    match filters.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_yaml::from_value(value.clone()).unwrap_or_else(|e| {
            log::warn!("Warning: filters.{key} is not a list of strings ({e}); ignoring it");
            Vec::new()
        }),
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrawlerConfig {
    /// First listing page to fetch
    #[serde(default = "defaults::seed_url")]
    pub seed_url: String,

    /// Hard ceiling on pages fetched per run
    #[serde(default = "defaults::max_pages")]
    pub max_pages: usize,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl CrawlerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        HeaderValue::from_str(&self.user_agent).map_err(|_| {
            AppError::validation("crawler.user_agent is not a valid header value")
        })?;
        if self.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.max_pages == 0 {
            return Err(AppError::validation("crawler.max_pages must be > 0"));
        }
        url::Url::parse(&self.seed_url).map_err(|e| {
            AppError::validation(format!(
                "crawler.seed_url '{}' is not a valid URL: {}",
                self.seed_url, e
            ))
        })?;
        Ok(())
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: defaults::seed_url(),
            max_pages: defaults::max_pages(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Time windows used when deciding what to publish and what to remember.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Only articles published within this many hours are published
    #[serde(default = "defaults::recent_hours")]
    pub recent_hours: i64,

    /// Known articles older than this many days are forgotten
    #[serde(default = "defaults::keep_days")]
    pub keep_days: i64,
}

impl RetentionConfig {
    /// The recency window, if `recent_hours` is positive and representable.
    pub fn recent_window(&self) -> Option<Duration> {
        Duration::try_hours(self.recent_hours).filter(|d| *d > Duration::zero())
    }

    /// The retention window, if `keep_days` is positive and representable.
    pub fn keep_window(&self) -> Option<Duration> {
        Duration::try_days(self.keep_days).filter(|d| *d > Duration::zero())
    }

    pub fn validate(&self) -> Result<()> {
        if self.recent_window().is_none() {
            return Err(AppError::validation(format!(
                "retention.recent_hours {} is out of range",
                self.recent_hours
            )));
        }
        if self.keep_window().is_none() {
            return Err(AppError::validation(format!(
                "retention.keep_days {} is out of range",
                self.keep_days
            )));
        }
        Ok(())
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            recent_hours: defaults::recent_hours(),
            keep_days: defaults::keep_days(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn seed_url() -> String {
        "https://www.afl.com.au/news".into()
    }
    pub fn max_pages() -> usize {
        5
    }
    pub fn user_agent() -> String {
        "AFL RSS Feed Generator/1.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Retention defaults
    pub fn recent_hours() -> i64 {
        24
    }
    pub fn keep_days() -> i64 {
        7
    }
}
