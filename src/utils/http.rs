// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Source of listing-page markup.
///
/// The crawler only ever needs "give me the body of this URL"; keeping that
/// behind a trait lets tests drive pagination without a network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page and return its body. Any non-success outcome is an error.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &CrawlerConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// [`PageFetcher`] backed by a shared `reqwest` session.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the client from crawler settings.
    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self::new(create_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?;

        let response = response
            .error_for_status()
            .map_err(|e| AppError::fetch(url, e))?;

        response.text().await.map_err(|e| AppError::fetch(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::models::ArticleSelectors;
    use crate::services::{ArticleExtractor, CrawlStop, Crawler};

    /// Answer a single connection with `response` verbatim.
    async fn serve(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/news")
    }

    fn local_fetcher() -> HttpFetcher {
        HttpFetcher::new(Client::builder().no_proxy().build().unwrap())
    }

    const UNAVAILABLE: &str =
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

    #[test]
    fn test_create_client_from_default_config() {
        assert!(create_client(&CrawlerConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_is_fetch_error() {
        let fetcher = HttpFetcher::from_config(&CrawlerConfig::default()).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, AppError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_success_status_returns_body() {
        let url =
            serve("HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello").await;
        let fetcher = local_fetcher();
        assert_eq!(fetcher.fetch(&url).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_error_status_is_fetch_error() {
        let url = serve(UNAVAILABLE).await;
        let fetcher = local_fetcher();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, AppError::Fetch { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_error_status_ends_crawl() {
        let url = serve(UNAVAILABLE).await;
        let fetcher = local_fetcher();
        let extractor = ArticleExtractor::new(&ArticleSelectors::default()).unwrap();

        let outcome = Crawler::new(fetcher, extractor, 5).crawl(&url).await;

        assert!(outcome.is_partial());
        assert_eq!(outcome.pages_fetched, 0);
        assert!(outcome.articles.is_empty());
        assert!(matches!(outcome.stop, CrawlStop::FetchFailed { .. }));
    }
}
