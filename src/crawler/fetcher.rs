//! HTTP fetcher implementation
//!
//! This module is the crawler's only network boundary:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for pages, robots.txt and assets
//! - Classifying every failure into a [`FetchFailure`]
//!
//! Nothing here returns a `reqwest::Error` to the caller and nothing is
//! retried.

use crate::config::Config;
use crate::url::CrawlTarget;
use reqwest::{header, Client, Response};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a fetch did not produce an HTML page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("non-HTML content ({0})")]
    NonHtmlContent(String),
}

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects; relative links resolve against it
    pub final_url: Url,

    /// Content-Type header value (empty if the server sent none)
    pub content_type: String,

    /// Page body
    pub body: String,
}

/// Outcome of fetching one target
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Page(Page),
    Failed(FetchFailure),
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub target: CrawlTarget,
    pub outcome: FetchOutcome,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Page(_))
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match &self.outcome {
            FetchOutcome::Failed(failure) => Some(failure),
            FetchOutcome::Page(_) => None,
        }
    }
}

/// Shared HTTP fetcher
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher with the given user agent and per-request timeout
    ///
    /// # Example
    ///
    /// ```no_run
    /// use link_crawler::crawler::Fetcher;
    /// use std::time::Duration;
    ///
    /// let fetcher = Fetcher::new("link-crawler/0.1.0", Duration::from_secs(10)).unwrap();
    /// ```
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Builds a fetcher from the crawl configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            &config.user_agent.header_value(),
            config.crawler.request_timeout(),
        )
    }

    /// Fetches one crawl target
    ///
    /// # Outcome Mapping
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | 2xx with HTML (or no) Content-Type | `Page` |
    /// | 2xx with any other Content-Type | `NonHtmlContent` |
    /// | Non-2xx status | `HttpStatus(code)` |
    /// | Timeout (connect, headers or body) | `Timeout` |
    /// | Any other transport error | `Connection` |
    pub async fn fetch(&self, target: &CrawlTarget) -> FetchResult {
        let outcome = match self.get_page(target.as_url()).await {
            Ok(page) => FetchOutcome::Page(page),
            Err(failure) => FetchOutcome::Failed(failure),
        };

        FetchResult {
            target: target.clone(),
            outcome,
        }
    }

    async fn get_page(&self, url: &Url) -> Result<Page, FetchFailure> {
        let response = self.get(url).await?;
        let final_url = response.url().clone();

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return Err(FetchFailure::NonHtmlContent(content_type));
        }

        let body = response.text().await.map_err(|e| classify_error(&e))?;

        Ok(Page {
            final_url,
            content_type,
            body,
        })
    }

    /// Fetches a plain-text resource such as robots.txt
    pub async fn fetch_text(&self, url: &Url) -> Result<String, FetchFailure> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| classify_error(&e))
    }

    /// Fetches a binary resource such as an image
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchFailure> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await.map_err(|e| classify_error(&e))?;
        Ok(bytes.to_vec())
    }

    /// Sends a GET and turns non-success statuses into failures
    async fn get(&self, url: &Url) -> Result<Response, FetchFailure> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::HttpStatus(status.as_u16()));
        }

        Ok(response)
    }
}

/// Maps a transport error to a fetch failure
fn classify_error(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if let Some(status) = error.status() {
        FetchFailure::HttpStatus(status.as_u16())
    } else {
        FetchFailure::Connection(error.to_string())
    }
}

/// Returns true if a Content-Type header denotes an HTML document
///
/// A missing header is treated as HTML.
pub fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    mime.is_empty() || mime == "text/html" || mime == "application/xhtml+xml"
}
