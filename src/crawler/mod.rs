//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with failure classification
//! - HTML parsing and reference extraction
//! - The frontier of pending targets and its visit budget
//! - Worker pool coordination
//! - Downloading collected images

mod coordinator;
mod download;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{scan_page, Claim, Coordinator, CrawlReport, CrawlSession, PageFindings};
pub use download::{asset_file_name, download_assets, DownloadSummary};
pub use fetcher::{is_html, FetchFailure, FetchOutcome, FetchResult, Fetcher, Page};
pub use frontier::Frontier;
pub use parser::Document;

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl from `seed`
///
/// This is the simplest entry point. Use [`Coordinator`] directly to get a
/// cancellation token before the crawl starts.
pub async fn crawl(config: Config, seed: &str) -> Result<CrawlReport, CrawlError> {
    Coordinator::new(config, seed)?.run().await
}
