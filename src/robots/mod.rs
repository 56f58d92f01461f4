//! Robots.txt handling module
//!
//! Robots rules are only consulted when the crawl opts in. They are fetched
//! once, for the seed's origin, before any worker starts.

mod policy;

pub use policy::{RobotsPolicy, MAX_CRAWL_DELAY_SECS};

use crate::crawler::Fetcher;
use crate::url::CrawlTarget;

/// Fetches and parses robots.txt for the seed's origin
///
/// Any failure (missing file, HTTP error, timeout) yields an allow-all
/// policy.
pub async fn fetch_robots(fetcher: &Fetcher, seed: &CrawlTarget) -> RobotsPolicy {
    let robots_url = match seed.as_url().join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL for {}: {}", seed, e);
            return RobotsPolicy::allow_all();
        }
    };

    match fetcher.fetch_text(&robots_url).await {
        Ok(content) => {
            tracing::debug!("Fetched {} ({} bytes)", robots_url, content.len());
            RobotsPolicy::from_content(&content)
        }
        Err(failure) => {
            tracing::debug!("No robots.txt at {}: {}", robots_url, failure);
            RobotsPolicy::allow_all()
        }
    }
}
