use crate::url::HostScope;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default visit budget
pub const DEFAULT_MAX_VISITS: u32 = 30;

/// Default number of concurrent workers
pub const DEFAULT_WORKERS: u32 = 8;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure
///
/// Every section and field is optional in the TOML file; missing values take
/// their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of pages to fetch in one run
    pub max_visits: u32,

    /// Number of concurrent fetch workers
    pub workers: u32,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Fixed pause each worker takes after every fetch (milliseconds)
    pub delay_ms: u64,

    /// Treat subdomains of the seed host as internal
    pub include_subdomains: bool,

    /// Skip internal links disallowed by the site's robots.txt
    pub respect_robots: bool,

    /// Also collect `<img src>` references
    pub collect_assets: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_visits: DEFAULT_MAX_VISITS,
            workers: DEFAULT_WORKERS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            delay_ms: 0,
            include_subdomains: false,
            respect_robots: false,
            collect_assets: false,
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn host_scope(&self) -> HostScope {
        HostScope::from_include_subdomains(self.include_subdomains)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }

    /// The product token used when matching robots.txt groups
    pub fn robots_token(&self) -> &str {
        &self.crawler_name
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory the link files are written to
    pub directory: PathBuf,

    /// Download collected images into this directory after the crawl
    pub download_images: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            download_images: None,
        }
    }
}
