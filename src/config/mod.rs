//! Configuration module
//!
//! Crawl settings come from built-in defaults, an optional TOML file and
//! command-line overrides, in that order.
//!
//! # Example
//!
//! ```no_run
//! use link_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_MAX_VISITS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_WORKERS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_REQUEST_TIMEOUT_SECS, MAX_WORKERS};
