//! Output module for crawl results
//!
//! This module handles:
//! - Accumulating discovered links, addresses, assets and failures
//! - Writing the per-host link files
//! - Printing the end-of-crawl summary

mod aggregator;
mod export;
pub mod stats;

pub use aggregator::{CrawlSummary, LinkExport, ResultAggregator};
pub use export::write_link_files;
pub use stats::{format_summary, print_summary};
