//! URL handling module
//!
//! This module turns raw `href` values into normalized [`CrawlTarget`]s and
//! classifies them relative to the seed:
//! - Resolution of relative references against the page URL
//! - Query and fragment stripping (the crawler's identity is scheme+host+path)
//! - `mailto:` address validation
//! - Internal/external host matching

mod classify;
mod email;
mod matcher;
mod target;

// Re-export main types and functions
pub use classify::{classify, normalize_asset, Reference, ReferenceKind};
pub use email::{is_valid_email, mailto_address};
pub use matcher::{matches_host, HostScope};
pub use target::CrawlTarget;
