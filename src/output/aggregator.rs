//! Accumulated crawl results
//!
//! All sets are plain collections; the coordinator serializes access.

use crate::crawler::FetchFailure;
use crate::url::CrawlTarget;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Summary statistics for a crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSummary {
    pub internal_count: usize,
    pub external_count: usize,
    pub email_count: usize,
    pub asset_count: usize,
    pub failed_count: usize,
    pub total_visited: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    /// Internal plus external links
    pub fn total_urls(&self) -> usize {
        self.internal_count + self.external_count
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Sorted snapshot of every result set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkExport {
    pub internal: Vec<String>,
    pub external: Vec<String>,
    pub emails: Vec<String>,
    pub assets: Vec<String>,
}

/// Collects the links, addresses and failures found during a crawl
#[derive(Debug)]
pub struct ResultAggregator {
    internal: HashSet<CrawlTarget>,
    external: HashSet<CrawlTarget>,
    emails: HashSet<String>,
    assets: HashSet<CrawlTarget>,
    failures: HashMap<CrawlTarget, FetchFailure>,
    started_at: DateTime<Utc>,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {
            internal: HashSet::new(),
            external: HashSet::new(),
            emails: HashSet::new(),
            assets: HashSet::new(),
            failures: HashMap::new(),
            started_at: Utc::now(),
        }
    }

    /// Returns true if the target was not already recorded
    pub fn record_internal(&mut self, target: CrawlTarget) -> bool {
        self.internal.insert(target)
    }

    pub fn record_external(&mut self, target: CrawlTarget) -> bool {
        self.external.insert(target)
    }

    pub fn record_email(&mut self, address: &str) -> bool {
        self.emails.insert(address.to_string())
    }

    pub fn record_asset(&mut self, target: CrawlTarget) -> bool {
        self.assets.insert(target)
    }

    /// Records why a visited target produced no page
    ///
    /// The first failure recorded for a target is kept.
    pub fn record_failure(&mut self, target: CrawlTarget, failure: FetchFailure) -> bool {
        if self.failures.contains_key(&target) {
            return false;
        }
        self.failures.insert(target, failure);
        true
    }

    pub fn failure_for(&self, target: &CrawlTarget) -> Option<&FetchFailure> {
        self.failures.get(target)
    }

    pub fn assets(&self) -> impl Iterator<Item = &CrawlTarget> {
        self.assets.iter()
    }

    /// Counts and timestamps; `finished_at` is taken now
    pub fn summary(&self, total_visited: u32) -> CrawlSummary {
        CrawlSummary {
            internal_count: self.internal.len(),
            external_count: self.external.len(),
            email_count: self.emails.len(),
            asset_count: self.assets.len(),
            failed_count: self.failures.len(),
            total_visited,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn export(&self) -> LinkExport {
        LinkExport {
            internal: sorted(self.internal.iter().map(CrawlTarget::to_string)),
            external: sorted(self.external.iter().map(CrawlTarget::to_string)),
            emails: sorted(self.emails.iter().cloned()),
            assets: sorted(self.assets.iter().map(CrawlTarget::to_string)),
        }
    }
}

fn sorted(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut values: Vec<String> = values.collect();
    values.sort();
    values
}
