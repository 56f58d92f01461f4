//! Frontier of discovered-but-unvisited crawl targets
//!
//! This module handles:
//! - FIFO ordering of pending targets
//! - Deduplication across queued and visited targets
//! - Enforcing the visit budget
//!
//! The frontier is not synchronized; the coordinator owns it behind a lock.

use crate::url::CrawlTarget;
use std::collections::{HashSet, VecDeque};

/// Pending and visited crawl targets with a visit budget
///
/// A target is in at most one of the queue and the visited set at any time,
/// and `visited_count` never exceeds `max_visits`.
#[derive(Debug)]
pub struct Frontier {
    /// Pending targets in discovery order
    queue: VecDeque<CrawlTarget>,

    /// Mirror of `queue` for O(1) membership checks
    queued: HashSet<CrawlTarget>,

    /// Targets that have been fetched or are being fetched
    visited: HashSet<CrawlTarget>,

    /// Number of fetches handed out; redirect targets do not count
    visits: u32,

    /// Maximum number of targets that may ever be visited
    max_visits: u32,
}

impl Frontier {
    /// Creates an empty frontier with the given visit budget
    pub fn new(max_visits: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            visits: 0,
            max_visits,
        }
    }

    /// Creates a frontier holding only the seed
    pub fn seed(seed: CrawlTarget, max_visits: u32) -> Self {
        let mut frontier = Self::new(max_visits);
        frontier.offer(seed);
        frontier
    }

    /// Offers a target to the frontier
    ///
    /// Returns true if the target was enqueued. Targets already queued or
    /// visited are ignored, as is everything once the budget is spent.
    pub fn offer(&mut self, target: CrawlTarget) -> bool {
        if self.is_budget_exhausted()
            || self.visited.contains(&target)
            || self.queued.contains(&target)
        {
            return false;
        }

        self.queued.insert(target.clone());
        self.queue.push_back(target);
        true
    }

    /// Pops the next target in discovery order
    ///
    /// Returns `None` when the queue is empty or the budget is spent. The
    /// caller marks the target visited before fetching it.
    pub fn next(&mut self) -> Option<CrawlTarget> {
        if self.is_budget_exhausted() {
            return None;
        }

        let target = self.queue.pop_front()?;
        self.queued.remove(&target);
        Some(target)
    }

    /// Records that `target` is being fetched; it will never be queued again
    pub fn mark_visited(&mut self, target: &CrawlTarget) {
        if self.visited.insert(target.clone()) {
            self.visits += 1;
        }
    }

    /// Records a page reached by following a redirect from a claimed target
    ///
    /// The page was fetched as part of that claim, so it leaves the queue and
    /// becomes visited without spending another unit of the budget.
    pub fn mark_reached(&mut self, target: &CrawlTarget) {
        if self.queued.remove(target) {
            self.queue.retain(|queued| queued != target);
        }
        self.visited.insert(target.clone());
    }

    pub fn is_budget_exhausted(&self) -> bool {
        self.visited_count() >= self.max_visits
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of targets waiting to be fetched
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_count(&self) -> u32 {
        self.visits
    }

    pub fn contains_visited(&self, target: &CrawlTarget) -> bool {
        self.visited.contains(target)
    }
}
