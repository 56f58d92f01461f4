//! Crawl session phases
//!
//! A session moves `Idle -> Running` when it is seeded, then to exactly one
//! of the stop phases, then to `Done`.

use crate::CrawlError;
use std::fmt;

/// Represents the current phase of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Created but not yet seeded
    Idle,

    /// Workers are pulling from the frontier
    Running,

    // ===== Stop Phases =====
    /// The frontier drained with nothing in flight
    Exhausted,

    /// The visit budget was used up
    BudgetReached,

    /// The crawl was cancelled before it drained
    Cancelled,

    /// Terminal; results are final
    Done,
}

impl CrawlPhase {
    /// Returns true if the crawl has stopped pulling new work
    pub fn is_stopped(&self) -> bool {
        matches!(
            self,
            Self::Exhausted | Self::BudgetReached | Self::Cancelled | Self::Done
        )
    }

    /// Returns true if `next` is a legal successor of this phase
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Exhausted)
                | (Self::Running, Self::BudgetReached)
                | (Self::Running, Self::Cancelled)
                | (Self::Exhausted, Self::Done)
                | (Self::BudgetReached, Self::Done)
                | (Self::Cancelled, Self::Done)
        )
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), CrawlError> {
        if !self.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Exhausted => "exhausted",
            Self::BudgetReached => "budget_reached",
            Self::Cancelled => "cancelled",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
