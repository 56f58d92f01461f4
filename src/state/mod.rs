//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the lifecycle of one crawl session
//!   (`Idle -> Running -> Exhausted | BudgetReached | Cancelled -> Done`)

mod phase;

pub use phase::CrawlPhase;
