//! Robots.txt policy for the seed host
//!
//! Allow/disallow matching is delegated to the robotstxt crate. Crawl-delay
//! is not part of that crate's API, so it is read here line by line.

use crate::url::CrawlTarget;
use robotstxt::DefaultMatcher;
use std::time::Duration;

/// Upper bound on a crawl-delay taken from robots.txt
pub const MAX_CRAWL_DELAY_SECS: u64 = 60;

/// Parsed robots.txt rules for one host
#[derive(Debug, Clone, Default)]
pub struct RobotsPolicy {
    /// Raw robots.txt content; empty means allow all
    content: String,
}

impl RobotsPolicy {
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// A policy that allows everything
    ///
    /// Used when robots.txt is missing or cannot be fetched.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_allow_all(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Checks a full URL against the rules for `agent`
    pub fn is_allowed(&self, url: &str, agent: &str) -> bool {
        if self.is_allow_all() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, agent, url)
    }

    pub fn allows(&self, target: &CrawlTarget, agent: &str) -> bool {
        self.is_allowed(target.as_str(), agent)
    }

    /// Crawl-delay in seconds for `agent`
    ///
    /// A group naming the agent takes precedence over the `*` group. Agent
    /// names match case-insensitively as substrings of `agent`.
    pub fn crawl_delay(&self, agent: &str) -> Option<f64> {
        if self.is_allow_all() {
            return None;
        }

        let agent = agent.to_lowercase();
        let mut group: Vec<String> = Vec::new();
        let mut in_rules = false;
        let mut wildcard_delay = None;
        let mut agent_delay = None;

        for line in self.content.lines() {
            // Strip trailing comments
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if in_rules {
                        group.clear();
                        in_rules = false;
                    }
                    group.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    in_rules = true;
                    let Ok(delay) = value.parse::<f64>() else {
                        continue;
                    };
                    if !delay.is_finite() || delay < 0.0 {
                        continue;
                    }
                    if group.iter().any(|ua| ua != "*" && agent.contains(ua.as_str())) {
                        agent_delay = Some(delay);
                    } else if group.iter().any(|ua| ua == "*") {
                        wildcard_delay = Some(delay);
                    }
                }
                _ => in_rules = true,
            }
        }

        agent_delay.or(wildcard_delay)
    }

    /// The per-worker pause to use given the configured delay
    ///
    /// Returns the larger of `configured` and this policy's crawl-delay.
    /// The crawl-delay is capped at [`MAX_CRAWL_DELAY_SECS`], and a value
    /// that does not fit a `Duration` is ignored.
    pub fn effective_delay(&self, configured: Duration, agent: &str) -> Duration {
        let robots_delay = self
            .crawl_delay(agent)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .map(|delay| delay.min(Duration::from_secs(MAX_CRAWL_DELAY_SECS)))
            .unwrap_or(Duration::ZERO);

        std::cmp::max(configured, robots_delay)
    }
}
