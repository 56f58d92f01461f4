//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the worker pool that drives a crawl session:
//! - Owning the frontier and results behind a single lock
//! - Handing out targets to workers and absorbing what they found
//! - Detecting when the crawl is finished (drained, budget spent, cancelled)
//! - Applying the optional robots.txt policy and politeness delay
//!
//! Fetching and HTML parsing always happen outside the lock.

use crate::config::{validate, Config};
use crate::crawler::{Document, FetchFailure, FetchOutcome, Fetcher, Frontier, Page};
use crate::output::{CrawlSummary, LinkExport, ResultAggregator};
use crate::robots::{fetch_robots, RobotsPolicy};
use crate::state::CrawlPhase;
use crate::url::{classify, normalize_asset, CrawlTarget, HostScope, Reference};
use crate::CrawlError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio_util::sync::CancellationToken;

/// What a worker should do next
#[derive(Debug, PartialEq, Eq)]
pub enum Claim {
    /// Fetch this target
    Target(CrawlTarget),

    /// Nothing queued, but other fetches may still add work
    Wait,

    /// The crawl has stopped; exit
    Done,
}

/// Everything extracted from one fetched page
#[derive(Debug, Default)]
pub struct PageFindings {
    pub references: Vec<Reference>,
    pub assets: Vec<CrawlTarget>,
    /// The internal page actually served, when it differs from the request
    /// because of a redirect
    pub reached: Option<CrawlTarget>,
}

/// Mutable state of one crawl, shared by all workers behind a mutex
#[derive(Debug)]
pub struct CrawlSession {
    seed: CrawlTarget,
    frontier: Frontier,
    results: ResultAggregator,
    phase: CrawlPhase,
    in_flight: usize,
    robots: RobotsPolicy,
    robots_agent: String,
    robots_skipped: usize,
    seed_failure: Option<FetchFailure>,
}

impl CrawlSession {
    /// Creates an idle session whose frontier holds only the seed
    pub fn new(seed: CrawlTarget, max_visits: u32) -> Self {
        Self {
            frontier: Frontier::seed(seed.clone(), max_visits),
            seed,
            results: ResultAggregator::new(),
            phase: CrawlPhase::Idle,
            in_flight: 0,
            robots: RobotsPolicy::allow_all(),
            robots_agent: String::new(),
            robots_skipped: 0,
            seed_failure: None,
        }
    }

    /// Internal targets disallowed by `robots` for `agent` are recorded but
    /// never offered to the frontier
    pub fn with_robots(mut self, robots: RobotsPolicy, agent: &str) -> Self {
        self.robots = robots;
        self.robots_agent = agent.to_string();
        self
    }

    pub fn start(&mut self) -> Result<(), CrawlError> {
        self.phase.transition(CrawlPhase::Running)
    }

    /// Hands out the next target, marking it visited and in flight
    ///
    /// The first worker to find nothing left to do moves the session into
    /// its stop phase.
    pub fn claim(&mut self) -> Claim {
        if self.phase != CrawlPhase::Running {
            return Claim::Done;
        }

        if self.frontier.is_budget_exhausted() {
            self.stop(CrawlPhase::BudgetReached);
            return Claim::Done;
        }

        match self.frontier.next() {
            Some(target) => {
                self.frontier.mark_visited(&target);
                self.in_flight += 1;
                Claim::Target(target)
            }
            None if self.in_flight > 0 => Claim::Wait,
            None => {
                self.stop(CrawlPhase::Exhausted);
                Claim::Done
            }
        }
    }

    /// Absorbs the outcome of fetching a claimed target
    pub fn complete(&mut self, target: CrawlTarget, outcome: Result<PageFindings, FetchFailure>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome {
            Ok(mut findings) => {
                if let Some(reached) = findings.reached.take() {
                    if reached != target {
                        tracing::debug!("{} redirected to {}", target, reached);
                        self.frontier.mark_reached(&reached);
                    }
                }
                self.absorb(findings);
            }
            Err(failure) => {
                tracing::warn!("Failed to fetch {}: {}", target, failure);
                if target == self.seed {
                    self.seed_failure = Some(failure.clone());
                }
                self.results.record_failure(target, failure);
            }
        }
    }

    fn absorb(&mut self, findings: PageFindings) {
        for reference in findings.references {
            match reference {
                Reference::Internal(target) => {
                    let is_new = self.results.record_internal(target.clone());
                    if is_new {
                        tracing::debug!("Internal link: {}", target);
                    }

                    if self.robots.allows(&target, &self.robots_agent) {
                        self.frontier.offer(target);
                    } else if is_new {
                        tracing::debug!("Disallowed by robots.txt: {}", target);
                        self.robots_skipped += 1;
                    }
                }
                Reference::External(target) => {
                    if self.results.record_external(target.clone()) {
                        tracing::debug!("External link: {}", target);
                    }
                }
                Reference::Mailto(address) => {
                    if self.results.record_email(&address) {
                        tracing::info!("Email found: {}", address);
                    }
                }
                Reference::Invalid(raw) => {
                    tracing::trace!("Discarding reference: {}", raw);
                }
            }
        }

        for asset in findings.assets {
            if self.results.record_asset(asset.clone()) {
                tracing::debug!("Image link: {}", asset);
            }
        }
    }

    /// Moves a running session into a stop phase
    fn stop(&mut self, phase: CrawlPhase) {
        if self.phase.transition(phase).is_ok() {
            tracing::debug!("Crawl session is now {}", phase);
        }
    }

    /// Closes the session once every worker has exited
    ///
    /// Returns the stop phase the session passed through.
    fn finish(&mut self, cancelled: bool) -> Result<CrawlPhase, CrawlError> {
        if self.phase == CrawlPhase::Running {
            let stop = if cancelled {
                CrawlPhase::Cancelled
            } else {
                CrawlPhase::Exhausted
            };
            self.phase.transition(stop)?;
        }
        let stopped_by = self.phase;
        self.phase.transition(CrawlPhase::Done)?;
        Ok(stopped_by)
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn visited_count(&self) -> u32 {
        self.frontier.visited_count()
    }

    pub fn robots_skipped(&self) -> usize {
        self.robots_skipped
    }

    pub fn seed_failure(&self) -> Option<&FetchFailure> {
        self.seed_failure.as_ref()
    }

    pub fn results(&self) -> &ResultAggregator {
        &self.results
    }
}

/// Parses a fetched page and classifies everything on it
///
/// Relative references resolve against the page's final URL. When that URL
/// is internal it is reported as `reached`, so a redirect target is never
/// fetched a second time.
pub fn scan_page(
    page: &Page,
    seed: &CrawlTarget,
    scope: HostScope,
    collect_assets: bool,
) -> PageFindings {
    let document = Document::parse(&page.body);
    if let Some(title) = document.title() {
        tracing::debug!("Parsed {} ({})", page.final_url, title);
    }

    let references = document
        .anchors()
        .map(|raw| classify(raw, &page.final_url, seed, scope))
        .collect();

    let assets = if collect_assets {
        document
            .images()
            .filter_map(|raw| normalize_asset(raw, &page.final_url))
            .collect()
    } else {
        Vec::new()
    };

    let reached = CrawlTarget::from_url(page.final_url.clone())
        .ok()
        .filter(|target| scope.contains(seed, target));

    PageFindings {
        references,
        assets,
        reached,
    }
}

/// State shared by every worker task
struct Shared {
    session: Mutex<CrawlSession>,
    progress: Notify,
    fetcher: Fetcher,
    cancel: CancellationToken,
    seed: CrawlTarget,
    scope: HostScope,
    collect_assets: bool,
    delay: Duration,
}

/// Results of a finished crawl
#[derive(Debug)]
pub struct CrawlReport {
    pub seed: CrawlTarget,
    /// Why the crawl stopped: `Exhausted`, `BudgetReached` or `Cancelled`
    pub stopped_by: CrawlPhase,
    pub summary: CrawlSummary,
    pub results: ResultAggregator,
    pub robots_skipped: usize,
}

impl CrawlReport {
    pub fn export(&self) -> LinkExport {
        self.results.export()
    }

    /// Seed host without port, used to name output files
    pub fn host(&self) -> &str {
        self.seed.host()
    }

    pub fn was_cancelled(&self) -> bool {
        self.stopped_by == CrawlPhase::Cancelled
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    seed: CrawlTarget,
    fetcher: Fetcher,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator for crawling from `seed`
    ///
    /// # Returns
    ///
    /// * `Err(CrawlError::Config)` - The configuration is invalid
    /// * `Err(CrawlError::Url)` - The seed is not an absolute http(s) URL
    /// * `Err(CrawlError::Http)` - The HTTP client could not be built
    pub fn new(config: Config, seed: &str) -> Result<Self, CrawlError> {
        validate(&config)?;
        let seed = CrawlTarget::parse_seed(seed)?;
        let fetcher = Fetcher::from_config(&config)?;

        Ok(Self {
            config,
            seed,
            fetcher,
            cancel: CancellationToken::new(),
        })
    }

    /// Token that stops the crawl when cancelled
    ///
    /// Workers stop claiming new targets; fetches already in flight finish.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Runs the crawl to completion
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The crawl finished (possibly cancelled)
    /// * `Err(CrawlError::SeedUnreachable)` - The seed itself could not be fetched
    pub async fn run(self) -> Result<CrawlReport, CrawlError> {
        let crawler = &self.config.crawler;
        let agent = self.config.user_agent.robots_token().to_string();

        let (robots, delay) = if crawler.respect_robots {
            let robots = fetch_robots(&self.fetcher, &self.seed).await;
            let delay = robots.effective_delay(crawler.delay(), &agent);
            (robots, delay)
        } else {
            (RobotsPolicy::allow_all(), crawler.delay())
        };

        let mut session =
            CrawlSession::new(self.seed.clone(), crawler.max_visits).with_robots(robots, &agent);
        session.start()?;

        tracing::info!(
            "Starting crawl of {} with {} workers (budget {} pages)",
            self.seed,
            crawler.workers,
            crawler.max_visits
        );

        let shared = Arc::new(Shared {
            session: Mutex::new(session),
            progress: Notify::new(),
            fetcher: self.fetcher.clone(),
            cancel: self.cancel.clone(),
            seed: self.seed.clone(),
            scope: crawler.host_scope(),
            collect_assets: crawler.collect_assets,
            delay,
        });

        let handles: Vec<_> = (0..crawler.workers as usize)
            .map(|worker_id| tokio::spawn(run_worker(worker_id, Arc::clone(&shared))))
            .collect();

        for handle in handles {
            handle.await?;
        }

        let mut session = shared.session.lock().await;
        let stopped_by = session.finish(self.cancel.is_cancelled())?;

        if let Some(reason) = session.seed_failure.clone() {
            return Err(CrawlError::SeedUnreachable {
                url: self.seed.to_string(),
                reason,
            });
        }

        let summary = session.results.summary(session.visited_count());
        tracing::info!(
            "Crawl {}: {} pages visited, {} failed",
            stopped_by,
            summary.total_visited,
            summary.failed_count
        );
        if session.robots_skipped > 0 {
            tracing::info!("{} internal links skipped by robots.txt", session.robots_skipped);
        }

        Ok(CrawlReport {
            seed: self.seed.clone(),
            stopped_by,
            summary,
            results: std::mem::take(&mut session.results),
            robots_skipped: session.robots_skipped,
        })
    }
}

async fn run_worker(worker_id: usize, shared: Arc<Shared>) {
    tracing::debug!("Worker {} started", worker_id);

    loop {
        if shared.cancel.is_cancelled() {
            break;
        }

        // Registered before claiming so a completion between the claim and
        // the wait is not missed
        let progress = shared.progress.notified();

        let claim = shared.session.lock().await.claim();
        match claim {
            Claim::Target(target) => {
                tracing::info!("Crawling: {}", target);
                let fetched = shared.fetcher.fetch(&target).await;

                let outcome = match fetched.outcome {
                    FetchOutcome::Page(page) => Ok(scan_page(
                        &page,
                        &shared.seed,
                        shared.scope,
                        shared.collect_assets,
                    )),
                    FetchOutcome::Failed(failure) => Err(failure),
                };

                shared.session.lock().await.complete(target, outcome);
                shared.progress.notify_waiters();

                if !shared.delay.is_zero() {
                    tokio::select! {
                        _ = tokio::time::sleep(shared.delay) => {}
                        _ = shared.cancel.cancelled() => {}
                    }
                }
            }
            Claim::Wait => {
                tokio::select! {
                    _ = progress => {}
                    _ = shared.cancel.cancelled() => break,
                }
            }
            Claim::Done => {
                shared.progress.notify_waiters();
                break;
            }
        }
    }

    tracing::debug!("Worker {} finished", worker_id);
}
