//! link-crawler main entry point
//!
//! This is the command-line interface for the link crawler.

use clap::Parser;
use link_crawler::config::{load_config_with_hash, validate, Config};
use link_crawler::crawler::{download_assets, Coordinator};
use link_crawler::output::{print_summary, write_link_files};
use link_crawler::CrawlError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// link-crawler: extract links and email addresses from a website
///
/// Crawls pages on the seed's host breadth-first, up to a visit budget,
/// and writes the internal links, external links and email addresses it
/// found to one file each.
#[derive(Parser, Debug)]
#[command(name = "link-crawler")]
#[command(version)]
#[command(about = "Link and email extractor", long_about = None)]
struct Cli {
    /// The URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum number of pages to crawl [default: 30]
    #[arg(short, long, value_name = "N")]
    max_urls: Option<u32>,

    /// Number of concurrent workers [default: 8]
    #[arg(short, long, value_name = "N")]
    workers: Option<u32>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Pause each worker takes after every fetch, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Treat subdomains of the seed host as internal
    #[arg(long)]
    subdomains: bool,

    /// Skip internal links disallowed by the site's robots.txt
    #[arg(long)]
    respect_robots: bool,

    /// Also collect image links
    #[arg(long)]
    images: bool,

    /// Download collected images into this directory (implies --images)
    #[arg(long, value_name = "DIR")]
    download_images: Option<PathBuf>,

    /// Directory to write the link files to [default: .]
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line flags on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(max_urls) = self.max_urls {
            config.crawler.max_visits = max_urls;
        }
        if let Some(workers) = self.workers {
            config.crawler.workers = workers;
        }
        if let Some(timeout) = self.timeout {
            config.crawler.request_timeout_secs = timeout;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.crawler.delay_ms = delay_ms;
        }
        if self.subdomains {
            config.crawler.include_subdomains = true;
        }
        if self.respect_robots {
            config.crawler.respect_robots = true;
        }
        if self.images {
            config.crawler.collect_assets = true;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(dir) = &self.download_images {
            config.output.download_images = Some(dir.clone());
        }
        if config.output.download_images.is_some() {
            config.crawler.collect_assets = true;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_crawler=info,warn"),
            1 => EnvFilter::new("link_crawler=debug,info"),
            2 => EnvFilter::new("link_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if one was given
fn load_config(cli: &Cli) -> Result<Config, CrawlError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Handles the main crawl operation
async fn run(cli: Cli) -> Result<(), CrawlError> {
    let config = load_config(&cli)?;
    let output_dir = config.output.directory.clone();
    let download_dir = config.output.download_images.clone();
    let collect_assets = config.crawler.collect_assets;
    let workers = config.crawler.workers as usize;

    let coordinator = Coordinator::new(config, &cli.url)?;
    let fetcher = coordinator.fetcher().clone();

    // Stop claiming new pages on Ctrl-C and keep what was found so far
    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing in-flight requests");
            cancel.cancel();
        }
    });

    let report = coordinator.run().await?;
    if report.was_cancelled() {
        tracing::warn!("Crawl was cancelled; results are partial");
    }

    let written = write_link_files(&output_dir, report.host(), &report.export(), collect_assets)?;
    for path in &written {
        tracing::info!("Wrote {}", path.display());
    }

    print_summary(&report.summary);

    if let Some(dir) = download_dir {
        tracing::info!(
            "Downloading {} images to {}",
            report.summary.asset_count,
            dir.display()
        );
        let downloads = download_assets(&fetcher, report.results.assets(), &dir, workers).await?;
        println!(
            "[+] Downloaded images: {} ({} failed)",
            downloads.downloaded, downloads.failed
        );
    }

    Ok(())
}
