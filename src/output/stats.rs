//! Human-readable crawl summary

use crate::output::CrawlSummary;
use std::fmt::{self, Write};

/// Renders the summary block printed at the end of a crawl
///
/// The image line only appears when assets were collected.
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();
    write_summary(&mut out, summary).map(|()| out).unwrap_or_default()
}

fn write_summary(out: &mut impl Write, summary: &CrawlSummary) -> fmt::Result {
    writeln!(out, "=== Summary ===")?;
    writeln!(out, "[+] Total Internal links: {}", summary.internal_count)?;
    writeln!(out, "[+] Total External links: {}", summary.external_count)?;
    writeln!(out, "[+] Total Email addresses: {}", summary.email_count)?;
    writeln!(out, "[+] Total URLs: {}", summary.total_urls())?;
    writeln!(out, "[+] Total crawled URLs: {}", summary.total_visited)?;
    writeln!(out, "[+] Failed pages: {}", summary.failed_count)?;
    if summary.asset_count > 0 {
        writeln!(out, "[+] Total Image links: {}", summary.asset_count)?;
    }
    writeln!(
        out,
        "[+] Duration: {:.1}s (started {})",
        summary.duration_seconds(),
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Prints the summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!();
    print!("{}", format_summary(summary));
}
