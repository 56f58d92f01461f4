//! Image download after a crawl
//!
//! Each asset is saved under its last path segment. Assets that share a
//! file name overwrite each other; the last one written wins.

use crate::crawler::Fetcher;
use crate::url::CrawlTarget;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};

/// Counts of a download run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub failed: usize,
}

/// File name an asset is saved as
///
/// The last path segment, or `index` when the path ends in `/`.
pub fn asset_file_name(target: &CrawlTarget) -> String {
    target
        .as_url()
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("index")
        .to_string()
}

/// Downloads every asset into `dir` with at most `concurrency` requests at once
///
/// Individual failures are logged and counted; only failing to create `dir`
/// is an error.
pub async fn download_assets<'a, I>(
    fetcher: &Fetcher,
    assets: I,
    dir: &Path,
    concurrency: usize,
) -> std::io::Result<DownloadSummary>
where
    I: IntoIterator<Item = &'a CrawlTarget>,
{
    tokio::fs::create_dir_all(dir).await?;

    let outcomes: Vec<bool> = stream::iter(assets)
        .map(|asset| download_one(fetcher, asset, dir))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let downloaded = outcomes.iter().filter(|ok| **ok).count();
    Ok(DownloadSummary {
        downloaded,
        failed: outcomes.len() - downloaded,
    })
}

async fn download_one(fetcher: &Fetcher, asset: &CrawlTarget, dir: &Path) -> bool {
    let path: PathBuf = dir.join(asset_file_name(asset));

    let bytes = match fetcher.fetch_bytes(asset.as_url()).await {
        Ok(bytes) => bytes,
        Err(failure) => {
            tracing::warn!("Failed to download {}: {}", asset, failure);
            return false;
        }
    };

    match tokio::fs::write(&path, &bytes).await {
        Ok(()) => {
            tracing::debug!("Saved {} ({} bytes) to {}", asset, bytes.len(), path.display());
            true
        }
        Err(e) => {
            tracing::warn!("Failed to write {}: {}", path.display(), e);
            false
        }
    }
}
