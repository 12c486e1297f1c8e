use std::path::Path;

use tracing::{info, warn};

use crate::core::archive::{self, ZipFilter};
use crate::core::downloader::{Downloader, FetchOutcome};
use crate::core::error::{LauncherError, LauncherResult};

use super::{NativeArtifact, ResolvedArtifactSet};

/// Tally of one install pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub downloaded: usize,
    pub cached: usize,
    /// Optional artifacts that could not be fetched or unpacked.
    pub failed: Vec<String>,
}

impl InstallReport {
    fn record(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Cached => self.cached += 1,
            FetchOutcome::Downloaded => self.downloaded += 1,
        }
    }
}

/// Fetch everything in `set`, one file at a time.
///
/// The client jar is mandatory and its failure aborts the install. Library and
/// native failures are logged and skipped so the launch can still be
/// attempted with whatever did arrive.
pub async fn install(
    set: &ResolvedArtifactSet,
    downloader: &Downloader,
) -> LauncherResult<InstallReport> {
    let mut report = InstallReport::default();

    let client = &set.client_jar;
    let outcome = downloader
        .fetch_if_stale(&client.url, &client.path, &client.sha1)
        .await?;
    report.record(outcome);

    for lib in &set.libraries {
        match downloader.fetch_if_stale(&lib.url, &lib.path, &lib.sha1).await {
            Ok(outcome) => report.record(outcome),
            Err(e) => {
                warn!("Library {} unavailable: {}", lib.name, e);
                report.failed.push(lib.name.clone());
            }
        }
    }

    if !set.natives.is_empty() {
        tokio::fs::create_dir_all(&set.natives_dir)
            .await
            .map_err(|e| LauncherError::io(&set.natives_dir, e))?;
    }

    for native in &set.natives {
        match install_native(native, &set.natives_dir, downloader).await {
            Ok(outcome) => report.record(outcome),
            Err(e) => {
                warn!("Native {} ({}) unavailable: {}", native.name, native.classifier, e);
                report.failed.push(format!("{}:{}", native.name, native.classifier));
            }
        }
    }

    info!(
        "Installed {}: {} downloaded, {} up to date, {} failed",
        set.version_id,
        report.downloaded,
        report.cached,
        report.failed.len()
    );
    Ok(report)
}

/// Download a native bundle, unpack it into `natives_dir` and drop the archive.
async fn install_native(
    native: &NativeArtifact,
    natives_dir: &Path,
    downloader: &Downloader,
) -> LauncherResult<FetchOutcome> {
    let outcome = downloader
        .fetch_if_stale(&native.url, &native.archive_path, &native.sha1)
        .await?;

    let archive_path = native.archive_path.clone();
    let dest = natives_dir.to_path_buf();
    tokio::task::spawn_blocking(move || {
        archive::extract_zip(&archive_path, &dest, ZipFilter::SkipMetaInf)
    })
    .await
    .map_err(|e| LauncherError::Other(format!("Task join error: {e}")))??;

    tokio::fs::remove_file(&native.archive_path)
        .await
        .map_err(|e| LauncherError::io(&native.archive_path, e))?;

    Ok(outcome)
}
