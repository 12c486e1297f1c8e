// ─── Version Manifest ───
// Fetches the top-level version index and sorts it into launcher categories.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::core::downloader::Downloader;
use crate::core::error::LauncherResult;

/// Top-level version manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionManifest {
    pub latest: LatestVersions,
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersions {
    pub release: String,
    pub snapshot: String,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: VersionType,
    /// Descriptor URL.
    pub url: String,
    #[serde(default, rename = "releaseTime")]
    pub release_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sha1: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
    #[serde(other)]
    Other,
}

/// Launcher-facing grouping of manifest entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCategory {
    LatestRelease,
    LatestSnapshot,
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
}

impl VersionCategory {
    pub const ALL: [VersionCategory; 6] = [
        VersionCategory::LatestRelease,
        VersionCategory::LatestSnapshot,
        VersionCategory::Release,
        VersionCategory::Snapshot,
        VersionCategory::OldBeta,
        VersionCategory::OldAlpha,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VersionCategory::LatestRelease => "Latest Release",
            VersionCategory::LatestSnapshot => "Latest Snapshot",
            VersionCategory::Release => "Release",
            VersionCategory::Snapshot => "Snapshot",
            VersionCategory::OldBeta => "Old Beta",
            VersionCategory::OldAlpha => "Old Alpha",
        }
    }
}

impl fmt::Display for VersionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Version ids per category, each in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCatalog {
    pub latest_release: Vec<String>,
    pub latest_snapshot: Vec<String>,
    pub release: Vec<String>,
    pub snapshot: Vec<String>,
    pub old_beta: Vec<String>,
    pub old_alpha: Vec<String>,
}

impl VersionCatalog {
    pub fn bucket(&self, category: VersionCategory) -> &[String] {
        match category {
            VersionCategory::LatestRelease => &self.latest_release,
            VersionCategory::LatestSnapshot => &self.latest_snapshot,
            VersionCategory::Release => &self.release,
            VersionCategory::Snapshot => &self.snapshot,
            VersionCategory::OldBeta => &self.old_beta,
            VersionCategory::OldAlpha => &self.old_alpha,
        }
    }
}

impl VersionManifest {
    /// Fetch the version manifest.
    pub async fn load(downloader: &Downloader, url: &str) -> LauncherResult<Self> {
        info!("Fetching version manifest...");

        let raw = downloader.fetch_text(url).await?;
        let manifest: VersionManifest = serde_json::from_str(&raw)?;

        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Sort entries into categories.
    ///
    /// The declared latest release/snapshot go to their own bucket and are
    /// kept out of the plain Release/Snapshot buckets.
    pub fn classify(&self) -> VersionCatalog {
        let mut catalog = VersionCatalog::default();
        let latest_release = self.latest.release.as_str();
        let latest_snapshot = self.latest.snapshot.as_str();

        for entry in &self.versions {
            let id = entry.id.as_str();

            if id == latest_release {
                catalog.latest_release.push(entry.id.clone());
            } else if id == latest_snapshot {
                catalog.latest_snapshot.push(entry.id.clone());
            }

            match entry.version_type {
                VersionType::Release if id != latest_release => {
                    catalog.release.push(entry.id.clone());
                }
                VersionType::Snapshot if id != latest_snapshot => {
                    catalog.snapshot.push(entry.id.clone());
                }
                VersionType::OldBeta => catalog.old_beta.push(entry.id.clone()),
                VersionType::OldAlpha => catalog.old_alpha.push(entry.id.clone()),
                _ => {}
            }
        }

        catalog
    }
}
