use std::path::Path;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http;

use super::integrity;

/// What `fetch_if_stale` had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The local file already matched its digest; nothing was requested.
    Cached,
    Downloaded,
}

/// Sequential, SHA-1 validated downloader.
///
/// Every request goes out over a certificate-validating client first. If that
/// fails for any reason the request is repeated exactly once over a client
/// that skips certificate validation, unless the fallback is disabled.
#[derive(Debug, Clone)]
pub struct Downloader {
    verified: Client,
    /// `None` when the degraded-trust retry is disabled.
    unverified: Option<Client>,
}

impl Downloader {
    pub fn new(allow_insecure_fallback: bool) -> LauncherResult<Self> {
        let verified = http::build_http_client().map_err(|e| {
            LauncherError::Other(format!("failed to build HTTP client: {e}"))
        })?;
        let unverified = if allow_insecure_fallback {
            Some(http::build_unverified_http_client().map_err(|e| {
                LauncherError::Other(format!("failed to build fallback HTTP client: {e}"))
            })?)
        } else {
            None
        };

        Ok(Self {
            verified,
            unverified,
        })
    }

    /// Build from explicit clients.
    pub fn with_clients(verified: Client, unverified: Option<Client>) -> Self {
        Self {
            verified,
            unverified,
        }
    }

    // ── Transport ───────────────────────────────────────

    async fn get_bytes(&self, url: &str) -> LauncherResult<Vec<u8>> {
        let first_error = match request(&self.verified, url).await {
            Ok(bytes) => return Ok(bytes),
            Err(reason) => reason,
        };

        let Some(unverified) = &self.unverified else {
            return Err(LauncherError::NetworkUnreachable {
                url: url.to_string(),
                reason: first_error,
            });
        };

        warn!(
            "Verified fetch of {} failed ({}); retrying once without certificate validation",
            url, first_error
        );

        request(unverified, url)
            .await
            .map_err(|reason| LauncherError::NetworkUnreachable {
                url: url.to_string(),
                reason: format!("{first_error}; degraded-trust retry: {reason}"),
            })
    }

    /// Fetch a document body as text.
    pub async fn fetch_text(&self, url: &str) -> LauncherResult<String> {
        let bytes = self.get_bytes(url).await?;
        String::from_utf8(bytes).map_err(|e| LauncherError::NetworkUnreachable {
            url: url.to_string(),
            reason: format!("response is not UTF-8: {e}"),
        })
    }

    // ── Single file download ────────────────────────────

    /// Download `url` to `dest`, overwriting it, then validate SHA-1 if given.
    ///
    /// Creates parent directories as needed. On a digest mismatch the written
    /// file is left in place; the next `integrity::verify` rejects it.
    pub async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let bytes = self.get_bytes(url).await?;

        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| LauncherError::io(dest, e))?;

        if let Some(expected) = sha1_expected {
            let actual = integrity::sha1_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected.trim()) {
                return Err(LauncherError::ChecksumMismatch {
                    path: dest.to_path_buf(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        debug!("Downloaded: {} -> {:?} ({} bytes)", url, dest, bytes.len());
        Ok(())
    }

    /// Download only if `dest` is missing or fails its checksum.
    pub async fn fetch_if_stale(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: &str,
    ) -> LauncherResult<FetchOutcome> {
        if integrity::verify(dest, sha1_expected).await {
            debug!("Up to date: {:?}", dest);
            return Ok(FetchOutcome::Cached);
        }

        self.fetch(url, dest, Some(sha1_expected)).await?;
        info!("Fetched {:?}", dest.file_name().unwrap_or_default());
        Ok(FetchOutcome::Downloaded)
    }
}

/// One GET; any transport error or non-success status is a failure.
async fn request(client: &Client, url: &str) -> Result<Vec<u8>, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status.as_u16()));
    }

    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}
