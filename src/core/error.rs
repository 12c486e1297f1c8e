use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the launcher core.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("Network unreachable for {url}: {reason}")]
    NetworkUnreachable { url: String, reason: String },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Descriptors ─────────────────────────────────────
    #[error("Malformed version descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("Version not found in manifest: {0}")]
    VersionNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Platform / runtime ──────────────────────────────
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Java runtime provisioning failed: {0}")]
    RuntimeProvisionFailed(String),

    // ── Archive ─────────────────────────────────────────
    #[error("Extraction of {path:?} failed: {reason}")]
    ExtractionFailed { path: PathBuf, reason: String },

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl LauncherError {
    /// Wrap an IO error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }
}
