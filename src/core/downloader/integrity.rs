use std::path::Path;

use sha1::{Digest, Sha1};

/// Lowercase hex SHA-1 of a buffer.
pub fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Whether the file at `path` hashes to `expected` (hex, any case).
///
/// A missing or unreadable file is simply not valid.
pub async fn verify(path: &Path, expected: &str) -> bool {
    match tokio::fs::read(path).await {
        Ok(bytes) => sha1_hex(&bytes).eq_ignore_ascii_case(expected.trim()),
        Err(_) => false,
    }
}
