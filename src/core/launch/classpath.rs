// ─── Classpath Builder ───
// Constructs the classpath for launching the client.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::platform::HostOs;
use crate::core::resolver::ResolvedArtifactSet;

/// Client jar first, then every resolved library that exists on disk.
///
/// Libraries that failed to download are left out here; the game then fails
/// on the missing class instead of the launcher aborting up front.
pub fn build_classpath(set: &ResolvedArtifactSet) -> Vec<PathBuf> {
    let mut entries = Vec::with_capacity(set.libraries.len() + 1);
    entries.push(set.client_jar.path.clone());

    for lib in &set.libraries {
        if lib.path.is_file() {
            entries.push(lib.path.clone());
        } else {
            debug!("Classpath entry missing on disk: {:?}", lib.path);
        }
    }

    entries
}

/// Join classpath entries with the separator of `os`.
pub fn join_classpath(entries: &[PathBuf], os: HostOs) -> String {
    entries
        .iter()
        .map(|p| safe_path_str(p))
        .collect::<Vec<_>>()
        .join(os.classpath_separator())
}

/// Path as a launch argument, without the Windows extended-length prefix
/// that Java's classpath handling rejects.
pub fn safe_path_str(path: &Path) -> String {
    let text = path.to_string_lossy();
    match text.strip_prefix(r"\\?\") {
        Some(stripped) => stripped.to_string(),
        None => text.into_owned(),
    }
}
