// ─── Dependency Resolver ───
// Turns a version descriptor into the concrete files one host needs.

pub mod install;

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::core::config::LauncherConfig;
use crate::core::error::LauncherResult;
use crate::core::version::VersionDescriptor;

pub use install::{install, InstallReport};

/// The version's own jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientJar {
    pub url: String,
    pub sha1: String,
    pub path: PathBuf,
}

/// A classpath library under `libraries/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryArtifact {
    pub name: String,
    pub url: String,
    pub sha1: String,
    pub path: PathBuf,
}

/// A platform-native bundle, downloaded next to the natives directory and
/// unpacked into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeArtifact {
    pub name: String,
    pub classifier: String,
    pub url: String,
    pub sha1: String,
    /// Transient archive location, removed after extraction.
    pub archive_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifactSet {
    pub version_id: String,
    pub client_jar: ClientJar,
    pub libraries: Vec<LibraryArtifact>,
    pub natives: Vec<NativeArtifact>,
    pub natives_dir: PathBuf,
}

impl ResolvedArtifactSet {
    /// Library paths that are actually present on disk, in resolution order.
    pub fn existing_library_paths(&self) -> Vec<PathBuf> {
        self.libraries
            .iter()
            .filter(|lib| lib.path.is_file())
            .map(|lib| lib.path.clone())
            .collect()
    }
}

/// Resolve `descriptor` for the host described by `config`.
///
/// Only the client download is mandatory. Libraries are filtered by their
/// rules; a native bundle is planned only when the library names a classifier
/// for this OS and that classifier has a download.
pub fn resolve(
    descriptor: &VersionDescriptor,
    config: &LauncherConfig,
) -> LauncherResult<ResolvedArtifactSet> {
    let os = config.os;
    let client = descriptor.client_download()?;
    let libraries_dir = config.libraries_dir();
    let natives_dir = config.natives_dir(&descriptor.id);

    let mut libraries = Vec::new();
    let mut natives = Vec::new();

    for lib in &descriptor.libraries {
        if !lib.is_allowed_for(os) {
            debug!("Skipping library (OS rule): {}", lib.name);
            continue;
        }

        let artifact = lib.downloads.as_ref().and_then(|d| d.artifact.as_ref());
        if let Some(artifact) = artifact {
            match artifact.path.as_deref() {
                Some(path) => libraries.push(LibraryArtifact {
                    name: lib.name.clone(),
                    url: artifact.url.clone(),
                    sha1: artifact.sha1.clone(),
                    path: libraries_dir.join(path),
                }),
                None => warn!("Library {} has an artifact without a path", lib.name),
            }
        }

        if let Some((classifier, file)) = lib.native_download_for(os) {
            natives.push(NativeArtifact {
                name: lib.name.clone(),
                archive_path: natives_dir.join(format!("{classifier}.jar")),
                classifier,
                url: file.url.clone(),
                sha1: file.sha1.clone(),
            });
        }
    }

    info!(
        "Resolved {} for {}: {} of {} libraries, {} natives",
        descriptor.id,
        os,
        libraries.len(),
        descriptor.libraries.len(),
        natives.len()
    );

    Ok(ResolvedArtifactSet {
        version_id: descriptor.id.clone(),
        client_jar: ClientJar {
            url: client.url.clone(),
            sha1: client.sha1.clone(),
            path: config.client_jar_path(&descriptor.id),
        },
        libraries,
        natives,
        natives_dir,
    })
}
