// ─── Archive Extraction ───
// Zip and tar.gz unpacking for native bundles and Java runtimes.

use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

/// Which entries of a zip to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZipFilter {
    All,
    /// Skip `META-INF/` (signatures and manifests of native jars).
    SkipMetaInf,
}

fn extraction_failed(path: &Path, reason: impl ToString) -> LauncherError {
    LauncherError::ExtractionFailed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Extract a zip archive into `dest_dir`, returning the files written.
pub fn extract_zip(
    archive_path: &Path,
    dest_dir: &Path,
    filter: ZipFilter,
) -> LauncherResult<Vec<PathBuf>> {
    let file = File::open(archive_path).map_err(|e| LauncherError::io(archive_path, e))?;
    let mut archive =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|e| extraction_failed(archive_path, e))?;

    std::fs::create_dir_all(dest_dir).map_err(|e| LauncherError::io(dest_dir, e))?;

    let mut written = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| extraction_failed(archive_path, e))?;

        // Entries escaping the destination are dropped.
        let Some(rel_path) = entry.enclosed_name() else {
            continue;
        };

        if filter == ZipFilter::SkipMetaInf
            && rel_path.components().next() == Some(Component::Normal("META-INF".as_ref()))
        {
            continue;
        }

        let out_path = dest_dir.join(&rel_path);
        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|e| LauncherError::io(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }

        let mut out = File::create(&out_path).map_err(|e| LauncherError::io(&out_path, e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| LauncherError::io(&out_path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                let _ = std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode));
            }
        }

        written.push(out_path);
    }

    debug!("Extracted {} files from {:?}", written.len(), archive_path);
    Ok(written)
}

/// Extract a gzip-compressed tarball into `dest_dir`.
pub fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> LauncherResult<()> {
    let file = File::open(archive_path).map_err(|e| LauncherError::io(archive_path, e))?;
    let decoder = flate2::read::GzDecoder::new(BufReader::new(file));
    let mut archive = tar::Archive::new(decoder);

    std::fs::create_dir_all(dest_dir).map_err(|e| LauncherError::io(dest_dir, e))?;
    archive
        .unpack(dest_dir)
        .map_err(|e| extraction_failed(archive_path, e))?;

    debug!("Unpacked {:?} into {:?}", archive_path, dest_dir);
    Ok(())
}
