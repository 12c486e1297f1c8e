use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, SystemTime};

use tracing::{debug, info, instrument, warn};

use crate::core::archive::{self, ZipFilter};
use crate::core::config::LauncherConfig;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::{self, HostOs};

/// Command name used when no better runtime is known.
pub const SYSTEM_JAVA: &str = "java";
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// A probed Java executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaInstallation {
    pub path: PathBuf,
    pub version: String,
    pub major: u32,
}

// ─── Probing ───

/// Run `<java> -version` and parse what it reports.
///
/// Any failure (missing binary, timeout, unparsable output) yields `None`.
#[instrument]
pub async fn probe_java(path: &Path) -> Option<JavaInstallation> {
    let child = tokio::process::Command::new(path)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .ok()?;

    let output = match tokio::time::timeout(PROBE_TIMEOUT, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            debug!("Probe of {:?} failed: {}", path, e);
            return None;
        }
        Err(_) => {
            warn!("Probe of {:?} timed out", path);
            return None;
        }
    };

    // `-version` reports on stderr.
    let report = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stderr),
        String::from_utf8_lossy(&output.stdout)
    );
    debug!("Probing {:?}: {}", path, report.lines().next().unwrap_or(""));

    let version = parse_version_string(&report)?;
    let major = parse_major_version(&version)?;
    Some(JavaInstallation {
        path: path.to_path_buf(),
        version,
        major,
    })
}

/// First double-quoted token of a `-version` report, e.g. `21.0.5`.
fn parse_version_string(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let start = line.find('"')?;
        let end = line[start + 1..].find('"')?;
        Some(line[start + 1..start + 1 + end].to_string())
    })
}

/// Major version of a Java version string; legacy `1.x` maps to `x`.
fn parse_major_version(version: &str) -> Option<u32> {
    let mut parts = version.split(|c: char| !c.is_ascii_digit());
    let first: u32 = parts.next()?.parse().ok()?;
    if first == 1 {
        parts.next().and_then(|s| s.parse().ok()).or(Some(first))
    } else {
        Some(first)
    }
}

/// Whether `java` on the PATH satisfies `required_major`.
pub async fn system_java_satisfies(required_major: u32) -> bool {
    match probe_java(Path::new(SYSTEM_JAVA)).await {
        Some(java) => {
            debug!("System Java {} (major {})", java.version, java.major);
            java.major >= required_major
        }
        None => false,
    }
}

// ─── Locating provisioned runtimes ───

fn locate_java_binary(runtime_root: &Path, os: HostOs) -> Option<PathBuf> {
    let primary = runtime_root.join("bin").join(os.java_exe());
    if primary.is_file() {
        return Some(primary);
    }

    let mac_layout = runtime_root
        .join("Contents")
        .join("Home")
        .join("bin")
        .join(os.java_exe());
    if mac_layout.is_file() {
        return Some(mac_layout);
    }

    None
}

/// Java binaries of every unpacked runtime under `runtimes_dir`, newest first.
fn provisioned_java_binaries(runtimes_dir: &Path, os: HostOs) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(runtimes_dir) else {
        return vec![];
    };

    let mut candidates: Vec<(SystemTime, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|entry| {
            let root = entry.path();
            let java = locate_java_binary(&root, os)?;
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            Some((modified, java))
        })
        .collect();

    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    candidates.into_iter().map(|(_, java)| java).collect()
}

/// Java binary of the most recently unpacked runtime under `runtimes_dir`.
pub fn latest_provisioned_java(runtimes_dir: &Path, os: HostOs) -> Option<PathBuf> {
    provisioned_java_binaries(runtimes_dir, os).into_iter().next()
}

/// Newest provisioned runtime whose probed major is at least `required_major`.
pub async fn provisioned_java_satisfying(
    config: &LauncherConfig,
    required_major: u32,
) -> Option<JavaInstallation> {
    for java in provisioned_java_binaries(&config.runtime_dir(), config.os) {
        match probe_java(&java).await {
            Some(found) if found.major >= required_major => return Some(found),
            Some(found) => debug!(
                "Provisioned Java {} at {:?} is older than {}",
                found.major, java, required_major
            ),
            None => debug!("Provisioned Java at {:?} did not respond", java),
        }
    }
    None
}

/// Pick the Java executable for launching.
///
/// A system runtime meeting the requirement wins; then the newest provisioned
/// runtime meeting it; otherwise the bare command name, so a missing Java
/// surfaces as a normal spawn error.
pub async fn select_java_executable(config: &LauncherConfig, required_major: u32) -> PathBuf {
    if system_java_satisfies(required_major).await {
        return PathBuf::from(SYSTEM_JAVA);
    }

    match provisioned_java_satisfying(config, required_major).await {
        Some(java) => {
            info!("Using provisioned Java {} at {:?}", java.version, java.path);
            java.path
        }
        None => {
            warn!(
                "No Java {}+ found; falling back to `{}` on PATH",
                required_major, SYSTEM_JAVA
            );
            PathBuf::from(SYSTEM_JAVA)
        }
    }
}

// ─── Provisioning ───

/// Archive kind served for each platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
}

impl ArchiveKind {
    pub fn for_os(os: HostOs) -> Self {
        match os {
            HostOs::Windows => ArchiveKind::Zip,
            HostOs::Linux | HostOs::Osx => ArchiveKind::TarGz,
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            ArchiveKind::Zip => "openjdk.zip",
            ArchiveKind::TarGz => "openjdk.tar.gz",
        }
    }
}

/// Download URL of a JDK build for `major` on this host.
pub fn runtime_archive_url(base: &str, major: u32, os: HostOs, arch: &str) -> String {
    let os_name = match os {
        HostOs::Windows => "windows",
        HostOs::Linux => "linux",
        HostOs::Osx => "mac",
    };
    format!(
        "{}/{}/ga/{}/{}/jdk/hotspot/normal/eclipse",
        base.trim_end_matches('/'),
        major,
        os_name,
        arch
    )
}

/// Make sure a Java runtime of at least `required_major` is available,
/// checking the system `java` and already provisioned runtimes before
/// downloading one.
///
/// Never fails outward: any problem is logged and reported as `false`, and
/// the launch falls back to whatever `java` resolves to.
pub async fn ensure_runtime(
    config: &LauncherConfig,
    downloader: &Downloader,
    required_major: u32,
) -> bool {
    if system_java_satisfies(required_major).await {
        debug!("System Java satisfies major {}", required_major);
        return true;
    }

    if let Some(java) = provisioned_java_satisfying(config, required_major).await {
        debug!(
            "Provisioned Java {} at {:?} satisfies major {}",
            java.version, java.path, required_major
        );
        return true;
    }

    match provision_runtime(config, downloader, required_major).await {
        Ok(java) => {
            info!("Provisioned Java {} at {:?}", required_major, java);
            true
        }
        Err(e) => {
            warn!("Java {} provisioning failed: {}", required_major, e);
            false
        }
    }
}

#[instrument(skip(config, downloader))]
async fn provision_runtime(
    config: &LauncherConfig,
    downloader: &Downloader,
    required_major: u32,
) -> LauncherResult<PathBuf> {
    let arch = platform::runtime_arch()?;
    let url = runtime_archive_url(&config.runtime_download_base, required_major, config.os, arch);
    let kind = ArchiveKind::for_os(config.os);
    let runtimes_dir = config.runtime_dir();
    let archive_path = runtimes_dir.join(kind.file_name());

    info!("Downloading Java {} from {}", required_major, url);
    downloader
        .fetch(&url, &archive_path, None)
        .await
        .map_err(|e| LauncherError::RuntimeProvisionFailed(e.to_string()))?;

    let dest = runtimes_dir.clone();
    let archive = archive_path.clone();
    tokio::task::spawn_blocking(move || match kind {
        ArchiveKind::Zip => archive::extract_zip(&archive, &dest, ZipFilter::All).map(|_| ()),
        ArchiveKind::TarGz => archive::extract_tar_gz(&archive, &dest),
    })
    .await
    .map_err(|e| LauncherError::Other(format!("Task join error: {e}")))??;

    #[cfg(unix)]
    mark_binaries_executable(&runtimes_dir)?;

    tokio::fs::remove_file(&archive_path)
        .await
        .map_err(|e| LauncherError::io(&archive_path, e))?;

    latest_provisioned_java(&runtimes_dir, config.os).ok_or_else(|| {
        LauncherError::RuntimeProvisionFailed(format!(
            "no java binary found in {runtimes_dir:?} after extraction"
        ))
    })
}

/// `chmod 755` every file in each runtime's `bin/` directory.
#[cfg(unix)]
fn mark_binaries_executable(runtimes_dir: &Path) -> LauncherResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let roots = std::fs::read_dir(runtimes_dir).map_err(|e| LauncherError::io(runtimes_dir, e))?;
    for root in roots.filter_map(Result::ok) {
        let root = root.path();
        for bin_dir in [root.join("bin"), root.join("Contents/Home/bin")] {
            let Ok(entries) = std::fs::read_dir(&bin_dir) else {
                continue;
            };
            for entry in entries.filter_map(Result::ok) {
                let path = entry.path();
                if path.is_file() {
                    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                        .map_err(|e| LauncherError::io(&path, e))?;
                }
            }
        }
    }
    Ok(())
}
