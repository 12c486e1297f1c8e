// ─── Launcher Configuration ───
// Immutable directory layout and tunables, passed explicitly to every service.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::HostOs;

pub const VERSION_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";
pub const RUNTIME_DOWNLOAD_BASE: &str = "https://api.adoptium.net/v3/binary/latest";
pub const SETTINGS_FILE: &str = "launcher_settings.json";
const LAUNCHER_HOME_DIR: &str = ".blocklaunch";
const GAME_DIR: &str = ".minecraft";
const DEFAULT_JAVA_MAJOR: u32 = 21;
const DEFAULT_TARGET_FPS: u32 = 60;

/// Optional overrides persisted as `launcher_settings.json` in the launcher home.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    pub game_dir: Option<PathBuf>,
    pub required_java_major: Option<u32>,
    pub manifest_url: Option<String>,
    pub runtime_download_base: Option<String>,
    pub target_fps: Option<u32>,
    pub allow_insecure_fallback: Option<bool>,
}

impl LauncherSettings {
    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> LauncherResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(LauncherError::io(path, e)),
        }
    }

    pub fn save(&self, path: &Path) -> LauncherResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| LauncherError::io(path, e))
    }
}

/// Everything the core needs to know about the host and its directories.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Root game directory (`.minecraft` equivalent).
    pub game_dir: PathBuf,
    /// Launcher-private directory holding settings and provisioned runtimes.
    pub launcher_home: PathBuf,
    pub os: HostOs,
    pub required_java_major: u32,
    pub manifest_url: String,
    pub runtime_download_base: String,
    pub target_fps: u32,
    /// Retry once without certificate validation when a verified fetch fails.
    pub allow_insecure_fallback: bool,
}

impl LauncherConfig {
    /// Defaults rooted at the given directories, for the current host.
    pub fn new(game_dir: PathBuf, launcher_home: PathBuf) -> LauncherResult<Self> {
        Ok(Self {
            game_dir,
            launcher_home,
            os: HostOs::current()?,
            required_java_major: DEFAULT_JAVA_MAJOR,
            manifest_url: VERSION_MANIFEST_URL.to_string(),
            runtime_download_base: RUNTIME_DOWNLOAD_BASE.to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            allow_insecure_fallback: true,
        })
    }

    /// Defaults under the user's home directory, overridden by the settings
    /// file if one exists.
    pub fn discover() -> LauncherResult<Self> {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::under_home(&home)
    }

    /// Layout rooted at `home`, with `settings_path()` applied on top.
    pub fn under_home(home: &Path) -> LauncherResult<Self> {
        let defaults = Self::new(home.join(GAME_DIR), home.join(LAUNCHER_HOME_DIR))?;
        let settings_path = defaults.settings_path();

        let settings = LauncherSettings::load(&settings_path).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings {:?}: {}", settings_path, e);
            LauncherSettings::default()
        });

        let config = defaults.with_settings(settings);
        debug!("Launcher config: {:?}", config);
        Ok(config)
    }

    pub fn with_settings(mut self, settings: LauncherSettings) -> Self {
        if let Some(dir) = settings.game_dir {
            self.game_dir = dir;
        }
        if let Some(major) = settings.required_java_major {
            self.required_java_major = major;
        }
        if let Some(url) = settings.manifest_url {
            self.manifest_url = url;
        }
        if let Some(base) = settings.runtime_download_base {
            self.runtime_download_base = base;
        }
        if let Some(fps) = settings.target_fps {
            self.target_fps = fps;
        }
        if let Some(allow) = settings.allow_insecure_fallback {
            self.allow_insecure_fallback = allow;
        }
        self
    }

    pub fn with_os(mut self, os: HostOs) -> Self {
        self.os = os;
        self
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.game_dir.join("versions")
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.game_dir.join("libraries")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.game_dir.join("assets")
    }

    pub fn options_path(&self) -> PathBuf {
        self.game_dir.join("options.txt")
    }

    pub fn version_dir(&self, version_id: &str) -> PathBuf {
        self.versions_dir().join(version_id)
    }

    /// `versions/<id>/<id>.json`
    pub fn descriptor_path(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id).join(format!("{version_id}.json"))
    }

    /// `versions/<id>/<id>.jar`
    pub fn client_jar_path(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id).join(format!("{version_id}.jar"))
    }

    pub fn natives_dir(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id).join("natives")
    }

    /// Where provisioned Java runtimes are unpacked.
    pub fn runtime_dir(&self) -> PathBuf {
        self.launcher_home.join("java")
    }

    /// `launcher_settings.json` in the launcher home.
    pub fn settings_path(&self) -> PathBuf {
        self.launcher_home.join(SETTINGS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_follows_version_directory_contract() {
        let config = LauncherConfig::new("/games/mc".into(), "/home/u/.blocklaunch".into())
            .unwrap()
            .with_os(HostOs::Linux);

        assert_eq!(
            config.descriptor_path("1.20.4"),
            PathBuf::from("/games/mc/versions/1.20.4/1.20.4.json")
        );
        assert_eq!(
            config.client_jar_path("1.20.4"),
            PathBuf::from("/games/mc/versions/1.20.4/1.20.4.jar")
        );
        assert_eq!(
            config.natives_dir("1.20.4"),
            PathBuf::from("/games/mc/versions/1.20.4/natives")
        );
        assert_eq!(config.libraries_dir(), PathBuf::from("/games/mc/libraries"));
        assert_eq!(
            config.runtime_dir(),
            PathBuf::from("/home/u/.blocklaunch/java")
        );
    }

    #[test]
    fn settings_override_only_the_fields_they_set() {
        let settings: LauncherSettings =
            serde_json::from_str(r#"{ "target_fps": 144, "allow_insecure_fallback": false }"#)
                .unwrap();
        let config = LauncherConfig::new("/g".into(), "/h".into())
            .unwrap()
            .with_settings(settings);

        assert_eq!(config.target_fps, 144);
        assert!(!config.allow_insecure_fallback);
        assert_eq!(config.required_java_major, 21);
        assert_eq!(config.manifest_url, VERSION_MANIFEST_URL);
    }

    #[test]
    fn missing_settings_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LauncherSettings::load(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert!(settings.game_dir.is_none());
        assert!(settings.target_fps.is_none());
    }

    #[test]
    fn settings_survive_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = LauncherSettings {
            required_java_major: Some(17),
            ..LauncherSettings::default()
        };
        settings.save(&path).unwrap();

        let loaded = LauncherSettings::load(&path).unwrap();
        assert_eq!(loaded.required_java_major, Some(17));
    }

    #[test]
    fn settings_file_in_launcher_home_is_applied() {
        let home = tempfile::tempdir().unwrap();
        let defaults = LauncherConfig::under_home(home.path()).unwrap();
        assert_eq!(
            defaults.settings_path(),
            home.path().join(".blocklaunch").join(SETTINGS_FILE)
        );
        assert_eq!(defaults.game_dir, home.path().join(".minecraft"));
        assert_eq!(defaults.target_fps, 60);

        let settings = LauncherSettings {
            target_fps: Some(144),
            ..LauncherSettings::default()
        };
        settings.save(&defaults.settings_path()).unwrap();

        let config = LauncherConfig::under_home(home.path()).unwrap();
        assert_eq!(config.target_fps, 144);
        assert_eq!(config.launcher_home, home.path().join(".blocklaunch"));
    }

    #[test]
    fn unreadable_settings_fall_back_to_defaults() {
        let home = tempfile::tempdir().unwrap();
        let path = home.path().join(".blocklaunch").join(SETTINGS_FILE);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let config = LauncherConfig::under_home(home.path()).unwrap();
        assert_eq!(config.target_fps, 60);
        assert!(config.allow_insecure_fallback);
    }
}
