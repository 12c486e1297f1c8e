// ─── Game Options ───
// Rewrites the game's `options.txt` (`key:value` per line) before launch.

use std::path::Path;

use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};

/// Parsed `options.txt`, keeping entry order and unknown keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameOptions {
    entries: Vec<(String, String)>,
}

impl GameOptions {
    /// Lines without a `:` are dropped; the value is everything after the first `:`.
    pub fn parse(raw: &str) -> Self {
        let mut options = Self::default();
        for line in raw.lines() {
            if let Some((key, value)) = line.trim().split_once(':') {
                options.set(key, value);
            }
        }
        options
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value of `key` in place, or append it.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}:{v}\n"))
            .collect()
    }

    pub async fn load(path: &Path) -> LauncherResult<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => Ok(Self::parse(&raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(LauncherError::io(path, e)),
        }
    }

    pub async fn save(&self, path: &Path) -> LauncherResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }
        tokio::fs::write(path, self.render())
            .await
            .map_err(|e| LauncherError::io(path, e))
    }
}

/// Force the frame cap and disable vsync, keeping every other setting.
pub async fn apply_launch_overrides(path: &Path, target_fps: u32) -> LauncherResult<()> {
    let mut options = GameOptions::load(path).await?;
    options.set("maxFps", target_fps.to_string());
    options.set("enableVsync", "false");
    options.save(path).await?;

    info!("Applied maxFps={} enableVsync=false", target_fps);
    debug!("Options written to {:?}", path);
    Ok(())
}
