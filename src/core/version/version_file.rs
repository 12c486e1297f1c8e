// ─── Version File ───
// Parses a per-version descriptor JSON and expands its conditional arguments.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::{self, HostOs};

use super::rules::{evaluate, Rule, RuleContext};

pub const DEFAULT_MAIN_CLASS: &str = "net.minecraft.client.main.Main";

/// A fully parsed version descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    pub id: String,
    #[serde(default)]
    pub main_class: Option<String>,
    #[serde(default, rename = "type")]
    pub version_type: Option<String>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
    #[serde(default)]
    pub libraries: Vec<Library>,
    #[serde(default)]
    pub arguments: Option<Arguments>,
    /// Legacy flat argument string of descriptors that predate `arguments`.
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
    #[serde(default)]
    pub java_version: Option<JavaVersionInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersionInfo {
    pub major_version: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionDownloads {
    #[serde(default)]
    pub client: Option<DownloadArtifact>,
    #[serde(default)]
    pub server: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub sha1: String,
    #[serde(default)]
    pub size: Option<u64>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Option<Vec<Argument>>,
    #[serde(default)]
    pub jvm: Option<Vec<Argument>>,
}

/// One entry of `arguments.jvm` / `arguments.game`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    Plain(String),
    Conditional {
        #[serde(default)]
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    Many(Vec<String>),
}

// ─── Library Entry ───

#[derive(Debug, Clone, Deserialize)]
pub struct Library {
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// OS name → classifier (may contain `${arch}`).
    #[serde(default)]
    pub natives: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibraryFile>,
    #[serde(default)]
    pub classifiers: HashMap<String, LibraryFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryFile {
    /// Maven-style relative path under `libraries/`.
    #[serde(default)]
    pub path: Option<String>,
    pub sha1: String,
    #[serde(default)]
    pub size: Option<u64>,
    pub url: String,
}

impl Library {
    /// Whether this library belongs on the classpath for `os`.
    pub fn is_allowed_for(&self, os: HostOs) -> bool {
        evaluate(&self.rules, os, RuleContext::Library)
    }

    /// Native classifier declared for `os`, with `${arch}` substituted.
    pub fn native_classifier_for(&self, os: HostOs) -> Option<String> {
        self.natives
            .get(os.manifest_name())
            .map(|classifier| classifier.replace("${arch}", platform::arch_bits()))
    }

    /// Download entry for the native bundle of `os`, if both the classifier
    /// and its download exist.
    pub fn native_download_for(&self, os: HostOs) -> Option<(String, &LibraryFile)> {
        let classifier = self.native_classifier_for(os)?;
        let file = self.downloads.as_ref()?.classifiers.get(&classifier)?;
        Some((classifier, file))
    }
}

impl Argument {
    /// Tokens this argument contributes on `os`.
    pub fn expand(&self, os: HostOs) -> Vec<String> {
        match self {
            Argument::Plain(token) => vec![token.clone()],
            Argument::Conditional { rules, value } => {
                if !evaluate(rules, os, RuleContext::Argument) {
                    return vec![];
                }
                match value {
                    ArgumentValue::Single(token) => vec![token.clone()],
                    ArgumentValue::Many(tokens) => tokens.clone(),
                }
            }
        }
    }
}

/// Flatten an argument list for `os`.
pub fn expand_arguments(args: &[Argument], os: HostOs) -> Vec<String> {
    args.iter().flat_map(|arg| arg.expand(os)).collect()
}

impl VersionDescriptor {
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        serde_json::from_str(raw).map_err(|e| LauncherError::MalformedDescriptor(e.to_string()))
    }

    /// Fetch and parse a descriptor, returning the raw JSON alongside it.
    pub async fn fetch(downloader: &Downloader, url: &str) -> LauncherResult<(Self, String)> {
        let raw = downloader.fetch_text(url).await?;
        let descriptor = Self::parse(&raw)?;
        Ok((descriptor, raw))
    }

    /// Read a previously saved descriptor.
    pub async fn load_from(path: &Path) -> LauncherResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        Self::parse(&raw)
    }

    /// Save the raw descriptor JSON to `path`.
    pub async fn save_raw(raw_json: &str, path: &Path) -> LauncherResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }
        tokio::fs::write(path, raw_json)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        debug!("Saved descriptor to {:?}", path);
        Ok(())
    }

    /// The client jar download, which every launchable descriptor must carry.
    pub fn client_download(&self) -> LauncherResult<&DownloadArtifact> {
        self.downloads
            .as_ref()
            .and_then(|d| d.client.as_ref())
            .ok_or_else(|| {
                LauncherError::MalformedDescriptor(format!(
                    "version {} has no client download",
                    self.id
                ))
            })
    }

    pub fn main_class(&self) -> &str {
        self.main_class.as_deref().unwrap_or(DEFAULT_MAIN_CLASS)
    }

    pub fn asset_index_id(&self) -> &str {
        self.asset_index
            .as_ref()
            .map(|ai| ai.id.as_str())
            .unwrap_or("legacy")
    }

    pub fn version_type(&self) -> &str {
        self.version_type.as_deref().unwrap_or("release")
    }

    pub fn required_java_major(&self) -> Option<u32> {
        self.java_version.as_ref().map(|j| j.major_version)
    }

    /// JVM tokens for `os`, before placeholder substitution.
    pub fn jvm_args(&self, os: HostOs) -> Vec<String> {
        self.arguments
            .as_ref()
            .and_then(|a| a.jvm.as_deref())
            .map(|args| expand_arguments(args, os))
            .unwrap_or_default()
    }

    /// Game tokens for `os`, before placeholder substitution.
    ///
    /// Falls back to splitting the legacy `minecraftArguments` string when the
    /// descriptor has no structured game arguments.
    pub fn game_args(&self, os: HostOs) -> Vec<String> {
        if let Some(args) = self.arguments.as_ref().and_then(|a| a.game.as_deref()) {
            return expand_arguments(args, os);
        }

        match &self.minecraft_arguments {
            Some(s) => s.split_whitespace().map(ToString::to_string).collect(),
            None => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(value: serde_json::Value) -> VersionDescriptor {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn argument_object_rules_apply_to_given_os() {
        let parsed = descriptor(serde_json::json!({
            "id": "test",
            "mainClass": "net.minecraft.client.main.Main",
            "arguments": {
                "game": [
                    "--username",
                    "${auth_player_name}",
                    {
                        "rules": [{"action": "allow", "os": {"name": "linux"}}],
                        "value": ["--demo", "--extra"]
                    },
                    {
                        "rules": [{"action": "allow", "os": {"name": "windows"}}],
                        "value": "--should-not-appear"
                    }
                ]
            }
        }));

        assert_eq!(
            parsed.game_args(HostOs::Linux),
            vec!["--username", "${auth_player_name}", "--demo", "--extra"]
        );
        assert_eq!(
            parsed.game_args(HostOs::Windows),
            vec!["--username", "${auth_player_name}", "--should-not-appear"]
        );
    }

    #[test]
    fn feature_gated_arguments_are_dropped() {
        let parsed = descriptor(serde_json::json!({
            "id": "test",
            "arguments": {
                "game": [
                    {
                        "rules": [{"action": "allow", "features": {"has_custom_resolution": true}}],
                        "value": ["--width", "${resolution_width}"]
                    }
                ],
                "jvm": ["-Xss1M"]
            }
        }));

        assert!(parsed.game_args(HostOs::Linux).is_empty());
        assert_eq!(parsed.jvm_args(HostOs::Linux), vec!["-Xss1M"]);
    }

    #[test]
    fn legacy_argument_string_is_split_on_whitespace() {
        let parsed = descriptor(serde_json::json!({
            "id": "1.7.10",
            "minecraftArguments": "--username ${auth_player_name}  --version ${version_name}"
        }));

        assert_eq!(
            parsed.game_args(HostOs::Osx),
            vec!["--username", "${auth_player_name}", "--version", "${version_name}"]
        );
        assert!(parsed.jvm_args(HostOs::Osx).is_empty());
    }

    #[test]
    fn defaults_cover_missing_optional_fields() {
        let parsed = descriptor(serde_json::json!({ "id": "a1.0.4" }));
        assert_eq!(parsed.main_class(), DEFAULT_MAIN_CLASS);
        assert_eq!(parsed.asset_index_id(), "legacy");
        assert_eq!(parsed.version_type(), "release");
        assert!(parsed.required_java_major().is_none());
    }

    #[test]
    fn missing_client_download_is_malformed() {
        let parsed = descriptor(serde_json::json!({ "id": "broken", "downloads": {} }));
        assert!(matches!(
            parsed.client_download(),
            Err(LauncherError::MalformedDescriptor(_))
        ));
    }

    #[test]
    fn unparsable_descriptor_is_malformed() {
        assert!(matches!(
            VersionDescriptor::parse("{ not json"),
            Err(LauncherError::MalformedDescriptor(_))
        ));
    }

    #[test]
    fn native_classifier_substitutes_arch() {
        let lib: Library = serde_json::from_value(serde_json::json!({
            "name": "tv.twitch:twitch-platform:5.16",
            "natives": { "windows": "natives-windows-${arch}" },
            "downloads": {
                "classifiers": {
                    "natives-windows-64": {
                        "path": "tv/twitch/natives-windows-64.jar",
                        "sha1": "abc",
                        "url": "https://example.com/w64.jar"
                    },
                    "natives-windows-32": {
                        "path": "tv/twitch/natives-windows-32.jar",
                        "sha1": "def",
                        "url": "https://example.com/w32.jar"
                    }
                }
            }
        }))
        .unwrap();

        let expected = format!("natives-windows-{}", platform::arch_bits());
        assert_eq!(lib.native_classifier_for(HostOs::Windows), Some(expected.clone()));
        let (classifier, _) = lib.native_download_for(HostOs::Windows).unwrap();
        assert_eq!(classifier, expected);
        assert!(lib.native_download_for(HostOs::Linux).is_none());
    }
}
