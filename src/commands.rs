use std::process::Child;

use tracing::{info, warn};

use crate::core::config::LauncherConfig;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::java;
use crate::core::launch::{self, LaunchSession, LaunchSpec};
use crate::core::options;
use crate::core::resolver::{self, ResolvedArtifactSet};
use crate::core::version::{VersionCatalog, VersionDescriptor, VersionManifest};

/// Entry point for front ends: owns the configuration, the HTTP stack and
/// the per-session manifest cache.
pub struct Launcher {
    config: LauncherConfig,
    downloader: Downloader,
    manifest: Option<VersionManifest>,
}

impl Launcher {
    pub fn new(config: LauncherConfig) -> LauncherResult<Self> {
        let downloader = Downloader::new(config.allow_insecure_fallback)?;
        Ok(Self::with_downloader(config, downloader))
    }

    pub fn with_downloader(config: LauncherConfig, downloader: Downloader) -> Self {
        Self {
            config,
            downloader,
            manifest: None,
        }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Version manifest, fetched on first use and cached for the session.
    pub async fn load_manifest(&mut self) -> LauncherResult<&VersionManifest> {
        if self.manifest.is_none() {
            return self.refresh_manifest().await;
        }
        self.manifest
            .as_ref()
            .ok_or_else(|| LauncherError::Other("manifest cache empty".into()))
    }

    /// Drop the cached manifest and fetch it again.
    pub async fn refresh_manifest(&mut self) -> LauncherResult<&VersionManifest> {
        let manifest = VersionManifest::load(&self.downloader, &self.config.manifest_url).await?;
        info!("Manifest lists {} versions", manifest.versions.len());
        Ok(self.manifest.insert(manifest))
    }

    pub async fn catalog(&mut self) -> LauncherResult<VersionCatalog> {
        Ok(self.load_manifest().await?.classify())
    }

    pub async fn ensure_runtime(&self, required_major: u32) -> bool {
        java::ensure_runtime(&self.config, &self.downloader, required_major).await
    }

    /// Fetch the descriptor of `version_id`, store it and download everything
    /// it needs on this host.
    pub async fn resolve_and_fetch(
        &mut self,
        version_id: &str,
    ) -> LauncherResult<ResolvedArtifactSet> {
        let url = self
            .load_manifest()
            .await?
            .find_version(version_id)
            .map(|entry| entry.url.clone())
            .ok_or_else(|| LauncherError::VersionNotFound(version_id.to_string()))?;

        let (descriptor, raw) = VersionDescriptor::fetch(&self.downloader, &url).await?;
        VersionDescriptor::save_raw(&raw, &self.config.descriptor_path(version_id)).await?;

        let set = resolver::resolve(&descriptor, &self.config)?;
        let report = resolver::install(&set, &self.downloader).await?;
        if !report.failed.is_empty() {
            warn!(
                "{} optional artifacts missing for {}: {:?}",
                report.failed.len(),
                version_id,
                report.failed
            );
        }
        Ok(set)
    }

    /// Build the launch command for an installed version.
    pub async fn build_launch_command(
        &self,
        version_id: &str,
        username: &str,
        ram_gib: u32,
    ) -> LauncherResult<LaunchSpec> {
        let descriptor =
            VersionDescriptor::load_from(&self.config.descriptor_path(version_id)).await?;
        let set = resolver::resolve(&descriptor, &self.config)?;

        let required_major = descriptor
            .required_java_major()
            .unwrap_or(self.config.required_java_major);
        let executable = java::select_java_executable(&self.config, required_major).await;

        let session = LaunchSession {
            username: username.to_string(),
            ram_gib,
        };
        Ok(launch::build_launch_spec(
            &descriptor,
            &set,
            &session,
            &self.config,
            executable,
        ))
    }

    pub fn launch(&self, spec: &LaunchSpec) -> LauncherResult<Child> {
        launch::launch(spec)
    }

    /// Runtime check, options rewrite, install, build and spawn in one go.
    pub async fn prepare_and_launch(
        &mut self,
        version_id: &str,
        username: &str,
        ram_gib: u32,
    ) -> LauncherResult<Child> {
        if !self.ensure_runtime(self.config.required_java_major).await {
            warn!(
                "Java {} not available; launching with the best runtime found",
                self.config.required_java_major
            );
        }

        if let Err(e) =
            options::apply_launch_overrides(&self.config.options_path(), self.config.target_fps)
                .await
        {
            warn!("Could not update game options: {}", e);
        }

        self.resolve_and_fetch(version_id).await?;
        let spec = self.build_launch_command(version_id, username, ram_gib).await?;
        let child = self.launch(&spec)?;
        info!("Started {} (pid {})", version_id, child.id());
        Ok(child)
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Mock, Server, ServerGuard};
    use reqwest::Client;

    use super::*;
    use crate::core::downloader::integrity::sha1_hex;
    use crate::core::platform::HostOs;

    /// Manifest, descriptor and client jar for 1.12.2. The manifest mock
    /// comes first and expects exactly one hit.
    async fn serve_version(server: &mut ServerGuard) -> Vec<Mock> {
        let base = server.url();
        let manifest = server
            .mock("GET", "/manifest.json")
            .with_body(
                serde_json::json!({
                    "latest": { "release": "1.12.2", "snapshot": "1.12.2" },
                    "versions": [
                        { "id": "1.12.2", "type": "release", "url": format!("{base}/1.12.2.json") }
                    ]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let descriptor = server
            .mock("GET", "/1.12.2.json")
            .with_body(
                serde_json::json!({
                    "id": "1.12.2",
                    "type": "release",
                    "mainClass": "net.minecraft.client.main.Main",
                    "assetIndex": { "id": "1.12", "url": format!("{base}/1.12.json") },
                    "downloads": {
                        "client": {
                            "sha1": sha1_hex(b"client"),
                            "size": 6,
                            "url": format!("{base}/client.jar")
                        }
                    },
                    "libraries": [],
                    "minecraftArguments": "--username ${auth_player_name} --assetIndex ${assets_index_name}"
                })
                .to_string(),
            )
            .create_async()
            .await;
        let client = server
            .mock("GET", "/client.jar")
            .with_body("client")
            .create_async()
            .await;
        vec![manifest, descriptor, client]
    }

    fn launcher(server: &ServerGuard, root: &std::path::Path) -> Launcher {
        let mut config = LauncherConfig::new(root.join("game"), root.join("home"))
            .unwrap()
            .with_os(HostOs::Linux);
        config.manifest_url = format!("{}/manifest.json", server.url());
        Launcher::with_downloader(config, Downloader::with_clients(Client::new(), None))
    }

    #[tokio::test]
    async fn install_then_build_command() {
        let mut server = Server::new_async().await;
        let _mocks = serve_version(&mut server).await;
        let dir = tempfile::tempdir().unwrap();
        let mut launcher = launcher(&server, dir.path());

        let set = launcher.resolve_and_fetch("1.12.2").await.unwrap();
        assert!(set.client_jar.path.is_file());
        assert!(launcher.config().descriptor_path("1.12.2").is_file());

        let spec = launcher
            .build_launch_command("1.12.2", "Alex", 2)
            .await
            .unwrap();
        assert_eq!(spec.jvm_args[0], "-Xmx2G");
        assert_eq!(spec.game_args, vec!["--username", "Alex", "--assetIndex", "1.12"]);
        assert_eq!(spec.classpath, vec![set.client_jar.path.clone()]);
        assert_eq!(spec.working_dir, dir.path().join("game"));
        assert!(spec.executable.ends_with("java"));
    }

    #[tokio::test]
    async fn manifest_is_fetched_once_per_session() {
        let mut server = Server::new_async().await;
        let mocks = serve_version(&mut server).await;
        let dir = tempfile::tempdir().unwrap();
        let mut launcher = launcher(&server, dir.path());

        let catalog = launcher.catalog().await.unwrap();
        assert_eq!(catalog.latest_release, vec!["1.12.2".to_string()]);
        launcher.load_manifest().await.unwrap();

        let err = launcher.resolve_and_fetch("9.9.9").await.unwrap_err();
        assert!(matches!(err, LauncherError::VersionNotFound(id) if id == "9.9.9"));
        mocks[0].assert_async().await;
    }

    #[tokio::test]
    async fn build_without_install_reports_missing_descriptor() {
        let server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let launcher = launcher(&server, dir.path());

        let err = launcher
            .build_launch_command("1.12.2", "Steve", 2)
            .await
            .unwrap_err();
        let expected = dir.path().join("game/versions/1.12.2/1.12.2.json");
        assert!(matches!(err, LauncherError::Io { path, .. } if path == expected));
    }
}
