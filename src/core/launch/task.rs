// ─── Launch Task ───
// Assembles the full command line and spawns the game process.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::{debug, info};

use crate::core::auth::LaunchAccountProfile;
use crate::core::config::LauncherConfig;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::HostOs;
use crate::core::resolver::ResolvedArtifactSet;
use crate::core::version::VersionDescriptor;

use super::arguments::{
    ensure_platform_jvm_args, heap_flag, strip_classpath_args, PlaceholderContext, Placeholders,
};
use super::classpath::{build_classpath, join_classpath, safe_path_str};

/// Per-launch player choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSession {
    pub username: String,
    pub ram_gib: u32,
}

/// A fully resolved invocation. Built fresh for every launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub executable: PathBuf,
    pub jvm_args: Vec<String>,
    pub classpath: Vec<PathBuf>,
    pub os: HostOs,
    pub main_class: String,
    pub game_args: Vec<String>,
    pub working_dir: PathBuf,
    pub natives_dir: PathBuf,
}

impl LaunchSpec {
    pub fn classpath_string(&self) -> String {
        join_classpath(&self.classpath, self.os)
    }

    /// `exe jvm… -cp <classpath> main game…`
    pub fn command_line(&self) -> Vec<String> {
        let mut line = Vec::with_capacity(self.jvm_args.len() + self.game_args.len() + 4);
        line.push(safe_path_str(&self.executable));
        line.extend(self.jvm_args.iter().cloned());
        line.push("-cp".to_string());
        line.push(self.classpath_string());
        line.push(self.main_class.clone());
        line.extend(self.game_args.iter().cloned());
        line
    }

    /// Detached command: no stdio, game directory as cwd, natives on the
    /// dynamic linker search path.
    pub fn to_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.executable);
        cmd.args(&self.jvm_args)
            .arg("-cp")
            .arg(self.classpath_string())
            .arg(&self.main_class)
            .args(&self.game_args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let var = self.os.library_path_var();
        let existing = std::env::var(var).ok();
        cmd.env(
            var,
            prepend_search_path(&self.natives_dir, existing.as_deref(), self.os),
        );
        cmd
    }
}

/// Build the launch spec for an installed version.
pub fn build_launch_spec(
    descriptor: &VersionDescriptor,
    set: &ResolvedArtifactSet,
    session: &LaunchSession,
    config: &LauncherConfig,
    executable: PathBuf,
) -> LaunchSpec {
    let os = config.os;
    let account = LaunchAccountProfile::offline(&session.username);
    let assets_dir = config.assets_dir();
    let libraries_dir = config.libraries_dir();

    let placeholders = Placeholders::new(PlaceholderContext {
        account: &account,
        version_id: &descriptor.id,
        version_type: descriptor.version_type(),
        asset_index: descriptor.asset_index_id(),
        game_dir: &config.game_dir,
        assets_dir: &assets_dir,
        libraries_dir: &libraries_dir,
        natives_dir: &set.natives_dir,
        os,
    });

    let mut jvm_args = vec![heap_flag(session.ram_gib)];
    jvm_args.extend(placeholders.apply_all(&strip_classpath_args(descriptor.jvm_args(os))));
    ensure_platform_jvm_args(&mut jvm_args, os, &set.natives_dir);

    let game_args = placeholders.apply_all(&descriptor.game_args(os));

    LaunchSpec {
        executable,
        jvm_args,
        classpath: build_classpath(set),
        os,
        main_class: descriptor.main_class().to_string(),
        game_args,
        working_dir: config.game_dir.clone(),
        natives_dir: set.natives_dir.clone(),
    }
}

/// Spawn the game and return without waiting on it.
pub fn launch(spec: &LaunchSpec) -> LauncherResult<std::process::Child> {
    std::fs::create_dir_all(&spec.working_dir)
        .map_err(|e| LauncherError::io(&spec.working_dir, e))?;

    let mut cmd = spec.to_command();
    info!("Launching {} with Java: {:?}", spec.main_class, spec.executable);
    debug!("Command (copy/paste): {}", format_command_for_logs(&cmd));

    cmd.spawn().map_err(|e| LauncherError::io(&spec.executable, e))
}

/// `dir` in front of an existing search path value, if there is one.
fn prepend_search_path(dir: &Path, existing: Option<&str>, os: HostOs) -> String {
    let value = safe_path_str(dir);
    match existing {
        Some(existing) if !existing.trim().is_empty() => {
            format!("{}{}{}", value, os.classpath_separator(), existing)
        }
        _ => value,
    }
}

fn format_command_for_logs(cmd: &std::process::Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| shell_escape(&part.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::offline_uuid;
    use crate::core::resolver::{resolve, tests::sample_descriptor};

    fn config(root: &Path, os: HostOs) -> LauncherConfig {
        LauncherConfig::new(root.join("game"), root.join("home"))
            .unwrap()
            .with_os(os)
    }

    fn session(username: &str) -> LaunchSession {
        LaunchSession {
            username: username.into(),
            ram_gib: 4,
        }
    }

    #[test]
    fn legacy_descriptor_builds_full_command() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), HostOs::Linux);
        let descriptor = sample_descriptor();
        let set = resolve(&descriptor, &config).unwrap();

        let spec = build_launch_spec(
            &descriptor,
            &set,
            &session("Alex"),
            &config,
            PathBuf::from("java"),
        );

        let natives = safe_path_str(&set.natives_dir);
        assert_eq!(
            spec.jvm_args,
            vec!["-Xmx4G".to_string(), format!("-Djava.library.path={natives}")]
        );
        assert_eq!(spec.game_args, vec!["--username", "Alex", "--version", "1.12.2"]);
        assert_eq!(spec.main_class, "net.minecraft.client.main.Main");

        // No library is on disk yet, so only the client jar is listed.
        let line = spec.command_line();
        assert_eq!(line[0], "java");
        assert_eq!(line[1], "-Xmx4G");
        assert_eq!(line[3], "-cp");
        assert_eq!(line[4], safe_path_str(&set.client_jar.path));
        assert_eq!(line[5], "net.minecraft.client.main.Main");
    }

    #[test]
    fn modern_descriptor_substitutes_identity_and_strips_classpath() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), HostOs::Osx);
        let descriptor: VersionDescriptor = serde_json::from_value(serde_json::json!({
            "id": "1.20.4",
            "type": "snapshot",
            "mainClass": "net.minecraft.client.main.Main",
            "assetIndex": { "id": "12", "url": "https://example.com/12.json" },
            "downloads": {
                "client": { "sha1": "aa", "size": 1, "url": "https://example.com/client.jar" }
            },
            "libraries": [],
            "arguments": {
                "game": [
                    "--username", "${auth_player_name}",
                    "--uuid", "${auth_uuid}",
                    "--versionType", "${version_type}",
                    { "rules": [{ "action": "allow", "features": { "is_demo_user": true } }],
                      "value": "--demo" }
                ],
                "jvm": [
                    { "rules": [{ "action": "allow", "os": { "name": "osx" } }],
                      "value": ["-XstartOnFirstThread"] },
                    "-Djava.library.path=${natives_directory}",
                    "-cp", "${classpath}"
                ]
            }
        }))
        .unwrap();
        let set = resolve(&descriptor, &config).unwrap();

        let spec = build_launch_spec(
            &descriptor,
            &set,
            &session("Alex"),
            &config,
            PathBuf::from("java"),
        );

        assert_eq!(
            spec.jvm_args,
            vec![
                "-Xmx4G".to_string(),
                "-XstartOnFirstThread".to_string(),
                format!("-Djava.library.path={}", safe_path_str(&set.natives_dir)),
            ]
        );
        assert_eq!(
            spec.game_args,
            vec![
                "--username".to_string(),
                "Alex".to_string(),
                "--uuid".to_string(),
                offline_uuid("Alex"),
                "--versionType".to_string(),
                "snapshot".to_string(),
            ]
        );
    }

    #[test]
    fn classpath_string_uses_os_separator() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), HostOs::Windows);
        let descriptor = sample_descriptor();
        let mut set = resolve(&descriptor, &config).unwrap();
        set.libraries.clear();

        let mut spec = build_launch_spec(
            &descriptor,
            &set,
            &session("Steve"),
            &config,
            PathBuf::from("java.exe"),
        );
        spec.classpath = vec![PathBuf::from("a.jar"), PathBuf::from("b.jar")];
        assert_eq!(spec.classpath_string(), "a.jar;b.jar");

        spec.os = HostOs::Linux;
        assert_eq!(spec.classpath_string(), "a.jar:b.jar");
    }

    #[test]
    fn library_path_prepends_to_existing_value() {
        let natives = Path::new("/n");
        assert_eq!(prepend_search_path(natives, None, HostOs::Linux), "/n");
        assert_eq!(prepend_search_path(natives, Some(" "), HostOs::Linux), "/n");
        assert_eq!(
            prepend_search_path(natives, Some("/usr/lib"), HostOs::Linux),
            "/n:/usr/lib"
        );
        assert_eq!(
            prepend_search_path(Path::new("C:/n"), Some("C:/Windows"), HostOs::Windows),
            "C:/n;C:/Windows"
        );
    }

    #[test]
    fn command_is_rendered_for_logs() {
        let mut cmd = std::process::Command::new("java");
        cmd.args(["-Xmx2G", "--username", "Some Name", ""]);
        assert_eq!(
            format_command_for_logs(&cmd),
            "java -Xmx2G --username \"Some Name\" \"\""
        );
    }

    #[test]
    fn missing_executable_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), HostOs::Linux);
        let descriptor = sample_descriptor();
        let set = resolve(&descriptor, &config).unwrap();
        let spec = build_launch_spec(
            &descriptor,
            &set,
            &session("Steve"),
            &config,
            dir.path().join("no-such-java"),
        );

        assert!(matches!(launch(&spec), Err(LauncherError::Io { .. })));
    }
}
