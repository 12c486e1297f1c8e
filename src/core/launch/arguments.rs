// ─── Launch Arguments ───
// Placeholder substitution and platform-specific JVM flags.

use std::path::Path;

use crate::core::auth::LaunchAccountProfile;
use crate::core::platform::HostOs;

use super::classpath::safe_path_str;

pub const LAUNCHER_NAME: &str = "blocklaunch";
pub const LAUNCHER_VERSION: &str = env!("CARGO_PKG_VERSION");
const START_ON_FIRST_THREAD: &str = "-XstartOnFirstThread";
const LIBRARY_PATH_FLAG: &str = "-Djava.library.path";

/// Session values for every `${name}` placeholder the launcher understands.
#[derive(Debug, Clone)]
pub struct Placeholders {
    pairs: Vec<(&'static str, String)>,
}

/// Inputs for `Placeholders::new`.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderContext<'a> {
    pub account: &'a LaunchAccountProfile,
    pub version_id: &'a str,
    pub version_type: &'a str,
    pub asset_index: &'a str,
    pub game_dir: &'a Path,
    pub assets_dir: &'a Path,
    pub libraries_dir: &'a Path,
    pub natives_dir: &'a Path,
    pub os: HostOs,
}

impl Placeholders {
    pub fn new(ctx: PlaceholderContext<'_>) -> Self {
        let pairs = vec![
            ("${auth_player_name}", ctx.account.username.clone()),
            ("${version_name}", ctx.version_id.to_string()),
            ("${game_directory}", safe_path_str(ctx.game_dir)),
            ("${assets_root}", safe_path_str(ctx.assets_dir)),
            ("${assets_index_name}", ctx.asset_index.to_string()),
            ("${auth_uuid}", ctx.account.uuid.clone()),
            ("${auth_access_token}", ctx.account.access_token.clone()),
            ("${user_type}", ctx.account.user_type.clone()),
            ("${version_type}", ctx.version_type.to_string()),
            ("${user_properties}", "{}".to_string()),
            ("${quickPlayRealms}", String::new()),
            ("${auth_xuid}", ctx.account.xuid.clone()),
            ("${clientid}", ctx.account.client_id.clone()),
            ("${natives_directory}", safe_path_str(ctx.natives_dir)),
            ("${library_directory}", safe_path_str(ctx.libraries_dir)),
            ("${classpath_separator}", ctx.os.classpath_separator().to_string()),
            ("${launcher_name}", LAUNCHER_NAME.to_string()),
            ("${launcher_version}", LAUNCHER_VERSION.to_string()),
        ];
        Self { pairs }
    }

    /// Replace every known placeholder in `token`. Unknown ones are left as is.
    pub fn apply(&self, token: &str) -> String {
        self.pairs
            .iter()
            .fold(token.to_string(), |acc, (key, value)| acc.replace(key, value))
    }

    pub fn apply_all(&self, tokens: &[String]) -> Vec<String> {
        tokens.iter().map(|t| self.apply(t)).collect()
    }
}

/// Drop descriptor-supplied classpath switches together with their value;
/// the launcher always passes its own classpath.
pub fn strip_classpath_args(args: Vec<String>) -> Vec<String> {
    let mut kept = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "-cp" || arg == "-classpath" || arg == "--class-path" {
            let _ = iter.next();
            continue;
        }
        kept.push(arg);
    }
    kept
}

/// Append the flags the JVM needs on `os` unless the descriptor already set them.
pub fn ensure_platform_jvm_args(args: &mut Vec<String>, os: HostOs, natives_dir: &Path) {
    if os.requires_first_thread() && !args.iter().any(|a| a == START_ON_FIRST_THREAD) {
        args.push(START_ON_FIRST_THREAD.to_string());
    }

    if !args.iter().any(|a| a.contains(LIBRARY_PATH_FLAG)) {
        args.push(format!("{LIBRARY_PATH_FLAG}={}", safe_path_str(natives_dir)));
    }
}

/// Maximum-heap flag from a whole-GiB budget.
pub fn heap_flag(ram_gib: u32) -> String {
    format!("-Xmx{ram_gib}G")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::core::auth::offline_uuid;

    fn placeholders(username: &str) -> Placeholders {
        let account = LaunchAccountProfile::offline(username);
        let game_dir = PathBuf::from("/g");
        Placeholders::new(PlaceholderContext {
            account: &account,
            version_id: "1.20.4",
            version_type: "release",
            asset_index: "12",
            game_dir: &game_dir,
            assets_dir: &game_dir.join("assets"),
            libraries_dir: &game_dir.join("libraries"),
            natives_dir: &game_dir.join("versions/1.20.4/natives"),
            os: HostOs::Linux,
        })
    }

    #[test]
    fn identity_placeholders_are_substituted() {
        let tokens: Vec<String> = ["--username", "${auth_player_name}", "--uuid", "${auth_uuid}"]
            .iter()
            .map(ToString::to_string)
            .collect();

        let resolved = placeholders("Alex").apply_all(&tokens);

        assert_eq!(
            resolved,
            vec![
                "--username".to_string(),
                "Alex".to_string(),
                "--uuid".to_string(),
                offline_uuid("Alex"),
            ]
        );
    }

    #[test]
    fn session_placeholders_use_fixed_offline_values() {
        let p = placeholders("Steve");
        assert_eq!(p.apply("${auth_access_token}"), "0");
        assert_eq!(p.apply("${user_type}"), "legacy");
        assert_eq!(p.apply("${user_properties}"), "{}");
        assert_eq!(p.apply("${quickPlayRealms}"), "");
        assert_eq!(p.apply("${assets_index_name}"), "12");
        assert_eq!(p.apply("${assets_root}"), "/g/assets");
        assert_eq!(
            p.apply("-Djava.library.path=${natives_directory}"),
            "-Djava.library.path=/g/versions/1.20.4/natives"
        );
        assert_eq!(p.apply("${unknown_thing}"), "${unknown_thing}");
    }

    #[test]
    fn descriptor_classpath_switches_are_removed() {
        let args = vec![
            "-Xss1M".to_string(),
            "-cp".to_string(),
            "${classpath}".to_string(),
            "-Dfoo=bar".to_string(),
        ];
        assert_eq!(strip_classpath_args(args), vec!["-Xss1M", "-Dfoo=bar"]);
    }

    #[test]
    fn first_thread_flag_is_added_once_on_osx() {
        let natives = PathBuf::from("/n");
        let mut args = vec![START_ON_FIRST_THREAD.to_string()];
        ensure_platform_jvm_args(&mut args, HostOs::Osx, &natives);
        assert_eq!(
            args.iter().filter(|a| *a == START_ON_FIRST_THREAD).count(),
            1
        );

        let mut args = vec![];
        ensure_platform_jvm_args(&mut args, HostOs::Osx, &natives);
        assert_eq!(args, vec![START_ON_FIRST_THREAD, "-Djava.library.path=/n"]);

        let mut args = vec![];
        ensure_platform_jvm_args(&mut args, HostOs::Linux, &natives);
        assert_eq!(args, vec!["-Djava.library.path=/n"]);
    }

    #[test]
    fn existing_library_path_flag_is_kept() {
        let mut args = vec!["-Djava.library.path=/custom".to_string()];
        ensure_platform_jvm_args(&mut args, HostOs::Windows, Path::new("/n"));
        assert_eq!(args, vec!["-Djava.library.path=/custom"]);
    }

    #[test]
    fn heap_flag_uses_gib() {
        assert_eq!(heap_flag(4), "-Xmx4G");
    }
}
