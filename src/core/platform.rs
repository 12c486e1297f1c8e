// ─── Platform ───
// Host OS identification in the vocabulary used by version descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{LauncherError, LauncherResult};

/// Operating systems as named by the manifest (`os.name` in rules,
/// keys of a library's `natives` map).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Windows,
    Linux,
    Osx,
}

impl HostOs {
    /// Detect the OS this binary was built for.
    pub fn current() -> LauncherResult<Self> {
        Self::from_platform_name(std::env::consts::OS)
    }

    /// Normalize a platform-reported OS name to the manifest vocabulary.
    ///
    /// The platform calls macOS `darwin` or `macos`; descriptors call it `osx`.
    pub fn from_platform_name(name: &str) -> LauncherResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "windows" => Ok(HostOs::Windows),
            "linux" => Ok(HostOs::Linux),
            "darwin" | "macos" | "osx" => Ok(HostOs::Osx),
            other => Err(LauncherError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Name used by `os.name` rules and `natives` keys.
    pub fn manifest_name(self) -> &'static str {
        match self {
            HostOs::Windows => "windows",
            HostOs::Linux => "linux",
            HostOs::Osx => "osx",
        }
    }

    /// Java classpath list separator.
    pub fn classpath_separator(self) -> &'static str {
        match self {
            HostOs::Windows => ";",
            HostOs::Linux | HostOs::Osx => ":",
        }
    }

    /// macOS needs the windowing thread to be the process's first thread.
    pub fn requires_first_thread(self) -> bool {
        self == HostOs::Osx
    }

    pub fn java_exe(self) -> &'static str {
        match self {
            HostOs::Windows => "java.exe",
            HostOs::Linux | HostOs::Osx => "java",
        }
    }

    /// Environment variable the dynamic linker searches for native libraries.
    pub fn library_path_var(self) -> &'static str {
        match self {
            HostOs::Windows => "PATH",
            HostOs::Linux => "LD_LIBRARY_PATH",
            HostOs::Osx => "DYLD_LIBRARY_PATH",
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.manifest_name())
    }
}

/// Value substituted for `${arch}` in native classifier templates.
pub fn arch_bits() -> &'static str {
    if cfg!(target_pointer_width = "64") {
        "64"
    } else {
        "32"
    }
}

/// Architecture label used by runtime download endpoints.
pub fn runtime_arch() -> LauncherResult<&'static str> {
    match std::env::consts::ARCH {
        "x86_64" => Ok("x64"),
        "aarch64" => Ok("aarch64"),
        "x86" => Ok("x32"),
        other => Err(LauncherError::UnsupportedPlatform(format!(
            "no Java runtime build for architecture {other}"
        ))),
    }
}
