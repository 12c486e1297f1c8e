pub mod commands;
pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::commands::Launcher;
pub use crate::core::config::LauncherConfig;
pub use crate::core::error::{LauncherError, LauncherResult};

/// Install the global log subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,blocklaunch=debug")),
        )
        .init();
}
