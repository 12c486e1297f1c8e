use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;

use blocklaunch::core::version::VersionCategory;
use blocklaunch::{Launcher, LauncherConfig, LauncherResult};

#[derive(Debug, Parser)]
#[command(name = "blocklaunch", version, about = "Minimal offline Minecraft launcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List versions from the manifest, grouped by category.
    Versions {
        /// Only show one category.
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },
    /// Download a version and everything it needs on this machine.
    Install {
        #[arg(value_name = "VERSION")]
        version_id: String,
    },
    /// Print the launch command line for an installed version.
    Command {
        #[arg(value_name = "VERSION")]
        version_id: String,
        #[arg(long, default_value = "Steve")]
        username: String,
        /// Maximum heap in GiB.
        #[arg(long, default_value_t = 2)]
        ram: u32,
    },
    /// Install if needed and start the game.
    Play {
        #[arg(value_name = "VERSION")]
        version_id: String,
        #[arg(long, default_value = "Steve")]
        username: String,
        /// Maximum heap in GiB.
        #[arg(long, default_value_t = 2)]
        ram: u32,
    },
    /// Make sure a suitable Java runtime is available.
    Runtime {
        /// Required Java major version; defaults to the configured one.
        #[arg(long)]
        major: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    LatestRelease,
    LatestSnapshot,
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
}

impl From<CategoryArg> for VersionCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::LatestRelease => VersionCategory::LatestRelease,
            CategoryArg::LatestSnapshot => VersionCategory::LatestSnapshot,
            CategoryArg::Release => VersionCategory::Release,
            CategoryArg::Snapshot => VersionCategory::Snapshot,
            CategoryArg::OldBeta => VersionCategory::OldBeta,
            CategoryArg::OldAlpha => VersionCategory::OldAlpha,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    blocklaunch::init_tracing();
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> LauncherResult<ExitCode> {
    let mut launcher = Launcher::new(LauncherConfig::discover()?)?;

    match command {
        Commands::Versions { category } => {
            let catalog = launcher.catalog().await?;
            let categories = match category {
                Some(c) => vec![VersionCategory::from(c)],
                None => VersionCategory::ALL.to_vec(),
            };
            for category in categories {
                let ids = catalog.bucket(category);
                if ids.is_empty() {
                    continue;
                }
                println!("{} ({})", category, ids.len());
                for id in ids {
                    println!("  {id}");
                }
            }
        }
        Commands::Install { version_id } => {
            let set = launcher.resolve_and_fetch(&version_id).await?;
            println!(
                "Installed {} ({} libraries, {} natives)",
                set.version_id,
                set.existing_library_paths().len(),
                set.natives.len()
            );
        }
        Commands::Command {
            version_id,
            username,
            ram,
        } => {
            let spec = launcher
                .build_launch_command(&version_id, &username, ram)
                .await?;
            println!("{}", spec.command_line().join(" "));
        }
        Commands::Play {
            version_id,
            username,
            ram,
        } => {
            let child = launcher
                .prepare_and_launch(&version_id, &username, ram)
                .await?;
            println!("Started {} (pid {})", version_id, child.id());
        }
        Commands::Runtime { major } => {
            let major = major.unwrap_or(launcher.config().required_java_major);
            if !launcher.ensure_runtime(major).await {
                println!("Java {major} is not available");
                return Ok(ExitCode::FAILURE);
            }
            println!("Java {major} is available");
        }
    }

    Ok(ExitCode::SUCCESS)
}
