pub mod manifest;
pub mod rules;
pub mod version_file;

pub use manifest::{
    LatestVersions, VersionCatalog, VersionCategory, VersionEntry, VersionManifest, VersionType,
};
pub use rules::{evaluate, OsRule, Rule, RuleAction, RuleContext};
pub use version_file::{
    Argument, ArgumentValue, Arguments, AssetIndexInfo, DownloadArtifact, Library,
    LibraryDownloads, LibraryFile, VersionDescriptor, VersionDownloads,
};
