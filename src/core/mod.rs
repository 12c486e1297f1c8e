// ─── blocklaunch core ───
//
//   version/   : manifest, version descriptors, OS rules
//   resolver/  : per-host artifact plan + sequential install
//   downloader/: HTTP fetch with SHA-1 freshness checks
//   launch/    : classpath, placeholders, process spawn
//   java/      : Java probing and runtime provisioning

pub mod archive;
pub mod auth;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod java;
pub mod launch;
pub mod options;
pub mod platform;
pub mod resolver;
pub mod version;
