pub mod client;
pub mod integrity;

pub use client::{Downloader, FetchOutcome};
