use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

pub const APP_USER_AGENT: &str = "blocklaunch/0.1.0";

/// Client with normal certificate validation.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    base_builder().build()
}

/// Client with certificate validation turned off.
///
/// Only used for the single degraded-trust retry in the downloader, for hosts
/// whose local trust store is broken.
pub fn build_unverified_http_client() -> Result<Client, reqwest::Error> {
    base_builder().danger_accept_invalid_certs(true).build()
}

fn base_builder() -> reqwest::ClientBuilder {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
}
