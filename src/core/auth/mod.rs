use md5::{Digest, Md5};
use uuid::Uuid;

const OFFLINE_PREFIX: &str = "OfflinePlayer:";
const OFFLINE_ACCESS_TOKEN: &str = "0";
const OFFLINE_USER_TYPE: &str = "legacy";
const DEFAULT_USERNAME: &str = "Steve";

/// Identity values substituted into launch arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchAccountProfile {
    pub username: String,
    pub uuid: String,
    pub access_token: String,
    pub xuid: String,
    pub user_type: String,
    pub client_id: String,
}

impl LaunchAccountProfile {
    /// Unauthenticated profile with a stable, name-derived UUID.
    ///
    /// The name is used exactly as given; only an empty or all-blank name
    /// falls back to the default player name.
    pub fn offline(username: &str) -> Self {
        let username = if username.trim().is_empty() {
            DEFAULT_USERNAME
        } else {
            username
        };

        Self {
            username: username.to_string(),
            uuid: offline_uuid(username),
            access_token: OFFLINE_ACCESS_TOKEN.into(),
            xuid: "0".into(),
            user_type: OFFLINE_USER_TYPE.into(),
            client_id: String::new(),
        }
    }
}

/// Deterministic offline identity: MD5 of `OfflinePlayer:<name>`, rendered as
/// lowercase dashed hex (8-4-4-4-12). The digest bits are used unchanged.
pub fn offline_uuid(username: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(OFFLINE_PREFIX.as_bytes());
    hasher.update(username.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hasher.finalize());
    Uuid::from_bytes(bytes).hyphenated().to_string()
}
