//! Client configuration parsed from environment variables.
//!
//! - `HOMEROOM_API_URL`: remote API endpoint (required for remote calls)
//! - `HOMEROOM_CHAT_URL`: chat-assist proxy (default `http://127.0.0.1:3000/api/chat`)
//! - `HOMEROOM_REQUEST_TIMEOUT_SECS`: default 30
//! - `HOMEROOM_CONNECT_TIMEOUT_SECS`: default 10
//! - `HOMEROOM_SHARE_BASE_URL`: origin used in share links (default empty)

use std::time::Duration;

pub const DEFAULT_CHAT_URL: &str = "http://127.0.0.1:3000/api/chat";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: Option<String>,
    pub chat_url: String,
    pub share_base_url: String,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            chat_url: DEFAULT_CHAT_URL.to_owned(),
            share_base_url: String::new(),
            timeouts: Timeouts::default(),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_url: env_nonempty("HOMEROOM_API_URL"),
            chat_url: env_nonempty("HOMEROOM_CHAT_URL").unwrap_or_else(|| DEFAULT_CHAT_URL.to_owned()),
            share_base_url: env_nonempty("HOMEROOM_SHARE_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or_default(),
            timeouts: Timeouts {
                request_secs: env_parse("HOMEROOM_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
                connect_secs: env_parse("HOMEROOM_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            },
        }
    }

    /// Public link a student opens to answer `form_id`.
    #[must_use]
    pub fn share_link(&self, form_id: &str) -> String {
        format!("{}/view/{form_id}", self.share_base_url)
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
