//! Server configuration parsed from environment variables.
//!
//! - `PORT`: listen port (default 3000)
//! - `CHAT_MAX_TOKENS`: completion cap per chat request (default 2000)
//!
//! LLM and rate-limit settings are parsed by their own modules.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub chat_max_tokens: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, chat_max_tokens: DEFAULT_CHAT_MAX_TOKENS }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            chat_max_tokens: env_parse("CHAT_MAX_TOKENS", DEFAULT_CHAT_MAX_TOKENS),
        }
    }
}

/// Parse `key` as `T`, falling back to `default` when unset or malformed.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
