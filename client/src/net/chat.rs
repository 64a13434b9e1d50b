//! Chat-assist proxy client.
//!
//! The proxy takes `{message}` and answers `{reply}` on success or
//! `{error}` otherwise. Replies are used to pre-fill builder text only.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ClientConfig, Timeouts};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("메시지를 입력해 주세요.")]
    EmptyMessage,
    #[error("채팅 서버에 연결할 수 없습니다: {0}")]
    Unreachable(String),
    #[error("{message}")]
    Proxy { status: u16, message: String },
    #[error("채팅 응답을 해석할 수 없습니다: {0}")]
    Decode(String),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct ChatClient {
    http: reqwest::Client,
    url: String,
}

impl ChatClient {
    /// # Errors
    ///
    /// [`ChatError::Unreachable`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeouts: Timeouts) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| ChatError::Unreachable(e.to_string()))?;
        Ok(Self { http, url: url.into() })
    }

    /// # Errors
    ///
    /// See [`ChatClient::new`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ChatError> {
        Self::new(config.chat_url.clone(), config.timeouts)
    }

    /// Send one prompt and return the generated text.
    ///
    /// # Errors
    ///
    /// Blank message, transport failure, a proxy `{error}` reply, or an
    /// unreadable body.
    pub async fn ask(&self, message: &str) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        debug!(len = message.len(), "chat request");
        let response = self
            .http
            .post(&self.url)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| ChatError::Unreachable(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| ChatError::Unreachable(e.to_string()))?;
        let body: ChatReply = serde_json::from_str(&text).map_err(|e| ChatError::Decode(e.to_string()))?;

        if !status.is_success() || body.error.is_some() {
            let message = body
                .error
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_owned());
            warn!(status = status.as_u16(), %message, "chat proxy returned an error");
            return Err(ChatError::Proxy { status: status.as_u16(), message });
        }
        Ok(body.reply.unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
