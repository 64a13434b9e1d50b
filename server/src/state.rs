//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the optional LLM client, the reason it is missing when it is, the
//! rate limiter and the server config.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::llm::LlmChat;
use crate::rate_limit::RateLimiter;

/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    /// `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    /// Shown to callers while `llm` is `None`.
    pub llm_unavailable: Arc<str>,
    pub rate_limiter: RateLimiter,
    pub config: ServerConfig,
}

/// Fallback text when no specific configuration error was recorded.
pub const LLM_UNAVAILABLE_MESSAGE: &str = "LLM is not configured on this server.";

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>, rate_limiter: RateLimiter, config: ServerConfig) -> Self {
        Self { llm, llm_unavailable: Arc::from(LLM_UNAVAILABLE_MESSAGE), rate_limiter, config }
    }

    /// Record why the LLM client could not be built.
    #[must_use]
    pub fn with_unavailable_reason(mut self, reason: impl Into<String>) -> Self {
        self.llm_unavailable = Arc::from(reason.into());
        self
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
