mod config;
mod llm;
mod rate_limit;
mod routes;
mod state;

use std::sync::Arc;

use config::ServerConfig;
use llm::LlmChat;
use rate_limit::{RateLimitConfig, RateLimiter};

#[tokio::main]
async fn main() {
    // A missing .env file is normal in production.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();

    // Non-fatal: the chat endpoint answers 500 with the reason until configured.
    let (llm, unavailable_reason) = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            (Some(Arc::new(client) as Arc<dyn LlmChat>), None)
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured; chat assist disabled");
            (None, Some(e.to_string()))
        }
    };

    let mut state = state::AppState::new(llm, RateLimiter::new(RateLimitConfig::from_env()), config);
    if let Some(reason) = unavailable_reason {
        state = state.with_unavailable_reason(reason);
    }

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "homeroom chat proxy listening");
    axum::serve(listener, app).await.expect("server failed");
}
