//! `POST /api/chat`: chat-assist proxy.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is a JSON `{error}` body. Checks run in a fixed order:
//! method, LLM configuration, JSON body, non-blank message, rate limit.
//! Upstream non-2xx statuses pass through with the upstream body as the
//! error text.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm::prompt::SYSTEM_PROMPT;
use crate::llm::{LlmError, Message};
use crate::rate_limit::RateLimitError;
use crate::state::AppState;

const UPSTREAM_FALLBACK_ERROR: &str = "LLM API error";

#[derive(Debug, Default, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatReply {
    reply: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: error.into() })).into_response()
}

pub(crate) fn llm_error_to_response(err: LlmError) -> Response {
    match err {
        LlmError::ApiResponse { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            let error = if body.trim().is_empty() { UPSTREAM_FALLBACK_ERROR.to_owned() } else { body };
            error_response(status, error)
        }
        other => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) fn rate_limit_error_to_status(_err: &RateLimitError) -> StatusCode {
    StatusCode::TOO_MANY_REQUESTS
}

/// Caller identity for rate limiting: first `x-forwarded-for` hop, then
/// `x-real-ip`, else a shared anonymous bucket.
pub(crate) fn client_key(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    };
    header("x-forwarded-for").or_else(|| header("x-real-ip")).unwrap_or_else(|| "anonymous".to_owned())
}

fn parse_message(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let request: ChatRequest = serde_json::from_slice(body)?;
    Ok(request.message.map(|m| m.trim().to_owned()).filter(|m| !m.is_empty()))
}

pub async fn handle_chat(State(state): State<AppState>, method: Method, headers: HeaderMap, body: Bytes) -> Response {
    if method != Method::POST {
        return error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    }

    let Some(llm) = state.llm.clone() else {
        warn!("chat request while LLM is unconfigured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, state.llm_unavailable.to_string());
    };

    let message = match parse_message(&body) {
        Ok(Some(message)) => message,
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, "message is required"),
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid JSON body"),
    };

    let client = client_key(&headers);
    if let Err(e) = state.rate_limiter.check_and_record(&client) {
        warn!(%client, error = %e, "chat request rate limited");
        return error_response(rate_limit_error_to_status(&e), e.to_string());
    }

    let request_id = Uuid::new_v4();
    info!(%request_id, %client, chars = message.chars().count(), "chat request");
    match llm.chat(state.config.chat_max_tokens, SYSTEM_PROMPT, &[Message::user(message)]).await {
        Ok(response) => {
            info!(
                %request_id,
                input_tokens = response.input_tokens,
                output_tokens = response.output_tokens,
                "chat reply"
            );
            let reply = response.first_text().unwrap_or_default().to_owned();
            (StatusCode::OK, Json(ChatReply { reply })).into_response()
        }
        Err(e) => {
            warn!(%request_id, error = %e, "chat upstream failed");
            llm_error_to_response(e)
        }
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
