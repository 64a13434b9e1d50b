use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use super::*;
use crate::config::ServerConfig;
use crate::llm::{ChatResponse, LlmChat};
use crate::llm::types::ContentBlock;
use crate::rate_limit::{RateLimitConfig, RateLimiter};
use crate::state::test_helpers::{test_app_state, test_app_state_with_llm};

// =============================================================================
// MOCK LLM
// =============================================================================

struct MockLlm {
    responses: Mutex<Vec<Result<ChatResponse, LlmError>>>,
    calls: Mutex<Vec<(u32, String, Vec<Message>)>>,
}

impl MockLlm {
    fn new(responses: Vec<Result<ChatResponse, LlmError>>) -> Arc<Self> {
        Arc::new(Self { responses: Mutex::new(responses), calls: Mutex::new(Vec::new()) })
    }

    fn text(reply: &str) -> Result<ChatResponse, LlmError> {
        Ok(ChatResponse { content: vec![ContentBlock::Text { text: reply.into() }], ..ChatResponse::default() })
    }
}

#[async_trait::async_trait]
impl LlmChat for MockLlm {
    async fn chat(&self, max_tokens: u32, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        self.calls.lock().unwrap().push((max_tokens, system.to_owned(), messages.to_vec()));
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() { Ok(ChatResponse::default()) } else { responses.remove(0) }
    }
}

// =============================================================================
// HARNESS
// =============================================================================

async fn serve(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, crate::routes::app(state)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn post_raw(base: &str, body: &str) -> (StatusCode, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/chat"))
        .header("content-type", "application/json")
        .body(body.to_owned())
        .send()
        .await
        .unwrap();
    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
    (status, resp.json().await.unwrap())
}

// =============================================================================
// HANDLER
// =============================================================================

#[tokio::test]
async fn reply_is_first_text_of_completion() {
    let llm = MockLlm::new(vec![MockLlm::text("**[제목]:** 급식 만족도 조사")]);
    let base = serve(test_app_state_with_llm(llm.clone())).await;

    let (status, body) = post_raw(&base, r#"{"message":"  급식 만족도 조사 만들어줘  "}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "reply": "**[제목]:** 급식 만족도 조사" }));

    let calls = llm.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ServerConfig::default().chat_max_tokens);
    assert_eq!(calls[0].1, SYSTEM_PROMPT);
    assert_eq!(calls[0].2, vec![Message::user("급식 만족도 조사 만들어줘")]);
}

#[tokio::test]
async fn empty_completion_replies_with_empty_string() {
    let base = serve(test_app_state_with_llm(MockLlm::new(Vec::new()))).await;
    let (status, body) = post_raw(&base, r#"{"message":"hi"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "");
}

#[tokio::test]
async fn bad_bodies_are_400() {
    let llm = MockLlm::new(Vec::new());
    let base = serve(test_app_state_with_llm(llm.clone())).await;

    assert_eq!(post_raw(&base, "{oops").await, (StatusCode::BAD_REQUEST, json!({ "error": "Invalid JSON body" })));
    assert_eq!(post_raw(&base, r#"{"message":"   "}"#).await.1["error"], "message is required");
    assert_eq!(post_raw(&base, "{}").await.1["error"], "message is required");
    assert_eq!(post_raw(&base, "").await.1["error"], "message is required");
    assert!(llm.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_post_is_405() {
    let base = serve(test_app_state_with_llm(MockLlm::new(Vec::new()))).await;
    let resp = reqwest::get(format!("{base}/api/chat")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 405);
    assert_eq!(resp.json::<Value>().await.unwrap(), json!({ "error": "Method not allowed" }));
}

#[tokio::test]
async fn unconfigured_llm_is_500_before_parsing() {
    let state = test_app_state().with_unavailable_reason("OPENAI_API_KEY is not configured in the server environment.");
    let base = serve(state).await;
    let (status, body) = post_raw(&base, "{oops").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "OPENAI_API_KEY is not configured in the server environment.");
}

#[tokio::test]
async fn upstream_status_passes_through() {
    let llm = MockLlm::new(vec![
        Err(LlmError::ApiResponse { status: 401, body: r#"{"error":{"message":"bad key"}}"#.into() }),
        Err(LlmError::ApiResponse { status: 503, body: String::new() }),
        Err(LlmError::ApiRequest("connection reset".into())),
    ]);
    let base = serve(test_app_state_with_llm(llm)).await;

    let (status, body) = post_raw(&base, r#"{"message":"a"}"#).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], r#"{"error":{"message":"bad key"}}"#);

    let (status, body) = post_raw(&base, r#"{"message":"a"}"#).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], UPSTREAM_FALLBACK_ERROR);

    let (status, body) = post_raw(&base, r#"{"message":"a"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn rate_limited_callers_get_429() {
    let limiter = RateLimiter::new(RateLimitConfig { per_client_limit: 1, ..RateLimitConfig::default() });
    let llm: Arc<dyn LlmChat> = MockLlm::new(Vec::new());
    let state = AppState::new(Some(llm), limiter, ServerConfig::default());
    let base = serve(state).await;

    let send = |ip: &'static str| {
        let base = base.clone();
        async move {
            reqwest::Client::new()
                .post(format!("{base}/api/chat"))
                .header("x-forwarded-for", ip)
                .body(r#"{"message":"a"}"#)
                .send()
                .await
                .unwrap()
                .status()
                .as_u16()
        }
    };
    assert_eq!(send("10.0.0.1").await, 200);
    assert_eq!(send("10.0.0.1").await, 429);
    assert_eq!(send("10.0.0.2").await, 200);
}

#[tokio::test]
async fn healthz_is_ok() {
    let base = serve(test_app_state()).await;
    assert_eq!(reqwest::get(format!("{base}/healthz")).await.unwrap().status().as_u16(), 200);
}

// =============================================================================
// HELPERS
// =============================================================================

#[test]
fn client_key_prefers_first_forwarded_hop() {
    let mut headers = HeaderMap::new();
    assert_eq!(client_key(&headers), "anonymous");
    headers.insert("x-real-ip", "192.168.0.9".parse().unwrap());
    assert_eq!(client_key(&headers), "192.168.0.9");
    headers.insert("x-forwarded-for", "203.0.113.5, 10.0.0.1".parse().unwrap());
    assert_eq!(client_key(&headers), "203.0.113.5");
}

#[test]
fn rate_limit_maps_to_429() {
    let err = RateLimitError::GlobalExceeded { limit: 20, window_secs: 60 };
    assert_eq!(rate_limit_error_to_status(&err), StatusCode::TOO_MANY_REQUESTS);
}
