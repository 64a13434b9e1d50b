//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The only API surface is the chat-assist proxy; the remote form store is a
//! separate service the client talks to directly. CORS is open so the
//! browser build can call the proxy from any origin.

pub mod chat;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{any, get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/chat", any(chat::handle_chat))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
