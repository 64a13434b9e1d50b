//! Scripted transport for controller tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::Semaphore;

use super::api::{ApiError, Envelope, Transport};

type Reply = Result<Envelope, ApiError>;

/// Replies are queued per action name; an action with nothing queued gets
/// `{success: true}`. Every request body is recorded.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<Value>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every request until a permit is added to `gate`.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self { gate: Some(gate), ..Self::default() }
    }

    pub fn on(&self, action: &str, reply: Reply) -> &Self {
        self.replies.lock().unwrap().entry(action.to_owned()).or_default().push_back(reply);
        self
    }

    pub fn ok(&self, action: &str, data: Value) -> &Self {
        self.on(action, Ok(Envelope::ok(Some(data))))
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    /// Action names in request order.
    pub fn actions(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r.get("action").and_then(Value::as_str).map(str::to_owned))
            .collect()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn post(&self, body: Value) -> Result<Envelope, ApiError> {
        let action = body.get("action").and_then(Value::as_str).unwrap_or_default().to_owned();
        self.requests.lock().unwrap().push(body);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.replies
            .lock()
            .unwrap()
            .get_mut(&action)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(Envelope::ok(None)))
    }
}
