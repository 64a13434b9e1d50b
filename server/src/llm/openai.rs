//! OpenAI-compatible API client.
//!
//! Supports both `/chat/completions` and `/responses`. Request building and
//! response parsing are pure functions so they can be tested without HTTP.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::config::{LlmTimeouts, OpenAiApiMode};
use super::types::{ChatResponse, ContentBlock, LlmError, Message};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    mode: OpenAiApiMode,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(api_key: String, mode: OpenAiApiMode, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url, mode })
    }

    /// # Errors
    ///
    /// Transport failure, non-2xx status, or an unparseable body.
    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<ChatResponse, LlmError> {
        match self.mode {
            OpenAiApiMode::ChatCompletions => {
                let msgs = build_chat_completions_messages(system, messages);
                let body = CcRequest { model, max_tokens, messages: &msgs };
                let text = self.send_json("/chat/completions", &body).await?;
                parse_chat_completions_response(&text)
            }
            OpenAiApiMode::Responses => {
                let input = build_responses_input(messages);
                let body = RespRequest { model, max_output_tokens: max_tokens, instructions: system, input: &input };
                let text = self.send_json("/responses", &body).await?;
                parse_responses_response(&text)
            }
        }
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if !status.is_success() {
            return Err(LlmError::ApiResponse { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

// =============================================================================
// CHAT COMPLETIONS
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [Message],
}

fn build_chat_completions_messages(system: &str, messages: &[Message]) -> Vec<Message> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if !system.trim().is_empty() {
        out.push(Message { role: "system".into(), content: system.to_owned() });
    }
    out.extend(messages.iter().cloned());
    out
}

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let model = root.get("model").and_then(Value::as_str).map(str::to_owned).unwrap_or_default();
    let usage = |key: &str| root.get("usage").and_then(|u| u.get(key)).and_then(Value::as_u64).unwrap_or(0);

    let Some(choice) = root.get("choices").and_then(Value::as_array).and_then(|arr| arr.first()) else {
        return Err(LlmError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };
    let finish_reason = choice.get("finish_reason").and_then(Value::as_str).unwrap_or("stop");

    let mut content = Vec::new();
    if let Some(text) = choice.get("message").and_then(|m| m.get("content")).and_then(Value::as_str) {
        if !text.is_empty() {
            content.push(ContentBlock::Text { text: text.to_string() });
        }
    }

    let stop_reason = if finish_reason == "length" { "max_tokens" } else { "end_turn" };
    Ok(ChatResponse {
        content,
        model,
        stop_reason: stop_reason.to_string(),
        input_tokens: usage("prompt_tokens"),
        output_tokens: usage("completion_tokens"),
    })
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Serialize)]
struct RespRequest<'a> {
    model: &'a str,
    max_output_tokens: u32,
    instructions: &'a str,
    input: &'a [RespInputItem],
}

#[derive(Serialize)]
struct RespInputItem {
    #[serde(rename = "type")]
    item_type: &'static str,
    role: String,
    content: Vec<RespTextContent>,
}

#[derive(Serialize)]
struct RespTextContent {
    #[serde(rename = "type")]
    content_type: &'static str,
    text: String,
}

fn build_responses_input(messages: &[Message]) -> Vec<RespInputItem> {
    messages
        .iter()
        .map(|m| RespInputItem {
            item_type: "message",
            role: m.role.clone(),
            content: vec![RespTextContent { content_type: "input_text", text: m.content.clone() }],
        })
        .collect()
}

pub(crate) fn parse_responses_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let model = root.get("model").and_then(Value::as_str).map(str::to_owned).unwrap_or_default();
    let usage = |key: &str| root.get("usage").and_then(|u| u.get(key)).and_then(Value::as_u64).unwrap_or(0);

    let mut content = Vec::new();
    if let Some(items) = root.get("output").and_then(Value::as_array) {
        let parts = items
            .iter()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some("message"))
            .filter_map(|item| item.get("content").and_then(Value::as_array))
            .flatten();
        for part in parts {
            let kind = part.get("type").and_then(Value::as_str);
            let text = part.get("text").and_then(Value::as_str).unwrap_or("");
            if matches!(kind, Some("output_text" | "text")) && !text.is_empty() {
                content.push(ContentBlock::Text { text: text.to_string() });
            }
        }
    } else if let Some(output_text) = root.get("output_text").and_then(Value::as_str) {
        if !output_text.is_empty() {
            content.push(ContentBlock::Text { text: output_text.to_string() });
        }
    }

    let truncated =
        root.get("incomplete_details").and_then(|d| d.get("reason")).and_then(Value::as_str) == Some("max_output_tokens");
    Ok(ChatResponse {
        content,
        model,
        stop_reason: if truncated { "max_tokens" } else { "end_turn" }.to_string(),
        input_tokens: usage("input_tokens"),
        output_tokens: usage("output_tokens"),
    })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
