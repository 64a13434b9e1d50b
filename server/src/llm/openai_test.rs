use super::*;
use serde_json::json;

#[test]
fn cc_request_puts_system_first() {
    let msgs = build_chat_completions_messages("당신은 교무부장입니다.", &[Message::user("안내문 써줘")]);
    let body = serde_json::to_value(CcRequest { model: "gpt-4o-mini", max_tokens: 2000, messages: &msgs }).unwrap();
    assert_eq!(
        body,
        json!({
            "model": "gpt-4o-mini",
            "max_tokens": 2000,
            "messages": [
                { "role": "system", "content": "당신은 교무부장입니다." },
                { "role": "user", "content": "안내문 써줘" }
            ]
        })
    );
    assert_eq!(build_chat_completions_messages("  ", &[Message::user("x")]).len(), 1);
}

#[test]
fn cc_parse_text_response() {
    let text = json!({
        "model": "gpt-4o-mini",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": "**[제목]:** 학부모 총회 안내" }, "finish_reason": "stop" }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
    })
    .to_string();
    let resp = parse_chat_completions_response(&text).unwrap();
    assert_eq!(resp.first_text(), Some("**[제목]:** 학부모 총회 안내"));
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 10);
    assert_eq!(resp.output_tokens, 5);
}

#[test]
fn cc_parse_null_content_and_length() {
    let text = json!({ "choices": [{ "message": { "content": null }, "finish_reason": "length" }] }).to_string();
    let resp = parse_chat_completions_response(&text).unwrap();
    assert!(resp.content.is_empty());
    assert_eq!(resp.stop_reason, "max_tokens");
}

#[test]
fn cc_parse_missing_choices() {
    let text = json!({ "model": "gpt-4o-mini", "choices": [] }).to_string();
    assert!(matches!(parse_chat_completions_response(&text), Err(LlmError::ApiParse(_))));
    assert!(parse_chat_completions_response("<html>").is_err());
}

#[test]
fn resp_input_shape() {
    let input = build_responses_input(&[Message::user("설문 만들어줘")]);
    assert_eq!(
        serde_json::to_value(&input).unwrap(),
        json!([{ "type": "message", "role": "user", "content": [{ "type": "input_text", "text": "설문 만들어줘" }] }])
    );
}

#[test]
fn resp_parse_text_response() {
    let text = json!({
        "model": "gpt-4o-mini",
        "output": [
            { "type": "reasoning", "summary": [] },
            { "type": "message", "content": [{ "type": "output_text", "text": "Done!" }] }
        ],
        "usage": { "input_tokens": 15, "output_tokens": 8 }
    })
    .to_string();
    let resp = parse_responses_response(&text).unwrap();
    assert_eq!(resp.content, vec![ContentBlock::Text { text: "Done!".into() }]);
    assert_eq!(resp.input_tokens, 15);
}

#[test]
fn resp_parse_output_text_fallback_and_truncation() {
    let text = json!({ "output_text": "Fallback", "incomplete_details": { "reason": "max_output_tokens" } }).to_string();
    let resp = parse_responses_response(&text).unwrap();
    assert_eq!(resp.first_text(), Some("Fallback"));
    assert_eq!(resp.stop_reason, "max_tokens");
}
