use super::*;
use std::sync::Mutex;

use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use forms::FormType;

type Seen = Arc<Mutex<Vec<(String, Value)>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}/exec")
}

async fn replying(status: StatusCode, body: &'static str) -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let captured = seen.clone();
    let router = Router::new().route(
        "/exec",
        post(move |headers: HeaderMap, raw: String| {
            let captured = captured.clone();
            async move {
                let content_type = headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_owned();
                let value = serde_json::from_str(&raw).unwrap_or(Value::Null);
                captured.lock().expect("lock").push((content_type, value));
                (status, body)
            }
        }),
    );
    (serve(router).await, seen)
}

fn client(url: &str) -> ApiClient {
    ApiClient::http(url, Timeouts { request_secs: 5, connect_secs: 2 }).expect("client")
}

#[tokio::test]
async fn sends_action_merged_body_as_text_plain() {
    let (url, seen) = replying(StatusCode::OK, r#"{"success":true,"data":{"student_id":10101,"name":"홍길동"}}"#).await;
    let student = client(&url).auth_student("10101", "AB12").await.expect("auth").expect("data");
    assert_eq!(student.student_id, "10101");
    assert_eq!(student.name, "홍길동");

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "text/plain;charset=utf-8");
    assert_eq!(seen[0].1, json!({ "action": "AUTH_STUDENT", "student_id": "10101", "auth_code": "AB12" }));
}

#[tokio::test]
async fn server_error_with_body_uses_its_error() {
    let (url, _) = replying(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#).await;
    let err = client(&url).get_students().await.expect_err("should fail");
    assert_eq!(err, ApiError::Status { status: 500, message: "boom".into() });
    let envelope: Envelope = err.into_envelope();
    assert_eq!(serde_json::to_value(&envelope).expect("json"), json!({ "success": false, "error": "boom" }));
}

#[tokio::test]
async fn server_error_without_body_uses_status_reason() {
    let (url, _) = replying(StatusCode::NOT_FOUND, "").await;
    let err = client(&url).get_folders().await.expect_err("should fail");
    assert_eq!(err.message(), "Not Found");
}

#[tokio::test]
async fn unsuccessful_envelope_is_rejected() {
    let (url, _) = replying(StatusCode::OK, r#"{"success":false,"error":"인증코드가 올바르지 않습니다."}"#).await;
    let err = client(&url).auth_student("1", "x").await.expect_err("should fail");
    assert_eq!(err, ApiError::Rejected("인증코드가 올바르지 않습니다.".into()));

    let (url, _) = replying(StatusCode::OK, r#"{"success":false}"#).await;
    let err = client(&url).delete_form("f").await.expect_err("should fail");
    assert_eq!(err.message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn connection_refused_yields_connectivity_message() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let err = client(&format!("http://{addr}/exec")).get_forms(None).await.expect_err("should fail");
    assert!(matches!(err, ApiError::Unreachable { .. }));
    assert_eq!(err.message(), CONNECTIVITY_MESSAGE);
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let (url, _) = replying(StatusCode::OK, "<html>moved</html>").await;
    let err = client(&url).get_forms(None).await.expect_err("should fail");
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn list_data_is_read_leniently() {
    let (url, seen) = replying(
        StatusCode::OK,
        r#"{"success":true,"data":[{"form_id":7,"title":"공지","type":"notice","schema":"{\"body\":\"hi\"}","is_active":"TRUE"}]}"#,
    )
    .await;
    let forms = client(&url).get_forms(Some("fd1")).await.expect("forms");
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].form_id, "7");
    assert_eq!(forms[0].form_type, FormType::Notice);
    assert!(forms[0].is_active);
    assert_eq!(seen.lock().expect("lock")[0].1, json!({ "action": "GET_FORMS", "folder_id": "fd1" }));
}

#[tokio::test]
async fn success_without_data_is_none_or_empty() {
    let (url, _) = replying(StatusCode::OK, r#"{"success":true}"#).await;
    let api = client(&url);
    assert_eq!(api.get_form("x").await.expect("ok"), None);
    assert!(api.get_responses("x").await.expect("ok").is_empty());
}

#[test]
fn request_body_requires_object_params() {
    assert_eq!(request_body(Action::GetFolders, &()).expect("unit"), json!({ "action": "GET_FOLDERS" }));
    assert!(matches!(request_body(Action::GetForm, &json!([1])), Err(ApiError::Encode(_))));
}

#[test]
fn action_names_round_trip() {
    for action in Action::ALL {
        assert_eq!(Action::from_name(action.as_str()), Some(action));
    }
    assert_eq!(Action::from_name("get_form"), Some(Action::GetForm));
    assert_eq!(Action::from_name("NOPE"), None);
}

#[test]
fn envelope_from_result() {
    let ok: Envelope<u8> = Envelope::from_result(Ok(Some(3)));
    assert_eq!(ok, Envelope { success: true, data: Some(3), error: None });
    let failed: Envelope<u8> = Envelope::from_result(Err(ApiError::Rejected("no".into())));
    assert_eq!(failed, Envelope::failure("no"));
}
