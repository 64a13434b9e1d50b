use std::sync::Arc;

use forms::SmsError;
use serde_json::json;
use tokio::sync::Semaphore;

use super::*;
use crate::net::mock::MockTransport;

fn roster() -> serde_json::Value {
    json!([
        { "student_id": "10101", "name": "김하늘", "phone_student": "010-1111-2222", "phone_parent": "010-9999-0000" },
        { "student_id": "10102", "name": "이바다", "phone_student": "", "phone_parent": "010-3333-4444" },
        { "student_id": "10103", "name": "박솔", "phone_student": "010-5555-6666", "phone_parent": " " }
    ])
}

async fn loaded(mock: &Arc<MockTransport>) -> SmsController {
    mock.ok("GET_STUDENTS", roster());
    let ctrl = SmsController::new(ApiClient::new(mock.clone()));
    assert_eq!(ctrl.load().await.expect("load"), 3);
    ctrl
}

#[tokio::test]
async fn recipient_type_selects_numbers() {
    let mock = Arc::new(MockTransport::new());
    let ctrl = loaded(&mock).await;
    let (parents, skipped) = ctrl.receivers(RecipientType::Parent);
    assert_eq!(parents.len(), 2);
    assert_eq!(skipped, 1);
    let (students, skipped) = ctrl.receivers(RecipientType::Student);
    assert_eq!(students.iter().map(|r| r.phone.as_str()).collect::<Vec<_>>(), ["010-1111-2222", "010-5555-6666"]);
    assert_eq!(skipped, 1);
}

#[tokio::test]
async fn send_posts_receivers_and_reports_count() {
    let mock = Arc::new(MockTransport::new());
    let ctrl = loaded(&mock).await;
    mock.ok("SEND_SMS", json!({ "log_id": "L1", "sent_at": "2026-03-05T00:00:00Z", "receiver_count": "2" }));

    let (message, receipt) = ctrl.send(RecipientType::Parent, " {name} 학부모님, 내일은 단축 수업입니다. ").await.expect("send");
    assert_eq!(message, "2명에게 발송 요청이 완료되었습니다.");
    assert_eq!(receipt.expect("receipt").receiver_count, 2);

    let body = mock.requests().pop().expect("send request");
    assert_eq!(body["action"], "SEND_SMS");
    assert_eq!(body["message"], "{name} 학부모님, 내일은 단축 수업입니다.");
    assert_eq!(body["receivers"][1], json!({ "phone": "010-3333-4444", "name": "이바다" }));
}

#[tokio::test]
async fn nothing_is_sent_without_receivers_or_message() {
    let mock = Arc::new(MockTransport::new());
    let empty = SmsController::new(ApiClient::new(mock.clone()));
    assert_eq!(
        empty.send(RecipientType::Parent, "안내").await.unwrap_err(),
        ControllerError::Sms(SmsError::NoReceivers)
    );

    let ctrl = loaded(&mock).await;
    assert_eq!(ctrl.send(RecipientType::Student, "   ").await.unwrap_err(), ControllerError::Sms(SmsError::EmptyMessage));
    assert_eq!(mock.actions(), ["GET_STUDENTS"]);
}

#[tokio::test]
async fn second_send_while_sending_is_busy() {
    let gate = Arc::new(Semaphore::new(1));
    let mock = Arc::new(MockTransport::gated(gate.clone()));
    let ctrl = loaded(&mock).await;

    let first = ctrl.send(RecipientType::Parent, "안내");
    futures::pin_mut!(first);
    assert!(futures::poll!(first.as_mut()).is_pending());
    assert_eq!(ctrl.send(RecipientType::Parent, "안내").await.unwrap_err(), ControllerError::Busy);

    gate.add_permits(1);
    first.await.expect("first send");
    assert_eq!(mock.actions(), ["GET_STUDENTS", "SEND_SMS"]);
}
