use super::*;
use crate::answer::Answer;
use serde_json::json;

#[test]
fn response_row_accepts_embedded_answer_object() {
    let row: ResponseRow = serde_json::from_value(json!({
        "response_id": "r1",
        "form_id": "f1",
        "student_id": 10101,
        "student_name": "김하늘",
        "answer_data": { "f1": ["Chips"] },
        "submitted_at": "2026-03-05T05:07:09.000Z"
    }))
    .expect("row");
    assert_eq!(row.student_id, "10101");
    assert_eq!(row.answers()["f1"], Answer::Choices(vec!["Chips".into()]));
}

#[test]
fn malformed_answer_data_reads_as_empty() {
    let row = ResponseRow { answer_data: "{broken".into(), ..ResponseRow::default() };
    assert!(row.answers().is_empty());
}

#[test]
fn class_info_uses_class_key() {
    let info: ClassInfo = serde_json::from_value(json!({ "grade": 3, "class": "2", "teacher_name": "이선생" })).expect("info");
    assert_eq!(info.grade, "3");
    assert_eq!(info.class_num, "2");
    let value = serde_json::to_value(&info).expect("json");
    assert_eq!(value, json!({ "grade": "3", "class": "2", "teacher_name": "이선생" }));
}

#[test]
fn student_update_only_sends_changed_columns() {
    let update = StudentUpdate {
        find_by_student_id: "10101".into(),
        phone_parent: Some("010-1111-2222".into()),
        ..StudentUpdate::default()
    };
    let value = serde_json::to_value(&update).expect("json");
    assert_eq!(value, json!({ "find_by_student_id": "10101", "phone_parent": "010-1111-2222" }));
}

#[test]
fn create_form_params_send_schema_as_object() {
    let params = CreateFormParams {
        folder_id: None,
        title: "공지".into(),
        form_type: FormType::Notice,
        schema: FormSchema::notice(Some("본문".into())),
    };
    let value = serde_json::to_value(&params).expect("json");
    assert_eq!(value, json!({ "title": "공지", "type": "notice", "schema": { "fields": [], "body": "본문" } }));
}

#[test]
fn sms_log_reads_numeric_strings() {
    let log: SmsLog = serde_json::from_value(json!({ "log_id": 1, "receiver_count": "25", "status": "OK" })).expect("log");
    assert_eq!(log.log_id, "1");
    assert_eq!(log.receiver_count, 25);
    assert_eq!(log.message_content, "");
}
