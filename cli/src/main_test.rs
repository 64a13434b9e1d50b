use std::sync::Mutex;

use super::*;
use axum::Router;
use axum::routing::post;
use client::store::MemoryStore;
use forms::Answer;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("homeroom").chain(args.iter().copied())).expect("args should parse")
}

/// Remote API stand-in; `respond` maps the posted action name to an envelope.
async fn spawn_remote(respond: fn(&str) -> Value) -> String {
    spawn_recording_remote(respond).await.0
}

/// Like [`spawn_remote`], also keeping every request body in arrival order.
async fn spawn_recording_remote(respond: fn(&str) -> Value) -> (String, Arc<Mutex<Vec<Value>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let seen = log.clone();
    let app = Router::new().route(
        "/",
        post(move |body: String| {
            let seen = seen.clone();
            async move {
                let request: Value = serde_json::from_str(&body).expect("request body is JSON");
                let action = request.get("action").and_then(Value::as_str).unwrap_or_default().to_owned();
                seen.lock().expect("request log").push(request);
                axum::Json(respond(&action))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{addr}/"), log)
}

fn actions(log: &Mutex<Vec<Value>>) -> Vec<String> {
    log.lock()
        .expect("request log")
        .iter()
        .map(|r| r["action"].as_str().unwrap_or_default().to_owned())
        .collect()
}

fn memory_last_used() -> LastUsed {
    LastUsed::new(Arc::new(MemoryStore::new()))
}

fn answer(key: &str, value: &str) -> AnswerSpec {
    AnswerSpec { key: key.to_owned(), value: value.to_owned() }
}

fn trip_survey() -> FormSchema {
    FormSchema::survey(
        vec![
            FormFieldSchema::new("q1", FieldType::Radio, "희망 장소").required(true).with_options(["박물관", "기타"]),
            FormFieldSchema::new("q2", FieldType::Checkbox, "준비물").with_options(["도시락", "물", "우산"]),
            FormFieldSchema::new("q3", FieldType::Text, "비고"),
        ],
        None,
    )
}

fn trip_form_envelope() -> Value {
    serde_json::json!({
        "success": true,
        "data": {
            "form_id": "F1",
            "title": "체험학습 희망 조사",
            "type": "survey",
            "schema": trip_survey().to_json_string(),
            "is_active": "TRUE"
        }
    })
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[test]
fn global_flags_build_client_config() {
    let cli = parse(&[
        "--api-url",
        " https://script.example/exec ",
        "--share-base-url",
        "https://homeroom.example/",
        "--timeout-secs",
        "5",
        "forms",
        "share-link",
        "f1",
    ]);
    let config = cli.client_config();
    assert_eq!(config.api_url.as_deref(), Some("https://script.example/exec"));
    assert_eq!(config.timeouts.request_secs, 5);
    assert_eq!(config.share_link("f1"), "https://homeroom.example/view/f1");
}

#[test]
fn blank_api_url_is_treated_as_unset() {
    let cli = parse(&["--api-url", "  ", "folders", "list"]);
    assert_eq!(cli.client_config().api_url, None);
}

#[test]
fn utc_offset_defaults_to_korea_and_accepts_negative_hours() {
    let cli = parse(&["responses", "list", "f1"]);
    assert_eq!(cli.utc_offset().expect("offset"), forms::DEFAULT_UTC_OFFSET);

    let cli = parse(&["--utc-offset-hours", "-5", "responses", "list", "f1"]);
    assert_eq!(cli.utc_offset().expect("offset").whole_hours(), -5);
}

#[test]
fn out_of_range_utc_offset_is_rejected() {
    let cli = parse(&["--utc-offset-hours", "30", "responses", "list", "f1"]);
    assert!(matches!(cli.utc_offset(), Err(CliError::InvalidUtcOffset(30))));
}

#[test]
fn forms_create_parses_type_names() {
    let cli = parse(&["forms", "create", "--type", "Survey", "--title", "현장체험학습 설문"]);
    let Command::Forms(FormsCommand { command: FormsSubcommand::Create { form_type, title, .. } }) = cli.command else {
        panic!("expected forms create");
    };
    assert_eq!(form_type, FormType::Survey);
    assert_eq!(title, "현장체험학습 설문");

    let err = Cli::try_parse_from(["homeroom", "forms", "create", "--type", "quiz", "--title", "x"]);
    assert!(err.is_err());
}

#[test]
fn sms_recipient_defaults_to_parent_then_last_used() {
    let cli = parse(&["sms", "send", "--message", "{name} 학부모님 안녕하세요"]);
    let last_used = cli.last_used();
    let Command::Sms(SmsCommand { command: SmsSubcommand::Send { to, message } }) = cli.command else {
        panic!("expected sms send");
    };
    assert_eq!(to, None);
    assert_eq!(last_used.recipient(to).expect("recipient"), RecipientType::Parent);
    assert!(message.contains("{name}"));

    let cli = parse(&["sms", "receivers", "--to", "student"]);
    let Command::Sms(SmsCommand { command: SmsSubcommand::Receivers { to } }) = cli.command else {
        panic!("expected sms receivers");
    };
    assert_eq!(to, Some(RecipientType::Student));
    assert_eq!(last_used.recipient(to).expect("recipient"), RecipientType::Student);
    assert_eq!(last_used.recipient(None).expect("recipient"), RecipientType::Student);
}

#[test]
fn state_file_remembers_folder_across_runs() {
    let path = std::env::temp_dir().join(format!("homeroom-state-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let state = path.to_str().expect("utf-8 temp path");

    let first = parse(&["--state-file", state, "folders", "list"]).last_used();
    assert_eq!(first.folder(Some("fd_trip")).expect("folder"), "fd_trip");
    let second = parse(&["--state-file", state, "folders", "list"]).last_used();
    assert_eq!(second.folder(None).expect("folder"), "fd_trip");

    // No state file: nothing carries over.
    assert_eq!(parse(&["folders", "list"]).last_used().folder(None).expect("folder"), "");
    let _ = std::fs::remove_file(path);
}

#[test]
fn field_specs_parse_type_label_required_and_options() {
    let spec = parse_field_spec("radio:희망 장소*:박물관| 과학관 |기타").expect("valid spec");
    assert_eq!(spec.field_type, FieldType::Radio);
    assert_eq!(spec.label, "희망 장소");
    assert!(spec.required);
    assert_eq!(spec.options, ["박물관", "과학관", "기타"]);

    let spec = parse_field_spec("Textarea:건의 사항").expect("valid spec");
    assert_eq!(spec.field_type, FieldType::Textarea);
    assert!(!spec.required);
    assert!(spec.options.is_empty());

    assert!(parse_field_spec("slider:만족도").is_err());
    assert!(parse_field_spec("text").is_err());
    assert!(parse_field_spec("text:이름:a|b").is_err());
}

#[test]
fn answer_specs_split_at_first_equals() {
    assert_eq!(parse_answer_spec("q3=a=b").expect("valid"), answer("q3", "a=b"));
    assert_eq!(parse_answer_spec(" q1 =").expect("valid"), answer("q1", ""));
    assert!(parse_answer_spec("q1").is_err());
    assert!(parse_answer_spec("=x").is_err());

    let cli = parse(&["forms", "respond", "F1", "--student-id", "10101", "--auth-code", "A1", "--answer", "q2=물", "--answer", "q2=우산"]);
    let Command::Forms(FormsCommand { command: FormsSubcommand::Respond { answers, .. } }) = cli.command else {
        panic!("expected forms respond");
    };
    assert_eq!(answers.answers, [answer("q2", "물"), answer("q2", "우산")]);
}

#[test]
fn field_specs_build_draft_fields() {
    let mut draft = FormDraft::new(FormType::Survey);
    draft.title = "체험학습".into();
    let args = FieldArgs {
        schema: None,
        fields: vec![
            parse_field_spec("radio:희망 장소*:박물관|기타").expect("spec"),
            parse_field_spec("checkbox:준비물").expect("spec"),
            parse_field_spec("date:희망일").expect("spec"),
        ],
    };
    apply_fields(&mut draft, Some("  안내문  "), &args).expect("apply");

    let fields = draft.fields();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].label, "희망 장소");
    assert!(fields[0].required);
    assert_eq!(fields[0].options(), ["박물관", "기타"]);
    assert!(fields[0].has_other_option());
    assert_eq!(fields[1].options(), ["선택지 1"]);
    assert_eq!(fields[2].field_type, FieldType::Date);
    assert_eq!(draft.to_schema().body.as_deref(), Some("안내문"));
}

#[test]
fn schema_file_replaces_fields_and_supplies_body() {
    let path = std::env::temp_dir().join(format!("homeroom-schema-{}.json", std::process::id()));
    let schema = FormSchema::survey(trip_survey().fields, Some("준비물을 확인하세요".into()));
    std::fs::write(&path, schema.to_json_string()).expect("write schema");

    let mut draft = FormDraft::new(FormType::Survey);
    draft.add_field();
    let args = FieldArgs { schema: Some(path.clone()), fields: vec![parse_field_spec("text:연락처").expect("spec")] };
    apply_fields(&mut draft, None, &args).expect("apply");

    let ids: Vec<&str> = draft.fields().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(&ids[..3], ["q1", "q2", "q3"]);
    assert_eq!(ids.len(), 4);
    assert_eq!(draft.description, "준비물을 확인하세요");

    std::fs::write(&path, "{not json").expect("write junk");
    let err = apply_fields(&mut draft, None, &args).expect_err("not a schema");
    assert!(matches!(err, CliError::InvalidSchema(_)));
    let _ = std::fs::remove_file(path);
}

#[test]
fn answers_drive_survey_controls() {
    let mut survey = SurveyForm::new(&trip_survey());
    let answers = [answer("q1", "기타"), answer("q1_other", "미술관"), answer("q2", "물"), answer("q2", "도시락"), answer("q3", "없음")];
    fill_survey(&mut survey, &answers).expect("fill");
    let submitted = survey.submit().expect("required answered");
    assert_eq!(submitted["q1"], Answer::Text("기타 (미술관)".into()));
    assert_eq!(submitted["q2"], Answer::Choices(vec!["도시락".into(), "물".into()]));
    assert_eq!(submitted["q3"], Answer::Text("없음".into()));
    assert!(!submitted.contains_key("q1_other"));

    let mut survey = SurveyForm::new(&trip_survey());
    assert!(matches!(fill_survey(&mut survey, &[answer("q9", "x")]), Err(InputError::UnknownField(_))));
    assert!(matches!(fill_survey(&mut survey, &[answer("q1", "수족관")]), Err(InputError::UnknownOption { .. })));
    assert!(matches!(fill_survey(&mut survey, &[answer("q3_other", "x")]), Err(InputError::UnknownField(_))));
}

#[test]
fn merged_answers_keep_untouched_fields() {
    let existing = AnswerMap::from([
        ("q1".to_owned(), Answer::Text("박물관".into())),
        ("q2".to_owned(), Answer::Choices(vec!["우산".into()])),
        ("q3".to_owned(), Answer::Text("알레르기 있음".into())),
    ]);
    let merged = merge_answers(&trip_survey().fields, existing, &[answer("q1", "기타"), answer("q1_other", "천문대")])
        .expect("merge");
    assert_eq!(merged["q1"], Answer::Text("기타 (천문대)".into()));
    assert_eq!(merged["q2"], Answer::Choices(vec!["우산".into()]));
    assert_eq!(merged["q3"], Answer::Text("알레르기 있음".into()));

    // 기타 text alone leaves the required choice unanswered.
    let err = merge_answers(&trip_survey().fields, AnswerMap::new(), &[answer("q1_other", "천문대")]).expect_err("required");
    assert!(matches!(err, CliError::Controller(ControllerError::Submit(_))));
}

#[test]
fn student_args_become_registration() {
    let cli = parse(&["students", "add", "--student-id", "10101", "--name", "김민수", "--phone-parent", "01012345678"]);
    let Command::Students(StudentsCommand { command: StudentsSubcommand::Add(args) }) = cli.command else {
        panic!("expected students add");
    };
    let registration = Registration::from(args);
    let student = registration.to_new_student().expect("id and name present");
    assert_eq!(student.phone_parent.as_deref(), Some("010-1234-5678"));
    assert_eq!(student.phone_student, None);
}

// =============================================================================
// HANDLERS
// =============================================================================

#[tokio::test]
async fn respond_authenticates_then_submits_normalized_answers() {
    let (url, log) = spawn_recording_remote(|action| match action {
        "GET_FORM" => trip_form_envelope(),
        "AUTH_STUDENT" => serde_json::json!({ "success": true, "data": { "student_id": "10101", "name": "김민수" } }),
        "SUBMIT_RESPONSE" => serde_json::json!({ "success": true, "data": { "response_id": "r1" } }),
        other => serde_json::json!({ "success": false, "error": format!("unexpected {other}") }),
    })
    .await;
    let config = ClientConfig { api_url: Some(url), ..ClientConfig::default() };
    let cli = parse(&[
        "forms", "respond", "F1", "--student-id", "10101", "--auth-code", "A1B2",
        "--answer", "q1=기타", "--answer", "q1_other=천문대", "--answer", "q2=물",
    ]);
    let Command::Forms(cmd) = &cli.command else { panic!("expected forms") };

    run_forms(&config, &memory_last_used(), cmd).await.expect("respond");

    assert_eq!(actions(&log), ["GET_FORM", "AUTH_STUDENT", "SUBMIT_RESPONSE"]);
    let submit = log.lock().expect("request log")[2].clone();
    assert_eq!(submit["student_name"], "김민수");
    assert_eq!(submit["answer_data"]["q1"], "기타 (천문대)");
    assert_eq!(submit["answer_data"]["q2"], serde_json::json!(["물"]));
}

#[tokio::test]
async fn respond_with_bad_answer_sends_no_credentials() {
    let (url, log) = spawn_recording_remote(|action| match action {
        "GET_FORM" => trip_form_envelope(),
        other => serde_json::json!({ "success": false, "error": format!("unexpected {other}") }),
    })
    .await;
    let config = ClientConfig { api_url: Some(url), ..ClientConfig::default() };
    let cli = parse(&["forms", "respond", "F1", "--student-id", "10101", "--auth-code", "A1B2", "--answer", "q1=수족관"]);
    let Command::Forms(cmd) = &cli.command else { panic!("expected forms") };

    let err = run_forms(&config, &memory_last_used(), cmd).await.expect_err("unknown option");
    assert!(matches!(err, CliError::Input(InputError::UnknownOption { .. })));
    assert_eq!(actions(&log), ["GET_FORM"]);
}

#[tokio::test]
async fn responses_update_sends_merged_answers() {
    let (url, log) = spawn_recording_remote(|action| match action {
        "GET_FORM" => trip_form_envelope(),
        "GET_RESPONSES" => serde_json::json!({
            "success": true,
            "data": [{
                "response_id": "r1", "form_id": "F1", "student_id": "10101", "student_name": "김민수",
                "answer_data": "{\"q1\":\"박물관\",\"q3\":\"없음\"}", "submitted_at": "2026-03-05T01:00:00Z"
            }]
        }),
        "UPDATE_RESPONSE" => serde_json::json!({ "success": true }),
        other => serde_json::json!({ "success": false, "error": format!("unexpected {other}") }),
    })
    .await;
    let config = ClientConfig { api_url: Some(url), ..ClientConfig::default() };
    let cli = parse(&["responses", "update", "F1", "r1", "--answer", "q2=우산"]);
    let Command::Responses(cmd) = &cli.command else { panic!("expected responses") };

    run_responses(&config, forms::DEFAULT_UTC_OFFSET, cmd).await.expect("update");

    let requests = log.lock().expect("request log").clone();
    let update = requests.iter().find(|r| r["action"] == "UPDATE_RESPONSE").expect("update sent");
    assert_eq!(update["response_id"], "r1");
    assert_eq!(update["answer_data"]["q1"], "박물관");
    assert_eq!(update["answer_data"]["q2"], serde_json::json!(["우산"]));
    assert_eq!(update["answer_data"]["q3"], "없음");
}

#[tokio::test]
async fn create_uses_remembered_folder() {
    let (url, log) = spawn_recording_remote(|action| match action {
        "CREATE_FORM" => serde_json::json!({ "success": true, "data": { "form_id": "F9" } }),
        other => serde_json::json!({ "success": false, "error": format!("unexpected {other}") }),
    })
    .await;
    let config = ClientConfig { api_url: Some(url), ..ClientConfig::default() };
    let last_used = memory_last_used();
    last_used.folder(Some("fd_trip")).expect("remember");
    let cli = parse(&["forms", "create", "--type", "survey", "--title", "체험학습", "--field", "text:비고"]);
    let Command::Forms(cmd) = &cli.command else { panic!("expected forms") };

    run_forms(&config, &last_used, cmd).await.expect("create");

    let create = log.lock().expect("request log")[0].clone();
    assert_eq!(create["action"], "CREATE_FORM");
    assert_eq!(create["folder_id"], "fd_trip");
}

#[tokio::test]
async fn remote_commands_require_an_api_url() {
    let config = ClientConfig::default();
    let cmd = FoldersCommand { command: FoldersSubcommand::List };
    let err = run_folders(&config, &cmd).await.expect_err("no API URL configured");
    assert!(matches!(err, CliError::Api(ApiError::NotConfigured)));
}

#[tokio::test]
async fn class_get_reads_remote_class_info() {
    let url = spawn_remote(|action| {
        assert_eq!(action, "GET_CLASS_INFO");
        serde_json::json!({ "success": true, "data": { "grade": 2, "class": 3, "teacher_name": "이선생" } })
    })
    .await;
    let config = ClientConfig { api_url: Some(url), ..ClientConfig::default() };
    run_class(&config, &ClassCommand { command: ClassSubcommand::Get }).await.expect("class get");
}

#[tokio::test]
async fn remote_failure_surfaces_envelope_error() {
    let url = spawn_remote(|_| serde_json::json!({ "success": false, "error": "시트를 찾을 수 없습니다." })).await;
    let config = ClientConfig { api_url: Some(url), ..ClientConfig::default() };
    let err = run_folders(&config, &FoldersCommand { command: FoldersSubcommand::List })
        .await
        .expect_err("envelope failure");
    assert_eq!(err.to_string(), "시트를 찾을 수 없습니다.");
}

#[tokio::test]
async fn roster_is_written_to_output_file() {
    let url = spawn_remote(|action| match action {
        "GET_STUDENTS" => serde_json::json!({
            "success": true,
            "data": [{ "student_id": 10101, "name": "김<민수>", "auth_code": "A1B2" }]
        }),
        "GET_CLASS_INFO" => serde_json::json!({ "success": true, "data": { "grade": "2", "class": "3" } }),
        other => serde_json::json!({ "success": false, "error": format!("unexpected {other}") }),
    })
    .await;
    let config = ClientConfig { api_url: Some(url), ..ClientConfig::default() };
    let path = std::env::temp_dir().join(format!("homeroom-roster-{}.html", std::process::id()));
    let cmd = StudentsCommand { command: StudentsSubcommand::Roster { output: Some(path.clone()) } };

    run_students(&config, &cmd).await.expect("roster");

    let html = std::fs::read_to_string(&path).expect("roster written");
    assert!(html.contains("2학년 3반 학생 명렬표"));
    assert!(html.contains("김&lt;민수&gt;"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn emit_reports_unwritable_path() {
    let path = std::env::temp_dir().join("homeroom-missing-dir").join("nested").join("out.csv");
    let err = emit("a,b\n", Some(&path)).expect_err("parent dir does not exist");
    assert!(matches!(err, CliError::Write { .. }));
}
