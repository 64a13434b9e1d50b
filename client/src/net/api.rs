//! Remote API client.
//!
//! DESIGN
//! ======
//! The remote service is a single script endpoint. Every call is one POST
//! whose JSON body is `{"action": NAME, ...params}`, answered with the
//! envelope `{success, data?, error?}`. [`Transport`] owns the HTTP exchange
//! and [`ApiClient`] owns the typed actions on top of it, so controllers can
//! run against a mock transport in tests.
//!
//! The body is sent as `text/plain;charset=utf-8`. The script host does not
//! answer CORS preflight requests and a JSON content type would trigger one
//! from browsers.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, non-2xx replies, undecodable bodies and
//! `success: false` envelopes all become an [`ApiError`] whose display text
//! is the user-facing message. Nothing here panics or leaks a `reqwest`
//! error type.

use std::sync::Arc;

use forms::{
    AuthenticatedStudent, ClassInfo, CreateFormParams, CreatedFolder, CreatedForm, Folder, Form, IssuedStudent,
    NewStudent, ResponseRow, SendSmsParams, SmsReceipt, Student, StudentUpdate, SubmitResponseParams,
    SubmittedResponse, UpdateFormParams, UpdateResponseParams,
};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::config::{ClientConfig, Timeouts};

/// Shown when the endpoint cannot be reached at all.
pub const CONNECTIVITY_MESSAGE: &str = "서버에 연결할 수 없습니다. API 배포 URL(HOMEROOM_API_URL)과 스프레드시트 연결을 확인하고, 설정을 바꾼 뒤 다시 시도해 주세요.";

/// Shown for a `success: false` envelope without an error string.
pub const GENERIC_FAILURE_MESSAGE: &str = "요청을 처리하지 못했습니다.";

const TEXT_PLAIN_UTF8: &str = "text/plain;charset=utf-8";

// =============================================================================
// ACTIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetForm,
    GetForms,
    CreateForm,
    UpdateForm,
    DeleteForm,
    GetFolders,
    CreateFolder,
    GetResponses,
    SubmitResponse,
    UpdateResponse,
    DeleteResponse,
    GetStudents,
    AddStudent,
    UpdateStudent,
    DeleteStudent,
    GetClassInfo,
    SaveClassInfo,
    GetNonResponders,
    AuthStudent,
    SendSms,
}

impl Action {
    pub const ALL: [Action; 20] = [
        Self::GetForm,
        Self::GetForms,
        Self::CreateForm,
        Self::UpdateForm,
        Self::DeleteForm,
        Self::GetFolders,
        Self::CreateFolder,
        Self::GetResponses,
        Self::SubmitResponse,
        Self::UpdateResponse,
        Self::DeleteResponse,
        Self::GetStudents,
        Self::AddStudent,
        Self::UpdateStudent,
        Self::DeleteStudent,
        Self::GetClassInfo,
        Self::SaveClassInfo,
        Self::GetNonResponders,
        Self::AuthStudent,
        Self::SendSms,
    ];

    /// Wire name sent in the `action` member.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetForm => "GET_FORM",
            Self::GetForms => "GET_FORMS",
            Self::CreateForm => "CREATE_FORM",
            Self::UpdateForm => "UPDATE_FORM",
            Self::DeleteForm => "DELETE_FORM",
            Self::GetFolders => "GET_FOLDERS",
            Self::CreateFolder => "CREATE_FOLDER",
            Self::GetResponses => "GET_RESPONSES",
            Self::SubmitResponse => "SUBMIT_RESPONSE",
            Self::UpdateResponse => "UPDATE_RESPONSE",
            Self::DeleteResponse => "DELETE_RESPONSE",
            Self::GetStudents => "GET_STUDENTS",
            Self::AddStudent => "ADD_STUDENT",
            Self::UpdateStudent => "UPDATE_STUDENT",
            Self::DeleteStudent => "DELETE_STUDENT",
            Self::GetClassInfo => "GET_CLASS_INFO",
            Self::SaveClassInfo => "SAVE_CLASS_INFO",
            Self::GetNonResponders => "GET_NON_RESPONDERS",
            Self::AuthStudent => "AUTH_STUDENT",
            Self::SendSms => "SEND_SMS",
        }
    }

    #[must_use]
    pub fn from_name(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ENVELOPE + ERRORS
// =============================================================================

/// Response envelope shared by every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn ok(data: Option<T>) -> Self {
        Self { success: true, data, error: None }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }

    /// Fold a call result back into envelope form.
    #[must_use]
    pub fn from_result(result: Result<Option<T>, ApiError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => e.into_envelope(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{}", CONNECTIVITY_MESSAGE)]
    Unreachable { detail: String },
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("응답을 해석할 수 없습니다: {0}")]
    Decode(String),
    #[error("요청을 만들 수 없습니다: {0}")]
    Encode(String),
    #[error("{0}")]
    Rejected(String),
    #[error("API 주소가 설정되지 않았습니다. HOMEROOM_API_URL을 확인해 주세요.")]
    NotConfigured,
}

impl ApiError {
    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    #[must_use]
    pub fn into_envelope<T>(self) -> Envelope<T> {
        Envelope::failure(self.message())
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// One request/response exchange with the endpoint.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` and decode the envelope of a 2xx reply.
    async fn post(&self, body: Value) -> Result<Envelope, ApiError>;
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`ApiError::Unreachable`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| ApiError::Unreachable { detail: e.to_string() })?;
        Ok(Self { http, url: url.into() })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn post(&self, body: Value) -> Result<Envelope, ApiError> {
        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, TEXT_PLAIN_UTF8)
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "api request failed to send");
                ApiError::Unreachable { detail: e.to_string() }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Unreachable { detail: e.to_string() })?;

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope>(&text)
                .ok()
                .and_then(|env| env.error)
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_owned());
            warn!(status = status.as_u16(), %message, "api request returned non-success status");
            return Err(ApiError::Status { status: status.as_u16(), message });
        }

        serde_json::from_str::<Envelope>(&text).map_err(|e| {
            warn!(error = %e, "api response body is not an envelope");
            ApiError::Decode(e.to_string())
        })
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Typed access to every remote action.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn http(url: &str, timeouts: Timeouts) -> Result<Self, ApiError> {
        Ok(Self::new(Arc::new(HttpTransport::new(url, timeouts)?)))
    }

    /// # Errors
    ///
    /// [`ApiError::NotConfigured`] when no API URL is set.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let url = config.api_url.as_deref().ok_or(ApiError::NotConfigured)?;
        Self::http(url, config.timeouts)
    }

    /// Run one action. `params` must serialize to a JSON object (or unit).
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; a `success: false` envelope becomes
    /// [`ApiError::Rejected`].
    pub async fn call<T, P>(&self, action: Action, params: &P) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = request_body(action, params)?;
        debug!(%action, "api request");
        let envelope = self.transport.post(body).await?;
        if !envelope.success {
            let message = envelope
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_owned());
            debug!(%action, %message, "api request rejected");
            return Err(ApiError::Rejected(message));
        }
        match envelope.data {
            None | Some(Value::Null) => Ok(None),
            Some(data) => serde_json::from_value(data).map(Some).map_err(|e| ApiError::Decode(e.to_string())),
        }
    }

    async fn call_list<T: DeserializeOwned>(&self, action: Action, params: &Value) -> Result<Vec<T>, ApiError> {
        Ok(self.call::<Vec<T>, _>(action, params).await?.unwrap_or_default())
    }

    async fn call_unit<P: Serialize + ?Sized>(&self, action: Action, params: &P) -> Result<(), ApiError> {
        self.call::<Value, _>(action, params).await.map(|_| ())
    }

    // ----- forms -----

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn get_form(&self, form_id: &str) -> Result<Option<Form>, ApiError> {
        self.call(Action::GetForm, &json!({ "form_id": form_id })).await
    }

    /// All forms, or only those in `folder_id`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn get_forms(&self, folder_id: Option<&str>) -> Result<Vec<Form>, ApiError> {
        let params = folder_id.map_or_else(|| json!({}), |id| json!({ "folder_id": id }));
        self.call_list(Action::GetForms, &params).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn create_form(&self, params: &CreateFormParams) -> Result<Option<CreatedForm>, ApiError> {
        self.call(Action::CreateForm, params).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn update_form(&self, params: &UpdateFormParams) -> Result<(), ApiError> {
        self.call_unit(Action::UpdateForm, params).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn delete_form(&self, form_id: &str) -> Result<(), ApiError> {
        self.call_unit(Action::DeleteForm, &json!({ "form_id": form_id })).await
    }

    // ----- folders -----

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn get_folders(&self) -> Result<Vec<Folder>, ApiError> {
        self.call_list(Action::GetFolders, &json!({})).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn create_folder(&self, name: &str) -> Result<Option<CreatedFolder>, ApiError> {
        self.call(Action::CreateFolder, &json!({ "name": name })).await
    }

    // ----- responses -----

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn get_responses(&self, form_id: &str) -> Result<Vec<ResponseRow>, ApiError> {
        self.call_list(Action::GetResponses, &json!({ "form_id": form_id })).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn submit_response(&self, params: &SubmitResponseParams) -> Result<Option<SubmittedResponse>, ApiError> {
        self.call(Action::SubmitResponse, params).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn update_response(&self, params: &UpdateResponseParams) -> Result<(), ApiError> {
        self.call_unit(Action::UpdateResponse, params).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn delete_response(&self, response_id: &str) -> Result<(), ApiError> {
        self.call_unit(Action::DeleteResponse, &json!({ "response_id": response_id })).await
    }

    // ----- students -----

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn get_students(&self) -> Result<Vec<Student>, ApiError> {
        self.call_list(Action::GetStudents, &json!({})).await
    }

    /// Register a student; the reply carries the issued auth code.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn add_student(&self, params: &NewStudent) -> Result<Option<IssuedStudent>, ApiError> {
        self.call(Action::AddStudent, params).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn update_student(&self, params: &StudentUpdate) -> Result<(), ApiError> {
        self.call_unit(Action::UpdateStudent, params).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn delete_student(&self, student_id: &str) -> Result<(), ApiError> {
        self.call_unit(Action::DeleteStudent, &json!({ "student_id": student_id })).await
    }

    /// Students who have not answered `form_id`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn get_non_responders(&self, form_id: &str) -> Result<Vec<Student>, ApiError> {
        self.call_list(Action::GetNonResponders, &json!({ "form_id": form_id })).await
    }

    /// Check a student's credentials. Only the server validates them.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; wrong credentials arrive as [`ApiError::Rejected`].
    pub async fn auth_student(&self, student_id: &str, auth_code: &str) -> Result<Option<AuthenticatedStudent>, ApiError> {
        self.call(Action::AuthStudent, &json!({ "student_id": student_id, "auth_code": auth_code })).await
    }

    // ----- class info -----

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn get_class_info(&self) -> Result<Option<ClassInfo>, ApiError> {
        self.call(Action::GetClassInfo, &json!({})).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn save_class_info(&self, info: &ClassInfo) -> Result<Option<ClassInfo>, ApiError> {
        self.call(Action::SaveClassInfo, info).await
    }

    // ----- sms -----

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn send_sms(&self, params: &SendSmsParams) -> Result<Option<SmsReceipt>, ApiError> {
        self.call(Action::SendSms, params).await
    }
}

/// `{"action": NAME, ...params}`.
///
/// # Errors
///
/// [`ApiError::Encode`] when `params` does not serialize to an object.
pub fn request_body<P: Serialize + ?Sized>(action: Action, params: &P) -> Result<Value, ApiError> {
    let mut body = match serde_json::to_value(params).map_err(|e| ApiError::Encode(e.to_string()))? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => return Err(ApiError::Encode(format!("params must be an object, got {other}"))),
    };
    body.insert("action".to_owned(), Value::String(action.as_str().to_owned()));
    Ok(Value::Object(body))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
