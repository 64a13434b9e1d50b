//! Rows and request payloads exchanged with the remote API.
//!
//! Read types use the lenient deserializers in [`crate::de`] because every
//! value originates in a spreadsheet cell. Request types serialize exactly
//! the parameter names the remote actions expect.

use serde::{Deserialize, Serialize};

use crate::answer::{AnswerMap, parse_answer_data};
use crate::de;
use crate::schema::{FormSchema, FormType};

// =============================================================================
// ROWS
// =============================================================================

/// One submission of a form by a student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRow {
    #[serde(default, deserialize_with = "de::string_like")]
    pub response_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub form_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub student_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub student_name: String,
    /// Serialized answer map; see [`ResponseRow::answers`].
    #[serde(default, deserialize_with = "de::json_string")]
    pub answer_data: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub submitted_at: String,
}

impl ResponseRow {
    /// Parsed answers; empty when `answer_data` is malformed.
    #[must_use]
    pub fn answers(&self) -> AnswerMap {
        parse_answer_data(&self.answer_data)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default, deserialize_with = "de::string_like")]
    pub student_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub name: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub auth_code: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub phone_student: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub phone_parent: String,
    #[serde(default, deserialize_with = "de::opt_string_like", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(default, deserialize_with = "de::string_like")]
    pub folder_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsLog {
    #[serde(default, deserialize_with = "de::string_like")]
    pub log_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub sent_at: String,
    #[serde(default, deserialize_with = "de::count")]
    pub receiver_count: u64,
    #[serde(default, deserialize_with = "de::string_like")]
    pub message_content: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub status: String,
}

/// Homeroom identity printed on rosters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    #[serde(default, deserialize_with = "de::string_like")]
    pub grade: String,
    #[serde(rename = "class", default, deserialize_with = "de::string_like")]
    pub class_num: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub teacher_name: String,
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateFormParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub title: String,
    #[serde(rename = "type")]
    pub form_type: FormType,
    pub schema: FormSchema,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateFormParams {
    pub form_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub form_type: FormType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub schema: FormSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitResponseParams {
    pub form_id: String,
    pub student_id: String,
    pub student_name: String,
    pub answer_data: AnswerMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateResponseParams {
    pub response_id: String,
    pub answer_data: AnswerMap,
}

/// A student to register. The server issues the auth code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewStudent {
    pub student_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_student: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Partial update of the student currently keyed `find_by_student_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentUpdate {
    pub find_by_student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_student: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsReceiver {
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SendSmsParams {
    pub receivers: Vec<SmsReceiver>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

// =============================================================================
// RESULTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedForm {
    #[serde(default, deserialize_with = "de::string_like")]
    pub form_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedFolder {
    #[serde(default, deserialize_with = "de::string_like")]
    pub folder_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedResponse {
    #[serde(default, deserialize_with = "de::string_like")]
    pub response_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub submitted_at: String,
}

/// Registration result carrying the freshly issued auth code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedStudent {
    #[serde(default, deserialize_with = "de::string_like")]
    pub student_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub name: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub auth_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedStudent {
    #[serde(default, deserialize_with = "de::string_like")]
    pub student_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsReceipt {
    #[serde(default, deserialize_with = "de::string_like")]
    pub log_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub sent_at: String,
    #[serde(default, deserialize_with = "de::count")]
    pub receiver_count: u64,
}

#[cfg(test)]
#[path = "records_test.rs"]
mod tests;
