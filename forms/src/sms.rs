//! Bulk SMS recipient selection.
//!
//! Receivers are derived from the roster: each student contributes the
//! number for the chosen recipient type, trimmed, and students without that
//! number are skipped and counted. `{name}` placeholders in the message are
//! filled in by the remote service, not here.

use crate::records::{SendSmsParams, SmsReceiver, Student};

pub const NO_RECEIVERS_MESSAGE: &str = "발송할 수신자가 없습니다. 학생/학부모 번호를 확인해 주세요.";
pub const EMPTY_MESSAGE_MESSAGE: &str = "발송할 내용을 입력해 주세요.";

/// Placeholder replaced with each receiver's name by the remote service.
pub const NAME_PLACEHOLDER: &str = "{name}";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecipientType {
    Student,
    #[default]
    Parent,
}

impl RecipientType {
    #[must_use]
    pub fn phone_of(self, student: &Student) -> &str {
        match self {
            Self::Student => student.phone_student.trim(),
            Self::Parent => student.phone_parent.trim(),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Parent => "parent",
        }
    }

    #[must_use]
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "parent" => Some(Self::Parent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SmsError {
    #[error("발송할 수신자가 없습니다. 학생/학부모 번호를 확인해 주세요.")]
    NoReceivers,
    #[error("발송할 내용을 입력해 주세요.")]
    EmptyMessage,
}

/// Receivers for `recipient_type` plus the number of students skipped for
/// lacking a phone number.
#[must_use]
pub fn receivers(students: &[Student], recipient_type: RecipientType) -> (Vec<SmsReceiver>, usize) {
    let receivers: Vec<SmsReceiver> = students
        .iter()
        .filter_map(|s| {
            let phone = recipient_type.phone_of(s);
            (!phone.is_empty()).then(|| SmsReceiver { phone: phone.to_owned(), name: Some(s.name.clone()) })
        })
        .collect();
    let skipped = students.len() - receivers.len();
    (receivers, skipped)
}

/// Build a `SEND_SMS` payload, checking receivers first and then the message.
///
/// # Errors
///
/// [`SmsError::NoReceivers`] or [`SmsError::EmptyMessage`].
pub fn build_request(receivers: Vec<SmsReceiver>, message: &str) -> Result<SendSmsParams, SmsError> {
    if receivers.is_empty() {
        return Err(SmsError::NoReceivers);
    }
    let message = message.trim();
    if message.is_empty() {
        return Err(SmsError::EmptyMessage);
    }
    Ok(SendSmsParams { receivers, message: Some(message.to_owned()), template: None })
}

/// Local preview of what one receiver will read.
#[must_use]
pub fn preview(message: &str, name: &str) -> String {
    message.replace(NAME_PLACEHOLDER, name)
}

#[cfg(test)]
#[path = "sms_test.rs"]
mod tests;
