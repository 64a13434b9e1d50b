//! Self-registration page.
//!
//! Student id and name are required; phone numbers are reformatted to the
//! dashed Korean style before sending and a blank email is omitted. The
//! server issues the auth code, which is shown once.

use forms::{IssuedStudent, NewStudent};

use super::{BusyFlag, ControllerError, non_blank};
use crate::net::ApiClient;

pub const REQUIRED_MESSAGE: &str = "학번과 이름을 입력해 주세요.";
pub const REGISTERED_MESSAGE: &str = "등록되었습니다. 폼 제출 시 사용할 인증코드를 확인하세요.";
pub const REGISTER_FAILED_MESSAGE: &str = "등록에 실패했습니다.";

/// Raw registration input as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub student_id: String,
    pub name: String,
    pub phone_student: String,
    pub phone_parent: String,
    pub email: String,
}

impl Registration {
    #[must_use]
    pub fn new(student_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { student_id: student_id.into(), name: name.into(), ..Self::default() }
    }

    /// Trimmed, phone-formatted payload; `None` when id or name is blank.
    #[must_use]
    pub fn to_new_student(&self) -> Option<NewStudent> {
        let student_id = non_blank(&self.student_id)?;
        let name = non_blank(&self.name)?;
        Some(NewStudent {
            student_id,
            name,
            phone_student: non_blank(&self.phone_student).map(|p| forms::format_phone(&p)),
            phone_parent: non_blank(&self.phone_parent).map(|p| forms::format_phone(&p)),
            email: non_blank(&self.email),
        })
    }
}

pub struct RegistrationController {
    api: ApiClient,
    submitting: BusyFlag,
}

impl RegistrationController {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, submitting: BusyFlag::new() }
    }

    /// # Errors
    ///
    /// Blank id or name (nothing is sent), busy, or API failure.
    pub async fn register(&self, input: &Registration) -> Result<IssuedStudent, ControllerError> {
        let student = input.to_new_student().ok_or_else(|| ControllerError::invalid(REQUIRED_MESSAGE))?;
        let _busy = self.submitting.acquire()?;
        let issued = self
            .api
            .add_student(&student)
            .await?
            .ok_or_else(|| ControllerError::failed(REGISTER_FAILED_MESSAGE))?;
        tracing::info!(student_id = %issued.student_id, "student registered");
        Ok(issued)
    }
}

#[cfg(test)]
#[path = "registration_test.rs"]
mod tests;
