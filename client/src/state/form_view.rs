//! Respondent view: load a shared form, authenticate, submit.
//!
//! A respondent must authenticate with student id and auth code before a
//! submission is accepted. The server is the only validator of credentials;
//! this controller only refuses blank input. The submitted `student_name`
//! is the one the server returned at authentication.

use std::sync::{Mutex, PoisonError};

use forms::{AnswerMap, AuthenticatedStudent, ParsedForm, RenderPlan, SubmitResponseParams, SurveyForm};

use super::{BusyFlag, ControllerError, non_blank};
use crate::net::ApiClient;

pub const LOAD_FAILED_MESSAGE: &str = "폼을 불러올 수 없습니다.";
pub const CREDENTIALS_REQUIRED_MESSAGE: &str = "학번과 인증코드를 입력해 주세요.";
pub const AUTH_FAILED_MESSAGE: &str = "인증에 실패했습니다.";
pub const SUBMITTED_MESSAGE: &str = "제출이 완료되었습니다.";

#[derive(Debug, Default)]
struct ViewState {
    form: Option<ParsedForm>,
    student: Option<AuthenticatedStudent>,
    submitted: bool,
}

pub struct FormViewController {
    api: ApiClient,
    state: Mutex<ViewState>,
    submitting: BusyFlag,
}

impl FormViewController {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, state: Mutex::new(ViewState::default()), submitting: BusyFlag::new() }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Fetch the form and reset any previous authentication.
    ///
    /// # Errors
    ///
    /// API failure, or [`ControllerError::Failed`] when the form does not exist.
    pub async fn load(&self, form_id: &str) -> Result<ParsedForm, ControllerError> {
        let form = self
            .api
            .get_form(form_id)
            .await?
            .ok_or_else(|| ControllerError::failed(LOAD_FAILED_MESSAGE))?
            .into_parsed();
        tracing::debug!(form_id = %form.form_id, form_type = %form.form_type, "form loaded");
        self.with_state(|s| *s = ViewState { form: Some(form.clone()), ..ViewState::default() });
        Ok(form)
    }

    #[must_use]
    pub fn form(&self) -> Option<ParsedForm> {
        self.with_state(|s| s.form.clone())
    }

    /// Render plan for the loaded form.
    #[must_use]
    pub fn plan(&self) -> Option<RenderPlan> {
        self.with_state(|s| {
            s.form.as_ref().map(|f| forms::render(f.form_type, f.schema.as_ref(), &f.title, f.body()))
        })
    }

    /// Fresh input state for the loaded survey.
    #[must_use]
    pub fn survey_form(&self) -> Option<SurveyForm> {
        self.with_state(|s| s.form.as_ref().and_then(|f| f.schema.as_ref()).map(SurveyForm::new))
    }

    #[must_use]
    pub fn student(&self) -> Option<AuthenticatedStudent> {
        self.with_state(|s| s.student.clone())
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.with_state(|s| s.submitted)
    }

    /// # Errors
    ///
    /// [`ControllerError::Invalid`] for blank input (nothing is sent), or the
    /// server's rejection.
    pub async fn authenticate(&self, student_id: &str, auth_code: &str) -> Result<AuthenticatedStudent, ControllerError> {
        let (Some(student_id), Some(auth_code)) = (non_blank(student_id), non_blank(auth_code)) else {
            return Err(ControllerError::invalid(CREDENTIALS_REQUIRED_MESSAGE));
        };
        let student = self
            .api
            .auth_student(&student_id, &auth_code)
            .await?
            .ok_or_else(|| ControllerError::failed(AUTH_FAILED_MESSAGE))?;
        tracing::info!(student_id = %student.student_id, "student authenticated");
        self.with_state(|s| s.student = Some(student.clone()));
        Ok(student)
    }

    /// Validate and submit a survey.
    ///
    /// # Errors
    ///
    /// Missing required answers, no form or student yet, busy, or API failure.
    pub async fn submit_survey(&self, survey: &mut SurveyForm) -> Result<&'static str, ControllerError> {
        let answers = survey.submit()?;
        self.send(answers).await
    }

    /// Acknowledge a notice. No field validation applies.
    ///
    /// # Errors
    ///
    /// No form or student yet, busy, or API failure.
    pub async fn confirm_notice(&self) -> Result<&'static str, ControllerError> {
        self.send(forms::notice_confirmation()).await
    }

    async fn send(&self, answer_data: AnswerMap) -> Result<&'static str, ControllerError> {
        let _busy = self.submitting.acquire()?;
        let (form, student) = self.with_state(|s| (s.form.clone(), s.student.clone()));
        let form = form.ok_or_else(|| ControllerError::failed(LOAD_FAILED_MESSAGE))?;
        let student = student.ok_or_else(|| ControllerError::invalid(CREDENTIALS_REQUIRED_MESSAGE))?;

        let params = SubmitResponseParams {
            form_id: form.form_id.clone(),
            student_id: student.student_id.clone(),
            student_name: student.name.clone(),
            answer_data,
        };
        let receipt = self.api.submit_response(&params).await?;
        tracing::info!(
            form_id = %form.form_id,
            response_id = receipt.as_ref().map_or("", |r| r.response_id.as_str()),
            "response submitted"
        );
        self.with_state(|s| s.submitted = true);
        Ok(SUBMITTED_MESSAGE)
    }
}

#[cfg(test)]
#[path = "form_view_test.rs"]
mod tests;
