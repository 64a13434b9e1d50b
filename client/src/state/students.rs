//! Student management page: roster CRUD, class info, printable roster.

use std::sync::{Mutex, PoisonError};

use forms::{ClassInfo, Student, StudentUpdate};

use super::registration::{REGISTER_FAILED_MESSAGE, Registration};
use super::{BusyFlag, ControllerError};
use crate::net::ApiClient;

pub const REQUIRED_MESSAGE: &str = "학번과 이름을 모두 입력해 주세요.";

/// Confirmation after issuing a code to `name`.
#[must_use]
pub fn issued_message(name: &str) -> String {
    format!("{name}님의 인증코드가 발급되었습니다.")
}

pub struct StudentsController {
    api: ApiClient,
    students: Mutex<Vec<Student>>,
    saving: BusyFlag,
}

impl StudentsController {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, students: Mutex::new(Vec::new()), saving: BusyFlag::new() }
    }

    /// Last loaded roster.
    #[must_use]
    pub fn students(&self) -> Vec<Student> {
        self.students.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// # Errors
    ///
    /// API failure; the previous roster is kept.
    pub async fn load(&self) -> Result<Vec<Student>, ControllerError> {
        let students = self.api.get_students().await?;
        tracing::debug!(count = students.len(), "students loaded");
        *self.students.lock().unwrap_or_else(PoisonError::into_inner) = students.clone();
        Ok(students)
    }

    /// Register a student and reload. Returns the confirmation message.
    ///
    /// # Errors
    ///
    /// Blank id or name (nothing is sent), busy, or API failure.
    pub async fn add(&self, input: &Registration) -> Result<String, ControllerError> {
        let student = input.to_new_student().ok_or_else(|| ControllerError::invalid(REQUIRED_MESSAGE))?;
        let _busy = self.saving.acquire()?;
        let issued = self
            .api
            .add_student(&student)
            .await?
            .ok_or_else(|| ControllerError::failed(REGISTER_FAILED_MESSAGE))?;
        tracing::info!(student_id = %issued.student_id, "auth code issued");
        self.load().await?;
        Ok(issued_message(&issued.name))
    }

    /// # Errors
    ///
    /// Busy or API failure.
    pub async fn update(&self, update: &StudentUpdate) -> Result<(), ControllerError> {
        let _busy = self.saving.acquire()?;
        self.api.update_student(update).await?;
        tracing::info!(student_id = %update.find_by_student_id, "student updated");
        self.load().await.map(|_| ())
    }

    /// # Errors
    ///
    /// Busy or API failure.
    pub async fn delete(&self, student_id: &str) -> Result<(), ControllerError> {
        let _busy = self.saving.acquire()?;
        self.api.delete_student(student_id).await?;
        tracing::info!(%student_id, "student deleted");
        self.load().await.map(|_| ())
    }

    /// Stored class info, or blanks when none has been saved.
    ///
    /// # Errors
    ///
    /// API failure.
    pub async fn class_info(&self) -> Result<ClassInfo, ControllerError> {
        Ok(self.api.get_class_info().await?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Busy or API failure.
    pub async fn save_class_info(&self, info: &ClassInfo) -> Result<ClassInfo, ControllerError> {
        let _busy = self.saving.acquire()?;
        let saved = self.api.save_class_info(info).await?;
        Ok(saved.unwrap_or_else(|| info.clone()))
    }

    /// Fresh roster and class info rendered as printable HTML.
    ///
    /// # Errors
    ///
    /// API failure on either request.
    pub async fn roster_html(&self) -> Result<String, ControllerError> {
        let (students, info) = futures::join!(self.load(), self.class_info());
        Ok(forms::roster_html(&students?, &info?))
    }
}

#[cfg(test)]
#[path = "students_test.rs"]
mod tests;
