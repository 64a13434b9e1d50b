//! SMS page: choose recipients from the roster and send one message.
//!
//! `{name}` in the message is substituted by the server per receiver. The
//! controller only filters receivers and checks the message is non-blank.

use std::sync::{Mutex, PoisonError};

use forms::sms::{self, RecipientType};
use forms::{SmsReceipt, SmsReceiver, Student};

use super::{BusyFlag, ControllerError};
use crate::net::ApiClient;


/// Confirmation after a send request to `count` receivers.
#[must_use]
pub fn sent_message(count: usize) -> String {
    format!("{count}명에게 발송 요청이 완료되었습니다.")
}

pub struct SmsController {
    api: ApiClient,
    students: Mutex<Vec<Student>>,
    sending: BusyFlag,
}

impl SmsController {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, students: Mutex::new(Vec::new()), sending: BusyFlag::new() }
    }

    /// # Errors
    ///
    /// API failure.
    pub async fn load(&self) -> Result<usize, ControllerError> {
        let students = self.api.get_students().await?;
        let count = students.len();
        *self.students.lock().unwrap_or_else(PoisonError::into_inner) = students;
        Ok(count)
    }

    /// Receivers for `recipient_type` plus how many students lack a number.
    #[must_use]
    pub fn receivers(&self, recipient_type: RecipientType) -> (Vec<SmsReceiver>, usize) {
        sms::receivers(&self.students.lock().unwrap_or_else(PoisonError::into_inner), recipient_type)
    }

    /// # Errors
    ///
    /// No receivers or blank message (nothing is sent), busy, or API failure.
    pub async fn send(&self, recipient_type: RecipientType, message: &str) -> Result<(String, Option<SmsReceipt>), ControllerError> {
        let (receivers, skipped) = self.receivers(recipient_type);
        let params = sms::build_request(receivers, message)?;
        let _busy = self.sending.acquire()?;
        let count = params.receivers.len();
        let receipt = self.api.send_sms(&params).await?;
        tracing::info!(receivers = count, skipped, ?recipient_type, "sms send requested");
        Ok((sent_message(count), receipt))
    }
}

#[cfg(test)]
#[path = "sms_test.rs"]
mod tests;
