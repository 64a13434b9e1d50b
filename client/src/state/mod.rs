//! Page controllers.
//!
//! DESIGN
//! ======
//! One controller per admin or respondent page. A controller owns an
//! [`ApiClient`] plus whatever page state must survive between calls, and
//! exposes async operations that mirror the page's buttons. The remote store
//! is the only source of truth: every mutation is followed by a full reload
//! and nothing is cached optimistically.
//!
//! SYSTEM CONTEXT
//! ==============
//! `cli` drives the same controllers the interactive pages would, so
//! validation and user-facing messages live here rather than in the caller.
//!
//! TRADE-OFFS
//! ==========
//! Re-entry is refused, not queued. While an operation is in flight its
//! [`BusyFlag`] is held and a second call returns [`ControllerError::Busy`]
//! without issuing a request. Dropping an in-flight future releases the flag
//! and its eventual result is never applied.
//!
//! ERROR HANDLING
//! ==============
//! Everything surfaces as [`ControllerError`]; [`ControllerError::message`]
//! is the string the page shows inline.

pub mod dashboard;
pub mod editor;
pub mod form_view;
pub mod registration;
pub mod responses;
pub mod sms;
pub mod students;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use forms::{DraftError, SmsError, SubmitError};

use crate::net::ApiError;

pub use dashboard::DashboardController;
pub use editor::EditorController;
pub use form_view::FormViewController;
pub use registration::{Registration, RegistrationController};
pub use responses::{ResponsesController, ResponsesView};
pub use sms::SmsController;
pub use students::StudentsController;

/// Shown when an operation is refused because another is still running.
pub const BUSY_MESSAGE: &str = "처리 중입니다. 잠시만 기다려 주세요.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControllerError {
    #[error("{BUSY_MESSAGE}")]
    Busy,
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Blocked locally before any request was sent.
    #[error("{0}")]
    Invalid(String),
    /// The request went through but produced nothing usable.
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Sms(#[from] SmsError),
}

impl ControllerError {
    /// User-facing text for inline display.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Api(e) => e.message(),
            Self::Submit(_) => forms::render::REQUIRED_MESSAGE.to_owned(),
            other => other.to_string(),
        }
    }

    pub(crate) fn invalid(message: &str) -> Self {
        Self::Invalid(message.to_owned())
    }

    pub(crate) fn failed(message: &str) -> Self {
        Self::Failed(message.to_owned())
    }
}

// =============================================================================
// BUSY GATING
// =============================================================================

/// In-flight marker for one operation kind (`saving`, `sending`, ...).
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Claim the flag for the lifetime of the returned guard.
    ///
    /// # Errors
    ///
    /// [`ControllerError::Busy`] if already held.
    pub fn acquire(&self) -> Result<BusyGuard, ControllerError> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ControllerError::Busy)?;
        Ok(BusyGuard(self.0.clone()))
    }
}

/// Releases its [`BusyFlag`] on drop.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Trimmed copy, or `None` when blank.
pub(crate) fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
