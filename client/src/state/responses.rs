//! Response grid page.
//!
//! The form and its responses load concurrently and are projected into a
//! [`ResponseGrid`]. Edits and deletes go straight to the server and are
//! followed by a full reload; the last writer wins.

use forms::{AnswerMap, ParsedForm, ResponseGrid, UpdateResponseParams};
use time::UtcOffset;

use super::{BusyFlag, ControllerError};
use crate::net::ApiClient;

pub use forms::grid::EMPTY_GRID_MESSAGE;

/// One loaded grid page.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsesView {
    /// `None` when the form no longer exists; the grid then has only the
    /// fixed columns.
    pub form: Option<ParsedForm>,
    pub grid: ResponseGrid,
}

impl ResponsesView {
    /// Print/PDF rendition titled after the form.
    #[must_use]
    pub fn print_html(&self) -> String {
        let title = self.form.as_ref().map_or("", |f| f.title.as_str());
        self.grid.to_print_html(title)
    }
}

pub struct ResponsesController {
    api: ApiClient,
    utc_offset: UtcOffset,
    saving: BusyFlag,
}

impl ResponsesController {
    #[must_use]
    pub fn new(api: ApiClient, utc_offset: UtcOffset) -> Self {
        Self { api, utc_offset, saving: BusyFlag::new() }
    }

    /// # Errors
    ///
    /// API failure on either request.
    pub async fn load(&self, form_id: &str) -> Result<ResponsesView, ControllerError> {
        let (form, responses) = futures::join!(self.api.get_form(form_id), self.api.get_responses(form_id));
        let form = form?.map(forms::Form::into_parsed);
        let responses = responses?;
        let grid = ResponseGrid::build(form.as_ref().and_then(|f| f.schema.as_ref()), &responses, self.utc_offset);
        tracing::debug!(%form_id, rows = grid.rows.len(), "responses loaded");
        Ok(ResponsesView { form, grid })
    }

    /// Replace one response's answers, then reload.
    ///
    /// # Errors
    ///
    /// Busy, or API failure on update or reload.
    pub async fn update(&self, form_id: &str, response_id: &str, answer_data: AnswerMap) -> Result<ResponsesView, ControllerError> {
        let _busy = self.saving.acquire()?;
        let params = UpdateResponseParams { response_id: response_id.to_owned(), answer_data };
        self.api.update_response(&params).await?;
        tracing::info!(%response_id, "response updated");
        self.load(form_id).await
    }

    /// Delete one response, then reload.
    ///
    /// # Errors
    ///
    /// Busy, or API failure on delete or reload.
    pub async fn delete(&self, form_id: &str, response_id: &str) -> Result<ResponsesView, ControllerError> {
        let _busy = self.saving.acquire()?;
        self.api.delete_response(response_id).await?;
        tracing::info!(%response_id, "response deleted");
        self.load(form_id).await
    }
}

#[cfg(test)]
#[path = "responses_test.rs"]
mod tests;
