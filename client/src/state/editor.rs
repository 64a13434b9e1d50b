//! Form builder page: load a form into a draft and save it back.

use forms::{CreatedFolder, FormDraft, FormType};

use super::{BusyFlag, ControllerError, non_blank};
use crate::net::ApiClient;

pub const NOT_FOUND_MESSAGE: &str = "폼을 찾을 수 없습니다.";
pub const SAVE_FAILED_MESSAGE: &str = "저장에 실패했습니다.";
pub const FOLDER_NAME_REQUIRED_MESSAGE: &str = "폴더 이름을 입력해 주세요.";

pub struct EditorController {
    api: ApiClient,
    saving: BusyFlag,
}

impl EditorController {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, saving: BusyFlag::new() }
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving.is_busy()
    }

    /// Blank draft for a new form.
    #[must_use]
    pub fn create(form_type: FormType) -> FormDraft {
        FormDraft::new(form_type)
    }

    /// # Errors
    ///
    /// API failure or an unknown form id.
    pub async fn load(&self, form_id: &str) -> Result<FormDraft, ControllerError> {
        let form = self.api.get_form(form_id).await?.ok_or_else(|| ControllerError::failed(NOT_FOUND_MESSAGE))?;
        Ok(FormDraft::from_form(&form.into_parsed()))
    }

    /// Create or update depending on whether the draft has a form id, and
    /// return the saved form's id. A newly created id is written back into
    /// the draft so the next save updates instead of creating again.
    ///
    /// # Errors
    ///
    /// Blank title (nothing is sent), busy, or API failure.
    pub async fn save(&self, draft: &mut FormDraft) -> Result<String, ControllerError> {
        let _busy = self.saving.acquire()?;
        for advisory in draft.advisories() {
            tracing::debug!(?advisory, "saving draft with advisory");
        }

        if let Some(form_id) = draft.form_id.clone() {
            let params = draft.update_params(&form_id)?;
            self.api.update_form(&params).await?;
            tracing::info!(%form_id, "form updated");
            return Ok(form_id);
        }

        let params = draft.create_params()?;
        let created = self.api.create_form(&params).await?;
        let form_id = created
            .map(|c| c.form_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ControllerError::failed(SAVE_FAILED_MESSAGE))?;
        tracing::info!(%form_id, form_type = %draft.form_type, "form created");
        draft.form_id = Some(form_id.clone());
        Ok(form_id)
    }

    /// # Errors
    ///
    /// Blank name (nothing is sent) or API failure.
    pub async fn create_folder(&self, name: &str) -> Result<CreatedFolder, ControllerError> {
        let name = non_blank(name).ok_or_else(|| ControllerError::invalid(FOLDER_NAME_REQUIRED_MESSAGE))?;
        self.api
            .create_folder(&name)
            .await?
            .ok_or_else(|| ControllerError::failed(SAVE_FAILED_MESSAGE))
    }
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;
