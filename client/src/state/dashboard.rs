//! Admin dashboard: forms by folder, share links, non-responders.
//!
//! Forms and folders load concurrently. The folder filter is local state;
//! changing it does not refetch.

use std::sync::{Mutex, PoisonError};

use forms::{Folder, Form, Student};

use super::{BusyFlag, ControllerError};
use crate::config::ClientConfig;
use crate::net::ApiClient;

#[derive(Debug, Default, Clone)]
struct Listing {
    forms: Vec<Form>,
    folders: Vec<Folder>,
    folder_filter: Option<String>,
}

pub struct DashboardController {
    api: ApiClient,
    config: ClientConfig,
    listing: Mutex<Listing>,
    loading: BusyFlag,
}

impl DashboardController {
    #[must_use]
    pub fn new(api: ApiClient, config: &ClientConfig) -> Self {
        Self {
            api,
            config: config.clone(),
            listing: Mutex::new(Listing::default()),
            loading: BusyFlag::new(),
        }
    }

    fn with_listing<R>(&self, f: impl FnOnce(&mut Listing) -> R) -> R {
        f(&mut self.listing.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Fetch forms and folders together. Either failing fails the load and
    /// leaves the previous listing in place.
    ///
    /// # Errors
    ///
    /// Busy or API failure.
    pub async fn load(&self) -> Result<(), ControllerError> {
        let _busy = self.loading.acquire()?;
        let (forms, folders) = futures::join!(self.api.get_forms(None), self.api.get_folders());
        let (forms, folders) = (forms?, folders?);
        tracing::debug!(forms = forms.len(), folders = folders.len(), "dashboard loaded");
        self.with_listing(|l| {
            l.forms = forms;
            l.folders = folders;
        });
        Ok(())
    }

    #[must_use]
    pub fn folders(&self) -> Vec<Folder> {
        self.with_listing(|l| l.folders.clone())
    }

    /// `None` shows every form.
    pub fn select_folder(&self, folder_id: Option<&str>) {
        self.with_listing(|l| l.folder_filter = folder_id.filter(|id| !id.is_empty()).map(str::to_owned));
    }

    /// Forms in the selected folder, in server order.
    #[must_use]
    pub fn visible_forms(&self) -> Vec<Form> {
        self.with_listing(|l| match &l.folder_filter {
            Some(folder_id) => l.forms.iter().filter(|f| &f.folder_id == folder_id).cloned().collect(),
            None => l.forms.clone(),
        })
    }

    /// Respondent URL for a form.
    #[must_use]
    pub fn share_link(&self, form_id: &str) -> String {
        self.config.share_link(form_id)
    }

    /// # Errors
    ///
    /// API failure.
    pub async fn non_responders(&self, form_id: &str) -> Result<Vec<Student>, ControllerError> {
        Ok(self.api.get_non_responders(form_id).await?)
    }

    /// Delete a form, then reload the listing.
    ///
    /// # Errors
    ///
    /// API failure on delete or reload.
    pub async fn delete_form(&self, form_id: &str) -> Result<(), ControllerError> {
        self.api.delete_form(form_id).await?;
        tracing::info!(%form_id, "form deleted");
        self.load().await
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
