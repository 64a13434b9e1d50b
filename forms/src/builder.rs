//! Form builder state.
//!
//! DESIGN
//! ======
//! [`FormDraft`] is the editable state behind the create and edit screens:
//! title, document type, folder, description and an ordered field list.
//! Every editing action is a method; nothing here talks to the network.
//! [`FormDraft::create_params`] and [`FormDraft::update_params`] produce the
//! payloads the API client sends.
//!
//! TRADE-OFFS
//! ==========
//! Saving serializes only the active type's content. A notice saves no
//! fields even if the draft still holds some from an earlier survey toggle,
//! and those fields are lost once saved.
//!
//! ERROR HANDLING
//! ==============
//! Only a blank title blocks saving. Option well-formedness is reported by
//! [`FormDraft::advisories`] and never blocks.

use rand::Rng;

use crate::records::{CreateFormParams, UpdateFormParams};
use crate::schema::{FieldType, FormFieldSchema, FormSchema, FormType, OTHER_OPTION, ParsedForm};

const FIELD_ID_PREFIX: &str = "f_";
const FIELD_ID_LEN: usize = 8;

/// Label of the `n`th default option (1-based).
#[must_use]
pub fn default_option_label(n: usize) -> String {
    format!("선택지 {n}")
}

/// Fresh `f_` + 8 lowercase base36 characters.
#[must_use]
pub fn generate_field_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..FIELD_ID_LEN)
        .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
        .collect();
    format!("{FIELD_ID_PREFIX}{suffix}")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("제목을 입력해 주세요.")]
    TitleRequired,
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("field {field_id} has no option at index {index}")]
    OptionOutOfRange { field_id: String, index: usize },
}

/// Label, required flag and placeholder changes for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub required: Option<bool>,
    /// `Some(None)` clears the placeholder.
    pub placeholder: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Non-blocking warning about a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    EmptyLabel { field_id: String },
    /// More than one field carries this id; answers would overwrite each other.
    DuplicateId { field_id: String },
    NoOptions { field_id: String },
    BlankOption { field_id: String, index: usize },
}

/// Editable form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    /// Set when editing an existing form.
    pub form_id: Option<String>,
    pub title: String,
    pub form_type: FormType,
    /// Empty means "no folder".
    pub folder_id: String,
    pub description: String,
    fields: Vec<FormFieldSchema>,
}

impl FormDraft {
    #[must_use]
    pub fn new(form_type: FormType) -> Self {
        Self { form_type, ..Self::default() }
    }

    /// Load an existing form for editing.
    #[must_use]
    pub fn from_form(form: &ParsedForm) -> Self {
        Self {
            form_id: Some(form.form_id.clone()),
            title: form.title.clone(),
            form_type: form.form_type,
            folder_id: form.folder_id.clone(),
            description: form.body().unwrap_or_default().to_owned(),
            fields: form.fields().to_vec(),
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[FormFieldSchema] {
        &self.fields
    }

    fn field_mut(&mut self, field_id: &str) -> Result<&mut FormFieldSchema, DraftError> {
        self.fields
            .iter_mut()
            .find(|f| f.id == field_id)
            .ok_or_else(|| DraftError::UnknownField(field_id.to_owned()))
    }

    /// Replace every field, e.g. with a schema authored elsewhere. Ids are
    /// kept as given; duplicates surface through [`FormDraft::advisories`].
    pub fn replace_fields(&mut self, fields: Vec<FormFieldSchema>) {
        self.fields = fields;
    }

    /// Append a blank text field and return its id.
    pub fn add_field(&mut self) -> String {
        let mut id = generate_field_id();
        while self.fields.iter().any(|f| f.id == id) {
            id = generate_field_id();
        }
        self.fields.push(FormFieldSchema::new(id.clone(), FieldType::Text, ""));
        id
    }

    /// Delete a field. Its id is never reused.
    ///
    /// # Errors
    ///
    /// [`DraftError::UnknownField`].
    pub fn remove_field(&mut self, field_id: &str) -> Result<(), DraftError> {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != field_id);
        if self.fields.len() == before {
            return Err(DraftError::UnknownField(field_id.to_owned()));
        }
        Ok(())
    }

    /// Apply a label/required/placeholder patch.
    ///
    /// # Errors
    ///
    /// [`DraftError::UnknownField`].
    pub fn update_field(&mut self, field_id: &str, patch: FieldPatch) -> Result<(), DraftError> {
        let field = self.field_mut(field_id)?;
        if let Some(label) = patch.label {
            field.label = label;
        }
        if let Some(required) = patch.required {
            field.required = required;
        }
        if let Some(placeholder) = patch.placeholder {
            field.placeholder = placeholder;
        }
        Ok(())
    }

    /// Change a field's type. Switching to radio or checkbox seeds
    /// `"선택지 1"` when the field has no options; existing options carry
    /// over between the two.
    ///
    /// # Errors
    ///
    /// [`DraftError::UnknownField`].
    pub fn set_field_type(&mut self, field_id: &str, field_type: FieldType) -> Result<(), DraftError> {
        let field = self.field_mut(field_id)?;
        if field_type.has_options() && field.options().is_empty() {
            field.options = Some(vec![default_option_label(1)]);
        }
        field.field_type = field_type;
        Ok(())
    }

    /// Append an option, defaulting to `"선택지 N"` for the new length N.
    ///
    /// # Errors
    ///
    /// [`DraftError::UnknownField`].
    pub fn add_option(&mut self, field_id: &str, label: Option<&str>) -> Result<(), DraftError> {
        let field = self.field_mut(field_id)?;
        let options = field.options.get_or_insert_with(Vec::new);
        let label = label.map_or_else(|| default_option_label(options.len() + 1), str::to_owned);
        options.push(label);
        Ok(())
    }

    /// Whether the "+ 기타" action is still available for a field.
    #[must_use]
    pub fn can_add_other(&self, field_id: &str) -> bool {
        self.fields.iter().find(|f| f.id == field_id).is_some_and(|f| !f.has_other_option())
    }

    /// Append [`OTHER_OPTION`] unless already present. Returns whether it
    /// was added.
    ///
    /// # Errors
    ///
    /// [`DraftError::UnknownField`].
    pub fn add_other_option(&mut self, field_id: &str) -> Result<bool, DraftError> {
        if self.field_mut(field_id)?.has_other_option() {
            return Ok(false);
        }
        self.add_option(field_id, Some(OTHER_OPTION))?;
        Ok(true)
    }

    /// Replace the option at `index`.
    ///
    /// # Errors
    ///
    /// Unknown field or index out of range.
    pub fn update_option(&mut self, field_id: &str, index: usize, value: impl Into<String>) -> Result<(), DraftError> {
        let field = self.field_mut(field_id)?;
        let slot = field
            .options
            .as_mut()
            .and_then(|options| options.get_mut(index))
            .ok_or_else(|| DraftError::OptionOutOfRange { field_id: field_id.to_owned(), index })?;
        *slot = value.into();
        Ok(())
    }

    /// Remove the option at `index`; the rest keep their order.
    ///
    /// # Errors
    ///
    /// Unknown field or index out of range.
    pub fn remove_option(&mut self, field_id: &str, index: usize) -> Result<String, DraftError> {
        let field = self.field_mut(field_id)?;
        match field.options.as_mut() {
            Some(options) if index < options.len() => Ok(options.remove(index)),
            _ => Err(DraftError::OptionOutOfRange { field_id: field_id.to_owned(), index }),
        }
    }

    /// Swap a field with its neighbour. Moving past either end is a no-op.
    ///
    /// # Errors
    ///
    /// [`DraftError::UnknownField`].
    pub fn move_field(&mut self, field_id: &str, direction: Direction) -> Result<(), DraftError> {
        let index = self
            .fields
            .iter()
            .position(|f| f.id == field_id)
            .ok_or_else(|| DraftError::UnknownField(field_id.to_owned()))?;
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|t| *t < self.fields.len()),
        };
        if let Some(target) = target {
            self.fields.swap(index, target);
        }
        Ok(())
    }

    /// Blocking checks before save.
    ///
    /// # Errors
    ///
    /// [`DraftError::TitleRequired`] when the title is blank.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::TitleRequired);
        }
        Ok(())
    }

    /// Warnings shown beside fields. Never blocks save.
    #[must_use]
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut out: Vec<Advisory> = FormSchema::survey(self.fields.clone(), None)
            .duplicate_field_ids()
            .into_iter()
            .map(|id| Advisory::DuplicateId { field_id: id.to_owned() })
            .collect();
        for field in &self.fields {
            if field.label.trim().is_empty() {
                out.push(Advisory::EmptyLabel { field_id: field.id.clone() });
            }
            if field.field_type.has_options() {
                if field.options().is_empty() {
                    out.push(Advisory::NoOptions { field_id: field.id.clone() });
                }
                for (index, option) in field.options().iter().enumerate() {
                    if option.trim().is_empty() {
                        out.push(Advisory::BlankOption { field_id: field.id.clone(), index });
                    }
                }
            }
        }
        out
    }

    /// The schema persisted for the current type.
    ///
    /// Notices drop fields. Surveys keep them, with option lists stripped
    /// from types that do not use them. The body is the trimmed description,
    /// absent when blank.
    #[must_use]
    pub fn to_schema(&self) -> FormSchema {
        let description = self.description.trim();
        let body = (!description.is_empty()).then(|| description.to_owned());
        match self.form_type {
            FormType::Notice => FormSchema::notice(body),
            FormType::Survey => {
                let fields = self
                    .fields
                    .iter()
                    .cloned()
                    .map(|mut f| {
                        if !f.field_type.has_options() {
                            f.options = None;
                        }
                        f
                    })
                    .collect();
                FormSchema::survey(fields, body)
            }
        }
    }

    fn folder(&self) -> Option<String> {
        let folder = self.folder_id.trim();
        (!folder.is_empty()).then(|| folder.to_owned())
    }

    /// Payload for `CREATE_FORM`.
    ///
    /// # Errors
    ///
    /// [`DraftError::TitleRequired`].
    pub fn create_params(&self) -> Result<CreateFormParams, DraftError> {
        self.validate()?;
        Ok(CreateFormParams {
            folder_id: self.folder(),
            title: self.title.trim().to_owned(),
            form_type: self.form_type,
            schema: self.to_schema(),
        })
    }

    /// Payload for `UPDATE_FORM`. `form_id` is the edited form's id.
    ///
    /// # Errors
    ///
    /// [`DraftError::TitleRequired`].
    pub fn update_params(&self, form_id: &str) -> Result<UpdateFormParams, DraftError> {
        self.validate()?;
        Ok(UpdateFormParams {
            form_id: form_id.to_owned(),
            title: self.title.trim().to_owned(),
            form_type: self.form_type,
            folder_id: self.folder(),
            schema: self.to_schema(),
        })
    }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod tests;
