//! Headless form renderer.
//!
//! DESIGN
//! ======
//! [`render`] turns a document type and schema into a [`RenderPlan`]: the
//! controls to draw and the labels around them. [`SurveyForm`] holds the
//! values a respondent has entered against that plan, validates required
//! fields, and produces the normalized [`AnswerMap`] on submit. Neither
//! performs I/O; a UI or the CLI drives them and sends the result.
//!
//! TRADE-OFFS
//! ==========
//! Unknown field types render as a plain text input rather than failing, so
//! a schema from a newer builder stays answerable.

use crate::answer::{Answer, AnswerMap};
use crate::html;
use crate::normalize::{RawInput, RawValue, normalize};
use crate::schema::{FieldType, FormFieldSchema, FormSchema, FormType};

/// Shown in place of a survey that has no fields.
pub const EMPTY_SURVEY_MESSAGE: &str = "설문 항목이 없습니다.";
/// Field-level message for a missing required answer.
pub const REQUIRED_MESSAGE: &str = "필수 항목입니다.";
pub const SUBMIT_LABEL: &str = "제출하기";
pub const CONFIRM_LABEL: &str = "확인했어요";

/// Rows of a multi-line text control.
pub const TEXTAREA_ROWS: u8 = 4;

// =============================================================================
// PLAN
// =============================================================================

/// Input control for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Single-line input; `input_type` is `text`, `number` or `date`.
    Input { input_type: &'static str },
    TextArea { rows: u8 },
    RadioGroup { options: Vec<String> },
    CheckboxGroup { options: Vec<String> },
}

/// A labelled control in a survey plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldControl {
    pub field_id: String,
    pub label: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub control: Control,
    /// Companion free-text key when the field offers "기타".
    pub other_key: Option<String>,
}

impl FieldControl {
    #[must_use]
    pub fn for_field(field: &FormFieldSchema) -> Self {
        let control = match &field.field_type {
            FieldType::Text => Control::Input { input_type: "text" },
            FieldType::Number => Control::Input { input_type: "number" },
            FieldType::Date => Control::Input { input_type: "date" },
            FieldType::Textarea => Control::TextArea { rows: TEXTAREA_ROWS },
            FieldType::Radio => Control::RadioGroup { options: field.options().to_vec() },
            FieldType::Checkbox => Control::CheckboxGroup { options: field.options().to_vec() },
            FieldType::Unknown(_) => Control::Input { input_type: "text" },
        };
        Self {
            field_id: field.id.clone(),
            label: field.label.clone(),
            required: field.required,
            placeholder: field.placeholder.clone(),
            control,
            other_key: field.other_key(),
        }
    }
}

/// Notice body, classified once so the UI never guesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeBody {
    /// Markup authored by the teacher; trusted as-is.
    Html(String),
    /// Plain text.
    Text(String),
}

impl NoticeBody {
    #[must_use]
    pub fn classify(body: &str) -> Self {
        if html::looks_like_html(body) { Self::Html(body.to_owned()) } else { Self::Text(body.to_owned()) }
    }

    /// Markup ready for insertion into a page.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Html(markup) => markup.clone(),
            Self::Text(text) => html::text_to_html(text),
        }
    }
}

/// What to show for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPlan {
    /// Title, optional body and a single confirm action.
    Notice { title: String, body: Option<NoticeBody> },
    /// Survey controls in schema order.
    Survey(Vec<FieldControl>),
    /// A survey with nothing to answer.
    Empty,
}

impl RenderPlan {
    /// Label of the primary action, if any.
    #[must_use]
    pub fn action_label(&self) -> Option<&'static str> {
        match self {
            Self::Notice { .. } => Some(CONFIRM_LABEL),
            Self::Survey(_) => Some(SUBMIT_LABEL),
            Self::Empty => None,
        }
    }

    /// Neutral message for plans without controls.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        matches!(self, Self::Empty).then_some(EMPTY_SURVEY_MESSAGE)
    }
}

/// Build the render plan for a document.
///
/// A notice ignores fields. A survey with no schema or no fields yields
/// [`RenderPlan::Empty`].
#[must_use]
pub fn render(form_type: FormType, schema: Option<&FormSchema>, title: &str, body: Option<&str>) -> RenderPlan {
    match form_type {
        FormType::Notice => RenderPlan::Notice {
            title: title.to_owned(),
            body: body.filter(|b| !b.trim().is_empty()).map(NoticeBody::classify),
        },
        FormType::Survey => match schema {
            Some(schema) if !schema.fields.is_empty() => {
                RenderPlan::Survey(schema.fields.iter().map(FieldControl::for_field).collect())
            }
            _ => RenderPlan::Empty,
        },
    }
}

// =============================================================================
// FORM STATE
// =============================================================================

/// Rejected input operation on a [`SurveyForm`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("field {field_id} has no option {option:?}")]
    UnknownOption { field_id: String, option: String },
    #[error("field {field_id} is not a {expected} field")]
    WrongControl { field_id: String, expected: &'static str },
    #[error("field {0} does not offer an other option")]
    NoOtherOption(String),
}

/// A validation message attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field_id: String,
    pub message: String,
}

/// Submission blocked by client-side validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("{} required field(s) missing", .0.len())]
    Invalid(Vec<FieldError>),
}

impl SubmitError {
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Invalid(errors) => errors,
        }
    }
}

/// Values entered against a survey, plus validation state.
#[derive(Debug, Clone)]
pub struct SurveyForm {
    fields: Vec<FormFieldSchema>,
    values: RawInput,
    errors: Vec<FieldError>,
    submitted: Option<AnswerMap>,
}

impl SurveyForm {
    /// Seed defaults: checkbox `[]`, everything else `""`, and `""` for each
    /// "기타" companion.
    #[must_use]
    pub fn new(schema: &FormSchema) -> Self {
        let mut values = RawInput::new();
        for field in &schema.fields {
            let default = match field.field_type {
                FieldType::Checkbox => RawValue::List(Vec::new()),
                _ => RawValue::Text(String::new()),
            };
            values.insert(field.id.clone(), default);
            if let Some(key) = field.other_key() {
                values.insert(key, RawValue::Text(String::new()));
            }
        }
        Self { fields: schema.fields.clone(), values, errors: Vec::new(), submitted: None }
    }

    #[must_use]
    pub fn fields(&self) -> &[FormFieldSchema] {
        &self.fields
    }

    /// Everything captured so far, companions included.
    #[must_use]
    pub fn raw(&self) -> &RawInput {
        &self.values
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<&RawValue> {
        self.values.get(key)
    }

    fn field(&self, field_id: &str) -> Result<&FormFieldSchema, InputError> {
        self.fields.iter().find(|f| f.id == field_id).ok_or_else(|| InputError::UnknownField(field_id.to_owned()))
    }

    fn put(&mut self, key: String, value: RawValue, field_id: &str) {
        self.values.insert(key, value);
        self.errors.retain(|e| e.field_id != field_id);
    }

    /// Set the value of a free-text control (text, textarea, number, date,
    /// unknown types).
    ///
    /// # Errors
    ///
    /// Unknown field, or a radio/checkbox field.
    pub fn set_text(&mut self, field_id: &str, value: impl Into<String>) -> Result<(), InputError> {
        let field = self.field(field_id)?;
        if field.field_type.has_options() {
            return Err(InputError::WrongControl { field_id: field_id.to_owned(), expected: "text" });
        }
        self.put(field_id.to_owned(), RawValue::Text(value.into()), field_id);
        Ok(())
    }

    /// Choose one option of a radio field.
    ///
    /// # Errors
    ///
    /// Unknown field, non-radio field, or an option the field does not offer.
    pub fn select(&mut self, field_id: &str, option: &str) -> Result<(), InputError> {
        let field = self.field(field_id)?;
        if field.field_type != FieldType::Radio {
            return Err(InputError::WrongControl { field_id: field_id.to_owned(), expected: "radio" });
        }
        if !field.options().iter().any(|o| o == option) {
            return Err(InputError::UnknownOption { field_id: field_id.to_owned(), option: option.to_owned() });
        }
        self.put(field_id.to_owned(), RawValue::Text(option.to_owned()), field_id);
        Ok(())
    }

    /// Flip one checkbox option. The selection stays in option order.
    ///
    /// # Errors
    ///
    /// Unknown field, non-checkbox field, or an option the field does not
    /// offer.
    pub fn toggle(&mut self, field_id: &str, option: &str) -> Result<(), InputError> {
        let field = self.field(field_id)?;
        if field.field_type != FieldType::Checkbox {
            return Err(InputError::WrongControl { field_id: field_id.to_owned(), expected: "checkbox" });
        }
        let options = field.options().to_vec();
        if !options.iter().any(|o| o == option) {
            return Err(InputError::UnknownOption { field_id: field_id.to_owned(), option: option.to_owned() });
        }
        let mut selected = self.values.get(field_id).map(RawValue::to_list).unwrap_or_default();
        if let Some(pos) = selected.iter().position(|s| s == option) {
            selected.remove(pos);
        } else {
            selected.push(option.to_owned());
        }
        selected.sort_by_key(|s| options.iter().position(|o| o == s).unwrap_or(usize::MAX));
        self.put(field_id.to_owned(), RawValue::List(selected), field_id);
        Ok(())
    }

    /// Set the companion text of a field offering "기타".
    ///
    /// # Errors
    ///
    /// Unknown field, or a field without the other option.
    pub fn set_other(&mut self, field_id: &str, text: impl Into<String>) -> Result<(), InputError> {
        let key = self.field(field_id)?.other_key().ok_or_else(|| InputError::NoOtherOption(field_id.to_owned()))?;
        self.put(key, RawValue::Text(text.into()), field_id);
        Ok(())
    }

    /// Required-field errors for the current values, in field order.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let answers = normalize(&self.fields, &self.values);
        self.fields
            .iter()
            .filter(|f| f.required && answers.get(&f.id).is_none_or(Answer::is_blank))
            .map(|f| FieldError { field_id: f.id.clone(), message: REQUIRED_MESSAGE.to_owned() })
            .collect()
    }

    /// Errors from the last submit attempt.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message to show next to a field's control, if any.
    #[must_use]
    pub fn error_for(&self, field_id: &str) -> Option<&str> {
        self.errors.iter().find(|e| e.field_id == field_id).map(|e| e.message.as_str())
    }

    /// Validate and normalize.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Invalid`] when a required field is blank; nothing is
    /// recorded as submitted.
    pub fn submit(&mut self) -> Result<AnswerMap, SubmitError> {
        self.errors = self.validate();
        if !self.errors.is_empty() {
            return Err(SubmitError::Invalid(self.errors.clone()));
        }
        let answers = normalize(&self.fields, &self.values);
        self.submitted = Some(answers.clone());
        Ok(answers)
    }

    /// Validate, then hand the answers to `on_submit`. The callback only runs
    /// when validation passes.
    ///
    /// # Errors
    ///
    /// Same as [`SurveyForm::submit`].
    pub fn submit_with<R>(&mut self, on_submit: impl FnOnce(AnswerMap) -> R) -> Result<R, SubmitError> {
        self.submit().map(on_submit)
    }

    /// Answers of the last successful submit.
    #[must_use]
    pub fn submitted(&self) -> Option<&AnswerMap> {
        self.submitted.as_ref()
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
