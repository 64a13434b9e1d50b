//! Form schema model.
//!
//! DESIGN
//! ======
//! A form stores its schema as a JSON string column. [`parse_schema`] is the
//! only way back to a typed [`FormSchema`] and it never fails loudly: any
//! malformed or empty string yields `None`, which the renderer treats as
//! "nothing to render".
//!
//! The option literal [`OTHER_OPTION`] is special. When a radio or checkbox
//! field offers it, the field gains a companion free-text input keyed
//! `"{id}_other"` (see [`other_key`]).

use serde::{Deserialize, Serialize};

use crate::de;

/// The "Other" option literal that activates a companion text input.
pub const OTHER_OPTION: &str = "기타";

/// Suffix appended to a field id to key its companion text input.
pub const OTHER_SUFFIX: &str = "_other";

/// Key of the companion free-text input for `field_id`.
#[must_use]
pub fn other_key(field_id: &str) -> String {
    format!("{field_id}{OTHER_SUFFIX}")
}

// =============================================================================
// FIELD TYPE
// =============================================================================

/// Input type of a single form field.
///
/// Unrecognized type strings are preserved in [`FieldType::Unknown`] so a
/// schema written by a newer builder round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Radio,
    Checkbox,
    Unknown(String),
}

impl FieldType {
    /// Every type the builder offers, in menu order.
    pub const BUILTIN: [FieldType; 6] =
        [Self::Text, Self::Textarea, Self::Number, Self::Date, Self::Radio, Self::Checkbox];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Date => "date",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether fields of this type carry an option list.
    #[must_use]
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox)
    }

    /// Builder menu label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Text => "한 줄 텍스트",
            Self::Textarea => "여러 줄 텍스트",
            Self::Number => "숫자",
            Self::Date => "날짜",
            Self::Radio => "객관식(라디오)",
            Self::Checkbox => "체크박스",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "text" => Self::Text,
            "textarea" => Self::Textarea,
            "number" => Self::Number,
            "date" => Self::Date,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Unknown(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SCHEMA
// =============================================================================

/// One question in a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFieldSchema {
    /// Unique within its schema and stable across edits.
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    /// Present (and non-empty) only for radio and checkbox fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FormFieldSchema {
    /// A blank field of the given type. Option-bearing types are seeded with
    /// no options; callers decide what to seed.
    #[must_use]
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self { id: id.into(), field_type, label: label.into(), required: false, options: None, placeholder: None }
    }

    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Options in display order; empty when the field has none.
    #[must_use]
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Whether the field offers the [`OTHER_OPTION`] literal.
    #[must_use]
    pub fn has_other_option(&self) -> bool {
        self.options().iter().any(|o| o == OTHER_OPTION)
    }

    /// Companion input key, present only when the field offers "Other".
    #[must_use]
    pub fn other_key(&self) -> Option<String> {
        self.has_other_option().then(|| other_key(&self.id))
    }
}

/// Ordered field definitions plus optional body text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Display order is list order.
    #[serde(default)]
    pub fields: Vec<FormFieldSchema>,
    /// Notice announcement, or introductory text for a survey.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl FormSchema {
    #[must_use]
    pub fn notice(body: Option<String>) -> Self {
        Self { fields: Vec::new(), body }
    }

    #[must_use]
    pub fn survey(fields: Vec<FormFieldSchema>, body: Option<String>) -> Self {
        Self { fields, body }
    }

    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FormFieldSchema> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Field ids that appear more than once, in first-seen order.
    #[must_use]
    pub fn duplicate_field_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dupes: Vec<&str> = Vec::new();
        for field in &self.fields {
            if !seen.insert(field.id.as_str()) && !dupes.contains(&field.id.as_str()) {
                dupes.push(&field.id);
            }
        }
        dupes
    }

    /// Serialize to the string form persisted in the form's schema column.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        // Serializing plain strings, bools and vecs cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Parse a persisted schema string.
///
/// Returns `None` for empty input, `null`, malformed JSON, or JSON of the
/// wrong shape. Never panics.
#[must_use]
pub fn parse_schema(raw: &str) -> Option<FormSchema> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    serde_json::from_str::<Option<FormSchema>>(raw).ok().flatten()
}

// =============================================================================
// FORM
// =============================================================================

/// Document kind. Unknown strings read as [`FormType::Notice`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    Survey,
    #[default]
    #[serde(other)]
    Notice,
}

impl FormType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Survey => "survey",
            Self::Notice => "notice",
        }
    }

    /// Parse a user-supplied type name; `None` for anything else.
    #[must_use]
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "survey" => Some(Self::Survey),
            "notice" => Some(Self::Notice),
            _ => None,
        }
    }
}

impl std::fmt::Display for FormType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A form row as stored by the remote API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    #[serde(default, deserialize_with = "de::string_like")]
    pub form_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub folder_id: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub title: String,
    #[serde(rename = "type", default)]
    pub form_type: FormType,
    /// Serialized [`FormSchema`]; see [`parse_schema`].
    #[serde(default, deserialize_with = "de::json_string")]
    pub schema: String,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::string_like")]
    pub created_at: String,
}

impl Form {
    #[must_use]
    pub fn parsed_schema(&self) -> Option<FormSchema> {
        parse_schema(&self.schema)
    }

    /// Replace the schema string with its parsed form.
    #[must_use]
    pub fn into_parsed(self) -> ParsedForm {
        let schema = parse_schema(&self.schema);
        ParsedForm {
            form_id: self.form_id,
            folder_id: self.folder_id,
            title: self.title,
            form_type: self.form_type,
            schema,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

/// A [`Form`] whose schema has been parsed. `schema` is `None` when the stored
/// string was empty or malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedForm {
    pub form_id: String,
    pub folder_id: String,
    pub title: String,
    pub form_type: FormType,
    pub schema: Option<FormSchema>,
    pub is_active: bool,
    pub created_at: String,
}

impl ParsedForm {
    /// Fields in display order; empty when there is no schema.
    #[must_use]
    pub fn fields(&self) -> &[FormFieldSchema] {
        self.schema.as_ref().map(|s| s.fields.as_slice()).unwrap_or_default()
    }

    /// Body text from the schema, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.schema.as_ref().and_then(|s| s.body.as_deref())
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
