//! Raw input to canonical answers.
//!
//! Normalization runs once, when a survey is submitted. Each field's captured
//! value is coerced to the shape its type stores (a list for checkbox, a
//! single string otherwise) and the "Other" rewrite is applied: a selected
//! [`OTHER_OPTION`] with non-blank companion text becomes
//! `"기타 (<text>)"`. Companion keys are consumed here and never stored.

use std::collections::BTreeMap;

use crate::answer::{Answer, AnswerMap};
use crate::schema::{FieldType, FormFieldSchema, OTHER_OPTION};

/// A value as captured from an input control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    List(Vec<String>),
}

impl RawValue {
    /// Text content; lists are joined with `", "`.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(", "),
        }
    }

    /// List content; a non-empty scalar becomes a one-element list.
    #[must_use]
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Self::Text(s) if s.is_empty() => Vec::new(),
            Self::Text(s) => vec![s.clone()],
            Self::List(items) => items.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_owned).collect())
    }
}

/// Captured values keyed by field id or companion key.
pub type RawInput = BTreeMap<String, RawValue>;

/// The stored form of an "Other" answer with its companion text.
#[must_use]
pub fn other_with_text(text: &str) -> String {
    format!("{OTHER_OPTION} ({text})")
}

/// Normalize captured input for `fields` into an answer map.
///
/// Only schema field ids appear in the result; a field with no captured
/// value gets its type's empty value.
#[must_use]
pub fn normalize(fields: &[FormFieldSchema], raw: &RawInput) -> AnswerMap {
    fields.iter().map(|field| (field.id.clone(), normalize_field(field, raw))).collect()
}

fn normalize_field(field: &FormFieldSchema, raw: &RawInput) -> Answer {
    let value = raw.get(&field.id);
    let other_text = field
        .other_key()
        .and_then(|key| raw.get(&key))
        .map(|v| v.to_text().trim().to_owned())
        .filter(|text| !text.is_empty());

    match field.field_type {
        FieldType::Checkbox => {
            let mut items = value.map(RawValue::to_list).unwrap_or_default();
            if let Some(text) = &other_text {
                for item in items.iter_mut().filter(|item| item.as_str() == OTHER_OPTION) {
                    *item = other_with_text(text);
                }
            }
            Answer::Choices(items)
        }
        _ => {
            let text = value.map(RawValue::to_text).unwrap_or_default();
            match other_text {
                Some(other) if text == OTHER_OPTION => Answer::Text(other_with_text(&other)),
                _ => Answer::Text(text),
            }
        }
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
