//! Submitted answer values.
//!
//! DESIGN
//! ======
//! Stored answer data is a JSON object keyed by field id whose value shape
//! depends on the field type. [`Answer`] names each shape so the grid and
//! the editors match on it instead of probing JSON at runtime. Values of any
//! other shape survive as [`Answer::Raw`] and re-serialize unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key used by the notice confirmation answer.
pub const CHECKED_KEY: &str = "checked";

/// One field's stored answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Single value: text, textarea, number, date, radio and unknown types.
    Text(String),
    /// Selected checkbox options in option order.
    Choices(Vec<String>),
    /// Notice confirmation.
    Checked(bool),
    /// Anything else found in stored data.
    Raw(Value),
}

impl Answer {
    /// Whether the answer counts as "not filled in" for required checks.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Choices(items) => items.is_empty(),
            Self::Checked(_) => false,
            Self::Raw(v) => v.is_null(),
        }
    }

    /// Cell text for display and export. Lists are joined with `", "`.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Choices(items) => items.join(", "),
            Self::Checked(b) => b.to_string(),
            Self::Raw(Value::Null) => String::new(),
            Self::Raw(Value::Array(items)) => items.iter().map(crate::de::scalar_to_string).collect::<Vec<_>>().join(", "),
            Self::Raw(other) => crate::de::scalar_to_string(other),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for Answer {
    fn from(value: Vec<String>) -> Self {
        Self::Choices(value)
    }
}

/// Field id to answer. Serializes as a JSON object.
pub type AnswerMap = BTreeMap<String, Answer>;

/// The fixed answer submitted when a notice is acknowledged.
#[must_use]
pub fn notice_confirmation() -> AnswerMap {
    AnswerMap::from([(CHECKED_KEY.to_owned(), Answer::Checked(true))])
}

/// Parse a stored `answer_data` string.
///
/// Malformed JSON or a non-object value yields an empty map so one bad row
/// never blocks the rest of a listing.
#[must_use]
pub fn parse_answer_data(raw: &str) -> AnswerMap {
    let raw = raw.trim();
    if raw.is_empty() {
        return AnswerMap::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| (key, serde_json::from_value(value).unwrap_or(Answer::Raw(Value::Null))))
            .collect(),
        Ok(_) | Err(_) => {
            tracing::warn!(len = raw.len(), "answer data is not a JSON object; treating as empty");
            AnswerMap::new()
        }
    }
}

#[cfg(test)]
#[path = "answer_test.rs"]
mod tests;
