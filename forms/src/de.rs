//! Lenient deserializers for spreadsheet-backed payloads.
//!
//! Cells read back from the sheet are not reliably typed: a student id column
//! may come back as the number `10101`, an empty cell as `null`, a checkbox
//! column as `"TRUE"`, and a JSON column either as a string or already
//! expanded into an object. These helpers fold those variants into the single
//! Rust type each field declares.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Read any scalar as text. `null` and a missing value become `""`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at this position.
pub fn string_like<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map_or_else(String::new, |v| scalar_to_string(&v)))
}

/// Like [`string_like`] but keeps `null`/missing as `None`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at this position.
pub fn opt_string_like<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Null => None,
        other => Some(scalar_to_string(&other)),
    }))
}

/// Read a JSON column that may arrive either as its serialized string or as
/// the already-decoded value. Decoded values are re-serialized so callers
/// always parse from a string.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at this position.
pub fn json_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Read a boolean cell. Accepts booleans, numbers (non-zero is true) and the
/// strings `true`/`yes`/`y`/`1` in any case. Everything else is false.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at this position.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "y" | "1"),
        _ => false,
    })
}

/// Read a non-negative count from a number or a numeric string. Anything
/// unreadable is zero.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at this position.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Render a JSON value the way a spreadsheet cell shows it.
#[must_use]
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
#[path = "de_test.rs"]
mod tests;
