use serde_json::Value;
use std::collections::BTreeSet;

use crate::authentication::{AttributeValue, Authentication};
use crate::errors::{Result, ValidateError};

/// All values stored under `name`, validated. A scalar counts as a list of
/// one; an absent attribute yields no values.
pub fn values(auth: &Authentication, name: &str) -> Result<Vec<AttributeValue>> {
    match auth.attribute(name) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| AttributeValue::parse(name, item))
            .collect(),
        Some(scalar) => Ok(vec![AttributeValue::parse(name, scalar)?]),
    }
}

/// The set of context identifiers recorded under `name`.
///
/// Boolean members are kept in their textual form; they can only ever match
/// a context literally named `true` or `false`.
pub fn extract_set(auth: &Authentication, name: &str) -> Result<BTreeSet<String>> {
    Ok(values(auth, name)?
        .into_iter()
        .map(|v| match v {
            AttributeValue::Text(s) => s,
            AttributeValue::Flag(b) => b.to_string(),
        })
        .collect())
}

/// Boolean attribute: `None` when absent, otherwise whether any recorded
/// value is `true`. Strings are rejected rather than parsed.
pub fn extract_flag(auth: &Authentication, name: &str) -> Result<Option<bool>> {
    let recorded = values(auth, name)?;
    if recorded.is_empty() {
        return Ok(None);
    }
    let mut any = false;
    for value in recorded {
        match value {
            AttributeValue::Flag(b) => any |= b,
            AttributeValue::Text(_) => {
                return Err(ValidateError::MalformedAttribute {
                    attribute: name.to_string(),
                    expected: "boolean",
                    found: "string",
                })
            }
        }
    }
    Ok(Some(any))
}

/// Text-only attribute: booleans are rejected.
pub fn extract_text_set(auth: &Authentication, name: &str) -> Result<BTreeSet<String>> {
    values(auth, name)?
        .into_iter()
        .map(|v| match v {
            AttributeValue::Text(s) => Ok(s),
            AttributeValue::Flag(_) => Err(ValidateError::MalformedAttribute {
                attribute: name.to_string(),
                expected: "string",
                found: "boolean",
            }),
        })
        .collect()
}
