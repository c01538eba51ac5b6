use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::errors::{Result, ValidateError};

/// A completed login transaction as handed over by the session store.
///
/// Attribute values arrive untyped: a name may hold a single scalar or a
/// list of values accumulated across renewed logins. They are only checked
/// when extracted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    pub principal: String,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
}

impl Authentication {
    pub fn new(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add a value under `name`. A name that already holds values keeps them
    /// and gains the new ones; a list argument contributes its items.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.attributes.entry(name.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(existing) => existing.extend(flatten(value)),
                scalar => {
                    let mut merged = vec![scalar.take()];
                    merged.extend(flatten(value));
                    *scalar = Value::Array(merged);
                }
            },
        }
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A validated attribute value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeValue {
    Text(String),
    Flag(bool),
}

impl AttributeValue {
    /// Check one raw value found under `attribute`. Lists are not accepted
    /// here; callers flatten the outer list first.
    pub fn parse(attribute: &str, raw: &Value) -> Result<Self> {
        match raw {
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Bool(b) => Ok(Self::Flag(*b)),
            other => Err(ValidateError::MalformedAttribute {
                attribute: attribute.to_string(),
                expected: "string or boolean",
                found: kind_of(other),
            }),
        }
    }
}

fn flatten(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        scalar => vec![scalar],
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
