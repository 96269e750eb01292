//! Fields handed from the shared request parser to a metric factory.
//!
//! The shared parser stores every field it does not recognise here. A
//! factory claims the fields it understands with the `take_*` methods, which
//! remove the entry whatever its type. Whatever is left after the factory
//! returns is reported back to the caller as unexpected.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::MetricConfigError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingFields {
    fields: HashMap<String, Value>,
}

impl PendingFields {
    pub fn new() -> Self {
        PendingFields::default()
    }

    /// Store a field, replacing any earlier value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Remaining field names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fields.keys().cloned().collect();
        names.sort();
        names
    }

    /// Claim a field, whatever its value.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let value = self.fields.remove(name);
        if value.is_some() {
            tracing::debug!(field = name, "claimed metric field");
        }
        value
    }

    pub fn take_f64(&mut self, name: &str) -> Result<Option<f64>, MetricConfigError> {
        match self.take(name) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| invalid_type(name, "a number", &value)),
        }
    }

    pub fn take_f64_list(&mut self, name: &str) -> Result<Option<Vec<f64>>, MetricConfigError> {
        match self.take(name) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_f64()
                        .ok_or_else(|| invalid_type(name, "an array of numbers", item))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(invalid_type(name, "an array of numbers", &other)),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn invalid_type(field: &str, expected: &'static str, found: &Value) -> MetricConfigError {
    MetricConfigError::InvalidType {
        field: field.to_owned(),
        expected,
        found: json_type_name(found),
    }
}
