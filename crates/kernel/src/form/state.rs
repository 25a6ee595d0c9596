//! Submitted form values and processing results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Values submitted with a form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormState {
    /// Form ID.
    pub form_id: String,

    /// Current form values.
    pub values: HashMap<String, Value>,
}

impl FormState {
    /// Create an empty form state.
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            values: HashMap::new(),
        }
    }

    /// Set a value.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`FormState::set_value`].
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_value(name, value);
        self
    }

    /// Get a raw value.
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Get a string value, trimmed. Empty strings count as missing.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Get a checkbox value. Accepts booleans, 0/1 and their string forms.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) => match s.trim() {
                "1" | "true" | "on" => Some(true),
                "0" | "false" | "off" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Get an integer value. Accepts numbers and numeric strings.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Get a multi-value field. A single string counts as one value; empty
    /// strings are dropped.
    pub fn get_strings(&self, name: &str) -> Vec<String> {
        match self.values.get(name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}

/// Result of form processing.
#[derive(Debug)]
pub enum FormResult {
    /// Saved; show the messages and redirect.
    Redirect { to: String, messages: Vec<String> },

    /// Re-display form with errors.
    ValidationFailed(Vec<ValidationError>),
}

/// Validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field name (None for form-level errors).
    pub field: Option<String>,

    /// Error message.
    pub message: String,
}

impl ValidationError {
    /// Create a field-level error.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(name.into()),
            message: message.into(),
        }
    }

    /// Create a form-level error.
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}
