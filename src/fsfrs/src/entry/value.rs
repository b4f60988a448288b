// fsfrs/src/entry/value.rs

//! Directive values and their textual forms.

use crate::error::{FsfError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The value of a `set` directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value, stored without surrounding quotes
    Text(String),
}

impl Value {
    /// Create a new text value.
    pub fn text<S: Into<String>>(value: S) -> Self {
        Value::Text(value.into())
    }

    /// Get the type name as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Try to convert to an integer.
    pub fn as_integer(&self) -> Result<i64> {
        match self {
            Value::Integer(i) => Ok(*i),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(*f as i64),
            _ => Err(self.conversion_error("integer")),
        }
    }

    /// Try to convert to a float.
    pub fn as_float(&self) -> Result<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            Value::Integer(i) => Ok(*i as f64),
            Value::Text(_) => Err(self.conversion_error("float")),
        }
    }

    /// Try to borrow the string contents.
    pub fn as_text(&self) -> Result<&str> {
        match self {
            Value::Text(s) => Ok(s),
            _ => Err(self.conversion_error("text")),
        }
    }

    fn conversion_error(&self, to: &str) -> FsfError {
        FsfError::type_conversion(self.type_name(), to, self.to_string().as_str())
    }
}

/// Parse an unquoted token as a number if it is syntactically one.
///
/// Only digits, signs, a decimal point and an exponent marker are accepted,
/// so words such as `inf` or `nan` stay text.
pub fn parse_number(raw: &str) -> Option<Value> {
    let numeric_chars = raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if raw.is_empty() || !numeric_chars || !raw.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::Integer(i));
    }
    raw.parse::<f64>().ok().map(Value::Float)
}

/// Format a float so that it always reads back as a float.
pub fn format_float(value: f64) -> String {
    let s = value.to_string();
    if value.is_finite() && !s.contains(['.', 'e', 'E']) {
        format!("{}.0", s)
    } else {
        s
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", format_float(*v)),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}
