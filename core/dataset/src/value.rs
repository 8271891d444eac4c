//! FILENAME: core/dataset/src/value.rs
//! PURPOSE: The value a single table cell can hold.
//! CONTEXT: Values come out of a ValueResolver and go into a presentation
//! sink. They are small and cloned freely; a table may produce millions.

use serde::{Deserialize, Serialize};

/// A resolved cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Value {
    /// Nothing to show: a missing value, a detector hole or an unavailable
    /// quantity.
    #[default]
    Empty,
    Integer(i64),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            Value::Empty | Value::Text(_) => None,
        }
    }

    /// Returns the display value as a String, as written into text dumps.
    pub fn display_value(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Number(n) => {
                if n.is_nan() {
                    "NaN".to_string()
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_value())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Integer(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Option<Value>> for Value {
    /// A missing value renders empty.
    fn from(value: Option<Value>) -> Self {
        value.unwrap_or_default()
    }
}
