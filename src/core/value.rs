// Copyright 2025 Csvql Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Value type for csvql - runtime cell values
//!
//! CSV cells load as `Text`; computed aggregates produce `Integer` or
//! `Float`; missing fields surface as `Null`. Comparison follows the SQL
//! subset's coercion rule: numeric when both sides parse as numbers,
//! lexicographic on the textual form otherwise.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A runtime cell value
///
/// Text uses Arc<str> for cheap cloning during row operations; rows are
/// cloned per joined output row.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent or unresolvable field
    Null,

    /// 64-bit signed integer (COUNT results)
    Integer(i64),

    /// 64-bit floating point (SUM/AVG/MIN/MAX results)
    Float(f64),

    /// UTF-8 text, the native CSV representation
    Text(Arc<str>),
}

impl Value {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(Arc::from(value.into().as_str()))
    }

    /// Create a text value from Arc<str> (zero-copy)
    pub fn text_arc(value: Arc<str>) -> Self {
        Value::Text(value)
    }

    /// Check if the value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the textual form, if any
    ///
    /// Returns None for Null; numeric variants render through Display.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce to f64 if this value is numeric or numeric-looking text
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Compare two values with numeric coercion
    ///
    /// Numeric comparison when both sides coerce to f64, lexicographic on
    /// the rendered text otherwise. Null sorts before everything.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        }

        self.to_string().cmp(&other.to_string())
    }

    /// Textual equality on the rendered form
    ///
    /// Eq/NotEq conditions compare textually even for numeric-looking
    /// values, matching the engine's string-first data model.
    pub fn text_eq(&self, other: &str) -> bool {
        match self {
            Value::Null => false,
            Value::Text(s) => s.as_ref() == other,
            _ => self.to_string() == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, ""),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                (*a as f64) == *b
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}
