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

//! Row type for csvql - an ordered column-name to value mapping
//!
//! Column order is insertion order and is preserved all the way to the
//! caller. `get` returns `Option` so a missing field is an explicit state
//! rather than a panic; unmatched join sides surface as `Value::Null`.

use std::fmt;
use std::sync::Arc;

use super::value::Value;

/// One record of table data
///
/// Rows are small (CSV-width), so lookups scan the column list rather
/// than paying for a per-row hash map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(Arc<str>, Value)>,
}

impl Row {
    /// Create a new empty row
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Create a row with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the row has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a column value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(col, _)| col.as_ref() == name)
            .map(|(_, value)| value)
    }

    /// Check whether a column exists
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(col, _)| col.as_ref() == name)
    }

    /// Set a column value, replacing an existing column of the same name
    /// or appending a new one
    pub fn set(&mut self, name: impl Into<Arc<str>>, value: Value) {
        let name = name.into();
        match self.columns.iter_mut().find(|(col, _)| *col == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name, value)),
        }
    }

    /// Iterate over (column, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(|(col, value)| (col.as_ref(), value))
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(col, _)| col.as_ref())
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (col, value)) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", col, value)?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(Arc<str>, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (Arc<str>, Value)>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
