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

//! In-memory table loader

use rustc_hash::FxHashMap;

use crate::core::{Error, Result, Row};

use super::TableLoader;

/// Table loader backed by a name-to-rows map
#[derive(Debug, Default)]
pub struct MemoryLoader {
    tables: FxHashMap<String, Vec<Row>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, replacing any previous rows under the same name
    pub fn insert(&mut self, table: impl Into<String>, rows: Vec<Row>) {
        self.tables.insert(table.into(), rows);
    }
}

impl TableLoader for MemoryLoader {
    fn load(&self, table: &str) -> Result<Vec<Row>> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| Error::TableNotFound(table.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    #[test]
    fn test_load_registered_table() {
        let mut loader = MemoryLoader::new();
        let mut row = Row::new();
        row.set("id", Value::text("1"));
        loader.insert("student", vec![row]);

        let rows = loader.load("student").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&Value::text("1")));
    }

    #[test]
    fn test_unknown_table() {
        let loader = MemoryLoader::new();
        assert!(matches!(
            loader.load("missing"),
            Err(Error::TableNotFound(_))
        ));
    }
}
