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

//! CSV-backed table loader
//!
//! A table named `t` maps to `<root>/t.csv`. The first record is the
//! header; every cell loads as text, with type coercion deferred to
//! evaluation. Short records pad with null, extra cells are dropped.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use crate::core::{Error, Result, Row, Value};

use super::TableLoader;

/// Table loader reading `<root>/<table>.csv` files
#[derive(Debug, Clone)]
pub struct CsvLoader {
    root: PathBuf,
}

impl CsvLoader {
    /// Create a loader rooted at a directory of CSV files
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the loader resolves table names against
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, table: &str) -> Result<PathBuf> {
        // Table names are bare identifiers; anything path-like is rejected
        // rather than resolved outside the root.
        if table.is_empty() || table.contains(['/', '\\', '.']) {
            return Err(Error::TableNotFound(table.to_string()));
        }
        Ok(self.root.join(format!("{table}.csv")))
    }
}

impl TableLoader for CsvLoader {
    fn load(&self, table: &str) -> Result<Vec<Row>> {
        let path = self.table_path(table)?;
        if !path.is_file() {
            return Err(Error::TableNotFound(table.to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = Row::with_capacity(headers.len());
            for (i, header) in headers.iter().enumerate() {
                let value = record
                    .get(i)
                    .map(|cell| Value::text(cell.trim()))
                    .unwrap_or(Value::Null);
                row.set(header.as_str(), value);
            }
            rows.push(row);
        }

        Ok(rows)
    }
}
