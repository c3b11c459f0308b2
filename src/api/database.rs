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

//! Database handle
//!
//! The main embedding entry point. A [`Database`] pairs a table loader
//! with the parser and executor; handles are cheap to clone and safe to
//! share across threads.

use std::path::Path;
use std::sync::Arc;

use crate::core::{Result, Row};
use crate::executor::execute_select;
use crate::parser::parse_select;
use crate::storage::{CsvLoader, TableLoader};

/// A database over a directory of CSV tables
///
/// # Example
///
/// ```no_run
/// use csvql::Database;
///
/// let db = Database::open("./data");
/// let rows = db.query("SELECT id, name FROM student WHERE age > 22").unwrap();
/// for row in &rows {
///     println!("{row}");
/// }
/// ```
#[derive(Clone)]
pub struct Database {
    loader: Arc<dyn TableLoader>,
}

impl Database {
    /// Open a database over a directory of `<table>.csv` files
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self {
            loader: Arc::new(CsvLoader::new(dir.as_ref())),
        }
    }

    /// Open a database over a custom table loader
    pub fn with_loader(loader: Arc<dyn TableLoader>) -> Self {
        Self { loader }
    }

    /// Parse and execute one SELECT query
    pub fn query(&self, sql: &str) -> Result<Vec<Row>> {
        let query = parse_select(sql)?;
        execute_select(&query, self.loader.as_ref())
    }
}
