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

//! Table storage backends
//!
//! [`TableLoader`] is the seam between query execution and data access.
//! [`CsvLoader`] reads `<root>/<table>.csv`; [`MemoryLoader`] serves rows
//! from memory and exists mainly for tests.

pub mod csv;
pub mod memory;

pub use csv::CsvLoader;
pub use memory::MemoryLoader;

use crate::core::{Result, Row};

/// Source of table rows, resolved by table name
pub trait TableLoader: Send + Sync {
    /// Load every row of the named table
    fn load(&self, table: &str) -> Result<Vec<Row>>;
}
