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

//! # csvql
//!
//! A minimal SQL query engine over directories of CSV files.
//!
//! Supports a single-statement SELECT subset: projection, WHERE
//! conditions, INNER/LEFT/RIGHT joins, GROUP BY with COUNT/SUM/AVG/MIN/MAX,
//! ORDER BY, LIMIT, DISTINCT, and LIKE patterns. Tables are plain
//! `<name>.csv` files with a header row; every cell is text until an
//! operator coerces it.
//!
//! # Example
//!
//! ```no_run
//! use csvql::Database;
//!
//! let db = Database::open("./data");
//! let rows = db
//!     .query("SELECT name, age FROM student WHERE age > 22 ORDER BY age DESC")
//!     .unwrap();
//! for row in &rows {
//!     println!("{row}");
//! }
//! ```

pub mod api;
pub mod core;
pub mod executor;
pub mod parser;
pub mod storage;

pub use api::Database;
pub use core::{Error, Result, Row, Value};
pub use parser::{parse_select, SelectQuery};
