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

//! Core types for csvql
//!
//! - [`Value`] - runtime cell value with numeric coercion
//! - [`Row`] - ordered column-name to value mapping
//! - [`Error`] / [`Result`] - crate-wide error handling

pub mod error;
pub mod row;
pub mod value;

pub use error::{Error, Result};
pub use row::Row;
pub use value::Value;
