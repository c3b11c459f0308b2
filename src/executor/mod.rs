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

//! Query execution
//!
//! - [`query`] - the SELECT pipeline
//! - [`join`] - INNER/LEFT/RIGHT join execution
//! - [`evaluator`] - per-row condition evaluation
//! - [`aggregation`] - GROUP BY and whole-result aggregates
//! - [`pattern`] - compiled LIKE pattern cache

pub mod aggregation;
pub mod evaluator;
pub mod join;
pub mod pattern;
pub mod query;

pub use aggregation::{aggregate_group_by, aggregate_whole};
pub use evaluator::{evaluate, matches_all};
pub use join::execute_join;
pub use pattern::{global_pattern_cache, CompiledPattern, PatternCache};
pub use query::execute_select;
