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

//! SELECT pipeline
//!
//! Fixed stage order: load, join, filter, group/aggregate, order, limit,
//! distinct, project. Grouping and whole-result aggregation are mutually
//! exclusive; every later stage applies in both modes (ordering a
//! whole-result row is a no-op, LIMIT still truncates it). When the query
//! joins two tables, both load concurrently.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use crate::core::{Result, Row, Value};
use crate::parser::{SelectQuery, SortDirection};
use crate::storage::TableLoader;

use super::aggregation::{aggregate_group_by, aggregate_whole};
use super::evaluator::matches_all;
use super::join::execute_join;

/// Separator for distinct keys; never appears in CSV field text
const DISTINCT_KEY_SEPARATOR: char = '\u{1F}';

/// Execute a parsed SELECT query against a table loader
pub fn execute_select(query: &SelectQuery, loader: &dyn TableLoader) -> Result<Vec<Row>> {
    let mut rows = match &query.join {
        Some(join) => {
            let (main_rows, join_rows) =
                rayon::join(|| loader.load(&query.table), || loader.load(&join.table));
            execute_join(query, join, main_rows?, join_rows?)?
        }
        None => loader.load(&query.table)?,
    };

    rows.retain(|row| matches_all(row, &query.where_clauses));

    if let Some(group_fields) = &query.group_by {
        rows = aggregate_group_by(query, group_fields, &rows)?;
    } else if query.aggregate_without_group_by {
        rows = aggregate_whole(query, &rows)?;
    }

    if let Some(order_by) = &query.order_by {
        rows.sort_by(|a, b| {
            for entry in order_by {
                let left = a.get(&entry.field).cloned().unwrap_or(Value::Null);
                let right = b.get(&entry.field).cloned().unwrap_or(Value::Null);
                let ordering = match entry.direction {
                    SortDirection::Asc => left.compare(&right),
                    SortDirection::Desc => right.compare(&left),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }

    if query.distinct {
        rows = dedupe(query, rows);
    }

    Ok(project(query, rows))
}

/// Keep the first row of each distinct projected-value tuple
fn dedupe(query: &SelectQuery, rows: Vec<Row>) -> Vec<Row> {
    let mut seen = FxHashSet::default();
    rows.into_iter()
        .filter(|row| {
            let key = query
                .fields
                .iter()
                .map(|field| match field.as_str() {
                    "*" => row.to_string(),
                    _ => row.get(field).map(|v| v.to_string()).unwrap_or_default(),
                })
                .collect::<Vec<_>>()
                .join(&DISTINCT_KEY_SEPARATOR.to_string());
            seen.insert(key)
        })
        .collect()
}

/// Narrow rows to the requested projection tokens; `*` keeps every column
fn project(query: &SelectQuery, rows: Vec<Row>) -> Vec<Row> {
    if query.fields.iter().any(|f| f == "*") {
        return rows;
    }

    rows.into_iter()
        .map(|row| {
            let mut projected = Row::with_capacity(query.fields.len());
            for field in &query.fields {
                let value = row.get(field).cloned().unwrap_or(Value::Null);
                projected.set(field.as_str(), value);
            }
            projected
        })
        .collect()
}
