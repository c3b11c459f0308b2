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

//! Join execution
//!
//! All three variants key on textual equality between one main-table and
//! one join-table field. The variants differ deliberately in match
//! multiplicity and in which side's fields are carried wholesale:
//!
//! - INNER: full cross-match; output rows carry the projection tokens only.
//! - LEFT: per main row, one output per match or a single null-extended
//!   row; all main fields additionally carried as `main.field`.
//! - RIGHT: per join row, the FIRST matching main row only (single-match,
//!   preserved observed behavior); all join fields carried as
//!   `join.field`.

use crate::core::{Error, Result, Row, Value};
use crate::parser::{JoinClause, JoinType, SelectQuery};

/// Which of the two joined tables a qualified field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Main,
    Join,
}

/// Resolve an ON-condition field to a side and bare column name
///
/// Strict: a qualifier naming neither table is a `FieldResolution` error.
/// Unqualified fields belong to the main table.
fn resolve_on_field(field: &str, main_table: &str, join_table: &str) -> Result<(Side, String)> {
    match field.split_once('.') {
        None => Ok((Side::Main, field.to_string())),
        Some((qualifier, column)) => {
            if qualifier == main_table {
                Ok((Side::Main, column.to_string()))
            } else if qualifier == join_table {
                Ok((Side::Join, column.to_string()))
            } else {
                Err(Error::FieldResolution {
                    field: field.to_string(),
                })
            }
        }
    }
}

/// Resolve a projection token against a main/join row pair
///
/// Graceful: unknown fields and absent sides produce Null. A qualifier
/// equal to the main table reads the main side; any other qualifier reads
/// the join side; bare names read the main side.
fn resolve_projection(
    field: &str,
    main_table: &str,
    main_row: Option<&Row>,
    join_row: Option<&Row>,
) -> Value {
    let (side_row, column) = match field.split_once('.') {
        Some((qualifier, column)) if qualifier == main_table => (main_row, column),
        Some((_, column)) => (join_row, column),
        None => (main_row, field),
    };

    side_row
        .and_then(|row| row.get(column))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Textual equality used for join keys; absent or Null never matches
fn join_values_match(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(l), Some(r)) if !l.is_null() && !r.is_null() => l.to_string() == r.to_string(),
        _ => false,
    }
}

/// Execute the join stage
pub fn execute_join(
    query: &SelectQuery,
    join: &JoinClause,
    main_rows: Vec<Row>,
    join_rows: Vec<Row>,
) -> Result<Vec<Row>> {
    let main_table = query.table.as_str();
    let join_table = join.table.as_str();

    let left = resolve_on_field(&join.condition.left, main_table, join_table)?;
    let right = resolve_on_field(&join.condition.right, main_table, join_table)?;

    // The condition must reference both tables, one field each
    let (main_key, join_key) = match (left, right) {
        ((Side::Main, m), (Side::Join, j)) | ((Side::Join, j), (Side::Main, m)) => (m, j),
        _ => {
            return Err(Error::FieldResolution {
                field: join.condition.right.clone(),
            })
        }
    };

    let rows = match join.join_type {
        JoinType::Inner => inner_join(query, &main_key, &join_key, &main_rows, &join_rows),
        JoinType::Left => left_join(query, &main_key, &join_key, &main_rows, &join_rows),
        JoinType::Right => right_join(query, join, &main_key, &join_key, &main_rows, &join_rows),
    };

    Ok(rows)
}

/// INNER: cross-match, non-matching main rows dropped
fn inner_join(
    query: &SelectQuery,
    main_key: &str,
    join_key: &str,
    main_rows: &[Row],
    join_rows: &[Row],
) -> Vec<Row> {
    let mut result = Vec::new();

    for main_row in main_rows {
        for join_row in join_rows {
            if !join_values_match(main_row.get(main_key), join_row.get(join_key)) {
                continue;
            }

            let mut row = Row::with_capacity(query.fields.len());
            for field in &query.fields {
                row.set(
                    field.as_str(),
                    resolve_projection(field, &query.table, Some(main_row), Some(join_row)),
                );
            }
            result.push(row);
        }
    }

    result
}

/// LEFT: every main row contributes; all main fields carried qualified
fn left_join(
    query: &SelectQuery,
    main_key: &str,
    join_key: &str,
    main_rows: &[Row],
    join_rows: &[Row],
) -> Vec<Row> {
    let mut result = Vec::new();

    for main_row in main_rows {
        let matches: Vec<&Row> = join_rows
            .iter()
            .filter(|join_row| join_values_match(main_row.get(main_key), join_row.get(join_key)))
            .collect();

        if matches.is_empty() {
            result.push(left_result_row(query, main_row, None));
        } else {
            for join_row in matches {
                result.push(left_result_row(query, main_row, Some(join_row)));
            }
        }
    }

    result
}

fn left_result_row(query: &SelectQuery, main_row: &Row, join_row: Option<&Row>) -> Row {
    let mut row = Row::with_capacity(main_row.len() + query.fields.len());

    for (column, value) in main_row.iter() {
        row.set(format!("{}.{}", query.table, column), value.clone());
    }
    for field in &query.fields {
        row.set(
            field.as_str(),
            resolve_projection(field, &query.table, Some(main_row), join_row),
        );
    }

    row
}

/// RIGHT: every join row contributes, matched against the first main row
/// only; all join fields carried qualified
fn right_join(
    query: &SelectQuery,
    join: &JoinClause,
    main_key: &str,
    join_key: &str,
    main_rows: &[Row],
    join_rows: &[Row],
) -> Vec<Row> {
    let mut result = Vec::new();

    for join_row in join_rows {
        let main_match = main_rows
            .iter()
            .find(|main_row| join_values_match(main_row.get(main_key), join_row.get(join_key)));

        let mut row = Row::with_capacity(join_row.len() + query.fields.len());
        for (column, value) in join_row.iter() {
            row.set(format!("{}.{}", join.table, column), value.clone());
        }
        for field in &query.fields {
            row.set(
                field.as_str(),
                resolve_projection(field, &query.table, main_match, Some(join_row)),
            );
        }
        result.push(row);
    }

    result
}
