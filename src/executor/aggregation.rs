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

//! Aggregation and GROUP BY execution
//!
//! Two mutually exclusive modes:
//!
//! - Grouped: `SELECT age, COUNT(*) FROM student GROUP BY age`
//! - Whole-result: `SELECT COUNT(*) FROM student` (no GROUP BY; exactly
//!   one output row)
//!
//! Groups accumulate in one pass through explicit per-group records;
//! output order is first appearance of each group. Cells that do not
//! parse as numbers are skipped by SUM/AVG/MIN/MAX; COUNT ignores its
//! argument entirely.

use rustc_hash::FxHashMap;

use crate::core::{Result, Row, Value};
use crate::parser::{AggregateExpr, AggregateFunc, SelectQuery};

/// Separator for compound group keys; never appears in CSV field text
const GROUP_KEY_SEPARATOR: char = '\u{1F}';

/// Running numeric state for one aggregate argument within one group
#[derive(Debug, Clone, Copy, Default)]
struct FieldStats {
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl FieldStats {
    fn update(&mut self, value: f64) {
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }
}

/// Accumulator record for one group
#[derive(Debug, Default)]
struct GroupAccumulator {
    /// Row count of the group
    count: u64,
    /// Per-argument numeric state, keyed by the aggregate argument
    stats: FxHashMap<String, FieldStats>,
    /// Group-by field values from the group's first row
    key_values: Vec<Value>,
}

impl GroupAccumulator {
    /// Feed one row into the accumulator
    ///
    /// `args` must be deduplicated: a column shared by several aggregates
    /// (SUM(age) and AVG(age), say) updates its stats exactly once per row.
    fn accumulate(&mut self, row: &Row, args: &[String]) {
        self.count += 1;
        for arg in args {
            let Some(value) = row.get(arg).and_then(|v| v.as_f64()) else {
                continue;
            };
            self.stats.entry(arg.clone()).or_default().update(value);
        }
    }

    fn compute(&self, aggregate: &AggregateExpr) -> Value {
        let stats = self.stats.get(&aggregate.arg).copied().unwrap_or_default();
        match aggregate.func {
            AggregateFunc::Count => Value::Integer(self.count as i64),
            AggregateFunc::Sum => Value::Float(stats.sum),
            AggregateFunc::Avg => {
                if self.count == 0 {
                    Value::Null
                } else {
                    Value::Float(stats.sum / self.count as f64)
                }
            }
            AggregateFunc::Min => stats.min.map_or(Value::Null, Value::Float),
            AggregateFunc::Max => stats.max.map_or(Value::Null, Value::Float),
        }
    }
}

/// Collect the aggregate expressions of the projection, with their
/// original tokens as output keys
fn projection_aggregates(query: &SelectQuery) -> Result<Vec<(String, AggregateExpr)>> {
    let mut aggregates = Vec::new();
    for field in &query.fields {
        if let Some(expr) = AggregateExpr::parse(field)? {
            aggregates.push((field.clone(), expr));
        }
    }
    Ok(aggregates)
}

/// Distinct non-`*` aggregate arguments, in first-appearance order
fn distinct_args(aggregates: &[(String, AggregateExpr)]) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    for (_, expr) in aggregates {
        if expr.arg != "*" && !args.contains(&expr.arg) {
            args.push(expr.arg.clone());
        }
    }
    args
}

/// GROUP BY mode: one output row per distinct group-key tuple
pub fn aggregate_group_by(
    query: &SelectQuery,
    group_fields: &[String],
    rows: &[Row],
) -> Result<Vec<Row>> {
    let aggregates = projection_aggregates(query)?;
    let args = distinct_args(&aggregates);

    let mut groups: FxHashMap<String, GroupAccumulator> = FxHashMap::default();
    let mut order: Vec<String> = Vec::new();

    for row in rows {
        let key_values: Vec<Value> = group_fields
            .iter()
            .map(|field| row.get(field).cloned().unwrap_or(Value::Null))
            .collect();
        let key = key_values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(&GROUP_KEY_SEPARATOR.to_string());

        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            GroupAccumulator {
                key_values,
                ..Default::default()
            }
        });
        group.accumulate(row, &args);
    }

    let mut result = Vec::with_capacity(order.len());
    for key in &order {
        let group = &groups[key];
        let mut row = Row::with_capacity(group_fields.len() + aggregates.len());
        for (field, value) in group_fields.iter().zip(&group.key_values) {
            row.set(field.as_str(), value.clone());
        }
        for (token, expr) in &aggregates {
            row.set(token.as_str(), group.compute(expr));
        }
        result.push(row);
    }

    Ok(result)
}

/// Whole-result mode: aggregates over the entire filtered set, exactly
/// one output row
pub fn aggregate_whole(query: &SelectQuery, rows: &[Row]) -> Result<Vec<Row>> {
    let aggregates = projection_aggregates(query)?;
    let args = distinct_args(&aggregates);

    let mut group = GroupAccumulator::default();
    for row in rows {
        group.accumulate(row, &args);
    }

    let mut result_row = Row::with_capacity(aggregates.len());
    for (token, expr) in &aggregates {
        result_row.set(token.as_str(), group.compute(expr));
    }

    Ok(vec![result_row])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_select;

    fn row(pairs: &[(&str, &str)]) -> Row {
        let mut row = Row::new();
        for (name, value) in pairs {
            row.set(*name, Value::text(*value));
        }
        row
    }

    fn students() -> Vec<Row> {
        vec![
            row(&[("id", "1"), ("name", "John"), ("age", "30")]),
            row(&[("id", "2"), ("name", "Jane"), ("age", "25")]),
            row(&[("id", "3"), ("name", "Bob"), ("age", "22")]),
            row(&[("id", "4"), ("name", "Alice"), ("age", "25")]),
        ]
    }

    #[test]
    fn test_count_star_whole() {
        let query = parse_select("SELECT COUNT(*) FROM student").unwrap();
        let result = aggregate_whole(&query, &students()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get("COUNT(*)"), Some(&Value::Integer(4)));
    }

    #[test]
    fn test_whole_sum_avg_min_max() {
        let query =
            parse_select("SELECT SUM(age), AVG(age), MIN(age), MAX(age) FROM student").unwrap();
        let result = aggregate_whole(&query, &students()).unwrap();
        let row = &result[0];
        assert_eq!(row.get("SUM(age)"), Some(&Value::Float(102.0)));
        assert_eq!(row.get("AVG(age)"), Some(&Value::Float(25.5)));
        assert_eq!(row.get("MIN(age)"), Some(&Value::Float(22.0)));
        assert_eq!(row.get("MAX(age)"), Some(&Value::Float(30.0)));
    }

    #[test]
    fn test_whole_aggregation_empty_set() {
        let query = parse_select("SELECT COUNT(*), MIN(age) FROM student").unwrap();
        let result = aggregate_whole(&query, &[]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get("COUNT(*)"), Some(&Value::Integer(0)));
        assert_eq!(result[0].get("MIN(age)"), Some(&Value::Null));
    }

    #[test]
    fn test_group_by_count() {
        let query = parse_select("SELECT age, COUNT(*) FROM student GROUP BY age").unwrap();
        let result = aggregate_group_by(&query, &["age".to_string()], &students()).unwrap();

        // Groups appear in first-seen order: 30, 25, 22
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].get("age"), Some(&Value::text("30")));
        assert_eq!(result[0].get("COUNT(*)"), Some(&Value::Integer(1)));
        assert_eq!(result[1].get("age"), Some(&Value::text("25")));
        assert_eq!(result[1].get("COUNT(*)"), Some(&Value::Integer(2)));
        assert_eq!(result[2].get("age"), Some(&Value::text("22")));
    }

    #[test]
    fn test_group_counts_sum_to_row_count() {
        let rows = students();
        let query = parse_select("SELECT age, COUNT(*) FROM student GROUP BY age").unwrap();
        let result = aggregate_group_by(&query, &["age".to_string()], &rows).unwrap();

        let total: i64 = result
            .iter()
            .map(|r| match r.get("COUNT(*)") {
                Some(Value::Integer(n)) => *n,
                _ => 0,
            })
            .sum();
        assert_eq!(total as usize, rows.len());
    }

    #[test]
    fn test_group_by_multiple_fields() {
        let rows = vec![
            row(&[("a", "x"), ("b", "1")]),
            row(&[("a", "x"), ("b", "2")]),
            row(&[("a", "x"), ("b", "1")]),
            row(&[("a", "y"), ("b", "1")]),
        ];
        let query = parse_select("SELECT a, b, COUNT(*) FROM t GROUP BY a, b").unwrap();
        let result =
            aggregate_group_by(&query, &["a".to_string(), "b".to_string()], &rows).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].get("COUNT(*)"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_group_by_sum_skips_unparsable() {
        let rows = vec![
            row(&[("cat", "a"), ("v", "10")]),
            row(&[("cat", "a"), ("v", "oops")]),
            row(&[("cat", "a"), ("v", "5")]),
        ];
        let query = parse_select("SELECT cat, SUM(v) FROM t GROUP BY cat").unwrap();
        let result = aggregate_group_by(&query, &["cat".to_string()], &rows).unwrap();
        assert_eq!(result[0].get("SUM(v)"), Some(&Value::Float(15.0)));
    }

    #[test]
    fn test_shared_argument_accumulates_once() {
        // Several aggregates over the same column must not inflate the sum
        let query = parse_select("SELECT SUM(age), SUM(age), AVG(age) FROM student").unwrap();
        let result = aggregate_whole(&query, &students()).unwrap();
        assert_eq!(result[0].get("SUM(age)"), Some(&Value::Float(102.0)));
        assert_eq!(result[0].get("AVG(age)"), Some(&Value::Float(25.5)));
    }

    #[test]
    fn test_shared_argument_in_group_by() {
        let query =
            parse_select("SELECT age, SUM(id), AVG(id) FROM student GROUP BY age").unwrap();
        let result = aggregate_group_by(&query, &["age".to_string()], &students()).unwrap();

        // age 25 holds ids 2 and 4
        let group = result
            .iter()
            .find(|r| r.get("age") == Some(&Value::text("25")))
            .unwrap();
        assert_eq!(group.get("SUM(id)"), Some(&Value::Float(6.0)));
        assert_eq!(group.get("AVG(id)"), Some(&Value::Float(3.0)));
    }

    #[test]
    fn test_count_ignores_argument() {
        let query = parse_select("SELECT age, COUNT(name) FROM student GROUP BY age").unwrap();
        let result = aggregate_group_by(&query, &["age".to_string()], &students()).unwrap();
        assert_eq!(result[1].get("COUNT(name)"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_group_missing_field_groups_as_null() {
        let rows = vec![row(&[("x", "1")]), row(&[("x", "2")])];
        let query = parse_select("SELECT missing, COUNT(*) FROM t GROUP BY missing").unwrap();
        let result = aggregate_group_by(&query, &["missing".to_string()], &rows).unwrap();
        // Both rows land in the single null group
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get("COUNT(*)"), Some(&Value::Integer(2)));
    }
}
