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

//! Query descriptor types
//!
//! [`SelectQuery`] is the structured form of one SELECT statement. It is
//! produced once by the parser and never mutated during execution.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::{Error, Result};

/// Comparison operator of a WHERE condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=` or `<>`
    NotEq,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    GtEq,
    /// `<=`
    LtEq,
    /// `LIKE` pattern match
    Like,
}

impl CompareOp {
    /// Parse an operator token
    pub fn parse(op: &str) -> Result<Self> {
        match op {
            "=" => Ok(CompareOp::Eq),
            "!=" | "<>" => Ok(CompareOp::NotEq),
            ">" => Ok(CompareOp::Gt),
            "<" => Ok(CompareOp::Lt),
            ">=" => Ok(CompareOp::GtEq),
            "<=" => Ok(CompareOp::LtEq),
            _ if op.eq_ignore_ascii_case("LIKE") => Ok(CompareOp::Like),
            _ => Err(Error::UnsupportedOperator(op.to_string())),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::GtEq => ">=",
            CompareOp::LtEq => "<=",
            CompareOp::Like => "LIKE",
        };
        write!(f, "{}", s)
    }
}

/// One WHERE condition: `<field> <operator> <value>`
///
/// The value is held in its textual form with literal quotes already
/// stripped; numeric coercion happens at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Field name, bare or `table.field`-qualified
    pub field: String,
    /// Comparison operator
    pub operator: CompareOp,
    /// Comparison value (textual)
    pub value: String,
}

/// Join variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
        };
        write!(f, "{}", s)
    }
}

/// Field-equality condition of a join: `ON <left> = <right>`
#[derive(Debug, Clone, PartialEq)]
pub struct JoinCondition {
    /// Qualified field of one side
    pub left: String,
    /// Qualified field of the other side
    pub right: String,
}

/// One JOIN clause
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// Join variant
    pub join_type: JoinType,
    /// Joined table name
    pub table: String,
    /// Equality condition between the two tables
    pub condition: JoinCondition,
}

/// Sort direction of an ORDER BY field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One ORDER BY entry
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByField {
    /// Field to sort on
    pub field: String,
    /// Direction, ASC when unspecified
    pub direction: SortDirection,
}

/// Parsed, immutable representation of one SELECT query
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Projection tokens in query order: bare names, `table.field`, or
    /// aggregate expressions like `COUNT(*)`
    pub fields: Vec<String>,
    /// Main table name
    pub table: String,
    /// WHERE conditions; a row must satisfy all of them
    pub where_clauses: Vec<Condition>,
    /// Optional single JOIN
    pub join: Option<JoinClause>,
    /// GROUP BY fields, absent when not grouping
    pub group_by: Option<Vec<String>>,
    /// ORDER BY fields, absent when unordered
    pub order_by: Option<Vec<OrderByField>>,
    /// Row limit
    pub limit: Option<usize>,
    /// SELECT DISTINCT flag
    pub distinct: bool,
    /// True iff the field list contains an aggregate expression and no
    /// GROUP BY is present; mutually exclusive with `group_by`
    pub aggregate_without_group_by: bool,
}

/// Aggregate function of an aggregate expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AggregateFunc::Count => "COUNT",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
        };
        write!(f, "{}", s)
    }
}

/// Aggregate expression `FUNC(arg)` parsed from a projection token
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateExpr {
    /// Aggregate function
    pub func: AggregateFunc,
    /// Argument: `*` or a column name
    pub arg: String,
}

/// Shape of an aggregate expression: `name(arg)`
static AGGREGATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(\s*(\*|[A-Za-z_][A-Za-z0-9_.]*)\s*\)\s*$")
        .expect("aggregate regex is valid")
});

impl AggregateExpr {
    /// Try to parse a projection token as an aggregate expression
    ///
    /// Returns Ok(None) when the token is not function-shaped at all, and
    /// `Error::UnsupportedAggregate` when it is function-shaped but names
    /// an unknown function.
    pub fn parse(field: &str) -> Result<Option<Self>> {
        let Some(caps) = AGGREGATE_RE.captures(field) else {
            return Ok(None);
        };

        let name = &caps[1];
        let func = match name.to_ascii_uppercase().as_str() {
            "COUNT" => AggregateFunc::Count,
            "SUM" => AggregateFunc::Sum,
            "AVG" => AggregateFunc::Avg,
            "MIN" => AggregateFunc::Min,
            "MAX" => AggregateFunc::Max,
            _ => return Err(Error::UnsupportedAggregate(name.to_string())),
        };

        Ok(Some(AggregateExpr {
            func,
            arg: caps[2].to_string(),
        }))
    }

    /// Check whether a projection token looks like a known aggregate
    pub fn is_aggregate(field: &str) -> bool {
        matches!(Self::parse(field), Ok(Some(_)))
    }
}

impl fmt::Display for AggregateExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.func, self.arg)
    }
}
