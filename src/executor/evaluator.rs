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

//! Condition evaluation against a single row
//!
//! Equality is textual; ordering operators compare numerically when both
//! sides parse as numbers and lexicographically otherwise. A condition on
//! a field the row does not carry is false, never an error.

use std::cmp::Ordering;

use crate::core::{Row, Value};
use crate::parser::{CompareOp, Condition};

use super::pattern::global_pattern_cache;

/// Strip one layer of surrounding quote characters, if present
fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Evaluate one condition against a row
pub fn evaluate(row: &Row, condition: &Condition) -> bool {
    let Some(field_value) = row.get(&condition.field) else {
        return false;
    };
    if field_value.is_null() {
        return false;
    }

    let row_text = field_value.to_string();
    let row_text = strip_quotes(&row_text);
    let cond_text = strip_quotes(&condition.value);

    match condition.operator {
        CompareOp::Eq => row_text == cond_text,
        CompareOp::NotEq => row_text != cond_text,
        CompareOp::Like => global_pattern_cache()
            .get_or_compile(cond_text)
            .matches(row_text),
        CompareOp::Gt => compare(row_text, cond_text) == Ordering::Greater,
        CompareOp::Lt => compare(row_text, cond_text) == Ordering::Less,
        CompareOp::GtEq => compare(row_text, cond_text) != Ordering::Less,
        CompareOp::LtEq => compare(row_text, cond_text) != Ordering::Greater,
    }
}

/// A row satisfies a condition list iff it satisfies every condition
pub fn matches_all(row: &Row, conditions: &[Condition]) -> bool {
    conditions.iter().all(|condition| evaluate(row, condition))
}

/// Ordering comparison with numeric coercion
fn compare(left: &str, right: &str) -> Ordering {
    Value::text(left).compare(&Value::text(right))
}
