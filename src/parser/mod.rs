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

//! SELECT-subset parser
//!
//! - [`Lexer`] - tokenizer for query input
//! - [`Parser`] - recursive-descent parser building a [`SelectQuery`]
//! - [`ast`] - query descriptor types
//! - [`error`] - positioned parse errors
//!
//! # Example
//!
//! ```
//! use csvql::parser::parse_select;
//!
//! let query = parse_select("SELECT id, name FROM student WHERE age = 25").unwrap();
//! assert_eq!(query.table, "student");
//! assert_eq!(query.fields, vec!["id", "name"]);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod token;

pub use ast::{
    AggregateExpr, AggregateFunc, CompareOp, Condition, JoinClause, JoinCondition, JoinType,
    OrderByField, SelectQuery, SortDirection,
};
pub use error::ParseError;
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{is_keyword, is_operator, is_punctuator, Position, Token, TokenType};

use crate::core::Result;

/// Parse one SELECT query
///
/// This is the main entry point for turning a query string into its
/// [`SelectQuery`] descriptor.
pub fn parse_select(query: &str) -> Result<SelectQuery> {
    let query = query.trim();
    if query.is_empty() {
        return Err(crate::core::Error::Parse(ParseError::new(
            "empty query",
            Position::new(0, 1, 1),
        )));
    }

    Parser::new(query).parse_select()
}
