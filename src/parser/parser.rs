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

//! Recursive-descent parser for the SELECT subset
//!
//! Clauses are consumed in grammar order from a token stream, so keyword
//! text inside string literals never disturbs clause detection.

use super::ast::{
    AggregateExpr, CompareOp, Condition, JoinClause, JoinCondition, JoinType, OrderByField,
    SelectQuery, SortDirection,
};
use super::error::ParseError;
use super::lexer::Lexer;
use super::token::{Token, TokenType};
use crate::core::{Error, Result};

/// Parser over the token stream of one query
pub struct Parser {
    /// The lexer providing tokens
    lexer: Lexer,
    /// Current token being examined
    cur_token: Token,
    /// Next token (peek)
    peek_token: Token,
    /// Original query text, kept for error context
    input: String,
}

impl Parser {
    /// Create a new parser for the given input
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer::new(input);
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();

        Parser {
            lexer,
            cur_token,
            peek_token,
            input: input.to_string(),
        }
    }

    /// Parse the input as a single SELECT query
    pub fn parse_select(&mut self) -> Result<SelectQuery> {
        self.check_error_token()?;
        self.expect_keyword("SELECT")?;

        let distinct = if self.cur_token.is_keyword("DISTINCT") {
            self.next_token()?;
            true
        } else {
            false
        };

        let fields = self.parse_field_list()?;

        self.expect_keyword("FROM")?;
        let table = self.parse_identifier("table name")?;

        let join = self.parse_join_clause()?;
        let where_clauses = self.parse_where_clause()?;
        let group_by = self.parse_group_by()?;
        let order_by = self.parse_order_by()?;
        let limit = self.parse_limit()?;

        // Optional trailing semicolon
        if self.cur_token.is_punctuator(";") {
            self.next_token()?;
        }

        if !self.cur_token.is_eof() {
            return Err(self.error(format!("unexpected token '{}'", self.cur_token.literal)));
        }

        let has_aggregate = fields
            .iter()
            .map(|f| AggregateExpr::parse(f))
            .collect::<Result<Vec<_>>>()?
            .iter()
            .any(|a| a.is_some());
        let aggregate_without_group_by = has_aggregate && group_by.is_none();

        Ok(SelectQuery {
            fields,
            table,
            where_clauses,
            join,
            group_by,
            order_by,
            limit,
            distinct,
            aggregate_without_group_by,
        })
    }

    // =========================================================================
    // Clause parsers
    // =========================================================================

    /// Parse the comma-separated projection list
    fn parse_field_list(&mut self) -> Result<Vec<String>> {
        let mut fields = vec![self.parse_field()?];

        while self.cur_token.is_punctuator(",") {
            self.next_token()?;
            fields.push(self.parse_field()?);
        }

        Ok(fields)
    }

    /// Parse one projection token: `*`, a bare or qualified name, or an
    /// aggregate expression `FUNC(arg)`
    fn parse_field(&mut self) -> Result<String> {
        if self.cur_token.is_operator("*") {
            self.next_token()?;
            return Ok("*".to_string());
        }

        if self.cur_token.token_type != TokenType::Identifier {
            return Err(self.error(format!(
                "expected field name, got '{}'",
                self.cur_token.literal
            )));
        }

        let name = self.cur_token.literal.clone();
        self.next_token()?;

        // Aggregate call: NAME ( * | column )
        if self.cur_token.is_punctuator("(") {
            self.next_token()?;

            let arg = if self.cur_token.is_operator("*") {
                self.next_token()?;
                "*".to_string()
            } else if self.cur_token.token_type == TokenType::Identifier {
                self.parse_qualified_name()?
            } else {
                return Err(self.error(format!(
                    "expected aggregate argument, got '{}'",
                    self.cur_token.literal
                )));
            };

            if !self.cur_token.is_punctuator(")") {
                return Err(self.error("expected ')' after aggregate argument"));
            }
            self.next_token()?;

            let expr = format!("{}({})", name, arg);
            // Unknown function names in call shape fail here
            AggregateExpr::parse(&expr)?;
            return Ok(expr);
        }

        // Qualified name: table.field
        if self.cur_token.is_punctuator(".") {
            self.next_token()?;
            let field = self.parse_identifier("field name after '.'")?;
            return Ok(format!("{}.{}", name, field));
        }

        Ok(name)
    }

    /// Parse an optional `(INNER|LEFT|RIGHT) JOIN <table> ON <l> = <r>`
    fn parse_join_clause(&mut self) -> Result<Option<JoinClause>> {
        let join_type = if self.cur_token.is_keyword("INNER") {
            JoinType::Inner
        } else if self.cur_token.is_keyword("LEFT") {
            JoinType::Left
        } else if self.cur_token.is_keyword("RIGHT") {
            JoinType::Right
        } else {
            return Ok(None);
        };
        self.next_token()?;

        self.expect_keyword("JOIN")?;
        let table = self.parse_identifier("join table name")?;
        self.expect_keyword("ON")?;

        let left = self.parse_qualified_name()?;
        if !self.cur_token.is_operator("=") {
            return Err(self.error("expected '=' in join condition"));
        }
        self.next_token()?;
        let right = self.parse_qualified_name()?;

        Ok(Some(JoinClause {
            join_type,
            table,
            condition: JoinCondition { left, right },
        }))
    }

    /// Parse an optional WHERE clause into the ordered condition list
    ///
    /// AND and OR are both accepted as separators but all conditions must
    /// hold; see DESIGN.md for the resolution of this inherited behavior.
    fn parse_where_clause(&mut self) -> Result<Vec<Condition>> {
        if !self.cur_token.is_keyword("WHERE") {
            return Ok(Vec::new());
        }
        self.next_token()?;

        let mut conditions = vec![self.parse_condition()?];

        while self.cur_token.is_keyword("AND") || self.cur_token.is_keyword("OR") {
            self.next_token()?;
            conditions.push(self.parse_condition()?);
        }

        Ok(conditions)
    }

    /// Parse one `<field> <operator> <value>` condition
    fn parse_condition(&mut self) -> Result<Condition> {
        let field = self.parse_qualified_name()?;

        let operator = if self.cur_token.token_type == TokenType::Operator {
            let op = CompareOp::parse(&self.cur_token.literal)?;
            self.next_token()?;
            op
        } else if self.cur_token.is_keyword("LIKE") {
            self.next_token()?;
            CompareOp::Like
        } else {
            return Err(self.error(format!(
                "expected comparison operator, got '{}'",
                self.cur_token.literal
            )));
        };

        let value = self.parse_condition_value()?;

        Ok(Condition {
            field,
            operator,
            value,
        })
    }

    /// Parse a condition value: string, number, or bare word
    ///
    /// The value is kept textual; the evaluator applies numeric coercion.
    fn parse_condition_value(&mut self) -> Result<String> {
        match self.cur_token.token_type {
            TokenType::String | TokenType::Integer | TokenType::Float => {
                let value = self.cur_token.literal.clone();
                self.next_token()?;
                Ok(value)
            }
            TokenType::Identifier => self.parse_qualified_name(),
            _ => Err(self.error(format!(
                "expected condition value, got '{}'",
                self.cur_token.literal
            ))),
        }
    }

    /// Parse an optional `GROUP BY <field>, ...`
    ///
    /// Field position takes the same tokens as the projection, so grouped
    /// output can be keyed the way it was selected.
    fn parse_group_by(&mut self) -> Result<Option<Vec<String>>> {
        if !self.cur_token.is_keyword("GROUP") {
            return Ok(None);
        }
        self.next_token()?;
        self.expect_keyword("BY")?;

        let mut fields = vec![self.parse_field()?];
        while self.cur_token.is_punctuator(",") {
            self.next_token()?;
            fields.push(self.parse_field()?);
        }

        Ok(Some(fields))
    }

    /// Parse an optional `ORDER BY <field> [ASC|DESC], ...`
    ///
    /// Aggregate tokens are valid sort keys: grouped rows carry them as
    /// columns, so `ORDER BY COUNT(*) DESC` sorts groups by size.
    fn parse_order_by(&mut self) -> Result<Option<Vec<OrderByField>>> {
        if !self.cur_token.is_keyword("ORDER") {
            return Ok(None);
        }
        self.next_token()?;
        self.expect_keyword("BY")?;

        let mut fields = Vec::new();
        loop {
            let field = self.parse_field()?;

            let direction = if self.cur_token.is_keyword("ASC") {
                self.next_token()?;
                SortDirection::Asc
            } else if self.cur_token.is_keyword("DESC") {
                self.next_token()?;
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };

            fields.push(OrderByField { field, direction });

            if !self.cur_token.is_punctuator(",") {
                break;
            }
            self.next_token()?;
        }

        Ok(Some(fields))
    }

    /// Parse an optional `LIMIT <n>`
    fn parse_limit(&mut self) -> Result<Option<usize>> {
        if !self.cur_token.is_keyword("LIMIT") {
            return Ok(None);
        }
        self.next_token()?;

        if self.cur_token.token_type != TokenType::Integer {
            return Err(self.error(format!(
                "expected row count after LIMIT, got '{}'",
                self.cur_token.literal
            )));
        }

        let limit = self
            .cur_token
            .literal
            .parse::<usize>()
            .map_err(|_| self.error("LIMIT value out of range"))?;
        self.next_token()?;

        Ok(Some(limit))
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Parse a bare or `table.field`-qualified identifier
    fn parse_qualified_name(&mut self) -> Result<String> {
        let name = self.parse_identifier("identifier")?;

        if self.cur_token.is_punctuator(".") {
            self.next_token()?;
            let field = self.parse_identifier("field name after '.'")?;
            return Ok(format!("{}.{}", name, field));
        }

        Ok(name)
    }

    /// Consume the current token as an identifier
    fn parse_identifier(&mut self, what: &str) -> Result<String> {
        if self.cur_token.token_type != TokenType::Identifier {
            return Err(self.error(format!(
                "expected {}, got '{}'",
                what, self.cur_token.literal
            )));
        }
        let name = self.cur_token.literal.clone();
        self.next_token()?;
        Ok(name)
    }

    /// Consume the current token as a specific keyword
    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if !self.cur_token.is_keyword(keyword) {
            return Err(self.error(format!(
                "expected {}, got '{}'",
                keyword, self.cur_token.literal
            )));
        }
        self.next_token()
    }

    /// Advance to the next token, surfacing lexer errors
    fn next_token(&mut self) -> Result<()> {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
        self.check_error_token()
    }

    /// Fail on a lexer error token at the current position
    fn check_error_token(&self) -> Result<()> {
        if self.cur_token.is_error() {
            let message = self
                .cur_token
                .error
                .clone()
                .unwrap_or_else(|| "invalid token".to_string());
            return Err(self.error(message));
        }
        Ok(())
    }

    /// Build a positioned parse error at the current token
    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse(ParseError::with_context(
            message,
            self.cur_token.position,
            self.input.clone(),
        ))
    }
}
