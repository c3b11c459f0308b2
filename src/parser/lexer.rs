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

//! Tokenizer for the SELECT subset
//!
//! String literals are single tokens here, which is what makes clause
//! detection safe: a WHERE value containing "ORDER BY" can never be
//! mistaken for an ORDER BY clause.

use super::token::{
    is_keyword, is_operator, is_operator_char, is_punctuator, Position, Token, TokenType,
};

/// Tokenizer for query input
pub struct Lexer {
    /// Input string
    input: Vec<char>,
    /// Current position in input (points to current char)
    position: usize,
    /// Current reading position in input (after current char)
    read_position: usize,
    /// Current character under examination
    ch: char,
    /// Current position tracking
    pos: Position,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let mut lexer = Self {
            input: chars,
            position: 0,
            read_position: 0,
            ch: '\0',
            pos: Position::new(0, 1, 1),
        };
        lexer.read_char();
        lexer
    }

    /// Read the next character
    fn read_char(&mut self) {
        if self.ch == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else if self.ch != '\0' {
            self.pos.column += 1;
        }

        if self.read_position >= self.input.len() {
            self.ch = '\0';
        } else {
            self.ch = self.input[self.read_position];
            self.position = self.read_position;
            self.read_position += 1;
        }

        self.pos.offset = self.position;
    }

    /// Peek at the next character without advancing
    fn peek_char(&self) -> char {
        if self.read_position >= self.input.len() {
            '\0'
        } else {
            self.input[self.read_position]
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let pos = self.pos;

        match self.ch {
            '\0' => Token::eof(pos),

            // String literal (single or double quotes)
            '\'' | '"' => match self.read_string_literal() {
                Ok(literal) => Token::new(TokenType::String, literal, pos),
                Err(message) => Token::error(message, "", pos),
            },

            // Number literal, optionally negative
            c if c.is_ascii_digit() => {
                let literal = self.read_number();
                if literal.contains('.') {
                    Token::new(TokenType::Float, literal, pos)
                } else {
                    Token::new(TokenType::Integer, literal, pos)
                }
            }
            '-' if self.peek_char().is_ascii_digit() => {
                let literal = self.read_number();
                if literal.contains('.') {
                    Token::new(TokenType::Float, literal, pos)
                } else {
                    Token::new(TokenType::Integer, literal, pos)
                }
            }

            // Star: operator token, the parser treats it as COUNT(*) / field
            '*' => {
                self.read_char();
                Token::new(TokenType::Operator, "*", pos)
            }

            // Punctuator
            c if is_punctuator(c) => {
                self.read_char();
                Token::new(TokenType::Punctuator, c.to_string(), pos)
            }

            // Operator
            c if is_operator_char(c) => {
                let literal = self.read_operator();
                if is_operator(&literal) {
                    Token::new(TokenType::Operator, literal, pos)
                } else {
                    Token::error(format!("unrecognized operator: {}", literal), literal, pos)
                }
            }

            // Identifier or keyword
            c if c.is_alphabetic() || c == '_' => {
                let literal = self.read_identifier();
                if is_keyword(&literal) {
                    Token::new(TokenType::Keyword, literal.to_uppercase(), pos)
                } else {
                    Token::new(TokenType::Identifier, literal, pos)
                }
            }

            // Unrecognized character
            c => {
                self.read_char();
                Token::error(
                    format!("unrecognized character: {:?}", c),
                    c.to_string(),
                    pos,
                )
            }
        }
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while self.ch.is_whitespace() {
            self.read_char();
        }
    }

    /// Read an identifier
    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        result.push(self.ch);
        self.read_char();

        while self.ch.is_alphanumeric() || self.ch == '_' {
            result.push(self.ch);
            self.read_char();
        }

        result
    }

    /// Read a number (integer or float)
    fn read_number(&mut self) -> String {
        let mut result = String::new();
        result.push(self.ch);
        self.read_char();

        while self.ch.is_ascii_digit() {
            result.push(self.ch);
            self.read_char();
        }

        if self.ch == '.' && self.peek_char().is_ascii_digit() {
            result.push(self.ch);
            self.read_char();

            while self.ch.is_ascii_digit() {
                result.push(self.ch);
                self.read_char();
            }
        }

        result
    }

    /// Read a string literal, returning its content without the quotes
    ///
    /// A doubled quote is the SQL-standard escape: 'it''s' reads as it's.
    fn read_string_literal(&mut self) -> std::result::Result<String, String> {
        let quote = self.ch;
        let mut result = String::new();
        self.read_char(); // consume opening quote

        loop {
            if self.ch == '\0' {
                return Err("unterminated string literal".to_string());
            } else if self.ch == quote {
                if self.peek_char() == quote {
                    result.push(self.ch);
                    self.read_char();
                    self.read_char();
                } else {
                    self.read_char();
                    break;
                }
            } else {
                result.push(self.ch);
                self.read_char();
            }
        }

        Ok(result)
    }

    /// Read an operator (longest match, so >= is never split into > =)
    fn read_operator(&mut self) -> String {
        let mut result = String::new();
        let first_char = self.ch;
        result.push(first_char);
        self.read_char();

        if self.ch != '\0' {
            let two_chars: String = [first_char, self.ch].iter().collect();
            if is_operator(&two_chars) {
                result.push(self.ch);
                self.read_char();
            }
        }

        result
    }
}
