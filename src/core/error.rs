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

//! Error types for csvql
//!
//! This module defines all error types used throughout the query engine.

use thiserror::Error;

use crate::parser::ParseError;

/// Result type alias for csvql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for csvql operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // =========================================================================
    // Parse errors
    // =========================================================================
    /// Query does not match the supported SELECT grammar
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    // =========================================================================
    // Evaluation errors
    // =========================================================================
    /// Comparison operator outside the supported set
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Aggregate function outside the supported set
    #[error("unsupported aggregate function: {0}")]
    UnsupportedAggregate(String),

    /// Qualified field in a join condition matches neither joined table
    #[error("field '{field}' cannot be resolved against either joined table")]
    FieldResolution { field: String },

    // =========================================================================
    // Loader errors
    // =========================================================================
    /// Table could not be resolved to a CSV source
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// CSV decode failure
    #[error("csv error: {message}")]
    Csv { message: String },

    /// I/O failure from the underlying source
    #[error("io error: {message}")]
    Io { message: String },
}

impl Error {
    /// Create an I/O error from a message
    pub fn io(message: impl Into<String>) -> Self {
        Error::Io {
            message: message.into(),
        }
    }

    /// Check if this error is a parse error
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TableNotFound("student".to_string());
        assert_eq!(err.to_string(), "table 'student' not found");

        let err = Error::UnsupportedOperator("~=".to_string());
        assert_eq!(err.to_string(), "unsupported operator: ~=");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io { .. }));
    }
}
