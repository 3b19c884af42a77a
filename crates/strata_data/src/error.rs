//! Error types for the data model.

use thiserror::Error;

/// Errors raised by the strict accessors and parsers of the data model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("'{name}' was not found")]
    NotFound { name: String },

    #[error("'{name}' does not match a data type")]
    InvalidType { name: String },

    #[error("'{value}' cannot be parsed as a number")]
    InvalidNumber { value: String },
}

impl DataError {
    pub fn not_found(name: impl Into<String>) -> Self {
        DataError::NotFound { name: name.into() }
    }
}
