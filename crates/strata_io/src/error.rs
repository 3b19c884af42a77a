//! Error types for the JSON and CSV codecs.

use std::path::Path;
use thiserror::Error;

use strata_data::DataError;

/// Errors raised while loading or saving documents and grids.
///
/// A codec failure aborts the whole load/save operation; partial writes
/// are not rolled back and nothing retries.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("{path}: resource unavailable")]
    ResourceUnavailable { path: String },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub fn malformed(message: impl Into<String>) -> Self {
        CodecError::Malformed(message.into())
    }

    pub fn resource_unavailable(path: &Path) -> Self {
        CodecError::ResourceUnavailable {
            path: path.display().to_string(),
        }
    }
}
