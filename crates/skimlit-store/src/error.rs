use std::path::PathBuf;

use skimlit_core::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("metrics file not found: {0}")]
    NotFound(PathBuf),

    #[error("no evaluation plot (.png, .jpg, .svg) in {0}")]
    NoImage(PathBuf),

    #[error("{table} metrics table is malformed: {reason}")]
    Malformed { table: &'static str, reason: String },

    #[error("model and baseline tables have different columns: {model:?} vs {baseline:?}")]
    SchemaMismatch {
        model: Vec<String>,
        baseline: Vec<String>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl From<&StoreError> for ServiceError {
    fn from(err: &StoreError) -> Self {
        ServiceError::MetricsUnavailable(err.to_string())
    }
}
