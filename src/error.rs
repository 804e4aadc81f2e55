//! Error types for projection runs and their input/output surfaces

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectionError {
    /// A precondition on the input parameters failed
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProjectionError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if this is an input validation failure
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
