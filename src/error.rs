//! Error types for the impact engine and session layer.

use crate::models::KpiId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A KPI parameter is missing, unknown, mismatched or non-finite.
    #[error("Invalid input for {}: {reason}", kpi.name())]
    InvalidInput {
        kpi: KpiId,
        field: Option<String>,
        reason: String,
    },

    /// An agent cannot be committed as it stands.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A session document failed the version or shape check.
    #[error("Invalid session document: {0}")]
    Format(String),

    /// A session file could not be read or written.
    #[error("I/O error: {0}")]
    Io(String),

    /// The report renderer did not produce a document.
    #[error("Report export failed: {0}")]
    ExportFailure(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub fn invalid_input(kpi: KpiId, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            kpi,
            field: None,
            reason: reason.into(),
        }
    }

    pub fn invalid_field(kpi: KpiId, field: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            kpi,
            field: Some(field.to_string()),
            reason: format!("{}: {}", field, reason.into()),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Format(e.to_string())
    }
}
