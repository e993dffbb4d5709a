//! Workspace engine errors.

use thiserror::Error;

/// Errors from the workspace engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkspaceError {
    /// A viewport or guide setting is out of range.
    #[error("invalid setting '{field}': {message}")]
    InvalidSetting {
        /// Field name within its settings struct.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl WorkspaceError {
    /// The offending field, if this is a setting error.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidSetting { field, .. } => field,
        }
    }
}

/// Result type for workspace operations.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
