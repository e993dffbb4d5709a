//! Core error types.

use thiserror::Error;

/// Errors raised by scene graph and document operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An object identifier failed validation.
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    /// A user object tried to take the workspace's reserved identifier.
    #[error("object id '{0}' is reserved for the workspace")]
    ReservedId(String),

    /// An object with the same identifier is already in the scene.
    #[error("duplicate object id: {0}")]
    DuplicateObject(String),

    /// The requested object does not exist.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// The serialized document is structurally invalid.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
