//! Event bus errors.

use thiserror::Error;

/// Errors raised when declaring events.
#[derive(Debug, Error)]
pub enum EventError {
    /// Another owner already declared this event name.
    #[error("event '{name}' is already declared by '{owner}' (claimed by '{claimant}')")]
    NameCollision {
        /// Contested name.
        name: String,
        /// Current owner.
        owner: String,
        /// Component that tried to declare it.
        claimant: String,
    },

    /// The event name is empty.
    #[error("invalid event name: {0:?}")]
    InvalidName(String),
}

/// Result type for event operations.
pub type EventResult<T> = Result<T, EventError>;
