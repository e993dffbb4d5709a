//! Hook pipeline errors.

use thiserror::Error;

use crate::hook::HookPoint;

/// Errors raised by hook callbacks and pipeline calls.
#[derive(Debug, Error)]
pub enum HookError {
    /// A callback reported failure.
    #[error("hook callback failed: {0}")]
    Callback(String),

    /// A callback dropped its completion signal without using it.
    #[error("hook callback dropped its completion signal")]
    CompletionDropped,

    /// A callback panicked.
    #[error("hook callback panicked: {0}")]
    Panicked(String),

    /// A callback registered with `FailAction::Block` failed.
    #[error("hook '{hook}' blocked {point}: {reason}")]
    Blocked {
        /// Hook point that was running.
        point: HookPoint,
        /// Name of the failing callback.
        hook: String,
        /// Failure message.
        reason: String,
    },

    /// The call did not finish in time.
    #[error("{point} hooks timed out after {timeout_ms}ms")]
    TimedOut {
        /// Hook point that was running.
        point: HookPoint,
        /// Applied bound.
        timeout_ms: u64,
    },

    /// The call was cancelled.
    #[error("{point} hooks cancelled")]
    Cancelled {
        /// Hook point that was running.
        point: HookPoint,
    },
}

/// Result type for hook operations.
pub type HookResult<T> = Result<T, HookError>;
