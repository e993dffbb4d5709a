//! Editor error types.

use easel_core::CoreError;
use easel_hooks::HookError;
use easel_plugins::PluginError;
use thiserror::Error;

/// Errors surfaced by editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A plugin call or registration failed.
    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// The document could not be parsed, applied or encoded.
    #[error("Document error: {0}")]
    Document(#[from] CoreError),

    /// A hook chain was blocked, timed out or was cancelled.
    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    /// Reading or writing a document file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The editor has been closed.
    #[error("editor is closed")]
    Closed,
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
