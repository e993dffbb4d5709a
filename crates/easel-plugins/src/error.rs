//! Plugin error types.

use easel_core::CoreError;
use easel_events::EventError;

use crate::plugin::PluginId;

/// Errors from plugin registration and facade calls.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The requested plugin was not found in the registry.
    #[error("plugin not found: {0}")]
    NotFound(PluginId),

    /// A plugin with this ID is already registered.
    #[error("plugin already registered: {0}")]
    AlreadyRegistered(PluginId),

    /// The plugin ID is invalid.
    #[error("invalid plugin id: {0}")]
    InvalidId(String),

    /// Another plugin already contributes this API name.
    #[error("api '{api}' is already provided by '{owner}' (claimed by '{claimant}')")]
    ApiCollision {
        /// Contested API name.
        api: String,
        /// Current owner.
        owner: String,
        /// Plugin that tried to claim it.
        claimant: String,
    },

    /// Declaring the plugin's events failed.
    #[error(transparent)]
    Event(#[from] EventError),

    /// The plugin factory failed or panicked.
    #[error("plugin construction failed: {plugin_id} - {message}")]
    ConstructionFailed {
        /// The plugin that failed.
        plugin_id: String,
        /// Failure reason.
        message: String,
    },

    /// The plugin's init hook failed or panicked.
    #[error("plugin init failed: {plugin_id} - {message}")]
    InitFailed {
        /// The plugin that failed.
        plugin_id: PluginId,
        /// Failure reason.
        message: String,
    },

    /// No registered plugin provides the API.
    #[error("capability unavailable: {api} ({reason})")]
    CapabilityUnavailable {
        /// Requested API name.
        api: String,
        /// Why it is unavailable.
        reason: String,
    },

    /// The arguments passed to an API did not match its contract.
    #[error("invalid arguments for {api}: {message}")]
    InvalidArguments {
        /// API name.
        api: String,
        /// What was wrong.
        message: String,
    },

    /// The plugin failed while serving a call.
    #[error("plugin execution failed: {0}")]
    ExecutionFailed(String),

    /// A scene graph operation failed.
    #[error(transparent)]
    Scene(#[from] CoreError),
}

impl PluginError {
    /// Whether this is [`PluginError::CapabilityUnavailable`].
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable { .. })
    }

    /// Build an [`PluginError::InvalidArguments`] error.
    #[must_use]
    pub fn invalid_arguments(api: &str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            api: api.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
