//! The editor facade: one merged surface over every plugin's API.
//!
//! API names are looked up at call time, so callers can probe for optional
//! plugins with [`Facade::try_invoke`] instead of failing hard.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use crate::capability::{Capability, GuideCapability, HistoryCapability, WorkspaceCapability};
use crate::error::{PluginError, PluginResult, panic_message};
use crate::plugin::{Plugin, PluginId};

const NOT_PROVIDED: &str = "no registered plugin provides it";

struct ApiBinding {
    owner: PluginId,
    plugin: Arc<dyn Plugin>,
}

#[derive(Default)]
struct FacadeState {
    apis: BTreeMap<String, ApiBinding>,
    unavailable: BTreeMap<String, String>,
    capabilities: Vec<(PluginId, Capability)>,
}

/// Merged, name-keyed view of all registered plugin APIs.
#[derive(Default)]
pub struct Facade {
    state: RwLock<FacadeState>,
}

impl std::fmt::Debug for Facade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Facade")
            .field("apis", &self.api_names())
            .finish_non_exhaustive()
    }
}

impl Facade {
    /// Create an empty facade.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, FacadeState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, FacadeState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ---- calls ----

    /// Call an API method.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::CapabilityUnavailable`] if no plugin provides
    /// `api`, carrying the registration failure reason when the owner failed.
    /// Errors and panics from the plugin are returned as errors.
    pub fn invoke(&self, api: &str, args: Value) -> PluginResult<Value> {
        let (owner, plugin) = {
            let state = self.read();
            match state.apis.get(api) {
                Some(binding) => (binding.owner.clone(), Arc::clone(&binding.plugin)),
                None => {
                    let reason = state
                        .unavailable
                        .get(api)
                        .cloned()
                        .unwrap_or_else(|| NOT_PROVIDED.to_string());
                    return Err(PluginError::CapabilityUnavailable {
                        api: api.to_string(),
                        reason,
                    });
                },
            }
        };

        debug!(api, plugin = %owner, "Invoking plugin API");
        match std::panic::catch_unwind(AssertUnwindSafe(|| plugin.call(api, args))) {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!(api, plugin = %owner, error = %message, "Plugin API panicked");
                Err(PluginError::ExecutionFailed(format!(
                    "{owner}.{api} panicked: {message}"
                )))
            },
        }
    }

    /// Call an API method if some plugin provides it.
    ///
    /// Returns `Ok(None)` when the capability is unavailable.
    ///
    /// # Errors
    ///
    /// Errors raised by the plugin itself are passed through.
    pub fn try_invoke(&self, api: &str, args: Value) -> PluginResult<Option<Value>> {
        match self.invoke(api, args) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_unavailable() => {
                debug!(api, "Optional API not available");
                Ok(None)
            },
            Err(e) => Err(e),
        }
    }

    // ---- introspection ----

    /// All bound API names, sorted.
    #[must_use]
    pub fn api_names(&self) -> Vec<String> {
        self.read().apis.keys().cloned().collect()
    }

    /// Whether `api` is bound.
    #[must_use]
    pub fn has_api(&self, api: &str) -> bool {
        self.read().apis.contains_key(api)
    }

    /// The plugin that provides `api`.
    #[must_use]
    pub fn owner_of(&self, api: &str) -> Option<PluginId> {
        self.read().apis.get(api).map(|b| b.owner.clone())
    }

    /// APIs marked unavailable, with the reason.
    #[must_use]
    pub fn unavailable_apis(&self) -> Vec<(String, String)> {
        self.read()
            .unavailable
            .iter()
            .map(|(api, reason)| (api.clone(), reason.clone()))
            .collect()
    }

    // ---- capabilities ----

    /// The history capability, if a plugin publishes one.
    #[must_use]
    pub fn history(&self) -> Option<Arc<dyn HistoryCapability>> {
        self.read().capabilities.iter().find_map(|(_, c)| match c {
            Capability::History(h) => Some(Arc::clone(h)),
            _ => None,
        })
    }

    /// The workspace capability, if a plugin publishes one.
    #[must_use]
    pub fn workspace(&self) -> Option<Arc<dyn WorkspaceCapability>> {
        self.read().capabilities.iter().find_map(|(_, c)| match c {
            Capability::Workspace(w) => Some(Arc::clone(w)),
            _ => None,
        })
    }

    /// The guide capability, if a plugin publishes one.
    #[must_use]
    pub fn guides(&self) -> Option<Arc<dyn GuideCapability>> {
        self.read().capabilities.iter().find_map(|(_, c)| match c {
            Capability::Guides(g) => Some(Arc::clone(g)),
            _ => None,
        })
    }

    // ---- binding (registry side) ----

    /// Bind `apis` to `plugin`. All-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ApiCollision`] if another plugin already
    /// provides one of the names.
    pub(crate) fn bind(
        &self,
        owner: &PluginId,
        apis: &[String],
        plugin: &Arc<dyn Plugin>,
    ) -> PluginResult<()> {
        let mut state = self.write();
        for api in apis {
            if let Some(existing) = state.apis.get(api)
                && existing.owner != *owner
            {
                return Err(PluginError::ApiCollision {
                    api: api.clone(),
                    owner: existing.owner.to_string(),
                    claimant: owner.to_string(),
                });
            }
        }
        for api in apis {
            state.unavailable.remove(api);
            state.apis.insert(
                api.clone(),
                ApiBinding {
                    owner: owner.clone(),
                    plugin: Arc::clone(plugin),
                },
            );
        }
        Ok(())
    }

    /// Drop every binding and capability of `owner`. Returns the number of
    /// API names released.
    pub(crate) fn unbind_owner(&self, owner: &PluginId) -> usize {
        let mut state = self.write();
        let before = state.apis.len();
        state.apis.retain(|_, b| b.owner != *owner);
        state.capabilities.retain(|(o, _)| o != owner);
        before.saturating_sub(state.apis.len())
    }

    /// Record that `apis` are unavailable. Names bound to another plugin are
    /// left alone.
    pub(crate) fn mark_unavailable(&self, apis: &[String], reason: &str) {
        let mut state = self.write();
        for api in apis {
            if !state.apis.contains_key(api) {
                state.unavailable.insert(api.clone(), reason.to_string());
            }
        }
    }

    pub(crate) fn add_capability(&self, owner: &PluginId, capability: Capability) {
        debug!(plugin = %owner, capability = capability.kind(), "Capability published");
        self.write().capabilities.push((owner.clone(), capability));
    }
}
