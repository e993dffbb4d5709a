//! Plugins every editor registers before any user plugin.
//!
//! Each one exposes string-keyed APIs on the facade and publishes a typed
//! capability for callers that prefer compile-time signatures.

use std::sync::Arc;

use easel_core::RenderSurface;
use easel_history::Suppression;
use easel_plugins::{PluginError, PluginFactory, PluginResult};
use easel_workspace::WorkspaceResult;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::settings::EditorSettings;

mod guides;
mod history;
mod workspace;

pub use guides::{GUIDE_APIS, GUIDES_PLUGIN, GuidesFactory, GuidesPlugin};
pub use history::{HISTORY_APIS, HISTORY_PLUGIN, HistoryFactory, HistoryPlugin};
pub use workspace::{WORKSPACE_APIS, WORKSPACE_PLUGIN, WorkspaceFactory, WorkspacePlugin};

/// The built-in factories in registration order.
#[must_use]
pub fn factories(
    surface: &Arc<dyn RenderSurface>,
    settings: &EditorSettings,
    suppression: &Suppression,
) -> Vec<Box<dyn PluginFactory>> {
    vec![
        Box::new(WorkspaceFactory::new(Arc::clone(surface), settings.viewport)),
        Box::new(HistoryFactory::new(settings.history.max_entries, suppression.clone())),
        Box::new(GuidesFactory::new(Arc::clone(surface), settings.guides)),
    ]
}

pub(crate) fn parse_args<T: DeserializeOwned>(api: &str, args: Value) -> PluginResult<T> {
    serde_json::from_value(args).map_err(|e| PluginError::invalid_arguments(api, e.to_string()))
}

pub(crate) fn to_json<T: Serialize>(api: &str, value: &T) -> PluginResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| PluginError::ExecutionFailed(format!("{api}: failed to encode result: {e}")))
}

pub(crate) fn unknown_api(plugin: &str, api: &str) -> PluginError {
    PluginError::ExecutionFailed(format!("{plugin} has no api '{api}'"))
}

/// Overlay the keys of `options` onto the serialized `base`.
pub(crate) fn merge_options<T>(base: &T, options: &Value) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = serde_json::to_value(base)?;
    if let (Some(target), Some(overlay)) = (merged.as_object_mut(), options.as_object()) {
        for (key, value) in overlay {
            target.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(merged)
}

/// Overlay plugin `options` onto `base` and check the result is usable.
pub(crate) fn configure<T>(
    plugin: &str,
    base: &T,
    options: &Value,
    validate: impl FnOnce(&T) -> WorkspaceResult<()>,
) -> PluginResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let failed = |message: String| PluginError::ConstructionFailed {
        plugin_id: plugin.to_string(),
        message,
    };
    let config: T = merge_options(base, options).map_err(|e| failed(format!("invalid options: {e}")))?;
    validate(&config).map_err(|e| failed(e.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_workspace::ViewportConfig;
    use serde_json::json;

    #[test]
    fn test_merge_options_overlays_keys() {
        let base = ViewportConfig::default();
        let merged: ViewportConfig = merge_options(&base, &json!({ "fit_ratio": 0.5 })).unwrap();
        assert_eq!(merged.fit_ratio, 0.5);
        assert_eq!(merged.max_zoom, base.max_zoom);

        let untouched: ViewportConfig = merge_options(&base, &Value::Null).unwrap();
        assert_eq!(untouched, base);
    }

    #[test]
    fn test_configure_rejects_unusable_options() {
        let base = ViewportConfig::default();
        for options in [
            json!({ "fit_ratio": 0.0 }),
            json!({ "min_zoom": 5.0, "max_zoom": 1.0 }),
            json!({ "zoom_step": "fast" }),
        ] {
            let err = configure("workspace", &base, &options, ViewportConfig::validate).unwrap_err();
            assert!(
                matches!(&err, PluginError::ConstructionFailed { plugin_id, .. } if plugin_id == "workspace"),
                "{options}: {err}"
            );
        }
        let ok = configure("workspace", &base, &json!({ "fit_ratio": 0.5 }), ViewportConfig::validate).unwrap();
        assert_eq!(ok.fit_ratio, 0.5);
    }

    #[test]
    fn test_parse_args_reports_api() {
        let err = parse_args::<f64>("setZoom", json!("fast")).unwrap_err();
        assert!(matches!(err, PluginError::InvalidArguments { api, .. } if api == "setZoom"));
    }
}
