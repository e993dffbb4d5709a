//! Deep merge of TOML value trees.
//!
//! Merging raw [`toml::Value`] trees keeps "absent" distinct from "default":
//! a key missing from an overlay never overrides the layer beneath it.

use std::collections::BTreeMap;

/// Which configuration layer a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Compiled-in defaults (`defaults.toml`).
    Defaults,
    /// User configuration (`~/.easel/config.toml`).
    User,
    /// Project configuration (`{project}/.easel/config.toml`).
    Project,
    /// Environment variable fallback.
    Environment,
}

impl std::fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::User => write!(f, "user (~/.easel/config.toml)"),
            Self::Project => write!(f, "project (.easel/config.toml)"),
            Self::Environment => write!(f, "environment variable"),
        }
    }
}

/// Dotted field path to the layer that set it.
pub type FieldSources = BTreeMap<String, ConfigLayer>;

/// Recursively merge `overlay` into `base`.
///
/// Tables merge per key; scalars and arrays from the overlay replace the
/// base value.
pub fn deep_merge(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                if let Some(base_val) = base_table.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
        },
    }
}

/// Merge like [`deep_merge`] and record the layer of every leaf it sets.
pub fn deep_merge_tracking(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    layer: ConfigLayer,
    sources: &mut FieldSources,
) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let path = join(prefix, key);
                if let Some(base_val) = base_table.get_mut(key) {
                    if overlay_val.is_table() {
                        deep_merge_tracking(base_val, overlay_val, &path, layer, sources);
                    } else {
                        *base_val = overlay_val.clone();
                        sources.insert(path, layer);
                    }
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                    record_leaves(overlay_val, &path, layer, sources);
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
            sources.insert(prefix.to_owned(), layer);
        },
    }
}

/// Record every leaf under `val` as coming from `layer`.
pub fn record_leaves(val: &toml::Value, prefix: &str, layer: ConfigLayer, sources: &mut FieldSources) {
    if let toml::Value::Table(table) = val {
        for (key, child) in table {
            record_leaves(child, &join(prefix, key), layer, sources);
        }
    } else {
        sources.insert(prefix.to_owned(), layer);
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_tables_merge_scalars_replace() {
        let mut base = parse(
            r#"
            [viewport]
            fit_ratio = 0.85
            min_zoom = 0.05
            [logging]
            directives = ["a"]
        "#,
        );
        let overlay = parse(
            r#"
            [viewport]
            fit_ratio = 0.9
            [logging]
            directives = ["b", "c"]
        "#,
        );
        deep_merge(&mut base, &overlay);

        assert_eq!(base["viewport"]["fit_ratio"].as_float(), Some(0.9));
        assert_eq!(base["viewport"]["min_zoom"].as_float(), Some(0.05));
        assert_eq!(base["logging"]["directives"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_tracking_records_layers() {
        let mut base = parse("[history]\nmax_entries = 100\nsettle_grace_ms = 150");
        let mut sources = FieldSources::new();
        record_leaves(&base, "", ConfigLayer::Defaults, &mut sources);

        let overlay = parse("[history]\nmax_entries = 20\n[surface]\nready_retries = 3");
        deep_merge_tracking(&mut base, &overlay, "", ConfigLayer::Project, &mut sources);

        assert_eq!(sources.get("history.max_entries"), Some(&ConfigLayer::Project));
        assert_eq!(sources.get("history.settle_grace_ms"), Some(&ConfigLayer::Defaults));
        assert_eq!(sources.get("surface.ready_retries"), Some(&ConfigLayer::Project));
    }
}
