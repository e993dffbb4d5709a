//! Config file discovery and layered loading.
//!
//! `Config::load()` proceeds as follows:
//! 1. Parse the embedded `defaults.toml`
//! 2. Merge `~/.easel/config.toml` (user)
//! 3. Merge `{project}/.easel/config.toml` (project)
//! 4. Apply `EASEL_*` fallbacks to fields still at their default
//! 5. Deserialize and validate

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, record_leaves};
use crate::show::ResolvedConfig;
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
pub(crate) const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MiB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Directory name holding config files under the home and project roots.
const CONFIG_DIR: &str = ".easel";

/// Load the layered configuration.
///
/// `home_override` replaces the home directory used for the user layer. If
/// `project_root` is `None` the project layer is skipped.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a config file is malformed or the merged
/// configuration fails validation.
pub fn load(project_root: Option<&Path>, home_override: Option<&Path>) -> ConfigResult<ResolvedConfig> {
    load_with_env(project_root, home_override, &collect_env_vars())
}

/// [`load`] with an explicit environment.
///
/// # Errors
///
/// Same as [`load`].
pub fn load_with_env<S: std::hash::BuildHasher>(
    project_root: Option<&Path>,
    home_override: Option<&Path>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<ResolvedConfig> {
    let home_dir = match home_override {
        Some(h) => h.to_path_buf(),
        None => home_directory()?,
    };

    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;
    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", ConfigLayer::Defaults, &mut field_sources);

    let user_path = home_dir.join(CONFIG_DIR).join("config.toml");
    if let Some(overlay) = try_load_file(&user_path)? {
        deep_merge_tracking(&mut merged, &overlay, "", ConfigLayer::User, &mut field_sources);
        loaded_files.push(user_path.display().to_string());
        info!(path = %user_path.display(), "loaded user config");
    }

    if let Some(root) = project_root {
        let project_path = root.join(CONFIG_DIR).join("config.toml");
        if let Some(overlay) = try_load_file(&project_path)? {
            deep_merge_tracking(
                &mut merged,
                &overlay,
                "",
                ConfigLayer::Project,
                &mut field_sources,
            );
            loaded_files.push(project_path.display().to_string());
            info!(path = %project_path.display(), "loaded project config");
        }
    }

    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    let config: Config = merged
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: "<merged config>".to_owned(),
            source: e,
        })?;

    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Load a config from one file, without layering.
///
/// Missing keys take their defaults.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, is too large, does
/// not parse or fails validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let value = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
        path: path.display().to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })?;
    let config: Config = value
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Read and parse a file, returning `None` if it does not exist.
///
/// The size check happens after a single read so the file cannot change
/// between the check and the read.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                content.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(Some(value))
}

fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(root: &Path, body: &str) {
        let dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), body).unwrap();
    }

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_defaults_deserialize_to_default_config() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_with_no_files() {
        let home = tempfile::tempdir().unwrap();
        let resolved = load_with_env(None, Some(home.path()), &no_env()).unwrap();
        assert_eq!(resolved.config, Config::default());
        assert!(resolved.loaded_files.is_empty());
        assert_eq!(
            resolved.field_sources.get("history.settle_grace_ms"),
            Some(&ConfigLayer::Defaults)
        );
    }

    #[test]
    fn test_project_overrides_user() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        write_config(
            home.path(),
            "[history]\nmax_entries = 30\nsettle_grace_ms = 10\n",
        );
        write_config(project.path(), "[history]\nmax_entries = 5\n");

        let resolved = load_with_env(Some(project.path()), Some(home.path()), &no_env()).unwrap();
        assert_eq!(resolved.config.history.max_entries, 5);
        assert_eq!(resolved.config.history.settle_grace_ms, 10);
        assert_eq!(resolved.loaded_files.len(), 2);
        assert_eq!(
            resolved.field_sources.get("history.max_entries"),
            Some(&ConfigLayer::Project)
        );
        assert_eq!(
            resolved.field_sources.get("history.settle_grace_ms"),
            Some(&ConfigLayer::User)
        );
    }

    #[test]
    fn test_env_fallback_only_for_defaults() {
        let home = tempfile::tempdir().unwrap();
        write_config(home.path(), "[logging]\nformat = \"pretty\"\n");
        let env: HashMap<String, String> = [
            ("EASEL_LOG_LEVEL".to_owned(), "debug".to_owned()),
            ("EASEL_LOG_FORMAT".to_owned(), "json".to_owned()),
        ]
        .into_iter()
        .collect();

        let resolved = load_with_env(None, Some(home.path()), &env).unwrap();
        assert_eq!(resolved.config.logging.level, "debug");
        assert_eq!(resolved.config.logging.format, "pretty");
    }

    #[test]
    fn test_invalid_merged_config_rejected() {
        let home = tempfile::tempdir().unwrap();
        write_config(home.path(), "[viewport]\nfit_ratio = 0.0\n");
        let err = load_with_env(None, Some(home.path()), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { field, .. } if field == "viewport.fit_ratio"));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let home = tempfile::tempdir().unwrap();
        write_config(home.path(), "[viewport\nbroken");
        let err = load_with_env(None, Some(home.path()), &no_env()).unwrap_err();
        match err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("config.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_file_nonexistent() {
        let result = load_file(Path::new("/nonexistent/easel.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_load_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("easel.toml");
        std::fs::write(&path, "[guides]\nout_tolerance_px = 3.0\n").unwrap();
        let config = load_file(&path).unwrap();
        assert_eq!(config.guides.out_tolerance_px, 3.0);
        assert_eq!(config.viewport.fit_ratio, 0.85);
    }

    #[test]
    fn test_oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        std::fs::write(&file_path, data).unwrap();

        let result = try_load_file(&file_path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
