//! CLI handlers for the `easel config` subcommand.

use anyhow::Result;
use easel_config::{ResolvedConfig, ShowFormat};

/// Show the resolved configuration with source annotations.
pub(crate) fn show_config(resolved: &ResolvedConfig, format: &str, section: Option<&str>) -> Result<()> {
    let show_format = match format {
        "json" => ShowFormat::Json,
        _ => ShowFormat::Toml,
    };

    let output = resolved
        .show(show_format, section)
        .map_err(|e| anyhow::anyhow!("failed to format config: {e}"))?;

    println!("{output}");
    Ok(())
}

/// Report whether the configuration loaded and validated.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn validate_config(loaded: Result<ResolvedConfig>) -> Result<()> {
    match loaded {
        Ok(resolved) => {
            println!("Configuration is valid.");
            if !resolved.loaded_files.is_empty() {
                println!("\nLoaded files:");
                for path in &resolved.loaded_files {
                    println!("  - {path}");
                }
            }
            Ok(())
        },
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            std::process::exit(1);
        },
    }
}

/// Show all config file paths that are checked.
#[allow(clippy::unnecessary_wraps)]
pub(crate) fn show_paths() -> Result<()> {
    let home = directories::BaseDirs::new().map(|d| d.home_dir().to_string_lossy().to_string());

    let workspace = std::env::current_dir()
        .ok()
        .map(|p| p.to_string_lossy().to_string());

    let paths = ResolvedConfig::config_paths(home.as_deref(), workspace.as_deref());

    println!("Configuration files checked (in precedence order):\n");
    for (i, path) in paths.iter().enumerate() {
        let exists = std::path::Path::new(path).exists();
        let status = if exists { "found" } else { "not found" };
        println!("  {}. {path}  [{status}]", i.saturating_add(1));
    }

    println!("\nEnvironment variable fallbacks:");
    println!("  EASEL_LOG_LEVEL  -> logging.level");
    println!("  EASEL_LOG_FORMAT -> logging.format");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_config::Config;

    #[test]
    fn test_show_known_section() {
        let resolved = ResolvedConfig::unlayered(Config::default());
        assert!(show_config(&resolved, "toml", Some("viewport")).is_ok());
        assert!(show_config(&resolved, "json", None).is_ok());
    }

    #[test]
    fn test_show_unknown_section_fails() {
        let resolved = ResolvedConfig::unlayered(Config::default());
        assert!(show_config(&resolved, "toml", Some("nonexistent")).is_err());
    }
}
