//! Validation of the merged configuration.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Validate every section. Stops at the first problem.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] naming the offending field.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_workspace(config)?;
    validate_viewport(config)?;
    validate_guides(config)?;
    validate_history(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message: message.into(),
    }
}

fn positive(field: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a positive number, got {value}")))
    }
}

fn unit_interval(field: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be in (0, 1], got {value}")))
    }
}

fn validate_workspace(config: &Config) -> ConfigResult<()> {
    positive("workspace.width", config.workspace.width)?;
    positive("workspace.height", config.workspace.height)?;
    if config.workspace.fill.trim().is_empty() {
        return Err(invalid("workspace.fill", "must not be empty"));
    }
    Ok(())
}

fn validate_viewport(config: &Config) -> ConfigResult<()> {
    let v = &config.viewport;
    unit_interval("viewport.fit_padding", v.fit_padding)?;
    unit_interval("viewport.fit_ratio", v.fit_ratio)?;
    positive("viewport.min_zoom", v.min_zoom)?;
    positive("viewport.max_zoom", v.max_zoom)?;
    positive("viewport.zoom_step", v.zoom_step)?;
    if v.max_zoom < v.min_zoom {
        return Err(invalid(
            "viewport.max_zoom",
            format!("must be >= min_zoom ({}), got {}", v.min_zoom, v.max_zoom),
        ));
    }
    Ok(())
}

fn validate_guides(config: &Config) -> ConfigResult<()> {
    let g = &config.guides;
    if !(g.out_tolerance_px.is_finite() && g.out_tolerance_px >= 0.0) {
        return Err(invalid(
            "guides.out_tolerance_px",
            format!("must be a non-negative number, got {}", g.out_tolerance_px),
        ));
    }
    positive("guides.thickness", g.thickness)?;
    positive("guides.length", g.length)?;
    positive("guides.min_tick_spacing_px", g.min_tick_spacing_px)?;
    Ok(())
}

fn validate_history(config: &Config) -> ConfigResult<()> {
    if config.history.max_entries == 0 {
        return Err(invalid("history.max_entries", "must be at least 1"));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(invalid(
            "logging.level",
            format!("must be one of {LOG_LEVELS:?}, got '{}'", config.logging.level),
        ));
    }
    let format = config.logging.format.to_ascii_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        return Err(invalid(
            "logging.format",
            format!("must be one of {LOG_FORMATS:?}, got '{}'", config.logging.format),
        ));
    }
    Ok(())
}
