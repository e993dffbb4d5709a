//! Viewport and guide settings.

use serde::{Deserialize, Serialize};

use crate::error::{WorkspaceError, WorkspaceResult};

fn invalid(field: &'static str, message: String) -> WorkspaceError {
    WorkspaceError::InvalidSetting { field, message }
}

fn positive(field: &'static str, value: f64) -> WorkspaceResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a positive number, got {value}")))
    }
}

fn unit_interval(field: &'static str, value: f64) -> WorkspaceResult<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be in (0, 1], got {value}")))
    }
}

fn or_default(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { default }
}

/// Zoom and fit settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Share of the container the workspace may cover when fitting, in (0, 1].
    pub fit_padding: f64,
    /// Comfortable-viewing ratio applied on top of the fit scale, in (0, 1].
    pub fit_ratio: f64,
    /// Smallest zoom level.
    pub min_zoom: f64,
    /// Largest zoom level.
    pub max_zoom: f64,
    /// Zoom change per zoom-in/zoom-out step.
    pub zoom_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            fit_padding: 1.0,
            fit_ratio: 0.85,
            min_zoom: 0.05,
            max_zoom: 20.0,
            zoom_step: 0.05,
        }
    }
}

impl ViewportConfig {
    /// Check every field is in range and the zoom range is ordered.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidSetting`] for the first bad field.
    pub fn validate(&self) -> WorkspaceResult<()> {
        unit_interval("fit_padding", self.fit_padding)?;
        unit_interval("fit_ratio", self.fit_ratio)?;
        positive("min_zoom", self.min_zoom)?;
        positive("max_zoom", self.max_zoom)?;
        positive("zoom_step", self.zoom_step)?;
        if self.max_zoom < self.min_zoom {
            return Err(invalid(
                "max_zoom",
                format!("must be >= min_zoom ({}), got {}", self.min_zoom, self.max_zoom),
            ));
        }
        Ok(())
    }

    /// A copy usable for viewport math whatever the input: unusable fields
    /// fall back to their defaults, ratios are capped at 1 and the zoom
    /// range is ordered.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let min_zoom = or_default(self.min_zoom, defaults.min_zoom);
        let max_zoom = or_default(self.max_zoom, defaults.max_zoom);
        Self {
            fit_padding: or_default(self.fit_padding, defaults.fit_padding).min(1.0),
            fit_ratio: or_default(self.fit_ratio, defaults.fit_ratio).min(1.0),
            min_zoom: min_zoom.min(max_zoom),
            max_zoom: max_zoom.max(min_zoom),
            zoom_step: or_default(self.zoom_step, defaults.zoom_step),
        }
    }
}

/// Guide and ruler settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Slack, in document pixels, before a guide counts as outside.
    pub out_tolerance_px: f64,
    /// Guide thickness in document pixels.
    pub thickness: f64,
    /// Guide length along its axis.
    pub length: f64,
    /// Smallest on-screen distance between ruler ticks.
    pub min_tick_spacing_px: f64,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            out_tolerance_px: 1.0,
            thickness: 1.0,
            length: 100_000.0,
            min_tick_spacing_px: 50.0,
        }
    }
}

impl GuideConfig {
    /// Check every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidSetting`] for the first bad field.
    pub fn validate(&self) -> WorkspaceResult<()> {
        if !(self.out_tolerance_px.is_finite() && self.out_tolerance_px >= 0.0) {
            return Err(invalid(
                "out_tolerance_px",
                format!("must be a non-negative number, got {}", self.out_tolerance_px),
            ));
        }
        positive("thickness", self.thickness)?;
        positive("length", self.length)?;
        positive("min_tick_spacing_px", self.min_tick_spacing_px)?;
        Ok(())
    }
}
