//! Configuration types for the Easel editor core.
//!
//! These types do not depend on other easel crates. The editor converts them
//! into its domain settings at startup. Every section implements [`Default`]
//! with the same values as the embedded `defaults.toml`, so a bare
//! `[section]` header still yields a working configuration.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bounds of new documents.
    pub workspace: WorkspaceSection,
    /// Fit and zoom behaviour.
    pub viewport: ViewportSection,
    /// Guide lines and rulers.
    pub guides: GuidesSection,
    /// Undo/redo.
    pub history: HistorySection,
    /// Hook pipeline limits.
    pub hooks: HooksSection,
    /// Rendering surface readiness polling.
    pub surface: SurfaceSection,
    /// Logging level, format and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// WorkspaceSection
// ---------------------------------------------------------------------------

/// Default document bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSection {
    /// Document width in scene units.
    pub width: f64,
    /// Document height in scene units.
    pub height: f64,
    /// Background fill.
    pub fill: String,
}

impl Default for WorkspaceSection {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 1200.0,
            fill: "#ffffff".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// ViewportSection
// ---------------------------------------------------------------------------

/// Fit-to-container and zoom settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSection {
    /// Fraction of the container the document may fill, in `(0, 1]`.
    pub fit_padding: f64,
    /// Comfortable-viewing ratio applied to the fit scale, in `(0, 1]`.
    pub fit_ratio: f64,
    /// Smallest zoom.
    pub min_zoom: f64,
    /// Largest zoom.
    pub max_zoom: f64,
    /// Additive step for zoom in/out.
    pub zoom_step: f64,
}

impl Default for ViewportSection {
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

// ---------------------------------------------------------------------------
// GuidesSection
// ---------------------------------------------------------------------------

/// Guide and ruler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidesSection {
    /// Slack in pixels before a guide counts as out of the workspace.
    pub out_tolerance_px: f64,
    /// Guide line thickness.
    pub thickness: f64,
    /// Guide line length.
    pub length: f64,
    /// Minimum on-screen distance between ruler ticks.
    pub min_tick_spacing_px: f64,
}

impl Default for GuidesSection {
    fn default() -> Self {
        Self {
            out_tolerance_px: 1.0,
            thickness: 1.0,
            length: 100_000.0,
            min_tick_spacing_px: 50.0,
        }
    }
}

// ---------------------------------------------------------------------------
// HistorySection
// ---------------------------------------------------------------------------

/// Undo/redo settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySection {
    /// Delay after a load settles before recording resumes.
    pub settle_grace_ms: u64,
    /// Maximum undo entries kept.
    pub max_entries: usize,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            settle_grace_ms: 150,
            max_entries: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// HooksSection
// ---------------------------------------------------------------------------

/// Hook pipeline settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksSection {
    /// Timeout for the bounded load variant. `0` means unbounded.
    pub default_timeout_ms: u64,
}

// ---------------------------------------------------------------------------
// SurfaceSection
// ---------------------------------------------------------------------------

/// Rendering surface readiness polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSection {
    /// Polls before giving up and continuing with a warning.
    pub ready_retries: u32,
    /// Delay between polls.
    pub ready_interval_ms: u64,
}

impl Default for SurfaceSection {
    fn default() -> Self {
        Self {
            ready_retries: 10,
            ready_interval_ms: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"` or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["easel_hooks=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
