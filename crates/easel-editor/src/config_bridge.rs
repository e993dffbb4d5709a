//! Bridge from `easel_config::Config` to [`EditorSettings`].

use std::time::Duration;

use easel_workspace::{GuideConfig, ViewportConfig};

use crate::settings::{EditorSettings, HistorySettings, SurfaceSettings, WorkspaceDefaults};

/// Convert a loaded [`easel_config::Config`] into editor settings.
///
/// A hook timeout of `0` means unbounded.
#[must_use]
pub fn from_config(cfg: &easel_config::Config) -> EditorSettings {
    let workspace = WorkspaceDefaults {
        width: cfg.workspace.width,
        height: cfg.workspace.height,
        fill: cfg.workspace.fill.clone(),
    };

    let viewport = ViewportConfig {
        fit_padding: cfg.viewport.fit_padding,
        fit_ratio: cfg.viewport.fit_ratio,
        min_zoom: cfg.viewport.min_zoom,
        max_zoom: cfg.viewport.max_zoom,
        zoom_step: cfg.viewport.zoom_step,
    };

    let guides = GuideConfig {
        out_tolerance_px: cfg.guides.out_tolerance_px,
        thickness: cfg.guides.thickness,
        length: cfg.guides.length,
        min_tick_spacing_px: cfg.guides.min_tick_spacing_px,
    };

    let history = HistorySettings {
        max_entries: cfg.history.max_entries,
        settle_grace: Duration::from_millis(cfg.history.settle_grace_ms),
    };

    let surface = SurfaceSettings {
        ready_retries: cfg.surface.ready_retries,
        ready_interval: Duration::from_millis(cfg.surface.ready_interval_ms),
    };

    let hook_timeout =
        (cfg.hooks.default_timeout_ms > 0).then(|| Duration::from_millis(cfg.hooks.default_timeout_ms));

    EditorSettings {
        workspace,
        viewport,
        guides,
        history,
        hook_timeout,
        surface,
    }
}
