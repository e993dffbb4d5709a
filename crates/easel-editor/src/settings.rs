//! Runtime settings for one editor instance.

use std::time::Duration;

use easel_core::DocumentBounds;
use easel_history::DEFAULT_MAX_ENTRIES;
use easel_workspace::{GuideConfig, ViewportConfig};

/// Bounds given to a new, empty document.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceDefaults {
    /// Document width.
    pub width: f64,
    /// Document height.
    pub height: f64,
    /// Workspace fill.
    pub fill: String,
}

impl Default for WorkspaceDefaults {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 1200.0,
            fill: easel_core::bounds::DEFAULT_FILL.to_string(),
        }
    }
}

impl WorkspaceDefaults {
    /// Bounds for a new document.
    #[must_use]
    pub fn bounds(&self) -> DocumentBounds {
        DocumentBounds::new(self.width, self.height).with_fill(self.fill.clone())
    }
}

/// History settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySettings {
    /// Undo entries kept before the oldest folds into the baseline.
    pub max_entries: usize,
    /// How long suppression outlives a load.
    pub settle_grace: Duration,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            settle_grace: Duration::from_millis(150),
        }
    }
}

/// Render surface readiness polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSettings {
    /// Readiness checks before giving up.
    pub ready_retries: u32,
    /// Delay between checks.
    pub ready_interval: Duration,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            ready_retries: 10,
            ready_interval: Duration::from_millis(50),
        }
    }
}

/// Everything an [`Editor`](crate::Editor) is configured with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorSettings {
    /// New-document bounds.
    pub workspace: WorkspaceDefaults,
    /// Zoom and fit.
    pub viewport: ViewportConfig,
    /// Guides and rulers.
    pub guides: GuideConfig,
    /// Undo/redo.
    pub history: HistorySettings,
    /// Bound applied to hook chains by the default load and save calls.
    pub hook_timeout: Option<Duration>,
    /// Surface readiness polling.
    pub surface: SurfaceSettings,
}

impl EditorSettings {
    /// Set the post-load settle delay.
    #[must_use]
    pub fn with_settle_grace(mut self, grace: Duration) -> Self {
        self.history.settle_grace = grace;
        self
    }

    /// Set the undo cap.
    #[must_use]
    pub fn with_max_history(mut self, max_entries: usize) -> Self {
        self.history.max_entries = max_entries;
        self
    }

    /// Bound default hook chains.
    #[must_use]
    pub fn with_hook_timeout(mut self, timeout: Duration) -> Self {
        self.hook_timeout = Some(timeout);
        self
    }

    /// Replace the viewport settings.
    #[must_use]
    pub fn with_viewport(mut self, viewport: ViewportConfig) -> Self {
        self.viewport = viewport;
        self
    }

    /// Replace the guide settings.
    #[must_use]
    pub fn with_guides(mut self, guides: GuideConfig) -> Self {
        self.guides = guides;
        self
    }

    /// Set readiness polling.
    #[must_use]
    pub fn with_surface_polling(mut self, retries: u32, interval: Duration) -> Self {
        self.surface = SurfaceSettings {
            ready_retries: retries,
            ready_interval: interval,
        };
        self
    }
}
