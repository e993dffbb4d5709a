//! Off-screen surface for headless runs.

use std::sync::{Arc, Mutex, PoisonError};

use easel_core::{Cursor, Rect, RenderSurface, Size};

#[derive(Debug, Default)]
struct State {
    dimensions: Option<Size>,
    transform: Option<[f64; 6]>,
    clip: Option<Rect>,
    renders: usize,
}

/// A surface with a fixed container that remembers what it was told.
///
/// Always ready.
#[derive(Debug, Clone)]
pub(crate) struct HeadlessSurface {
    container: Size,
    state: Arc<Mutex<State>>,
}

impl HeadlessSurface {
    pub(crate) fn new(container: Size) -> Self {
        Self {
            container,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    pub(crate) fn shared(&self) -> Arc<dyn RenderSurface> {
        Arc::new(self.clone())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Backing-store size last set, if any.
    pub(crate) fn dimensions(&self) -> Option<Size> {
        self.with_state(|s| s.dimensions)
    }

    /// Last transform applied, if any.
    pub(crate) fn transform(&self) -> Option<[f64; 6]> {
        self.with_state(|s| s.transform)
    }

    /// Last clip region applied.
    pub(crate) fn clip(&self) -> Option<Rect> {
        self.with_state(|s| s.clip)
    }

    /// How many repaints were requested.
    pub(crate) fn render_count(&self) -> usize {
        self.with_state(|s| s.renders)
    }
}

impl RenderSurface for HeadlessSurface {
    fn is_ready(&self) -> bool {
        true
    }

    fn container_size(&self) -> Size {
        self.container
    }

    fn set_dimensions(&self, size: Size) {
        self.with_state(|s| s.dimensions = Some(size));
    }

    fn set_viewport_transform(&self, matrix: [f64; 6]) {
        self.with_state(|s| s.transform = Some(matrix));
    }

    fn set_clip_region(&self, rect: Option<Rect>) {
        self.with_state(|s| s.clip = rect);
    }

    fn set_cursor(&self, _cursor: Cursor) {}

    fn request_render(&self) {
        self.with_state(|s| s.renders = s.renders.saturating_add(1));
    }
}
