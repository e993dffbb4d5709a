//! Recording render surface.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use easel_core::{Cursor, Rect, RenderSurface, Size};

/// One call made on a [`MockSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    /// `set_dimensions`.
    SetDimensions(Size),
    /// `set_viewport_transform`.
    SetViewportTransform([f64; 6]),
    /// `set_clip_region`.
    SetClipRegion(Option<Rect>),
    /// `set_cursor`.
    SetCursor(Cursor),
    /// `request_render`.
    RequestRender,
}

#[derive(Debug)]
struct Inner {
    container: Mutex<Size>,
    not_ready_polls: AtomicU32,
    polls: AtomicU32,
    calls: Mutex<Vec<SurfaceCall>>,
}

/// A surface that records every call.
///
/// Clones share state, so a test can keep one handle while the editor owns
/// another.
#[derive(Debug, Clone)]
pub struct MockSurface {
    inner: Arc<Inner>,
}

impl MockSurface {
    /// A ready surface with the given container size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            inner: Arc::new(Inner {
                container: Mutex::new(Size::new(width, height)),
                not_ready_polls: AtomicU32::new(0),
                polls: AtomicU32::new(0),
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Report "not ready" for the first `polls` readiness checks.
    #[must_use]
    pub fn not_ready_for(self, polls: u32) -> Self {
        self.set_not_ready_for(polls);
        self
    }

    /// Report "not ready" for the next `polls` readiness checks.
    pub fn set_not_ready_for(&self, polls: u32) {
        self.inner.not_ready_polls.store(polls, Ordering::SeqCst);
    }

    /// This surface as a trait object.
    #[must_use]
    pub fn shared(&self) -> Arc<dyn RenderSurface> {
        Arc::new(self.clone())
    }

    /// Change the reported container size.
    pub fn set_container(&self, width: f64, height: f64) {
        *self
            .inner
            .container
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Size::new(width, height);
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.inner
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.inner
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of readiness checks so far.
    #[must_use]
    pub fn poll_count(&self) -> u32 {
        self.inner.polls.load(Ordering::SeqCst)
    }

    /// Number of render requests.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::RequestRender))
            .count()
    }

    /// The last viewport matrix applied.
    #[must_use]
    pub fn last_transform(&self) -> Option<[f64; 6]> {
        self.calls().iter().rev().find_map(|c| match c {
            SurfaceCall::SetViewportTransform(m) => Some(*m),
            _ => None,
        })
    }

    /// The last clip region applied.
    #[must_use]
    pub fn last_clip(&self) -> Option<Option<Rect>> {
        self.calls().iter().rev().find_map(|c| match c {
            SurfaceCall::SetClipRegion(r) => Some(*r),
            _ => None,
        })
    }

    /// The last cursor shown.
    #[must_use]
    pub fn last_cursor(&self) -> Option<Cursor> {
        self.calls().iter().rev().find_map(|c| match c {
            SurfaceCall::SetCursor(cursor) => Some(*cursor),
            _ => None,
        })
    }

    /// The last backing-store size.
    #[must_use]
    pub fn last_dimensions(&self) -> Option<Size> {
        self.calls().iter().rev().find_map(|c| match c {
            SurfaceCall::SetDimensions(s) => Some(*s),
            _ => None,
        })
    }

    fn record(&self, call: SurfaceCall) {
        self.inner
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl RenderSurface for MockSurface {
    fn is_ready(&self) -> bool {
        self.inner.polls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .not_ready_polls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_err()
    }

    fn container_size(&self) -> Size {
        *self
            .inner
            .container
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_dimensions(&self, size: Size) {
        self.record(SurfaceCall::SetDimensions(size));
    }

    fn set_viewport_transform(&self, matrix: [f64; 6]) {
        self.record(SurfaceCall::SetViewportTransform(matrix));
    }

    fn set_clip_region(&self, rect: Option<Rect>) {
        self.record(SurfaceCall::SetClipRegion(rect));
    }

    fn set_cursor(&self, cursor: Cursor) {
        self.record(SurfaceCall::SetCursor(cursor));
    }

    fn request_render(&self) {
        self.record(SurfaceCall::RequestRender);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_countdown() {
        let surface = MockSurface::new(100.0, 100.0).not_ready_for(2);
        assert!(!surface.is_ready());
        assert!(!surface.is_ready());
        assert!(surface.is_ready());
        assert!(surface.is_ready());
        assert_eq!(surface.poll_count(), 4);
    }

    #[test]
    fn test_records_calls_across_clones() {
        let surface = MockSurface::new(100.0, 100.0);
        let shared = surface.shared();
        shared.set_cursor(Cursor::NotAllowed);
        shared.request_render();
        shared.set_viewport_transform([2.0, 0.0, 0.0, 2.0, 5.0, 5.0]);

        assert_eq!(surface.last_cursor(), Some(Cursor::NotAllowed));
        assert_eq!(surface.render_count(), 1);
        assert_eq!(surface.last_transform().unwrap()[0], 2.0);

        surface.clear_calls();
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_container_resize() {
        let surface = MockSurface::new(100.0, 100.0);
        surface.set_container(640.0, 480.0);
        assert_eq!(surface.container_size(), Size::new(640.0, 480.0));
    }
}
