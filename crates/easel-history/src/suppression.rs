//! Reference-counted suppression scopes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::trace;

/// Shared suppression counter.
///
/// Recording is suppressed while at least one [`SuppressionGuard`] is alive,
/// so overlapping bulk operations cannot re-enable recording early.
#[derive(Debug, Clone, Default)]
pub struct Suppression {
    depth: Arc<AtomicUsize>,
}

impl Suppression {
    /// Create an inactive suppression counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a suppression scope.
    #[must_use = "suppression ends as soon as the guard is dropped"]
    pub fn enter(&self) -> SuppressionGuard {
        let depth = self.depth.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        trace!(depth, "History suppression entered");
        SuppressionGuard {
            depth: Arc::clone(&self.depth),
        }
    }

    /// Whether any scope is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.depth() > 0
    }

    /// Number of open scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}

/// An open suppression scope; closes on drop.
#[derive(Debug)]
pub struct SuppressionGuard {
    depth: Arc<AtomicUsize>,
}

impl SuppressionGuard {
    /// Keep the scope open for `grace`, then close it.
    ///
    /// Absorbs trailing mutation events the surface emits while settling.
    pub async fn release_after(self, grace: Duration) {
        if !grace.is_zero() {
            tokio::time::sleep(grace).await;
        }
        drop(self);
    }
}

impl Drop for SuppressionGuard {
    fn drop(&mut self) {
        let previous = self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| Some(d.saturating_sub(1)))
            .unwrap_or_default();
        trace!(depth = previous.saturating_sub(1), "History suppression exited");
    }
}
