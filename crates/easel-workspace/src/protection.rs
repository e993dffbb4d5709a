//! Workspace invariant enforcement.

use easel_core::{ObjectId, SceneGraph};
use tracing::{debug, warn};

/// Re-apply the workspace's protection flags.
///
/// Idempotent; safe to call on every selection event. Returns `true` if the
/// flags had been disturbed.
pub fn enforce_protection(scene: &mut SceneGraph) -> bool {
    let restored = scene.bounds_mut().enforce();
    if restored {
        warn!("Workspace protection flags were disturbed, restored");
    }
    restored
}

/// Drop the workspace from a removal target set.
///
/// Every other id passes through in order.
#[must_use]
pub fn filter_removal(targets: &[ObjectId]) -> Vec<ObjectId> {
    let kept: Vec<ObjectId> = targets
        .iter()
        .filter(|id| !id.is_workspace())
        .cloned()
        .collect();
    if kept.len() != targets.len() {
        debug!(
            requested = targets.len(),
            kept = kept.len(),
            "Workspace dropped from removal targets"
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::DocumentBounds;

    #[test]
    fn test_enforce_is_idempotent() {
        let mut scene = SceneGraph::with_bounds(DocumentBounds::new(10.0, 10.0));
        scene.bounds_mut().flags_mut().evented = true;
        assert!(enforce_protection(&mut scene));
        assert!(!enforce_protection(&mut scene));
        assert!(scene.bounds().is_protected());
    }

    #[test]
    fn test_filter_removal_drops_only_workspace() {
        let a = ObjectId::new("a").unwrap();
        let b = ObjectId::new("b").unwrap();
        let kept = filter_removal(&[a.clone(), ObjectId::workspace(), b.clone()]);
        assert_eq!(kept, vec![a, b]);
        assert!(filter_removal(&[ObjectId::workspace()]).is_empty());
    }
}
