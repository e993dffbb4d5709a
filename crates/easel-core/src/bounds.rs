//! The protected workspace object representing document bounds.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::geometry::{Rect, Size};
use crate::object::{ObjectFlags, ObjectId, ObjectKind, SceneObject, WORKSPACE_ID};

/// Default workspace fill.
pub const DEFAULT_FILL: &str = "#ffffff";

/// Fixed interaction flags carried by the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ProtectionFlags {
    /// Can be picked by the selection tool.
    pub selectable: bool,
    /// Receives pointer events.
    pub evented: bool,
    /// Movement, rotation and scaling locked.
    pub locked: bool,
}

impl ProtectionFlags {
    /// The only flag combination the workspace is allowed to carry.
    pub const PROTECTED: Self = Self {
        selectable: false,
        evented: false,
        locked: true,
    };

    /// Whether these flags match [`ProtectionFlags::PROTECTED`].
    #[must_use]
    pub fn is_protected(&self) -> bool {
        *self == Self::PROTECTED
    }
}

impl Default for ProtectionFlags {
    fn default() -> Self {
        Self::PROTECTED
    }
}

/// The document bounds.
///
/// Exactly one exists per scene graph. Its protection flags can be disturbed
/// by careless code holding a mutable reference; [`DocumentBounds::enforce`]
/// puts them back.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBounds {
    width: f64,
    height: f64,
    fill: String,
    flags: ProtectionFlags,
    extra: Map<String, Value>,
}

impl DocumentBounds {
    /// Create bounds of the given size with the default fill.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            fill: DEFAULT_FILL.to_owned(),
            flags: ProtectionFlags::PROTECTED,
            extra: Map::new(),
        }
    }

    /// Set the fill paint.
    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Document width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Document height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Document size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Fill paint.
    #[must_use]
    pub fn fill(&self) -> &str {
        &self.fill
    }

    /// The workspace rectangle in document coordinates.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Current protection flags.
    #[must_use]
    pub fn flags(&self) -> ProtectionFlags {
        self.flags
    }

    /// Mutable access to the protection flags.
    ///
    /// Exists so that tests and foreign code can disturb them; the workspace
    /// engine restores them on the next selection event.
    pub fn flags_mut(&mut self) -> &mut ProtectionFlags {
        &mut self.flags
    }

    /// Whether the protection flags are intact.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.flags.is_protected()
    }

    /// Restore the protection flags. Returns `true` if anything changed.
    pub fn enforce(&mut self) -> bool {
        if self.flags.is_protected() {
            return false;
        }
        self.flags = ProtectionFlags::PROTECTED;
        true
    }

    /// Change the document size.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedDocument`] unless both dimensions are
    /// finite and positive.
    pub fn resize(&mut self, width: f64, height: f64) -> CoreResult<()> {
        if !Size::new(width, height).is_positive() {
            return Err(CoreError::MalformedDocument(format!(
                "workspace size must be positive, got {width}x{height}"
            )));
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Change the fill paint.
    pub fn set_fill(&mut self, fill: impl Into<String>) {
        self.fill = fill.into();
    }

    /// Serialize as the reserved workspace object.
    #[must_use]
    pub fn to_object(&self) -> SceneObject {
        let mut obj = SceneObject::new(ObjectKind::Rect)
            .with_id(ObjectId::workspace())
            .with_frame(0.0, 0.0, self.width, self.height)
            .with_fill(self.fill.clone());
        obj.flags = ObjectFlags {
            selectable: self.flags.selectable,
            evented: self.flags.evented,
            visible: true,
            has_controls: false,
            lock_movement_x: self.flags.locked,
            lock_movement_y: self.flags.locked,
            lock_rotation: self.flags.locked,
            lock_scaling_x: self.flags.locked,
            lock_scaling_y: self.flags.locked,
        };
        obj.extra = self.extra.clone();
        obj
    }

    /// Rebuild bounds from the reserved workspace object.
    ///
    /// Protection flags are always reset; whatever the document claimed is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedDocument`] if the object does not carry
    /// the reserved id or its scaled size is not positive.
    pub fn from_object(obj: &SceneObject) -> CoreResult<Self> {
        if obj.id.as_str() != WORKSPACE_ID {
            return Err(CoreError::MalformedDocument(format!(
                "expected workspace object, got id '{}'",
                obj.id
            )));
        }
        let width = obj.width * obj.scale_x;
        let height = obj.height * obj.scale_y;
        let mut bounds = Self::new(width, height);
        bounds.resize(width, height)?;
        if let Some(fill) = &obj.fill {
            bounds.fill.clone_from(fill);
        }
        bounds.extra = obj.extra.clone();
        Ok(bounds)
    }
}

impl Default for DocumentBounds {
    fn default() -> Self {
        Self::new(900.0, 1200.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bounds_are_protected() {
        let b = DocumentBounds::new(100.0, 50.0);
        assert!(b.is_protected());
        assert_eq!(b.rect(), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(b.fill(), DEFAULT_FILL);
    }

    #[test]
    fn test_enforce_restores_flags() {
        let mut b = DocumentBounds::new(100.0, 50.0);
        b.flags_mut().selectable = true;
        assert!(!b.is_protected());
        assert!(b.enforce());
        assert!(b.is_protected());
        assert!(!b.enforce());
    }

    #[test]
    fn test_resize_rejects_non_positive() {
        let mut b = DocumentBounds::new(100.0, 50.0);
        assert!(b.resize(0.0, 10.0).is_err());
        assert!(b.resize(10.0, f64::INFINITY).is_err());
        b.resize(640.0, 480.0).unwrap();
        assert_eq!(b.size(), Size::new(640.0, 480.0));
    }

    #[test]
    fn test_object_round_trip_resets_protection() {
        let b = DocumentBounds::new(300.0, 200.0).with_fill("#eee");
        let mut obj = b.to_object();
        assert!(obj.id.is_workspace());
        assert!(!obj.flags.selectable);

        obj.flags.selectable = true;
        obj.flags.evented = true;
        let back = DocumentBounds::from_object(&obj).unwrap();
        assert!(back.is_protected());
        assert_eq!(back.fill(), "#eee");
        assert_eq!(back.size(), Size::new(300.0, 200.0));
    }

    #[test]
    fn test_from_object_applies_scale() {
        let mut obj = DocumentBounds::new(100.0, 100.0).to_object();
        obj.scale_x = 2.0;
        let back = DocumentBounds::from_object(&obj).unwrap();
        assert_eq!(back.width(), 200.0);
    }

    #[test]
    fn test_from_object_rejects_other_ids() {
        let obj = SceneObject::new(ObjectKind::Rect).with_frame(0.0, 0.0, 1.0, 1.0);
        assert!(DocumentBounds::from_object(&obj).is_err());
    }
}
