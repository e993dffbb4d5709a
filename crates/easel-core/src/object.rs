//! Drawable object model.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::geometry::{Point, Rect};

/// Identifier reserved for the workspace object in serialized documents.
pub const WORKSPACE_ID: &str = "workspace";

/// Stable identifier of a scene object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObjectId(String);

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl ObjectId {
    /// Create an identifier, validating its shape.
    ///
    /// The reserved workspace identifier is accepted here; use
    /// [`ObjectId::user`] for identifiers handed to user-created objects.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidObjectId`] if the id is empty or contains
    /// whitespace.
    pub fn new(id: impl Into<String>) -> CoreResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::InvalidObjectId("object id must not be empty".into()));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidObjectId(format!(
                "object id must not contain whitespace, got: {id:?}"
            )));
        }
        Ok(Self(id))
    }

    /// Create an identifier for a user object.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReservedId`] for the workspace identifier, or
    /// [`CoreError::InvalidObjectId`] for a malformed one.
    pub fn user(id: impl Into<String>) -> CoreResult<Self> {
        let id = Self::new(id)?;
        if id.is_workspace() {
            return Err(CoreError::ReservedId(id.0));
        }
        Ok(id)
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The workspace identifier.
    #[must_use]
    pub fn workspace() -> Self {
        Self(WORKSPACE_ID.to_owned())
    }

    /// Whether this is the reserved workspace identifier.
    #[must_use]
    pub fn is_workspace(&self) -> bool {
        self.0 == WORKSPACE_ID
    }

    /// Borrow the identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Kind of drawable object.
///
/// Unknown kinds coming from the drawing library are carried through
/// unchanged as [`ObjectKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectKind {
    /// Rectangle.
    Rect,
    /// Circle.
    Circle,
    /// Ellipse.
    Ellipse,
    /// Triangle.
    Triangle,
    /// Closed polygon.
    Polygon,
    /// Straight line segment.
    Line,
    /// Free-form path, including free-hand drawing.
    Path,
    /// Single-line or editable text.
    Text,
    /// Wrapping text box.
    Textbox,
    /// Raster image.
    Image,
    /// Group of objects.
    Group,
    /// Alignment guide dragged out of a ruler.
    GuideLine,
    /// Any other kind, by name.
    Other(String),
}

impl ObjectKind {
    /// Name used in serialized documents.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Triangle => "triangle",
            Self::Polygon => "polygon",
            Self::Line => "line",
            Self::Path => "path",
            Self::Text => "i-text",
            Self::Textbox => "textbox",
            Self::Image => "image",
            Self::Group => "group",
            Self::GuideLine => "guide-line",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for ObjectKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "rect" => Self::Rect,
            "circle" => Self::Circle,
            "ellipse" => Self::Ellipse,
            "triangle" => Self::Triangle,
            "polygon" => Self::Polygon,
            "line" => Self::Line,
            "path" => Self::Path,
            "text" | "i-text" => Self::Text,
            "textbox" => Self::Textbox,
            "image" => Self::Image,
            "group" => Self::Group,
            "guide-line" | "GuideLine" => Self::GuideLine,
            _ => Self::Other(value),
        }
    }
}

impl From<ObjectKind> for String {
    fn from(value: ObjectKind) -> Self {
        match value {
            ObjectKind::Other(name) => name,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis of a guide line or ruler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Runs left to right; positioned along the vertical axis.
    Horizontal,
    /// Runs top to bottom; positioned along the horizontal axis.
    Vertical,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// Interaction flags understood by the drawing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ObjectFlags {
    /// Can be picked by the selection tool.
    pub selectable: bool,
    /// Receives pointer events.
    pub evented: bool,
    /// Drawn at all.
    pub visible: bool,
    /// Shows transform handles when selected.
    pub has_controls: bool,
    /// Horizontal movement locked.
    pub lock_movement_x: bool,
    /// Vertical movement locked.
    pub lock_movement_y: bool,
    /// Rotation locked.
    pub lock_rotation: bool,
    /// Horizontal scaling locked.
    pub lock_scaling_x: bool,
    /// Vertical scaling locked.
    pub lock_scaling_y: bool,
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self {
            selectable: true,
            evented: true,
            visible: true,
            has_controls: true,
            lock_movement_x: false,
            lock_movement_y: false,
            lock_rotation: false,
            lock_scaling_x: false,
            lock_scaling_y: false,
        }
    }
}

fn default_scale() -> f64 {
    1.0
}

/// A drawable object in the scene graph.
///
/// Attributes the core does not interpret are preserved in `extra` so that
/// documents survive a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    /// Object identifier.
    #[serde(default = "ObjectId::generate")]
    pub id: ObjectId,
    /// Object kind.
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Left edge before rotation.
    #[serde(default)]
    pub left: f64,
    /// Top edge before rotation.
    #[serde(default)]
    pub top: f64,
    /// Unscaled width.
    #[serde(default)]
    pub width: f64,
    /// Unscaled height.
    #[serde(default)]
    pub height: f64,
    /// Horizontal scale factor.
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    /// Vertical scale factor.
    #[serde(default = "default_scale")]
    pub scale_y: f64,
    /// Rotation in degrees around the top-left corner.
    #[serde(default)]
    pub angle: f64,
    /// Fill paint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Stroke paint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Axis for guide lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Orientation>,
    /// Interaction flags.
    #[serde(flatten)]
    pub flags: ObjectFlags,
    /// Attributes owned by the drawing library or leaf plugins.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SceneObject {
    /// Create an object of the given kind with a fresh identifier.
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::generate(),
            kind,
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            fill: None,
            stroke: None,
            axis: None,
            flags: ObjectFlags::default(),
            extra: Map::new(),
        }
    }

    /// Create a guide line spanning `length` along its axis.
    ///
    /// A horizontal guide sits at `y = position`, a vertical one at
    /// `x = position`; `thickness` is its extent across the axis.
    #[must_use]
    pub fn guide(orientation: Orientation, position: f64, length: f64, thickness: f64) -> Self {
        let mut obj = Self::new(ObjectKind::GuideLine);
        obj.axis = Some(orientation);
        obj.flags.has_controls = false;
        obj.flags.lock_rotation = true;
        obj.flags.lock_scaling_x = true;
        obj.flags.lock_scaling_y = true;
        let half_length = length / 2.0;
        match orientation {
            Orientation::Horizontal => {
                obj.flags.lock_movement_x = true;
                obj = obj.with_frame(-half_length, position - thickness / 2.0, length, thickness);
            },
            Orientation::Vertical => {
                obj.flags.lock_movement_y = true;
                obj = obj.with_frame(position - thickness / 2.0, -half_length, thickness, length);
            },
        }
        obj
    }

    /// Set an explicit identifier.
    #[must_use]
    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }

    /// Set position and unscaled size.
    #[must_use]
    pub fn with_frame(mut self, left: f64, top: f64, width: f64, height: f64) -> Self {
        self.left = left;
        self.top = top;
        self.width = width;
        self.height = height;
        self
    }

    /// Set the fill paint.
    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Set the rotation in degrees.
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Set an attribute the core does not interpret.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Whether this object is a guide line.
    #[must_use]
    pub fn is_guide(&self) -> bool {
        self.kind == ObjectKind::GuideLine
    }

    /// Guide position along its axis, if this is a guide line.
    #[must_use]
    pub fn guide_position(&self) -> Option<f64> {
        let rect = self.bounding_rect();
        match self.axis? {
            Orientation::Horizontal => Some(rect.center().y),
            Orientation::Vertical => Some(rect.center().x),
        }
    }

    /// Axis-aligned bounding rectangle after scale and rotation.
    #[must_use]
    pub fn bounding_rect(&self) -> Rect {
        let w = self.width * self.scale_x;
        let h = self.height * self.scale_y;
        if self.angle.rem_euclid(360.0) == 0.0 {
            return Rect::new(self.left, self.top, w, h);
        }
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let origin = Point::new(self.left, self.top);
        let rotate = |x: f64, y: f64| Point::new(origin.x + x * cos - y * sin, origin.y + x * sin + y * cos);
        let corners = [rotate(0.0, 0.0), rotate(w, 0.0), rotate(w, h), rotate(0.0, h)];
        Rect::from_points(&corners).unwrap_or_else(|| Rect::new(self.left, self.top, w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_validation() {
        assert!(ObjectId::new("").is_err());
        assert!(ObjectId::new("has space").is_err());
        assert!(ObjectId::new("abc-123").is_ok());
        assert!(ObjectId::new(WORKSPACE_ID).unwrap().is_workspace());
    }

    #[test]
    fn test_user_id_rejects_reserved() {
        assert!(matches!(
            ObjectId::user(WORKSPACE_ID),
            Err(CoreError::ReservedId(_))
        ));
        assert!(ObjectId::user("rect-1").is_ok());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ObjectId::generate(), ObjectId::generate());
        assert!(!ObjectId::generate().is_workspace());
    }

    #[test]
    fn test_kind_round_trips_unknown_names() {
        let kind: ObjectKind = serde_json::from_value(serde_json::json!("qrcode")).unwrap();
        assert_eq!(kind, ObjectKind::Other("qrcode".into()));
        assert_eq!(serde_json::to_value(&kind).unwrap(), serde_json::json!("qrcode"));
    }

    #[test]
    fn test_object_preserves_unknown_attributes() {
        let json = serde_json::json!({
            "id": "t1",
            "type": "textbox",
            "left": 5.0,
            "top": 6.0,
            "fontFamily": "Inter",
            "selectable": false
        });
        let obj: SceneObject = serde_json::from_value(json).unwrap();
        assert_eq!(obj.kind, ObjectKind::Textbox);
        assert!(!obj.flags.selectable);
        assert!(obj.flags.evented);
        assert_eq!(obj.extra.get("fontFamily"), Some(&serde_json::json!("Inter")));

        let back = serde_json::to_value(&obj).unwrap();
        assert_eq!(back["fontFamily"], "Inter");
        assert_eq!(back["selectable"], false);
        assert_eq!(back["type"], "textbox");
    }

    #[test]
    fn test_missing_id_is_generated() {
        let obj: SceneObject =
            serde_json::from_value(serde_json::json!({ "type": "rect" })).unwrap();
        assert!(!obj.id.as_str().is_empty());
        assert_eq!(obj.scale_x, 1.0);
    }

    #[test]
    fn test_bounding_rect_with_scale() {
        let mut obj = SceneObject::new(ObjectKind::Rect).with_frame(10.0, 20.0, 100.0, 50.0);
        obj.scale_x = 2.0;
        assert_eq!(obj.bounding_rect(), Rect::new(10.0, 20.0, 200.0, 50.0));
    }

    #[test]
    fn test_bounding_rect_with_rotation() {
        let obj = SceneObject::new(ObjectKind::Rect)
            .with_frame(0.0, 0.0, 10.0, 20.0)
            .with_angle(90.0);
        let r = obj.bounding_rect();
        assert!((r.left - -20.0).abs() < 1e-9);
        assert!((r.width - 20.0).abs() < 1e-9);
        assert!((r.height - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_guide_position() {
        let h = SceneObject::guide(Orientation::Horizontal, 120.0, 10_000.0, 2.0);
        assert_eq!(h.guide_position(), Some(120.0));
        assert!(h.is_guide());

        let v = SceneObject::guide(Orientation::Vertical, -40.0, 10_000.0, 2.0);
        assert_eq!(v.guide_position(), Some(-40.0));
        assert_eq!(v.bounding_rect().width, 2.0);
    }
}
