//! Test fixtures for documents and scene objects.

use easel_core::{
    DocumentBounds, ObjectId, ObjectKind, Orientation, SceneObject, SerializedDocument,
};
use serde_json::json;

/// Width of the fixture workspace.
pub const WORKSPACE_WIDTH: f64 = 900.0;

/// Height of the fixture workspace.
pub const WORKSPACE_HEIGHT: f64 = 1200.0;

/// Bounds of the fixture workspace.
#[must_use]
pub fn workspace_bounds() -> DocumentBounds {
    DocumentBounds::new(WORKSPACE_WIDTH, WORKSPACE_HEIGHT)
}

/// A rectangle with a fixed id.
///
/// # Panics
///
/// Panics if `id` is not a valid user object id.
#[must_use]
pub fn rect_object(id: &str, left: f64, top: f64, width: f64, height: f64) -> SceneObject {
    SceneObject::new(ObjectKind::Rect)
        .with_id(ObjectId::user(id).expect("fixture id must be valid"))
        .with_frame(left, top, width, height)
        .with_fill("#ff0000")
}

/// A text object with a fixed id.
///
/// # Panics
///
/// Panics if `id` is not a valid user object id.
#[must_use]
pub fn text_object(id: &str, text: &str) -> SceneObject {
    SceneObject::new(ObjectKind::Text)
        .with_id(ObjectId::user(id).expect("fixture id must be valid"))
        .with_frame(100.0, 100.0, 200.0, 40.0)
        .with_extra("text", json!(text))
        .with_extra("fontFamily", json!("Inter"))
}

/// A guide line at `position` with the default length and thickness.
#[must_use]
pub fn guide_object(orientation: Orientation, position: f64) -> SceneObject {
    SceneObject::guide(orientation, position, 100_000.0, 1.0)
}

/// A document with the workspace, a rectangle, a circle and a text object.
///
/// The workspace entry comes first, as the drawing library writes it.
#[must_use]
pub fn sample_document_json() -> String {
    json!({
        "version": "5.3.0",
        "width": WORKSPACE_WIDTH,
        "height": WORKSPACE_HEIGHT,
        "objects": [
            {
                "id": "workspace",
                "type": "rect",
                "left": 0.0,
                "top": 0.0,
                "width": WORKSPACE_WIDTH,
                "height": WORKSPACE_HEIGHT,
                "fill": "#ffffff",
                "selectable": false,
                "evented": false
            },
            {
                "id": "header",
                "type": "rect",
                "left": 50.0,
                "top": 40.0,
                "width": 800.0,
                "height": 120.0,
                "fill": "#336699"
            },
            {
                "id": "badge",
                "type": "circle",
                "left": 700.0,
                "top": 900.0,
                "width": 120.0,
                "height": 120.0,
                "fill": "#ffcc00",
                "radius": 60
            },
            {
                "id": "title",
                "type": "i-text",
                "left": 80.0,
                "top": 60.0,
                "width": 400.0,
                "height": 48.0,
                "text": "Spring Sale",
                "fontFamily": "Inter"
            }
        ]
    })
    .to_string()
}

/// [`sample_document_json`] parsed.
///
/// # Panics
///
/// Panics if the fixture does not parse.
#[must_use]
pub fn sample_document() -> SerializedDocument {
    SerializedDocument::from_json_str(&sample_document_json()).expect("fixture must parse")
}
