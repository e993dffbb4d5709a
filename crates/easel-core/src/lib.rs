//! Easel Core - Scene graph and shared contracts for the Easel editor.
//!
//! This crate provides:
//! - Geometry primitives (`Point`, `Size`, `Rect`)
//! - The drawable object model (`SceneObject`, `ObjectId`, `ObjectKind`)
//! - The protected document bounds (`DocumentBounds`), the single workspace
//!   object every document carries
//! - The ordered `SceneGraph` and its serialized document format
//! - The `RenderSurface` contract implemented by the drawing library
//!
//! # Workspace
//!
//! The workspace is not an ordinary entry in the object list. The scene graph
//! holds it as a typed [`DocumentBounds`] reached through
//! [`SceneGraph::bounds`], paints it first, and refuses to hand its reserved
//! identifier to any other object. It only shows up as an object inside the
//! serialized document, where it is the entry with id [`WORKSPACE_ID`].
//!
//! # Example
//!
//! ```rust
//! use easel_core::{DocumentBounds, ObjectKind, SceneGraph, SceneObject};
//!
//! let mut scene = SceneGraph::with_bounds(DocumentBounds::new(900.0, 1200.0));
//! let rect = SceneObject::new(ObjectKind::Rect).with_frame(10.0, 10.0, 100.0, 50.0);
//! scene.add(rect).unwrap();
//!
//! let doc = scene.to_document();
//! assert_eq!(doc.objects.len(), 2);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod bounds;
pub mod document;
pub mod error;
pub mod geometry;
pub mod object;
pub mod scene;
pub mod surface;

pub use bounds::{DocumentBounds, ProtectionFlags};
pub use document::SerializedDocument;
pub use error::{CoreError, CoreResult};
pub use geometry::{Point, Rect, Size};
pub use object::{ObjectFlags, ObjectId, ObjectKind, Orientation, SceneObject, WORKSPACE_ID};
pub use scene::{PaintItem, SceneGraph, SceneSnapshot};
pub use surface::{Cursor, RenderSurface};
