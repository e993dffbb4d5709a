//! Easel Editor - The editor host.
//!
//! This crate provides:
//! - [`Editor`]: one document's scene, bus, hook pipeline and plugin
//!   registry, with import, save and export flows
//! - [`builtin`]: the workspace, history and guides plugins every editor
//!   registers first
//! - [`EditorSettings`]: runtime settings, buildable from
//!   `easel_config::Config` through [`config_bridge`]
//!
//! # Example
//!
//! ```
//! use easel_editor::prelude::*;
//! use easel_test::{MockSurface, sample_document_json};
//! use serde_json::Value;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), EditorError> {
//! let surface = MockSurface::new(1280.0, 720.0);
//! let editor = Editor::builder(surface.shared()).build().await;
//!
//! editor.load_json(&sample_document_json()).await?;
//! assert_eq!(editor.scene().len(), 3);
//! assert!(!editor.undo());
//!
//! // Optional calls never fail on a missing capability
//! assert!(editor.invoke("applyFilter", Value::Null).is_none());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod builtin;
pub mod config_bridge;
mod editor;
pub mod error;
pub mod settings;
pub mod surface;

pub use editor::{Editor, EditorBuilder};
pub use error::{EditorError, EditorResult};
pub use settings::{EditorSettings, HistorySettings, SurfaceSettings, WorkspaceDefaults};
pub use surface::wait_until_ready;
