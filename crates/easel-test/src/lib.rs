//! Easel Test - Shared test utilities for the Easel editor core.
//!
//! This crate provides mock collaborators and fixtures that can be used
//! across the Easel crates as a dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! easel-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! use easel_test::{MockSurface, sample_document_json};
//!
//! #[tokio::test]
//! async fn test_load() {
//!     let surface = MockSurface::new(1280.0, 800.0);
//!     let editor = Editor::builder(surface.shared()).build().await;
//!     editor.load_json(&sample_document_json()).await.unwrap();
//!     assert!(surface.render_count() > 0);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod hooks;
pub mod plugins;
pub mod surface;

pub use fixtures::*;
pub use harness::*;
pub use hooks::*;
pub use plugins::*;
pub use surface::*;
