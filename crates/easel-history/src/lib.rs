//! Easel History - Undo/redo for the Easel editor core.
//!
//! This crate provides:
//! - [`History`]: undo and redo stacks of scene snapshots with monotonic
//!   sequence numbers and an entry cap
//! - [`Suppression`]: a reference-counted scope that stops recording during
//!   bulk loads, with a grace-delayed release
//!
//! History operations never fail. Undo and redo on an empty stack return
//! `None` and log it.
//!
//! # Example
//!
//! ```rust
//! use easel_core::SceneGraph;
//! use easel_history::{History, RecordOutcome};
//!
//! let scene = SceneGraph::new();
//! let mut history = History::default();
//!
//! {
//!     let _guard = history.suppress();
//!     assert_eq!(history.record(scene.snapshot(), "object:added"), RecordOutcome::Suppressed);
//! }
//!
//! assert!(matches!(history.record(scene.snapshot(), "object:added"), RecordOutcome::Recorded(1)));
//! assert!(history.undo().is_some());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod history;
mod suppression;

pub use history::{DEFAULT_MAX_ENTRIES, History, HistoryEntry, RecordOutcome};
pub use suppression::{Suppression, SuppressionGuard};
