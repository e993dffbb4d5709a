//! Prelude module - commonly used types for convenient import.
//!
//! Use `use easel_history::prelude::*;` to import all essential types.

pub use crate::{History, HistoryEntry, RecordOutcome};
pub use crate::{Suppression, SuppressionGuard};
