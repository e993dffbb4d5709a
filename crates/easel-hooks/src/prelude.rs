//! Prelude module - commonly used types for convenient import.
//!
//! Use `use easel_hooks::prelude::*;` to import all essential types.

// Core hook types
pub use crate::{FailAction, HookCallback, HookId, HookPoint};

// Callback adapters
pub use crate::{Done, DoneHook, FnHook};

// Pipeline
pub use crate::{HookPayload, HookPipeline};

// Results
pub use crate::{HookError, HookExecution, HookExecutionResult, HookResult, HookRun};
