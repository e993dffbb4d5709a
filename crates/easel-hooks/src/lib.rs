//! Easel Hooks - Ordered asynchronous extension points around import and save.
//!
//! This crate provides:
//! - The hook points (`BeforeImport`, `AfterImport`, `AfterSave`)
//! - The `HookCallback` trait, plus adapters for synchronous closures and
//!   callbacks that signal completion through an explicit [`Done`] handle
//! - The [`HookPipeline`], which runs the callbacks of one point strictly in
//!   registration order
//! - Execution records with timing and outcome
//!
//! # Execution model
//!
//! Callbacks never overlap: each is awaited before the next starts. A
//! callback that never completes stalls the chain; bound the call with
//! [`HookPipeline::call_with_timeout`] or
//! [`HookPipeline::call_cancellable`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use easel_hooks::{FnHook, HookPayload, HookPipeline, HookPoint};
//!
//! # async fn example() {
//! let pipeline = HookPipeline::new();
//! pipeline.register(
//!     HookPoint::BeforeImport,
//!     "fonts",
//!     Arc::new(FnHook::new("preload-fonts", |payload: &mut HookPayload| {
//!         payload.insert_data("fonts_ready", serde_json::json!(true));
//!         Ok(())
//!     })),
//! );
//!
//! let payload = HookPayload::new(HookPoint::BeforeImport, serde_json::Value::Null);
//! let run = pipeline.call(HookPoint::BeforeImport, payload).await.unwrap();
//! assert!(run.all_succeeded());
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod error;
pub mod hook;
pub mod payload;
pub mod pipeline;
pub mod result;

pub use error::{HookError, HookResult};
pub use hook::{
    Done, DoneHook, FailAction, FnHook, HookCallback, HookId, HookPoint, HookRegistration,
};
pub use payload::HookPayload;
pub use pipeline::HookPipeline;
pub use result::{HookExecution, HookExecutionResult, HookRun};

pub use tokio_util::sync::CancellationToken;
