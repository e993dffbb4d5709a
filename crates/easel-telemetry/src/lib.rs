//! Easel Telemetry - Logging and operation tracing.
//!
//! This crate provides:
//! - Subscriber setup with pretty, compact, JSON and full formats, writing to
//!   stdout, stderr or daily rolling files
//! - [`OperationContext`] spans that tie the log lines of one load or save
//!   together
//!
//! # Example
//!
//! ```rust,no_run
//! use easel_telemetry::{LogConfig, LogFormat, OperationContext, setup_logging};
//!
//! # fn main() -> Result<(), easel_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Pretty)
//!     .with_directive("easel_hooks=trace");
//! setup_logging(&config)?;
//!
//! let _op = OperationContext::new("load_json")
//!     .with_document("poster.json")
//!     .enter();
//! tracing::info!("Loading document");
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

mod context;
mod error;
mod logging;

pub use context::{OperationContext, OperationGuard};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
