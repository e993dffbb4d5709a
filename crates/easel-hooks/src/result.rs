//! Execution records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hook::{HookId, HookPoint};
use crate::payload::HookPayload;

/// Outcome of one callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum HookExecutionResult {
    /// The callback completed.
    Success,
    /// The callback failed or panicked.
    Failure {
        /// Error message.
        error: String,
    },
}

impl HookExecutionResult {
    /// Whether the callback completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Record of one callback run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookExecution {
    /// Registration that ran.
    pub hook_id: HookId,
    /// Callback name.
    pub hook_name: String,
    /// Registering component.
    pub owner: String,
    /// Pipeline call this belongs to.
    pub invocation_id: Uuid,
    /// When the callback started.
    pub started_at: DateTime<Utc>,
    /// When the callback finished.
    pub completed_at: DateTime<Utc>,
    /// Wall time in milliseconds.
    pub duration_ms: u64,
    /// Outcome.
    pub result: HookExecutionResult,
}

/// Result of running every callback of a hook point.
#[derive(Debug, Clone)]
pub struct HookRun {
    /// Hook point that ran.
    pub point: HookPoint,
    /// Payload after the last callback.
    pub payload: HookPayload,
    /// One record per callback, in run order.
    pub executions: Vec<HookExecution>,
}

impl HookRun {
    /// Number of callbacks that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.executions
            .iter()
            .filter(|e| !e.result.is_success())
            .count()
    }

    /// Whether every callback completed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }
}
