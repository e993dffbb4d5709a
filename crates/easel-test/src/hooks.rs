//! Hook callbacks that record what they saw.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use easel_hooks::{HookCallback, HookError, HookPayload, HookResult};

/// A callback that appends its name to a shared log.
///
/// An optional delay runs before the log entry is written, so ordering tests
/// can make an early callback slower than a later one.
#[derive(Debug, Clone)]
pub struct RecordingHook {
    name: String,
    log: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
    failure: Option<String>,
}

impl RecordingHook {
    /// Create a callback writing to `log`.
    #[must_use]
    pub fn new(name: impl Into<String>, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.into(),
            log: Arc::clone(log),
            delay: None,
            failure: None,
        }
    }

    /// Sleep before recording.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Record, then fail with `message`.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// This callback as a shared trait object.
    #[must_use]
    pub fn shared(self) -> Arc<dyn HookCallback> {
        Arc::new(self)
    }

    /// A fresh shared log.
    #[must_use]
    pub fn log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    /// Snapshot of a shared log.
    #[must_use]
    pub fn entries(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl HookCallback for RecordingHook {
    async fn call(&self, payload: &mut HookPayload) -> HookResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(self.name.clone());
        payload.insert_data(format!("seen_by_{}", self.name), serde_json::Value::Bool(true));
        match &self.failure {
            Some(message) => Err(HookError::Callback(message.clone())),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
