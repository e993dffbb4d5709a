//! Hook points, callbacks and registrations.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::{HookError, HookResult};
use crate::payload::HookPayload;

/// Named extension points around import and save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    /// Raw document received, not yet applied to the scene.
    BeforeImport,
    /// The scene holds the imported objects.
    AfterImport,
    /// About to capture the serialized document.
    AfterSave,
}

impl HookPoint {
    /// Every hook point.
    pub const ALL: [Self; 3] = [Self::BeforeImport, Self::AfterImport, Self::AfterSave];
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeImport => write!(f, "before_import"),
            Self::AfterImport => write!(f, "after_import"),
            Self::AfterSave => write!(f, "after_save"),
        }
    }
}

/// Action to take when a callback fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailAction {
    /// Log a warning and continue.
    #[default]
    Warn,
    /// Stop the chain and fail the call.
    Block,
    /// Silently ignore the failure.
    Ignore,
}

impl fmt::Display for FailAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Block => write!(f, "block"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

/// Registration handle for a hook callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HookId(Uuid);

impl HookId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A callback run by the pipeline.
///
/// The pipeline awaits the returned future before moving on to the next
/// callback, so a callback that never completes stalls the chain.
#[async_trait]
pub trait HookCallback: Send + Sync {
    /// Run against the shared payload.
    async fn call(&self, payload: &mut HookPayload) -> HookResult<()>;

    /// Name used in logs and execution records.
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "anonymous"
    }
}

/// Explicit completion signal handed to [`DoneHook`] callbacks.
///
/// Consuming it with [`Done::complete`] or [`Done::fail`] lets the pipeline
/// move on. Dropping it unused is reported as a failure.
#[derive(Debug)]
pub struct Done {
    tx: oneshot::Sender<HookResult<()>>,
}

impl Done {
    /// Signal success.
    pub fn complete(self) {
        // Receiver gone means the call was abandoned
        let _ = self.tx.send(Ok(()));
    }

    /// Signal failure.
    pub fn fail(self, message: impl Into<String>) {
        let _ = self.tx.send(Err(HookError::Callback(message.into())));
    }
}

/// Adapter for callbacks that signal completion through a [`Done`] handle.
///
/// The closure runs synchronously with the payload, and may move the
/// handle into a spawned task to finish later.
pub struct DoneHook<F> {
    name: String,
    f: F,
}

impl<F> DoneHook<F>
where
    F: Fn(&mut HookPayload, Done) + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> HookCallback for DoneHook<F>
where
    F: Fn(&mut HookPayload, Done) + Send + Sync,
{
    async fn call(&self, payload: &mut HookPayload) -> HookResult<()> {
        let (tx, rx) = oneshot::channel();
        (self.f)(payload, Done { tx });
        rx.await.unwrap_or(Err(HookError::CompletionDropped))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Adapter for synchronous callbacks.
pub struct FnHook<F> {
    name: String,
    f: F,
}

impl<F> FnHook<F>
where
    F: Fn(&mut HookPayload) -> HookResult<()> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> HookCallback for FnHook<F>
where
    F: Fn(&mut HookPayload) -> HookResult<()> + Send + Sync,
{
    async fn call(&self, payload: &mut HookPayload) -> HookResult<()> {
        (self.f)(payload)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// One callback registered on one hook point.
#[derive(Clone)]
pub struct HookRegistration {
    /// Registration handle.
    pub id: HookId,
    /// Hook point the callback runs on.
    pub point: HookPoint,
    /// Component that registered it; used for bulk removal.
    pub owner: String,
    /// What a failure does to the chain.
    pub fail_action: FailAction,
    /// The callback.
    pub callback: Arc<dyn HookCallback>,
}

impl fmt::Debug for HookRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistration")
            .field("id", &self.id)
            .field("point", &self.point)
            .field("owner", &self.owner)
            .field("fail_action", &self.fail_action)
            .field("callback", &self.callback.name())
            .finish()
    }
}
