//! The serial hook pipeline.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{HookError, HookResult};
use crate::hook::{FailAction, HookCallback, HookId, HookPoint, HookRegistration};
use crate::payload::HookPayload;
use crate::result::{HookExecution, HookExecutionResult, HookRun};

/// Ordered registry of hook callbacks, run strictly one after another.
///
/// For a given hook point, callbacks run in registration order. Each is
/// awaited to completion before the next starts, and the call resolves only
/// after the last one. The pipeline itself never times out; use
/// [`HookPipeline::call_with_timeout`] or [`HookPipeline::call_cancellable`]
/// to bound a call.
#[derive(Debug, Default)]
pub struct HookPipeline {
    registrations: Mutex<Vec<HookRegistration>>,
}

impl HookPipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback with the default [`FailAction::Warn`].
    pub fn register(
        &self,
        point: HookPoint,
        owner: impl Into<String>,
        callback: Arc<dyn HookCallback>,
    ) -> HookId {
        self.register_with(point, owner, FailAction::default(), callback)
    }

    /// Register a callback with an explicit failure action.
    pub fn register_with(
        &self,
        point: HookPoint,
        owner: impl Into<String>,
        fail_action: FailAction,
        callback: Arc<dyn HookCallback>,
    ) -> HookId {
        let registration = HookRegistration {
            id: HookId::new(),
            point,
            owner: owner.into(),
            fail_action,
            callback,
        };
        let id = registration.id;
        debug!(
            hook_id = %id,
            hook = %point,
            owner = %registration.owner,
            callback = %registration.callback.name(),
            "Hook registered"
        );
        self.lock().push(registration);
        id
    }

    /// Remove one registration. Returns `true` if it existed.
    pub fn unregister(&self, id: HookId) -> bool {
        let mut regs = self.lock();
        let before = regs.len();
        regs.retain(|r| r.id != id);
        regs.len() != before
    }

    /// Remove every registration made by `owner`. Returns how many.
    pub fn unregister_owner(&self, owner: &str) -> usize {
        let mut regs = self.lock();
        let before = regs.len();
        regs.retain(|r| r.owner != owner);
        let removed = before.saturating_sub(regs.len());
        if removed > 0 {
            debug!(owner = %owner, removed, "Hooks unregistered");
        }
        removed
    }

    /// Number of callbacks registered on a point.
    #[must_use]
    pub fn count(&self, point: HookPoint) -> usize {
        self.lock().iter().filter(|r| r.point == point).count()
    }

    /// Total number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Registrations for a point, in run order.
    #[must_use]
    pub fn registrations(&self, point: HookPoint) -> Vec<HookRegistration> {
        self.lock()
            .iter()
            .filter(|r| r.point == point)
            .cloned()
            .collect()
    }

    /// Run every callback registered on `point`, in order.
    ///
    /// The registration list is copied up front, so callbacks registered
    /// while the chain runs take effect on the next call.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Blocked`] when a callback registered with
    /// [`FailAction::Block`] fails. Other failures are recorded in the
    /// returned [`HookRun`] and the chain continues.
    pub async fn call(&self, point: HookPoint, mut payload: HookPayload) -> HookResult<HookRun> {
        payload.point = point;
        let registrations = self.registrations(point);
        let mut executions = Vec::with_capacity(registrations.len());

        debug!(
            hook = %point,
            invocation_id = %payload.invocation_id,
            callbacks = registrations.len(),
            "Running hooks"
        );

        for registration in registrations {
            let execution = run_one(&registration, &mut payload).await;

            if let HookExecutionResult::Failure { error } = &execution.result {
                match registration.fail_action {
                    FailAction::Block => {
                        warn!(
                            hook = %point,
                            hook_id = %registration.id,
                            callback = %execution.hook_name,
                            error = %error,
                            "Hook failed with Block action, stopping chain"
                        );
                        return Err(HookError::Blocked {
                            point,
                            hook: execution.hook_name.clone(),
                            reason: error.clone(),
                        });
                    },
                    FailAction::Warn => {
                        warn!(
                            hook = %point,
                            hook_id = %registration.id,
                            callback = %execution.hook_name,
                            error = %error,
                            "Hook failed with Warn action, continuing"
                        );
                    },
                    FailAction::Ignore => {
                        debug!(
                            hook = %point,
                            hook_id = %registration.id,
                            "Hook failed with Ignore action, continuing silently"
                        );
                    },
                }
            }

            executions.push(execution);
        }

        Ok(HookRun {
            point,
            payload,
            executions,
        })
    }

    /// Like [`HookPipeline::call`], bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::TimedOut`] if the chain does not finish in time,
    /// otherwise whatever [`HookPipeline::call`] returns.
    pub async fn call_with_timeout(
        &self,
        point: HookPoint,
        payload: HookPayload,
        timeout: Duration,
    ) -> HookResult<HookRun> {
        if let Ok(result) = tokio::time::timeout(timeout, self.call(point, payload)).await {
            result
        } else {
            let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(hook = %point, timeout_ms, "Hook chain timed out");
            Err(HookError::TimedOut { point, timeout_ms })
        }
    }

    /// Like [`HookPipeline::call`], abandoned when `token` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Cancelled`] if the token fires first, otherwise
    /// whatever [`HookPipeline::call`] returns.
    pub async fn call_cancellable(
        &self,
        point: HookPoint,
        payload: HookPayload,
        token: &CancellationToken,
    ) -> HookResult<HookRun> {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                info!(hook = %point, "Hook chain cancelled");
                Err(HookError::Cancelled { point })
            },
            result = self.call(point, payload) => result,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HookRegistration>> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

async fn run_one(registration: &HookRegistration, payload: &mut HookPayload) -> HookExecution {
    let started_at = Utc::now();
    let hook_name = registration.callback.name().to_string();

    let outcome = AssertUnwindSafe(registration.callback.call(payload))
        .catch_unwind()
        .await;

    let result = match outcome {
        Ok(Ok(())) => HookExecutionResult::Success,
        Ok(Err(e)) => HookExecutionResult::Failure {
            error: e.to_string(),
        },
        Err(panic) => HookExecutionResult::Failure {
            error: HookError::Panicked(panic_message(panic.as_ref())).to_string(),
        },
    };

    let completed_at = Utc::now();
    // A clock step backwards reads as zero
    let duration_ms =
        u64::try_from(completed_at.signed_duration_since(started_at).num_milliseconds()).unwrap_or(0);

    debug!(
        hook_id = %registration.id,
        callback = %hook_name,
        duration_ms,
        success = result.is_success(),
        "Hook executed"
    );

    HookExecution {
        hook_id: registration.id,
        hook_name,
        owner: registration.owner.clone(),
        invocation_id: payload.invocation_id,
        started_at,
        completed_at,
        duration_ms,
        result,
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::{Done, DoneHook, FnHook};
    use async_trait::async_trait;
    use serde_json::Value;

    struct Sleepy {
        label: &'static str,
        delay_ms: u64,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl HookCallback for Sleepy {
        async fn call(&self, _payload: &mut HookPayload) -> HookResult<()> {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            self.log.lock().unwrap().push(self.label);
            Ok(())
        }

        fn name(&self) -> &str {
            self.label
        }
    }

    fn sleepy(label: &'static str, delay_ms: u64, log: &Arc<Mutex<Vec<&'static str>>>) -> Arc<dyn HookCallback> {
        Arc::new(Sleepy {
            label,
            delay_ms,
            log: Arc::clone(log),
        })
    }

    fn payload(point: HookPoint) -> HookPayload {
        HookPayload::new(point, Value::Null)
    }

    #[tokio::test(start_paused = true)]
    async fn test_serial_order_with_slow_middle_callback() {
        let pipeline = HookPipeline::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        pipeline.register(HookPoint::BeforeImport, "a", sleepy("a", 5, &log));
        pipeline.register(HookPoint::BeforeImport, "b", sleepy("b", 50, &log));
        pipeline.register(HookPoint::BeforeImport, "c", sleepy("c", 1, &log));

        let run = pipeline
            .call(HookPoint::BeforeImport, payload(HookPoint::BeforeImport))
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(run.executions.len(), 3);
        assert!(run.all_succeeded());
    }

    #[tokio::test]
    async fn test_execution_records_wall_time() {
        let pipeline = HookPipeline::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        pipeline.register(HookPoint::AfterSave, "thumbs", sleepy("thumbs", 20, &log));

        let run = pipeline
            .call(HookPoint::AfterSave, payload(HookPoint::AfterSave))
            .await
            .unwrap();

        let execution = &run.executions[0];
        assert!(execution.completed_at >= execution.started_at);
        assert!(execution.duration_ms >= 20, "{}", execution.duration_ms);
    }

    #[tokio::test]
    async fn test_only_matching_point_runs() {
        let pipeline = HookPipeline::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        pipeline.register(HookPoint::AfterSave, "a", sleepy("save", 0, &log));
        pipeline.register(HookPoint::AfterImport, "a", sleepy("import", 0, &log));

        pipeline
            .call(HookPoint::AfterImport, payload(HookPoint::AfterImport))
            .await
            .unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["import"]);
    }

    #[tokio::test]
    async fn test_payload_flows_between_callbacks() {
        let pipeline = HookPipeline::new();
        pipeline.register(
            HookPoint::BeforeImport,
            "first",
            Arc::new(FnHook::new("first", |p: &mut HookPayload| {
                p.insert_data("fonts", serde_json::json!(["Inter"]));
                Ok(())
            })),
        );
        pipeline.register(
            HookPoint::BeforeImport,
            "second",
            Arc::new(FnHook::new("second", |p: &mut HookPayload| {
                if p.get_data("fonts").is_some() {
                    p.insert_data("loaded", Value::Bool(true));
                }
                Ok(())
            })),
        );

        let run = pipeline
            .call(HookPoint::BeforeImport, payload(HookPoint::BeforeImport))
            .await
            .unwrap();
        assert_eq!(run.payload.get_data("loaded"), Some(&Value::Bool(true)));
    }

    #[tokio::test]
    async fn test_warn_failure_continues() {
        let pipeline = HookPipeline::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        pipeline.register(
            HookPoint::AfterImport,
            "broken",
            Arc::new(FnHook::new("broken", |_: &mut HookPayload| {
                Err(HookError::Callback("nope".into()))
            })),
        );
        pipeline.register(HookPoint::AfterImport, "ok", sleepy("ok", 0, &log));

        let run = pipeline
            .call(HookPoint::AfterImport, payload(HookPoint::AfterImport))
            .await
            .unwrap();
        assert_eq!(run.failure_count(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["ok"]);
    }

    #[tokio::test]
    async fn test_block_failure_stops_chain() {
        let pipeline = HookPipeline::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        pipeline.register_with(
            HookPoint::BeforeImport,
            "gate",
            FailAction::Block,
            Arc::new(FnHook::new("gate", |_: &mut HookPayload| {
                Err(HookError::Callback("missing font".into()))
            })),
        );
        pipeline.register(HookPoint::BeforeImport, "after", sleepy("after", 0, &log));

        let err = pipeline
            .call(HookPoint::BeforeImport, payload(HookPoint::BeforeImport))
            .await
            .unwrap_err();
        assert!(matches!(err, HookError::Blocked { ref hook, .. } if hook == "gate"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_callback_is_recorded() {
        let pipeline = HookPipeline::new();
        pipeline.register(
            HookPoint::AfterSave,
            "panicky",
            Arc::new(FnHook::new("panicky", |_: &mut HookPayload| panic!("kaboom"))),
        );
        let run = pipeline
            .call(HookPoint::AfterSave, payload(HookPoint::AfterSave))
            .await
            .unwrap();
        assert!(matches!(
            &run.executions[0].result,
            HookExecutionResult::Failure { error } if error.contains("kaboom")
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds_a_stalled_chain() {
        let pipeline = HookPipeline::new();
        let parked: Arc<Mutex<Vec<Done>>> = Arc::new(Mutex::new(Vec::new()));
        let keep = Arc::clone(&parked);
        pipeline.register(
            HookPoint::BeforeImport,
            "stall",
            Arc::new(DoneHook::new("stall", move |_: &mut HookPayload, done: Done| {
                keep.lock().unwrap().push(done);
            })),
        );

        let err = pipeline
            .call_with_timeout(
                HookPoint::BeforeImport,
                payload(HookPoint::BeforeImport),
                Duration::from_millis(100),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HookError::TimedOut { timeout_ms: 100, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation() {
        let pipeline = Arc::new(HookPipeline::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        pipeline.register(HookPoint::BeforeImport, "slow", sleepy("slow", 10_000, &log));

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let err = pipeline
            .call_cancellable(
                HookPoint::BeforeImport,
                payload(HookPoint::BeforeImport),
                &token,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HookError::Cancelled { .. }));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unregister_owner() {
        let pipeline = HookPipeline::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        pipeline.register(HookPoint::AfterImport, "workspace", sleepy("a", 0, &log));
        pipeline.register(HookPoint::AfterSave, "workspace", sleepy("b", 0, &log));
        let keep = pipeline.register(HookPoint::AfterSave, "fonts", sleepy("c", 0, &log));

        assert_eq!(pipeline.unregister_owner("workspace"), 2);
        assert_eq!(pipeline.len(), 1);
        assert!(pipeline.unregister(keep));
        assert!(pipeline.is_empty());
    }
}
