//! Callbacks on one hook point run strictly in registration order.

mod common;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use common::editor;
use easel_hooks::{DoneHook, HookPayload, HookPipeline, HookPoint};
use easel_test::{RecordingHook, sample_document_json};
use serde_json::json;

fn register_abc(pipeline: &HookPipeline, point: HookPoint, log: &Arc<Mutex<Vec<String>>>) {
    pipeline.register(point, "test", RecordingHook::new("A", log).shared());
    pipeline.register(
        point,
        "test",
        RecordingHook::new("B", log)
            .with_delay(Duration::from_millis(40))
            .shared(),
    );
    pipeline.register(point, "test", RecordingHook::new("C", log).shared());
}

#[tokio::test(start_paused = true)]
async fn test_slow_middle_callback_keeps_order() {
    let pipeline = HookPipeline::new();
    let log = RecordingHook::log();
    register_abc(&pipeline, HookPoint::AfterSave, &log);

    for run in 0..20 {
        let payload = HookPayload::new(HookPoint::AfterSave, json!({ "run": run }));
        let result = pipeline.call(HookPoint::AfterSave, payload).await.unwrap();
        assert!(result.all_succeeded());

        let names: Vec<&str> = result
            .executions
            .iter()
            .map(|e| e.hook_name.as_str())
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
        for pair in result.executions.windows(2) {
            assert!(pair[0].completed_at <= pair[1].started_at);
        }
    }

    let entries = RecordingHook::entries(&log);
    assert_eq!(entries.len(), 60);
    for chunk in entries.chunks(3) {
        assert_eq!(chunk, ["A", "B", "C"]);
    }
}

#[tokio::test]
async fn test_done_style_callback_is_awaited() {
    let pipeline = HookPipeline::new();
    let log = RecordingHook::log();

    pipeline.register(
        HookPoint::BeforeImport,
        "test",
        RecordingHook::new("A", &log).shared(),
    );
    let deferred = Arc::clone(&log);
    pipeline.register(
        HookPoint::BeforeImport,
        "test",
        Arc::new(DoneHook::new("B", move |_payload, done| {
            let log = Arc::clone(&deferred);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                log.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push("B".to_string());
                done.complete();
            });
        })),
    );
    pipeline.register(
        HookPoint::BeforeImport,
        "test",
        RecordingHook::new("C", &log).shared(),
    );

    for _ in 0..5 {
        let payload = HookPayload::new(HookPoint::BeforeImport, json!({}));
        pipeline.call(HookPoint::BeforeImport, payload).await.unwrap();
    }
    let entries = RecordingHook::entries(&log);
    for chunk in entries.chunks(3) {
        assert_eq!(chunk, ["A", "B", "C"]);
    }
}

#[tokio::test(start_paused = true)]
async fn test_order_holds_through_document_load() {
    let (editor, _surface) = editor().await;
    let log = RecordingHook::log();
    register_abc(editor.hooks(), HookPoint::BeforeImport, &log);
    register_abc(editor.hooks(), HookPoint::AfterImport, &log);

    editor.load_json(&sample_document_json()).await.unwrap();
    assert_eq!(RecordingHook::entries(&log), ["A", "B", "C", "A", "B", "C"]);
}

#[tokio::test(start_paused = true)]
async fn test_other_points_do_not_run() {
    let pipeline = HookPipeline::new();
    let log = RecordingHook::log();
    register_abc(&pipeline, HookPoint::AfterImport, &log);

    let payload = HookPayload::new(HookPoint::AfterSave, json!({}));
    let result = pipeline.call(HookPoint::AfterSave, payload).await.unwrap();
    assert!(result.executions.is_empty());
    assert!(RecordingHook::entries(&log).is_empty());
}
