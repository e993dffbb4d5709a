//! A released guide with no workspace overlap is gone; any overlap keeps it.

mod common;

use common::{fast_settings, loaded_editor};
use easel_core::{Orientation, Rect};
use easel_editor::Editor;
use easel_events::EditorEvent;
use easel_test::{MockSurface, sample_document_json};
use easel_workspace::ReleaseOutcome;

fn drop_guide(editor: &Editor, orientation: Orientation, position: f64) -> (bool, ReleaseOutcome) {
    let guides = editor.guides().unwrap();
    let id = guides.add_guide(orientation, 100.0).unwrap();
    guides.drag_guide(&id, position).unwrap();
    let outcome = guides.release_guide(&id).unwrap();
    (editor.scene().get(&id).is_some(), outcome)
}

fn overlaps_workspace(editor: &Editor, orientation: Orientation, position: f64) -> bool {
    let workspace = editor.scene().bounds().rect();
    let thickness = editor.settings().guides.thickness;
    let near = position - thickness / 2.0;
    let far = position + thickness / 2.0;
    match orientation {
        Orientation::Vertical => far >= workspace.left && near <= workspace.right(),
        Orientation::Horizontal => far >= workspace.top && near <= workspace.bottom(),
    }
}

#[tokio::test]
async fn test_far_outside_is_removed() {
    let (editor, _surface) = loaded_editor().await;
    for (orientation, position) in [
        (Orientation::Vertical, -200.0),
        (Orientation::Vertical, 1500.0),
        (Orientation::Horizontal, -40.0),
        (Orientation::Horizontal, 1300.0),
    ] {
        let (present, outcome) = drop_guide(&editor, orientation, position);
        assert_eq!(outcome, ReleaseOutcome::Removed, "{orientation:?} at {position}");
        assert!(!present, "{orientation:?} at {position}");
    }
}

#[tokio::test]
async fn test_any_overlap_is_kept() {
    let (editor, _surface) = loaded_editor().await;
    for (orientation, position) in [
        (Orientation::Vertical, 450.0),
        (Orientation::Vertical, 0.0),
        (Orientation::Vertical, 900.4),
        (Orientation::Horizontal, 0.3),
        (Orientation::Horizontal, 1200.0),
    ] {
        assert!(overlaps_workspace(&editor, orientation, position));
        let (present, outcome) = drop_guide(&editor, orientation, position);
        assert_eq!(outcome, ReleaseOutcome::Kept, "{orientation:?} at {position}");
        assert!(present, "{orientation:?} at {position}");
    }
}

#[tokio::test]
async fn test_exact_edges_without_tolerance() {
    let surface = MockSurface::new(1000.0, 800.0);
    let mut settings = fast_settings();
    settings.guides.out_tolerance_px = 0.0;
    let editor = Editor::builder(surface.shared())
        .with_settings(settings)
        .build()
        .await;
    editor.load_json(&sample_document_json()).await.unwrap();

    // Sweep across the left edge in small steps.
    let mut position = -3.0;
    while position <= 3.0 {
        let expected = overlaps_workspace(&editor, Orientation::Vertical, position);
        let (present, _) = drop_guide(&editor, Orientation::Vertical, position);
        assert_eq!(present, expected, "vertical guide at {position}");
        position += 0.25;
    }
}

#[tokio::test]
async fn test_removal_is_announced_and_cursor_reset() {
    let (editor, surface) = loaded_editor().await;
    let mut removed = editor.bus().subscribe_named(EditorEvent::GUIDE_REMOVED);

    let (present, _) = drop_guide(&editor, Orientation::Horizontal, -500.0);
    assert!(!present);
    let event = removed.try_recv().unwrap();
    assert!(matches!(*event, EditorEvent::GuideRemoved { .. }));
    assert_eq!(surface.last_cursor(), Some(easel_core::Cursor::Default));
}

#[tokio::test]
async fn test_drag_is_silent_and_release_is_one_entry() {
    let (editor, _surface) = loaded_editor().await;
    let guides = editor.guides().unwrap();
    let id = guides.add_guide(Orientation::Vertical, 100.0).unwrap();
    let depth = |editor: &Editor| editor.invoke("historyLength", serde_json::Value::Null).unwrap()["undo"].as_u64();
    assert_eq!(depth(&editor), Some(1));

    for step in 0..10 {
        guides.drag_guide(&id, 100.0 + f64::from(step) * 10.0).unwrap();
    }
    assert_eq!(depth(&editor), Some(1));

    guides.release_guide(&id).unwrap();
    assert_eq!(depth(&editor), Some(2));
    let rect: Rect = editor.scene().get(&id).unwrap().bounding_rect();
    assert!((rect.left + rect.width / 2.0 - 190.0).abs() < 1e-9);
}
