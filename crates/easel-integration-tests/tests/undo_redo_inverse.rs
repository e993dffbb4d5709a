//! Undoing N steps then redoing N steps restores the scene byte for byte.

mod common;

use common::{Lcg, id, loaded_editor, serialized};
use easel_core::{ObjectKind, SceneObject};
use easel_editor::Editor;
use easel_test::rect_object;

fn mutate(editor: &Editor, rng: &mut Lcg, step: u32) {
    let scene = editor.scene();
    let existing: Vec<_> = scene.read(|g| g.objects().iter().map(|o| o.id.clone()).collect());
    let pick = |rng: &mut Lcg| {
        let len = u64::try_from(existing.len()).unwrap();
        usize::try_from(rng.below(len)).ok().and_then(|i| existing.get(i).cloned())
    };

    match rng.below(5) {
        0 => {
            let object = rect_object(
                &format!("shape-{step}"),
                rng.coordinate(900),
                rng.coordinate(1200),
                rng.coordinate(200) + 1.0,
                rng.coordinate(200) + 1.0,
            );
            scene.add(object).unwrap();
        },
        1 => {
            let path = SceneObject::new(ObjectKind::Path)
                .with_id(id(&format!("stroke-{step}")))
                .with_frame(rng.coordinate(900), rng.coordinate(1200), 40.0, 12.0);
            scene.add_path(path).unwrap();
        },
        2 => {
            if let Some(target) = pick(rng) {
                let dx = rng.coordinate(50);
                scene.modify(&target, |o| o.left += dx).unwrap();
            }
        },
        3 => {
            if let Some(target) = pick(rng) {
                let fill = format!("#{:06x}", rng.below(0x00ff_ffff));
                scene.modify(&target, |o| o.fill = Some(fill)).unwrap();
            }
        },
        _ => {
            if let Some(target) = pick(rng) {
                scene.remove(&[target]);
            }
        },
    }
}

fn undo_all(editor: &Editor) -> usize {
    let mut steps = 0usize;
    while editor.undo() {
        steps = steps.saturating_add(1);
    }
    steps
}

#[tokio::test]
async fn test_inverse_law_over_random_sequences() {
    for seed in 1..=12u64 {
        let (editor, _surface) = loaded_editor().await;
        let loaded = serialized(&editor);
        let mut rng = Lcg::new(seed);
        let length = u32::try_from(rng.below(25)).unwrap().saturating_add(1);

        for step in 0..length {
            mutate(&editor, &mut rng, step);
        }
        let before_undo = serialized(&editor);

        let steps = undo_all(&editor);
        assert_eq!(serialized(&editor), loaded, "seed {seed}: undo must reach the load baseline");
        for _ in 0..steps {
            assert!(editor.redo(), "seed {seed}: redo ran out early");
        }
        assert!(!editor.redo());
        assert_eq!(serialized(&editor), before_undo, "seed {seed}");
    }
}

#[tokio::test]
async fn test_partial_undo_then_redo() {
    let (editor, _surface) = loaded_editor().await;
    let mut rng = Lcg::new(99);
    for step in 0..10 {
        mutate(&editor, &mut rng, step);
    }
    let before_undo = serialized(&editor);

    let mut undone = 0usize;
    for _ in 0..4 {
        if editor.undo() {
            undone = undone.saturating_add(1);
        }
    }
    for _ in 0..undone {
        assert!(editor.redo());
    }
    assert_eq!(serialized(&editor), before_undo);
}

#[tokio::test]
async fn test_undo_and_redo_do_not_record() {
    let (editor, _surface) = loaded_editor().await;
    editor.scene().remove(&[id("badge")]);
    editor
        .scene()
        .add(rect_object("extra", 1.0, 1.0, 5.0, 5.0))
        .unwrap();

    assert!(editor.undo());
    assert!(editor.undo());
    let length = editor
        .invoke("historyLength", serde_json::Value::Null)
        .unwrap();
    assert_eq!(length, serde_json::json!({ "undo": 0, "redo": 2 }));
}
