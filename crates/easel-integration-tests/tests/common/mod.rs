//! Shared harness for integration tests.

use std::time::Duration;

use easel_core::ObjectId;
use easel_editor::{Editor, EditorSettings};
use easel_test::{MockSurface, init_test_logging, sample_document_json};

/// Settings with no settle grace and a single readiness poll.
#[allow(dead_code)]
pub fn fast_settings() -> EditorSettings {
    EditorSettings::default()
        .with_settle_grace(Duration::ZERO)
        .with_surface_polling(1, Duration::from_millis(1))
}

/// An editor with the built-ins over a 1000x800 mock surface.
#[allow(dead_code)]
pub async fn editor() -> (Editor, MockSurface) {
    init_test_logging("easel=debug");
    let surface = MockSurface::new(1000.0, 800.0);
    let editor = Editor::builder(surface.shared())
        .with_settings(fast_settings())
        .build()
        .await;
    (editor, surface)
}

/// [`editor`] with the sample document loaded.
///
/// # Panics
///
/// Panics if the sample document fails to load.
#[allow(dead_code)]
pub async fn loaded_editor() -> (Editor, MockSurface) {
    let (editor, surface) = editor().await;
    editor
        .load_json(&sample_document_json())
        .await
        .expect("sample document must load");
    (editor, surface)
}

/// Parse an object id.
///
/// # Panics
///
/// Panics if `s` is not a valid id.
#[allow(dead_code)]
pub fn id(s: &str) -> ObjectId {
    ObjectId::new(s).expect("valid object id")
}

/// Serialized scene.
///
/// # Panics
///
/// Panics if the scene fails to serialize.
#[allow(dead_code)]
pub fn serialized(editor: &Editor) -> String {
    editor
        .scene()
        .to_document()
        .to_json_string()
        .expect("scene must serialize")
}

/// Small deterministic generator for operation sequences.
#[allow(dead_code)]
pub struct Lcg(u64);

#[allow(dead_code)]
impl Lcg {
    /// Seeded generator.
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Next value in `0..bound`.
    pub fn below(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0.rotate_left(31).checked_rem(bound).unwrap_or(0)
    }

    /// Next value in `0.0..max`.
    #[allow(clippy::cast_precision_loss)]
    pub fn coordinate(&mut self, max: u64) -> f64 {
        self.below(max) as f64
    }
}
