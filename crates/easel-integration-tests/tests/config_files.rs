//! Configuration files flow through to the editor.

use std::time::Duration;

use easel_config::Config;
use easel_editor::Editor;
use easel_editor::config_bridge::from_config;
use easel_test::{MockSurface, sample_document_json};
use tempfile::TempDir;

fn write_config(root: &std::path::Path, body: &str) {
    let dir = root.join(".easel");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), body).unwrap();
}

#[test]
fn test_project_overrides_user() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write_config(
        home.path(),
        "[viewport]\nfit_ratio = 0.5\nmin_zoom = 0.1\n\n[history]\nmax_entries = 20\n",
    );
    write_config(project.path(), "[viewport]\nfit_ratio = 0.7\n");

    let resolved = Config::load_with_home(Some(project.path()), home.path()).unwrap();
    let config = &resolved.config;
    assert!((config.viewport.fit_ratio - 0.7).abs() < f64::EPSILON);
    assert!((config.viewport.min_zoom - 0.1).abs() < f64::EPSILON);
    assert_eq!(config.history.max_entries, 20);
    assert_eq!(resolved.loaded_files.len(), 2);
}

#[test]
fn test_invalid_values_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[viewport]\nfit_ratio = 1.5\n").unwrap();
    assert!(Config::load_file(&path).is_err());

    std::fs::write(&path, "[history]\nmax_entries = 0\n").unwrap();
    assert!(Config::load_file(&path).is_err());
}

#[tokio::test]
async fn test_editor_uses_configured_fit_and_cap() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("easel.toml");
    std::fs::write(
        &path,
        "[viewport]\nfit_ratio = 0.5\n\n[history]\nmax_entries = 2\nsettle_grace_ms = 0\n\n[surface]\nready_retries = 1\nready_interval_ms = 1\n",
    )
    .unwrap();

    let settings = from_config(&Config::load_file(&path).unwrap());
    assert_eq!(settings.history.settle_grace, Duration::ZERO);

    let surface = MockSurface::new(4000.0, 4000.0);
    let editor = Editor::builder(surface.shared())
        .with_settings(settings)
        .build()
        .await;
    editor.load_json(&sample_document_json()).await.unwrap();

    // The container dwarfs the document, so the fit is the ratio itself.
    let zoom = editor.workspace().unwrap().zoom_to_fit();
    assert!((zoom - 0.5).abs() < 1e-12);

    for i in 0..5 {
        editor
            .scene()
            .add(easel_test::rect_object(&format!("r{i}"), 0.0, 0.0, 5.0, 5.0))
            .unwrap();
    }
    let mut undone = 0usize;
    while editor.undo() {
        undone = undone.saturating_add(1);
    }
    assert_eq!(undone, 2);
}
