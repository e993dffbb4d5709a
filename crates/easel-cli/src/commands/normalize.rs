//! CLI handler for `easel normalize`.

use std::path::Path;

use anyhow::{Context, Result};
use easel_core::Size;
use easel_editor::EditorSettings;

use super::open_document;
use crate::headless::HeadlessSurface;

/// Container used when nothing is displayed.
const OFFSCREEN: Size = Size::new(1920.0, 1080.0);

/// Load `document` through the editor and render it back canonically.
///
/// With `clip`, objects off the workspace and guides are dropped.
pub(crate) async fn normalize(document: &Path, settings: EditorSettings, clip: bool) -> Result<String> {
    let surface = HeadlessSurface::new(OFFSCREEN);
    let mut editor = open_document(document, surface.shared(), settings).await?;

    let json = if clip {
        editor.export_json()?
    } else {
        editor.save_json().await?
    };
    editor.close();
    Ok(json)
}

/// Normalize `document` to `output`, or stdout.
pub(crate) async fn run_normalize(
    document: &Path,
    output: Option<&Path>,
    settings: EditorSettings,
    clip: bool,
) -> Result<()> {
    let json = normalize(document, settings, clip).await?;

    match output {
        Some(path) => {
            tokio::fs::write(path, json.as_bytes())
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        },
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::SerializedDocument;
    use easel_test::{sample_document_json, test_dir, write_document};
    use serde_json::json;

    #[tokio::test]
    async fn test_normalize_keeps_every_object() {
        let dir = test_dir();
        let path = write_document(&dir, "doc.json", &sample_document_json());

        let json = normalize(&path, EditorSettings::default(), false).await.unwrap();
        let document = SerializedDocument::from_json_str(&json).unwrap();
        let ids: Vec<_> = document.objects.iter().map(|o| o.id.to_string()).collect();
        assert_eq!(ids, vec!["workspace", "header", "badge", "title"]);
    }

    #[tokio::test]
    async fn test_normalize_is_stable() {
        let dir = test_dir();
        let first = write_document(&dir, "a.json", &sample_document_json());
        let once = normalize(&first, EditorSettings::default(), false).await.unwrap();

        let second = write_document(&dir, "b.json", &once);
        let twice = normalize(&second, EditorSettings::default(), false).await.unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_clip_drops_off_workspace_objects() {
        let mut raw: serde_json::Value = serde_json::from_str(&sample_document_json()).unwrap();
        raw["objects"].as_array_mut().unwrap().push(json!({
            "id": "offstage",
            "type": "rect",
            "left": 5000.0,
            "top": 5000.0,
            "width": 10.0,
            "height": 10.0
        }));
        let dir = test_dir();
        let path = write_document(&dir, "doc.json", &raw.to_string());

        let json = normalize(&path, EditorSettings::default(), true).await.unwrap();
        let document = SerializedDocument::from_json_str(&json).unwrap();
        assert!(document.objects.iter().all(|o| o.id.as_str() != "offstage"));
        assert_eq!(document.objects.len(), 4);
    }

    #[tokio::test]
    async fn test_run_normalize_writes_output() {
        let dir = test_dir();
        let input = write_document(&dir, "doc.json", &sample_document_json());
        let output = dir.path().join("out.json");

        run_normalize(&input, Some(&output), EditorSettings::default(), false)
            .await
            .unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(SerializedDocument::from_json_str(&written).is_ok());
    }
}
