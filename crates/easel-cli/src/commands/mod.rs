//! CLI commands.

pub(crate) mod config;
pub(crate) mod fit;
pub(crate) mod info;
pub(crate) mod normalize;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use easel_core::RenderSurface;
use easel_editor::{Editor, EditorSettings};

/// Build an editor over `surface` and load `document` into it.
pub(crate) async fn open_document(
    document: &Path,
    surface: Arc<dyn RenderSurface>,
    settings: EditorSettings,
) -> Result<Editor> {
    let editor = Editor::builder(surface).with_settings(settings).build().await;
    editor.load_file(document).await?;
    Ok(editor)
}
