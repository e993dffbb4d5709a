//! CLI handler for `easel fit`.

use std::path::Path;

use anyhow::{Result, anyhow};
use easel_core::{Rect, Size};
use easel_editor::EditorSettings;
use easel_editor::builtin::WORKSPACE_PLUGIN;
use serde::Serialize;

use super::open_document;
use crate::headless::HeadlessSurface;

/// Parse a `WIDTHxHEIGHT` container size.
pub(crate) fn parse_container(s: &str) -> Result<Size, String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid dimension '{part}': {e}"))
    };
    let size = Size::new(parse(width)?, parse(height)?);
    if !size.is_positive() {
        return Err(format!("container must be positive, got '{s}'"));
    }
    Ok(size)
}

#[derive(Debug, Serialize)]
struct FitReport {
    container: Size,
    document: Size,
    zoom: f64,
    transform: [f64; 6],
    clip: Rect,
}

/// Fit the document at `path` into `container` and print the viewport.
pub(crate) async fn run_fit(
    path: &Path,
    container: Size,
    settings: EditorSettings,
    json: bool,
) -> Result<()> {
    let surface = HeadlessSurface::new(container);
    let mut editor = open_document(path, surface.shared(), settings).await?;

    let workspace = editor
        .workspace()
        .ok_or_else(|| anyhow!("the {WORKSPACE_PLUGIN} plugin is unavailable"))?;
    let zoom = workspace.zoom_to_fit();
    let report = FitReport {
        container,
        document: editor.scene().bounds().size(),
        zoom,
        transform: surface
            .transform()
            .unwrap_or_else(|| workspace.transform().to_matrix()),
        clip: surface.clip().unwrap_or_else(|| workspace.clip_region()),
    };
    tracing::debug!(renders = surface.render_count(), "Fit complete");
    editor.close();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let [a, b, c, d, e, f] = report.transform;
    println!(
        "Container: {} x {}",
        report.container.width, report.container.height
    );
    println!(
        "Document:  {} x {}",
        report.document.width, report.document.height
    );
    println!("Zoom:      {:.4}", report.zoom);
    println!("Transform: [{a:.4}, {b:.4}, {c:.4}, {d:.4}, {e:.2}, {f:.2}]");
    println!(
        "Clip:      left {:.2}, top {:.2}, {:.2} x {:.2}",
        report.clip.left, report.clip.top, report.clip.width, report.clip.height
    );
    if let Some(canvas) = surface.dimensions() {
        println!("Canvas:    {} x {}", canvas.width, canvas.height);
    }
    Ok(())
}
