//! Import, save and export flows.

use std::path::Path;
use std::time::Duration;

use easel_core::{CoreError, SceneGraph, SerializedDocument};
use easel_hooks::{CancellationToken, HookPayload, HookPoint, HookRun};
use easel_telemetry::OperationContext;
use serde_json::Value;
use tracing::{Instrument, debug, info, warn};

use super::Editor;
use crate::error::EditorResult;

/// How long a hook chain may run.
#[derive(Debug, Clone, Copy)]
enum HookBound<'a> {
    Unbounded,
    Timeout(Duration),
    Cancel(&'a CancellationToken),
}

impl Editor {
    fn default_bound(&self) -> HookBound<'static> {
        self.settings
            .hook_timeout
            .map_or(HookBound::Unbounded, HookBound::Timeout)
    }

    async fn run_hooks(
        &self,
        point: HookPoint,
        document: Value,
        bound: HookBound<'_>,
    ) -> EditorResult<HookRun> {
        let payload = HookPayload::new(point, document);
        let run = match bound {
            HookBound::Unbounded => self.hooks.call(point, payload).await?,
            HookBound::Timeout(timeout) => {
                self.hooks.call_with_timeout(point, payload, timeout).await?
            },
            HookBound::Cancel(token) => self.hooks.call_cancellable(point, payload, token).await?,
        };
        if !run.all_succeeded() {
            debug!(hook = %point, failures = run.failure_count(), "Hook chain finished with failures");
        }
        Ok(run)
    }

    // ---- import ----

    /// Load a serialized document, replacing the scene.
    ///
    /// History is suppressed from before the before-import hooks until the
    /// settle grace after the after-import hooks, then reset so the loaded
    /// state is the baseline. Hook chains use the configured default bound.
    ///
    /// Returns the after-import run.
    ///
    /// # Errors
    ///
    /// Returns a document error for malformed input and a hook error when a
    /// blocking hook fails or the bound is hit. Suppression is released on
    /// every error path. A failure after the scene was replaced restores the
    /// pre-load scene, so scene and history still agree.
    pub async fn load_json(&self, json: &str) -> EditorResult<HookRun> {
        self.load(json, self.default_bound()).await
    }

    /// Like [`Editor::load_json`], with each hook chain bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// As [`Editor::load_json`].
    pub async fn load_json_with_timeout(&self, json: &str, timeout: Duration) -> EditorResult<HookRun> {
        self.load(json, HookBound::Timeout(timeout)).await
    }

    /// Like [`Editor::load_json`], abandoned when `token` is cancelled.
    ///
    /// # Errors
    ///
    /// As [`Editor::load_json`].
    pub async fn load_json_cancellable(
        &self,
        json: &str,
        token: &CancellationToken,
    ) -> EditorResult<HookRun> {
        self.load(json, HookBound::Cancel(token)).await
    }

    /// Read and load a document file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, otherwise as
    /// [`Editor::load_json`].
    pub async fn load_file(&self, path: impl AsRef<Path>) -> EditorResult<HookRun> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        debug!(path = %path.display(), bytes = json.len(), "Read document file");
        self.load_json(&json).await
    }

    async fn load(&self, json: &str, bound: HookBound<'_>) -> EditorResult<HookRun> {
        self.ensure_open()?;
        let context = OperationContext::new("load_document");
        let span = context.span();

        async move {
            let guard = self.suppression.enter();
            match self.apply_document(json, bound).await {
                Ok(run) => {
                    guard.release_after(self.settings.history.settle_grace).await;
                    if let Some(history) = self.history() {
                        history.clear();
                    }
                    self.surface.request_render();
                    info!(
                        objects = self.scene.len(),
                        elapsed_ms = context.elapsed_ms(),
                        "Document loaded"
                    );
                    Ok(run)
                },
                Err(e) => {
                    drop(guard);
                    warn!(error = %e, "Document load failed");
                    Err(e)
                },
            }
        }
        .instrument(span)
        .await
    }

    async fn apply_document(&self, json: &str, bound: HookBound<'_>) -> EditorResult<HookRun> {
        let raw: Value = serde_json::from_str(json).map_err(CoreError::from)?;

        // Before-import hooks may rewrite the raw document
        let before = self.run_hooks(HookPoint::BeforeImport, raw, bound).await?;
        let (bounds, objects) = SerializedDocument::from_value(before.payload.document)?.into_parts()?;
        let previous = self.scene.read(SceneGraph::clone);
        self.scene.replace(bounds, objects)?;

        let after = match self.scene.to_document().to_value() {
            Ok(loaded) => self.run_hooks(HookPoint::AfterImport, loaded, bound).await,
            Err(e) => Err(e.into()),
        };
        if after.is_err() {
            self.roll_back(previous);
        }
        after
    }

    /// Put back the scene a failed load replaced. Silent, so history keeps
    /// the pre-load state as current.
    fn roll_back(&self, previous: SceneGraph) {
        let objects = previous.len();
        self.scene.update_silently(|graph| *graph = previous);
        if let Some(workspace) = self.workspace() {
            workspace.zoom_to_fit();
        }
        self.surface.request_render();
        warn!(objects, "Restored the scene from before the failed load");
    }

    // ---- save ----

    /// Run the after-save hooks, then capture the scene.
    ///
    /// # Errors
    ///
    /// Returns a hook error when a blocking hook fails or the default bound
    /// is hit.
    pub async fn save_document(&self) -> EditorResult<SerializedDocument> {
        self.ensure_open()?;
        let context = OperationContext::new("save_document");
        let span = context.span();

        async move {
            let current = self.scene.to_document().to_value()?;
            self.run_hooks(HookPoint::AfterSave, current, self.default_bound())
                .await?;
            let document = self.scene.to_document();
            info!(
                objects = document.objects.len(),
                elapsed_ms = context.elapsed_ms(),
                "Document saved"
            );
            Ok(document)
        }
        .instrument(span)
        .await
    }

    /// [`Editor::save_document`] as JSON text.
    ///
    /// # Errors
    ///
    /// As [`Editor::save_document`], plus encoding failures.
    pub async fn save_json(&self) -> EditorResult<String> {
        Ok(self.save_document().await?.to_json_string()?)
    }

    /// Save to a file.
    ///
    /// # Errors
    ///
    /// As [`Editor::save_json`], plus IO failures.
    pub async fn save_file(&self, path: impl AsRef<Path>) -> EditorResult<()> {
        let path = path.as_ref();
        let json = self.save_json().await?;
        tokio::fs::write(path, json.as_bytes()).await?;
        debug!(path = %path.display(), bytes = json.len(), "Wrote document file");
        Ok(())
    }

    // ---- export ----

    /// The document clipped to the workspace.
    ///
    /// Keeps the workspace and every object whose bounding rectangle touches
    /// the clip region. Guides never export.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Closed`](crate::EditorError::Closed) after
    /// close.
    pub fn export_document(&self) -> EditorResult<SerializedDocument> {
        self.ensure_open()?;
        let clip = self
            .workspace()
            .map_or_else(|| self.scene.bounds().rect(), |w| w.clip_region());

        let mut document = self.scene.to_document();
        let before = document.objects.len();
        document.objects.retain(|o| {
            o.id.is_workspace() || (!o.is_guide() && o.bounding_rect().intersects(&clip))
        });
        debug!(
            kept = document.objects.len(),
            dropped = before.saturating_sub(document.objects.len()),
            "Document exported"
        );
        Ok(document)
    }

    /// [`Editor::export_document`] as JSON text.
    ///
    /// # Errors
    ///
    /// As [`Editor::export_document`], plus encoding failures.
    pub fn export_json(&self) -> EditorResult<String> {
        Ok(self.export_document()?.to_json_string()?)
    }
}
