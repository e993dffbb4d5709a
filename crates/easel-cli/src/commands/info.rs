//! CLI handler for `easel info`.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use easel_core::SerializedDocument;
use serde::Serialize;

/// What `easel info` reports about a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct DocumentSummary {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) fill: String,
    pub(crate) objects: usize,
    pub(crate) guides: usize,
    pub(crate) kinds: BTreeMap<String, usize>,
}

impl DocumentSummary {
    /// Summarize a parsed document. Guides are counted apart from objects.
    pub(crate) fn of(document: SerializedDocument) -> Result<Self> {
        let mut kinds = BTreeMap::new();
        let mut guides = 0usize;
        for object in document.user_objects() {
            if object.is_guide() {
                guides = guides.saturating_add(1);
                continue;
            }
            let count = kinds.entry(object.kind.to_string()).or_insert(0usize);
            *count = count.saturating_add(1);
        }
        let objects = kinds.values().sum();

        let (bounds, _) = document.into_parts()?;
        Ok(Self {
            width: bounds.width(),
            height: bounds.height(),
            fill: bounds.fill().to_string(),
            objects,
            guides,
            kinds,
        })
    }
}

/// Print a summary of the document at `path`.
pub(crate) async fn run_info(path: &Path, json: bool) -> Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let summary = DocumentSummary::of(SerializedDocument::from_json_str(&text)?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Document: {}", path.display());
    println!("  Size:    {} x {}", summary.width, summary.height);
    println!("  Fill:    {}", summary.fill);
    println!("  Objects: {}", summary.objects);
    println!("  Guides:  {}", summary.guides);
    if !summary.kinds.is_empty() {
        println!("\nKinds:");
        for (kind, count) in &summary.kinds {
            println!("  {kind:<12} {count}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::Orientation;
    use easel_test::{guide_object, sample_document, text_object};

    #[test]
    fn test_summary_of_sample() {
        let summary = DocumentSummary::of(sample_document()).unwrap();
        assert!((summary.width - 900.0).abs() < f64::EPSILON);
        assert!((summary.height - 1200.0).abs() < f64::EPSILON);
        assert_eq!(summary.objects, 3);
        assert_eq!(summary.guides, 0);
        assert_eq!(summary.kinds.get("rect"), Some(&1));
        assert_eq!(summary.kinds.get("circle"), Some(&1));
        assert_eq!(summary.kinds.get("i-text"), Some(&1));
    }

    #[test]
    fn test_guides_counted_separately() {
        let mut document = sample_document();
        document.objects.push(guide_object(Orientation::Vertical, 300.0));
        document.objects.push(text_object("note", "hello"));

        let summary = DocumentSummary::of(document).unwrap();
        assert_eq!(summary.guides, 1);
        assert_eq!(summary.objects, 4);
        assert!(!summary.kinds.contains_key("guide-line"));
    }

    #[test]
    fn test_duplicate_workspace_rejected() {
        let mut document = sample_document();
        let workspace = document.objects[0].clone();
        document.objects.push(workspace);
        assert!(DocumentSummary::of(document).is_err());
    }

    #[tokio::test]
    async fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = run_info(&path, false).await.unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}
