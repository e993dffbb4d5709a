//! Operation context for correlating log lines of one editor operation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and timing of one editor operation (a load, a save, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationContext {
    /// Unique operation id.
    pub operation_id: Uuid,
    /// Enclosing operation, if any.
    pub parent_id: Option<Uuid>,
    /// Operation name, e.g. `"load_json"`.
    pub name: String,
    /// Document being operated on, when known.
    pub document: Option<String>,
    /// When the operation started.
    pub started_at: DateTime<Utc>,
    /// Extra key/value fields.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl OperationContext {
    /// Start a new operation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            operation_id: Uuid::new_v4(),
            parent_id: None,
            name: name.into(),
            document: None,
            started_at: Utc::now(),
            metadata: BTreeMap::new(),
        }
    }

    /// Start a sub-operation of this one.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self {
            operation_id: Uuid::new_v4(),
            parent_id: Some(self.operation_id),
            name: name.into(),
            document: self.document.clone(),
            started_at: Utc::now(),
            metadata: self.metadata.clone(),
        }
    }

    /// Name the document.
    #[must_use]
    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    /// Add a metadata field.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Milliseconds since the operation started.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_milliseconds()
    }

    /// First eight characters of the id.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.operation_id.simple().to_string().chars().take(8).collect()
    }

    /// A span carrying the operation's fields.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "operation",
            operation_id = %self.operation_id,
            name = %self.name,
            document = self.document.as_deref(),
        )
    }

    /// Enter the span until the returned guard drops.
    #[must_use]
    pub fn enter(self) -> OperationGuard {
        OperationGuard::new(self)
    }
}

/// Keeps an operation's span entered and logs its duration on drop.
pub struct OperationGuard {
    context: OperationContext,
    _span: tracing::span::EnteredSpan,
}

impl std::fmt::Debug for OperationGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationGuard")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl OperationGuard {
    /// Enter the context's span.
    #[must_use]
    pub fn new(context: OperationContext) -> Self {
        let span = context.span().entered();
        tracing::debug!("Operation started");
        Self {
            context,
            _span: span,
        }
    }

    /// The guarded context.
    #[must_use]
    pub fn context(&self) -> &OperationContext {
        &self.context
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        tracing::debug!(elapsed_ms = self.context.elapsed_ms(), "Operation completed");
    }
}
