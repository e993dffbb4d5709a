//! Undo and redo stacks.

use chrono::{DateTime, Utc};
use easel_core::SceneSnapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::suppression::{Suppression, SuppressionGuard};

/// Default maximum number of undoable entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// One undoable state of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Monotonic sequence number, never reused.
    pub sequence: u64,
    /// Scene state after the mutation.
    pub snapshot: SceneSnapshot,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Name of the event that caused it.
    pub cause: String,
}

/// Result of [`History::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Pushed with this sequence number.
    Recorded(u64),
    /// Dropped because a suppression scope is open.
    Suppressed,
}

/// Undo/redo history of scene snapshots.
///
/// The baseline is the state nothing can be undone past. Each undo entry
/// holds the state after one mutation; undoing moves the top entry to the
/// redo stack and hands back the state beneath it.
#[derive(Debug)]
pub struct History {
    baseline: SceneSnapshot,
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    next_sequence: u64,
    max_entries: usize,
    suppression: Suppression,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl History {
    /// Create an empty history keeping at most `max_entries` undo entries.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            baseline: SceneSnapshot::default(),
            undo: Vec::new(),
            redo: Vec::new(),
            next_sequence: 1,
            max_entries: max_entries.max(1),
            suppression: Suppression::new(),
        }
    }

    /// Start from a known state.
    #[must_use]
    pub fn with_baseline(mut self, baseline: SceneSnapshot) -> Self {
        self.baseline = baseline;
        self
    }

    /// Share an existing suppression counter.
    #[must_use]
    pub fn with_suppression(mut self, suppression: Suppression) -> Self {
        self.suppression = suppression;
        self
    }

    /// The suppression counter.
    #[must_use]
    pub fn suppression(&self) -> &Suppression {
        &self.suppression
    }

    /// Open a suppression scope.
    #[must_use = "suppression ends as soon as the guard is dropped"]
    pub fn suppress(&self) -> SuppressionGuard {
        self.suppression.enter()
    }

    /// Whether recording is currently suppressed.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.suppression.is_active()
    }

    /// Record the state after a mutation.
    ///
    /// Clears the redo stack. When the cap is exceeded the oldest entry is
    /// folded into the baseline.
    pub fn record(&mut self, snapshot: SceneSnapshot, cause: impl Into<String>) -> RecordOutcome {
        let cause = cause.into();
        if self.is_suppressed() {
            debug!(cause = %cause, "History recording suppressed");
            return RecordOutcome::Suppressed;
        }

        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        self.redo.clear();
        self.undo.push(HistoryEntry {
            sequence,
            snapshot,
            recorded_at: Utc::now(),
            cause,
        });

        if self.undo.len() > self.max_entries {
            let oldest = self.undo.remove(0);
            self.baseline = oldest.snapshot;
        }

        debug!(sequence, depth = self.undo.len(), "History entry recorded");
        RecordOutcome::Recorded(sequence)
    }

    /// Step back. Returns the state to apply, or `None` if there is nothing
    /// to undo.
    pub fn undo(&mut self) -> Option<SceneSnapshot> {
        let Some(entry) = self.undo.pop() else {
            info!("Nothing to undo");
            return None;
        };
        debug!(sequence = entry.sequence, "Undo");
        self.redo.push(entry);
        Some(self.current().clone())
    }

    /// Step forward. Returns the state to apply, or `None` if there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Option<SceneSnapshot> {
        let Some(entry) = self.redo.pop() else {
            info!("Nothing to redo");
            return None;
        };
        debug!(sequence = entry.sequence, "Redo");
        let snapshot = entry.snapshot.clone();
        self.undo.push(entry);
        Some(snapshot)
    }

    /// Drop both stacks and start over from `baseline`.
    pub fn reset(&mut self, baseline: SceneSnapshot) {
        self.undo.clear();
        self.redo.clear();
        self.baseline = baseline;
        debug!("History reset");
    }

    /// Drop both stacks, keeping the current state as the baseline.
    pub fn clear(&mut self) {
        let current = self.current().clone();
        self.reset(current);
    }

    /// The state the scene is expected to be in.
    #[must_use]
    pub fn current(&self) -> &SceneSnapshot {
        self.undo.last().map_or(&self.baseline, |e| &e.snapshot)
    }

    /// The state nothing can be undone past.
    #[must_use]
    pub fn baseline(&self) -> &SceneSnapshot {
        &self.baseline
    }

    /// Whether [`History::undo`] would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether [`History::redo`] would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undoable entries.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redoable entries.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Undoable entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.undo
    }

    /// Maximum number of undoable entries.
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}
