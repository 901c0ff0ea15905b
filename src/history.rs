// history.rs — In-memory interaction history for one session

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

/// How many entries the display surface shows.
pub const DISPLAY_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub task: String,
    pub optimized_text: String,
    /// Provider that produced the text; `None` when every provider failed.
    pub provider: Option<String>,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(task: &str, optimized_text: &str, provider: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task: task.to_string(),
            optimized_text: optimized_text.to_string(),
            provider,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Append-only; insertion order is chronological. The full sequence is kept
/// for the session lifetime, display callers cap with `recent`.
#[derive(Debug, Default)]
pub struct InteractionHistory {
    entries: Vec<HistoryEntry>,
}

impl InteractionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Last `n` entries in chronological order, most recent last. Display
    /// surfaces reverse this themselves when they want most-recent-first.
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
