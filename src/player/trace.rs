//! Append-only trace of a playback run.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One timestamped line in the trace.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Ordered trace log. Entries are only ever appended; insertion order is the
/// display order and reconstructs the timeline of the run. Only a reset
/// clears it.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    entries: Vec<TraceEntry>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry stamped with the current time.
    pub fn append(&mut self, message: impl Into<String>) {
        self.entries.push(TraceEntry {
            timestamp: Utc::now(),
            message: message.into(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&TraceEntry> {
        self.entries.last()
    }
}
