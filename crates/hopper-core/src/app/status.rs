//! Status - point-in-time snapshot of a manager.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{PersistenceStrategy, QueueInputRequest};

/// Answers "why is nothing happening?" without subscribing to any stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStatus {
    pub captured_at: DateTime<Utc>,
    pub strategy: PersistenceStrategy,
    /// Items in memory, including the one being processed.
    pub queued: usize,
    /// Items waiting for `persist_pending_items` (ON_BACKGROUND only).
    pub pending_persistence: usize,
    /// Item currently inside `process()`.
    pub in_flight: Option<String>,
    pub running: bool,
    /// Queue-level question waiting for the operator.
    pub awaiting_input: Option<QueueInputRequest>,
}

impl QueueStatus {
    pub fn is_empty(&self) -> bool {
        self.queued == 0
    }

    pub fn has_pending_persistence(&self) -> bool {
        self.pending_persistence > 0
    }

    /// Running, but blocked on the operator.
    pub fn is_waiting_for_operator(&self) -> bool {
        self.running && self.awaiting_input.is_some()
    }
}
