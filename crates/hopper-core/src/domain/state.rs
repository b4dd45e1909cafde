//! Observable lifecycle of the queue and of the item at its head.

use serde::{Deserialize, Serialize};

use super::events::ProcessingErrorEvent;

/// The state published to observers.
///
/// Exactly one value is current at a time; a new one overwrites the old.
/// `None` on the `processing_state` channel means idle with nothing to report.
///
/// Transitions produced by the worker loop:
/// - ItemProcessing -> ItemDone | ItemFailed | ItemRetrying | ItemSkipped
/// - (queue drained) -> QueueDone
/// - ABORT_ALL escalation -> QueueCanceled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ProcessingState<T> {
    QueueIdle(Option<T>),
    ItemProcessing(T),
    ItemDone(T),
    ItemFailed { item: T, error: String },
    ItemRetrying(T),
    ItemSkipped(T),
    QueueCanceled(Option<T>),
    QueueDone(Option<T>),
}

impl<T> ProcessingState<T> {
    /// The item this state refers to, if any.
    pub fn item(&self) -> Option<&T> {
        match self {
            ProcessingState::ItemProcessing(item)
            | ProcessingState::ItemDone(item)
            | ProcessingState::ItemFailed { item, .. }
            | ProcessingState::ItemRetrying(item)
            | ProcessingState::ItemSkipped(item) => Some(item),
            ProcessingState::QueueIdle(item)
            | ProcessingState::QueueCanceled(item)
            | ProcessingState::QueueDone(item) => item.as_ref(),
        }
    }

    /// Does this state close out one processing attempt?
    pub fn resolves_item(&self) -> bool {
        matches!(
            self,
            ProcessingState::ItemDone(_)
                | ProcessingState::ItemFailed { .. }
                | ProcessingState::ItemRetrying(_)
                | ProcessingState::ItemSkipped(_)
        )
    }

    /// Does this state mean the loop has stopped?
    pub fn is_queue_level(&self) -> bool {
        matches!(
            self,
            ProcessingState::QueueIdle(_)
                | ProcessingState::QueueCanceled(_)
                | ProcessingState::QueueDone(_)
        )
    }

    /// Canonical kind behind an `ItemFailed` message (`Generic` when the
    /// message is not a kind name).
    pub fn error_kind(&self) -> Option<ProcessingErrorEvent> {
        match self {
            ProcessingState::ItemFailed { error, .. } => {
                Some(ProcessingErrorEvent::from_message(error))
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProcessingState::QueueIdle(_) => "queue_idle",
            ProcessingState::ItemProcessing(_) => "item_processing",
            ProcessingState::ItemDone(_) => "item_done",
            ProcessingState::ItemFailed { .. } => "item_failed",
            ProcessingState::ItemRetrying(_) => "item_retrying",
            ProcessingState::ItemSkipped(_) => "item_skipped",
            ProcessingState::QueueCanceled(_) => "queue_canceled",
            ProcessingState::QueueDone(_) => "queue_done",
        }
    }
}

/// When (and whether) queued items are written to storage.
///
/// Fixed per manager instance for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersistenceStrategy {
    /// Write-through on enqueue (fire-and-forget).
    #[default]
    Immediate,
    /// Buffer in a pending set, flush on `persist_pending_items`/`force_persist`.
    OnBackground,
    /// Memory only.
    Never,
}

impl PersistenceStrategy {
    pub fn persists(self) -> bool {
        !matches!(self, PersistenceStrategy::Never)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::done(ProcessingState::ItemDone(1), true)]
    #[case::failed(ProcessingState::ItemFailed { item: 1, error: "X".into() }, true)]
    #[case::retrying(ProcessingState::ItemRetrying(1), true)]
    #[case::skipped(ProcessingState::ItemSkipped(1), true)]
    #[case::processing(ProcessingState::ItemProcessing(1), false)]
    #[case::queue_done(ProcessingState::QueueDone(None), false)]
    fn resolving_states(#[case] state: ProcessingState<i32>, #[case] resolves: bool) {
        assert_eq!(state.resolves_item(), resolves);
    }

    #[test]
    fn item_accessor_covers_optional_variants() {
        assert_eq!(ProcessingState::QueueCanceled(Some(7)).item(), Some(&7));
        assert_eq!(ProcessingState::<i32>::QueueDone(None).item(), None);
        assert_eq!(ProcessingState::ItemSkipped(3).item(), Some(&3));
    }

    #[test]
    fn failed_state_exposes_canonical_kind() {
        let state = ProcessingState::ItemFailed {
            item: 1,
            error: "OPERATION_TIMEOUT".to_string(),
        };
        assert_eq!(state.error_kind(), Some(ProcessingErrorEvent::OperationTimeout));
        assert_eq!(state.name(), "item_failed");
    }

    #[test]
    fn strategy_serializes_screaming_snake() {
        let s = serde_json::to_string(&PersistenceStrategy::OnBackground).unwrap();
        assert_eq!(s, "\"ON_BACKGROUND\"");
        assert!(!PersistenceStrategy::Never.persists());
        assert_eq!(PersistenceStrategy::default(), PersistenceStrategy::Immediate);
    }
}
