//! Outcome of one `process()` call.
//!
//! Produced once per call, consumed exactly once by the worker loop.

use serde::{Deserialize, Serialize};

use super::events::ProcessingErrorEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingResult {
    /// The item is done.
    Success,

    /// Expected business failure. By convention the message names a
    /// canonical error kind (see [`ProcessingResult::failed_with`]).
    Error(String),

    /// Try again later; the item goes to the tail of the queue.
    Retry,
}

impl ProcessingResult {
    pub fn error(message: impl Into<String>) -> Self {
        ProcessingResult::Error(message.into())
    }

    /// Error whose message is the canonical kind's name, so observers can
    /// map it back with [`ProcessingResult::error_kind`].
    pub fn failed_with(kind: ProcessingErrorEvent) -> Self {
        ProcessingResult::Error(kind.as_str().to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingResult::Success)
    }

    /// Canonical kind named by an `Error` message; unknown names fall back to
    /// `Generic`. `None` for non-error results.
    pub fn error_kind(&self) -> Option<ProcessingErrorEvent> {
        match self {
            ProcessingResult::Error(message) => Some(ProcessingErrorEvent::from_message(message)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_tagged_enum() {
        let v = serde_json::to_value(ProcessingResult::error("CARD_REMOVED")).unwrap();
        assert_eq!(v["kind"], "ERROR");
        assert_eq!(v["message"], "CARD_REMOVED");

        let v = serde_json::to_value(ProcessingResult::Retry).unwrap();
        assert_eq!(v["kind"], "RETRY");
    }

    #[test]
    fn failed_with_round_trips_the_kind() {
        let result = ProcessingResult::failed_with(ProcessingErrorEvent::OperationTimeout);
        assert_eq!(result.error_kind(), Some(ProcessingErrorEvent::OperationTimeout));
    }

    #[test]
    fn free_text_errors_map_to_generic() {
        let result = ProcessingResult::error("printer caught fire");
        assert_eq!(result.error_kind(), Some(ProcessingErrorEvent::Generic));
        assert_eq!(ProcessingResult::Success.error_kind(), None);
    }
}
