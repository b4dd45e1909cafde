//! Queue-level input protocol: "tell me what to do about the queue".
//!
//! Kept apart from the processor-level protocol on purpose; these requests
//! are about the whole queue (proceed to the next item? how to recover from a
//! failure?) rather than data needed to finish one item.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::events::ProcessingErrorEvent;
use super::ids::QueueRequestId;

pub const CONFIRM_NEXT_TIMEOUT: Duration = Duration::from_secs(60);
pub const ERROR_RETRY_OR_SKIP_TIMEOUT: Duration = Duration::from_secs(60);

/// Operator decision after a failed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorHandlingAction {
    /// Process the same item again without moving it.
    RetryImmediately,
    /// Move the item to the tail of the queue.
    RetryLater,
    /// Drop this item (skipped, not shown as failed).
    AbortCurrent,
    /// Drop everything and cancel the queue.
    AbortAll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueInputRequest {
    ConfirmNextProcessor {
        id: QueueRequestId,
        current_item_index: usize,
        total_items: usize,
        current_item_id: String,
        next_item_id: Option<String>,
        timeout_ms: u64,
    },
    ErrorRetryOrSkip {
        id: QueueRequestId,
        item_id: String,
        error: ProcessingErrorEvent,
        /// Message from the processor's `Error` result.
        message: String,
        timeout_ms: u64,
    },
}

impl QueueInputRequest {
    pub fn confirm_next(
        current_item_index: usize,
        total_items: usize,
        current_item_id: impl Into<String>,
        next_item_id: Option<String>,
        timeout: Duration,
    ) -> Self {
        QueueInputRequest::ConfirmNextProcessor {
            id: QueueRequestId::generate(),
            current_item_index,
            total_items,
            current_item_id: current_item_id.into(),
            next_item_id,
            timeout_ms: timeout.as_millis().try_into().unwrap_or(u64::MAX),
        }
    }

    pub fn error_retry_or_skip(
        item_id: impl Into<String>,
        message: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let message = message.into();
        QueueInputRequest::ErrorRetryOrSkip {
            id: QueueRequestId::generate(),
            item_id: item_id.into(),
            error: ProcessingErrorEvent::from_message(&message),
            message,
            timeout_ms: timeout.as_millis().try_into().unwrap_or(u64::MAX),
        }
    }

    pub fn id(&self) -> QueueRequestId {
        match self {
            QueueInputRequest::ConfirmNextProcessor { id, .. }
            | QueueInputRequest::ErrorRetryOrSkip { id, .. } => *id,
        }
    }

    pub fn item_id(&self) -> &str {
        match self {
            QueueInputRequest::ConfirmNextProcessor {
                current_item_id, ..
            } => current_item_id,
            QueueInputRequest::ErrorRetryOrSkip { item_id, .. } => item_id,
        }
    }

    pub fn timeout(&self) -> Duration {
        match self {
            QueueInputRequest::ConfirmNextProcessor { timeout_ms, .. }
            | QueueInputRequest::ErrorRetryOrSkip { timeout_ms, .. } => {
                Duration::from_millis(*timeout_ms)
            }
        }
    }
}

/// Either a proceed/skip answer or an error-handling action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueueInputValue {
    Proceed(bool),
    Action(ErrorHandlingAction),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueInputResponse {
    pub request_id: QueueRequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<QueueInputValue>,
    #[serde(default)]
    pub canceled: bool,
    /// Item changes for the next step (e.g. a modified amount or method),
    /// applied through `QueueItem::apply_overrides`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<serde_json::Value>,
}

impl QueueInputResponse {
    fn with_value(request_id: QueueRequestId, value: QueueInputValue) -> Self {
        Self {
            request_id,
            value: Some(value),
            canceled: false,
            overrides: None,
        }
    }

    pub fn canceled(request_id: QueueRequestId) -> Self {
        Self {
            request_id,
            value: None,
            canceled: true,
            overrides: None,
        }
    }

    pub fn proceed(request_id: QueueRequestId) -> Self {
        Self::with_value(request_id, QueueInputValue::Proceed(true))
    }

    pub fn proceed_with_overrides(request_id: QueueRequestId, overrides: serde_json::Value) -> Self {
        Self {
            overrides: Some(overrides),
            ..Self::proceed(request_id)
        }
    }

    pub fn skip(request_id: QueueRequestId) -> Self {
        Self::with_value(request_id, QueueInputValue::Proceed(false))
    }

    pub fn action(request_id: QueueRequestId, action: ErrorHandlingAction) -> Self {
        Self::with_value(request_id, QueueInputValue::Action(action))
    }

    pub fn retry_immediately(request_id: QueueRequestId) -> Self {
        Self::action(request_id, ErrorHandlingAction::RetryImmediately)
    }

    pub fn retry_later(request_id: QueueRequestId) -> Self {
        Self::action(request_id, ErrorHandlingAction::RetryLater)
    }

    pub fn abort_current(request_id: QueueRequestId) -> Self {
        Self::action(request_id, ErrorHandlingAction::AbortCurrent)
    }

    pub fn abort_all(request_id: QueueRequestId) -> Self {
        Self::action(request_id, ErrorHandlingAction::AbortAll)
    }

    /// Proceed only on an explicit, non-canceled `true`.
    pub fn proceeds(&self) -> bool {
        !self.canceled && matches!(self.value, Some(QueueInputValue::Proceed(true)))
    }

    pub fn error_handling_action(&self) -> Option<ErrorHandlingAction> {
        if self.canceled {
            return None;
        }
        match self.value {
            Some(QueueInputValue::Action(action)) => Some(action),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_request_carries_canonical_kind() {
        let request =
            QueueInputRequest::error_retry_or_skip("p1", "CARD_REMOVED_BY_USER", ERROR_RETRY_OR_SKIP_TIMEOUT);
        match &request {
            QueueInputRequest::ErrorRetryOrSkip { error, item_id, .. } => {
                assert_eq!(*error, ProcessingErrorEvent::CardRemovedByUser);
                assert_eq!(item_id, "p1");
            }
            other => panic!("unexpected request: {other:?}"),
        }
        assert_eq!(request.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn confirm_request_describes_position() {
        let request = QueueInputRequest::confirm_next(0, 3, "a", Some("b".into()), CONFIRM_NEXT_TIMEOUT);
        assert_eq!(request.item_id(), "a");
        let v = serde_json::to_value(&request).unwrap();
        assert_eq!(v["type"], "CONFIRM_NEXT_PROCESSOR");
        assert_eq!(v["total_items"], 3);
        assert_eq!(v["next_item_id"], "b");
    }

    #[test]
    fn response_helpers() {
        let id = QueueRequestId::generate();

        assert!(QueueInputResponse::proceed(id).proceeds());
        assert!(!QueueInputResponse::skip(id).proceeds());
        assert!(!QueueInputResponse::canceled(id).proceeds());

        assert_eq!(
            QueueInputResponse::retry_later(id).error_handling_action(),
            Some(ErrorHandlingAction::RetryLater)
        );
        assert_eq!(QueueInputResponse::proceed(id).error_handling_action(), None);
    }

    #[test]
    fn value_is_untagged_bool_or_action() {
        let id = QueueRequestId::generate();
        let v = serde_json::to_value(QueueInputResponse::abort_all(id)).unwrap();
        assert_eq!(v["value"], "ABORT_ALL");

        let v = serde_json::to_value(QueueInputResponse::skip(id)).unwrap();
        assert_eq!(v["value"], false);
    }

    #[test]
    fn overrides_travel_with_proceed() {
        let id = QueueRequestId::generate();
        let response = QueueInputResponse::proceed_with_overrides(id, serde_json::json!({"amount": 500}));
        assert!(response.proceeds());
        assert_eq!(response.overrides.unwrap()["amount"], 500);
    }
}
