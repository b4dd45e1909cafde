//! Processor-level input protocol: "give me data to continue this item".
//!
//! A processor pauses mid-item, emits an [`InputRequest`] and waits for the
//! [`InputResponse`] carrying the same id. Each request has an optional
//! timeout; the processor (not the manager) enforces it and treats expiry as
//! if the operator declined.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ids::InputRequestId;

pub const PIN_TIMEOUT: Duration = Duration::from_secs(60);
pub const SIGNATURE_TIMEOUT: Duration = Duration::from_secs(120);
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);
pub const SELECTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputRequest {
    PinInput {
        id: InputRequestId,
        subject_id: String,
        timeout_ms: Option<u64>,
    },
    SignatureInput {
        id: InputRequestId,
        subject_id: String,
        timeout_ms: Option<u64>,
    },
    ConfirmationInput {
        id: InputRequestId,
        subject_id: String,
        timeout_ms: Option<u64>,
        message: String,
    },
    SelectionInput {
        id: InputRequestId,
        subject_id: String,
        timeout_ms: Option<u64>,
        options: Vec<String>,
    },
}

fn millis(d: Duration) -> Option<u64> {
    Some(d.as_millis().try_into().unwrap_or(u64::MAX))
}

impl InputRequest {
    pub fn pin(subject_id: impl Into<String>) -> Self {
        InputRequest::PinInput {
            id: InputRequestId::generate(),
            subject_id: subject_id.into(),
            timeout_ms: millis(PIN_TIMEOUT),
        }
    }

    pub fn signature(subject_id: impl Into<String>) -> Self {
        InputRequest::SignatureInput {
            id: InputRequestId::generate(),
            subject_id: subject_id.into(),
            timeout_ms: millis(SIGNATURE_TIMEOUT),
        }
    }

    pub fn confirmation(subject_id: impl Into<String>, message: impl Into<String>) -> Self {
        InputRequest::ConfirmationInput {
            id: InputRequestId::generate(),
            subject_id: subject_id.into(),
            timeout_ms: millis(CONFIRMATION_TIMEOUT),
            message: message.into(),
        }
    }

    pub fn selection(subject_id: impl Into<String>, options: Vec<String>) -> Self {
        InputRequest::SelectionInput {
            id: InputRequestId::generate(),
            subject_id: subject_id.into(),
            timeout_ms: millis(SELECTION_TIMEOUT),
            options,
        }
    }

    /// Replace the default timeout; `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        let value = timeout.and_then(millis);
        match &mut self {
            InputRequest::PinInput { timeout_ms, .. }
            | InputRequest::SignatureInput { timeout_ms, .. }
            | InputRequest::ConfirmationInput { timeout_ms, .. }
            | InputRequest::SelectionInput { timeout_ms, .. } => *timeout_ms = value,
        }
        self
    }

    pub fn id(&self) -> InputRequestId {
        match self {
            InputRequest::PinInput { id, .. }
            | InputRequest::SignatureInput { id, .. }
            | InputRequest::ConfirmationInput { id, .. }
            | InputRequest::SelectionInput { id, .. } => *id,
        }
    }

    /// What the request is about (e.g. a payment id).
    pub fn subject_id(&self) -> &str {
        match self {
            InputRequest::PinInput { subject_id, .. }
            | InputRequest::SignatureInput { subject_id, .. }
            | InputRequest::ConfirmationInput { subject_id, .. }
            | InputRequest::SelectionInput { subject_id, .. } => subject_id,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        let timeout_ms = match self {
            InputRequest::PinInput { timeout_ms, .. }
            | InputRequest::SignatureInput { timeout_ms, .. }
            | InputRequest::ConfirmationInput { timeout_ms, .. }
            | InputRequest::SelectionInput { timeout_ms, .. } => *timeout_ms,
        };
        timeout_ms.map(Duration::from_millis)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InputRequest::PinInput { .. } => "pin_input",
            InputRequest::SignatureInput { .. } => "signature_input",
            InputRequest::ConfirmationInput { .. } => "confirmation_input",
            InputRequest::SelectionInput { .. } => "selection_input",
        }
    }
}

/// Payload of an answered request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputValue {
    Text(String),
    Confirmed(bool),
    Selected(usize),
    Signature(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputResponse {
    pub request_id: InputRequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<InputValue>,
    #[serde(default)]
    pub canceled: bool,
    #[serde(default)]
    pub timed_out: bool,
}

impl InputResponse {
    pub fn answered(request_id: InputRequestId, value: InputValue) -> Self {
        Self {
            request_id,
            value: Some(value),
            canceled: false,
            timed_out: false,
        }
    }

    /// The operator declined.
    pub fn canceled(request_id: InputRequestId) -> Self {
        Self {
            request_id,
            value: None,
            canceled: true,
            timed_out: false,
        }
    }

    /// Nobody answered in time.
    pub fn timeout(request_id: InputRequestId) -> Self {
        Self {
            request_id,
            value: None,
            canceled: true,
            timed_out: true,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.value.is_some() && !self.canceled
    }

    /// `true` only for an explicit positive confirmation.
    pub fn is_confirmed(&self) -> bool {
        matches!(self.value, Some(InputValue::Confirmed(true))) && !self.canceled
    }

    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(InputValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<usize> {
        match self.value {
            Some(InputValue::Selected(index)) => Some(index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::pin(InputRequest::pin("pay-1"), PIN_TIMEOUT)]
    #[case::signature(InputRequest::signature("pay-1"), SIGNATURE_TIMEOUT)]
    #[case::confirmation(InputRequest::confirmation("pay-1", "print receipt?"), CONFIRMATION_TIMEOUT)]
    #[case::selection(InputRequest::selection("pay-1", vec!["a".into()]), SELECTION_TIMEOUT)]
    fn default_timeouts(#[case] request: InputRequest, #[case] expected: Duration) {
        assert_eq!(request.timeout(), Some(expected));
        assert_eq!(request.subject_id(), "pay-1");
    }

    #[test]
    fn timeout_can_be_overridden_or_removed() {
        let short = InputRequest::pin("p").with_timeout(Some(Duration::from_millis(50)));
        assert_eq!(short.timeout(), Some(Duration::from_millis(50)));

        let forever = InputRequest::pin("p").with_timeout(None);
        assert_eq!(forever.timeout(), None);
    }

    #[test]
    fn factory_responses_carry_no_value() {
        let request = InputRequest::confirmation("p", "ok?");

        let canceled = InputResponse::canceled(request.id());
        assert!(canceled.value.is_none());
        assert!(!canceled.is_answered());

        let timeout = InputResponse::timeout(request.id());
        assert!(timeout.timed_out);
        assert!(!timeout.is_confirmed());
    }

    #[test]
    fn answered_helpers() {
        let request = InputRequest::pin("p");
        let response = InputResponse::answered(request.id(), InputValue::Text("1234".into()));
        assert_eq!(response.text(), Some("1234"));
        assert_eq!(response.selection(), None);

        let yes = InputResponse::answered(request.id(), InputValue::Confirmed(true));
        assert!(yes.is_confirmed());
    }

    #[test]
    fn request_is_tagged_by_type() {
        let v = serde_json::to_value(InputRequest::pin("p")).unwrap();
        assert_eq!(v["type"], "pin_input");
        assert_eq!(v["timeout_ms"], 60_000);
    }
}
