//! InputBroker - correlates a processor's input requests with responses.
//!
//! A processor owns one broker, returns `broker.subscribe()` from
//! `QueueProcessor::input_requests` and forwards `provide_input` to
//! `broker.provide`. Inside `process` it awaits `broker.request(..)`, which
//! always resolves: with the operator's answer, with a canceled response when
//! the broker is cancelled, or with a timeout response once the request's own
//! timeout elapses.

use std::collections::HashMap;

use tokio::sync::{Mutex, broadcast, oneshot};
use tracing::{debug, warn};

use crate::domain::{InputRequest, InputRequestId, InputResponse};

pub struct InputBroker {
    requests: broadcast::Sender<InputRequest>,
    pending: Mutex<HashMap<InputRequestId, oneshot::Sender<InputResponse>>>,
}

impl InputBroker {
    pub fn new(capacity: usize) -> Self {
        let (requests, _) = broadcast::channel(capacity.max(1));
        Self {
            requests,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InputRequest> {
        self.requests.subscribe()
    }

    /// Emit `request` and wait for its response (or its timeout).
    pub async fn request(&self, request: InputRequest) -> InputResponse {
        let id = request.id();
        let timeout = request.timeout();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        debug!(request_id = %id, kind = request.kind(), subject_id = request.subject_id(), "input requested");
        if self.requests.send(request).is_err() {
            debug!(request_id = %id, "no subscriber for input request");
        }

        let received = match timeout {
            Some(timeout) => tokio::time::timeout(timeout, rx).await.ok(),
            None => Some(rx.await),
        };

        match received {
            Some(Ok(response)) => response,
            // sender dropped by cancel_all
            Some(Err(_)) => InputResponse::canceled(id),
            None => {
                self.pending.lock().await.remove(&id);
                warn!(request_id = %id, "input request timed out");
                InputResponse::timeout(id)
            }
        }
    }

    /// Deliver a response. Returns `false` when nobody is waiting for it
    /// (unknown id, already answered or already timed out).
    pub async fn provide(&self, response: InputResponse) -> bool {
        let waiter = self.pending.lock().await.remove(&response.request_id);
        match waiter {
            Some(tx) => {
                let request_id = response.request_id;
                let delivered = tx.send(response).is_ok();
                debug!(request_id = %request_id, delivered, "input response delivered");
                delivered
            }
            None => {
                debug!(request_id = %response.request_id, "ignoring late or unknown input response");
                false
            }
        }
    }

    /// Resolve every outstanding request as canceled. Returns how many there were.
    pub async fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self.pending.lock().await.drain().collect();
        let count = drained.len();
        for (id, tx) in drained {
            let _ = tx.send(InputResponse::canceled(id));
        }
        if count > 0 {
            debug!(count, "cancelled outstanding input requests");
        }
        count
    }

    pub async fn outstanding(&self) -> usize {
        self.pending.lock().await.len()
    }
}

impl Default for InputBroker {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InputValue;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn answered_request_returns_operator_response() {
        let broker = Arc::new(InputBroker::default());
        let mut requests = broker.subscribe();

        let waiter = tokio::spawn({
            let broker = broker.clone();
            async move { broker.request(InputRequest::pin("pay-1")).await }
        });

        let request = requests.recv().await.unwrap();
        let answer = InputResponse::answered(request.id(), InputValue::Text("1234".into()));
        assert!(broker.provide(answer).await);

        let response = waiter.await.unwrap();
        assert_eq!(response.text(), Some("1234"));
        assert_eq!(broker.outstanding().await, 0);
    }

    #[tokio::test]
    async fn unanswered_request_times_out() {
        let broker = InputBroker::default();
        let request = InputRequest::confirmation("pay-1", "continue?")
            .with_timeout(Some(Duration::from_millis(20)));

        let response = tokio::time::timeout(Duration::from_secs(2), broker.request(request))
            .await
            .expect("request must resolve after its timeout");

        assert!(response.timed_out);
        assert!(!response.is_confirmed());
        assert_eq!(broker.outstanding().await, 0);
    }

    #[tokio::test]
    async fn late_response_is_ignored() {
        let broker = InputBroker::default();
        let request = InputRequest::pin("pay-1").with_timeout(Some(Duration::from_millis(10)));
        let id = request.id();

        let _ = broker.request(request).await;

        let late = InputResponse::answered(id, InputValue::Text("0000".into()));
        assert!(!broker.provide(late).await);
    }

    #[tokio::test]
    async fn cancel_all_releases_waiters() {
        let broker = Arc::new(InputBroker::default());
        let mut requests = broker.subscribe();

        let waiter = tokio::spawn({
            let broker = broker.clone();
            async move { broker.request(InputRequest::signature("pay-1").with_timeout(None)).await }
        });

        let _ = requests.recv().await.unwrap();
        assert_eq!(broker.cancel_all().await, 1);

        let response = waiter.await.unwrap();
        assert!(response.canceled);
        assert!(!response.timed_out);
    }
}
