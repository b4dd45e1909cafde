//! EscalationController - answers queue-level questions on the operator's behalf.
//!
//! The manager only asks (CONFIRM_NEXT_PROCESSOR, ERROR_RETRY_OR_SKIP); the
//! decision belongs to an outer collaborator. A UI would show a dialog; this
//! controller consults an [`EscalationPolicy`] instead, which suits headless
//! hosts and tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::manager::HybridQueueManager;
use crate::domain::{
    ErrorHandlingAction, ProcessingErrorEvent, QueueInputRequest, QueueInputResponse, QueueItem,
    QueueRequestId, Remediation,
};
use crate::ports::QueueProcessor;

/// Decides what to do about a queue-level request.
pub trait EscalationPolicy: Send + 'static {
    fn on_error(
        &mut self,
        item_id: &str,
        kind: ProcessingErrorEvent,
        message: &str,
    ) -> ErrorHandlingAction;

    /// Answer to CONFIRM_NEXT_PROCESSOR; `true` proceeds.
    fn on_confirm(&mut self, _item_id: &str) -> bool {
        true
    }

    /// The item left the queue for good (done, failed, canceled or removed).
    fn on_item_resolved(&mut self, _item_id: &str) {}
}

/// Always the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy(pub ErrorHandlingAction);

impl EscalationPolicy for FixedPolicy {
    fn on_error(&mut self, _: &str, _: ProcessingErrorEvent, _: &str) -> ErrorHandlingAction {
        self.0
    }
}

/// Retry in place up to `immediate` times, then at the tail up to `later`
/// times, then abort the item. Kinds whose remediation needs a different
/// instrument or human support are aborted right away.
#[derive(Debug, Clone)]
pub struct RetryLimitPolicy {
    immediate: u32,
    later: u32,
    attempts: HashMap<String, (u32, u32)>,
}

impl RetryLimitPolicy {
    pub fn new(immediate: u32, later: u32) -> Self {
        Self {
            immediate,
            later,
            attempts: HashMap::new(),
        }
    }

    /// Items with retry counters.
    pub fn tracked(&self) -> usize {
        self.attempts.len()
    }
}

impl Default for RetryLimitPolicy {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl EscalationPolicy for RetryLimitPolicy {
    fn on_error(
        &mut self,
        item_id: &str,
        kind: ProcessingErrorEvent,
        _message: &str,
    ) -> ErrorHandlingAction {
        if matches!(
            kind.remediation(),
            Remediation::UseAnotherCard | Remediation::ContactSupport
        ) {
            self.attempts.remove(item_id);
            return ErrorHandlingAction::AbortCurrent;
        }

        let (now, later) = self.attempts.entry(item_id.to_string()).or_default();
        if *now < self.immediate {
            *now += 1;
            ErrorHandlingAction::RetryImmediately
        } else if *later < self.later {
            *later += 1;
            ErrorHandlingAction::RetryLater
        } else {
            self.attempts.remove(item_id);
            ErrorHandlingAction::AbortCurrent
        }
    }

    fn on_item_resolved(&mut self, item_id: &str) {
        self.attempts.remove(item_id);
    }
}

/// Background task that watches a manager's queue inputs and answers them.
pub struct EscalationController {
    task: JoinHandle<()>,
}

impl EscalationController {
    pub fn spawn<T, P, E>(manager: Arc<HybridQueueManager<T, P>>, mut policy: E) -> Self
    where
        T: QueueItem,
        P: QueueProcessor<T>,
        E: EscalationPolicy,
    {
        let task = tokio::spawn(async move {
            let mut requests = manager.queue_inputs();
            let mut queue = manager.queue_state();
            let mut queued = queued_ids(&queue.borrow_and_update());
            let mut answered: Option<QueueRequestId> = None;

            loop {
                let current = requests.borrow_and_update().clone();
                if let Some(request) = current
                    && answered != Some(request.id())
                {
                    answered = Some(request.id());
                    let response = decide(&mut policy, &request);
                    debug!(request_id = %request.id(), "answering queue input");
                    if let Err(e) = manager.provide_queue_input(response).await {
                        warn!(request_id = %request.id(), error = %e, "queue input answer rejected");
                    }
                }

                tokio::select! {
                    changed = requests.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    changed = queue.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let now = queued_ids(&queue.borrow_and_update());
                        for gone in queued.difference(&now) {
                            policy.on_item_resolved(gone);
                        }
                        queued = now;
                    }
                }
            }
            info!("escalation controller stopped");
        });
        Self { task }
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

fn decide<E: EscalationPolicy>(policy: &mut E, request: &QueueInputRequest) -> QueueInputResponse {
    match request {
        QueueInputRequest::ConfirmNextProcessor {
            id,
            current_item_id,
            ..
        } => {
            if policy.on_confirm(current_item_id) {
                QueueInputResponse::proceed(*id)
            } else {
                QueueInputResponse::skip(*id)
            }
        }
        QueueInputRequest::ErrorRetryOrSkip {
            id,
            item_id,
            error,
            message,
            ..
        } => {
            let action = policy.on_error(item_id, *error, message);
            info!(item_id = %item_id, kind = %error, ?action, "escalation decided");
            QueueInputResponse::action(*id, action)
        }
    }
}

/// Retried items stay queued, so an id missing from the queue is resolved.
fn queued_ids<T: QueueItem>(items: &[T]) -> HashSet<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}
