//! A fake card terminal: the payment item and a processor that approves or
//! declines at random.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

use hopper_core::HopperError;
use hopper_core::domain::{
    ErrorCodeTable, InputRequest, InputResponse, ProcessingErrorEvent, ProcessingEvent,
    ProcessingResult, QueueItem, QueueItemStatus,
};
use hopper_core::impls::InputBroker;
use hopper_core::ports::QueueProcessor;

/// Amounts at or above this need a signature.
const SIGNATURE_THRESHOLD_CENTS: i64 = 50_00;

/// Acquirer response codes the fake terminal can produce.
const ACQUIRER_CODES: &[(&str, ProcessingErrorEvent)] = &[
    ("05", ProcessingErrorEvent::Generic),
    ("51", ProcessingErrorEvent::CommunicationError),
    ("54", ProcessingErrorEvent::CardNotIdentified),
    ("75", ProcessingErrorEvent::AttemptsExceeded),
    ("91", ProcessingErrorEvent::OperationTimeout),
    ("96", ProcessingErrorEvent::UnexpectedError),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Payment {
    pub id: String,
    pub priority: i32,
    pub status: QueueItemStatus,
    pub amount_cents: i64,
    pub method: String,
}

impl Payment {
    pub(crate) fn new(seq: usize, amount_cents: i64, priority: i32) -> Self {
        Self {
            id: format!("pay-{seq:03}"),
            priority,
            status: QueueItemStatus::Pending,
            amount_cents,
            method: "CREDIT".to_string(),
        }
    }
}

impl QueueItem for Payment {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn status(&self) -> QueueItemStatus {
        self.status
    }

    fn set_status(&mut self, status: QueueItemStatus) {
        self.status = status;
    }

    fn apply_overrides(&mut self, overrides: &serde_json::Value) {
        if let Some(amount) = overrides.get("amount_cents").and_then(|v| v.as_i64()) {
            self.amount_cents = amount;
        }
        if let Some(method) = overrides.get("method").and_then(|v| v.as_str()) {
            self.method = method.to_string();
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum TerminalEvent {
    CardRead { payment_id: String },
    Approved { payment_id: String },
    Declined { payment_id: String, code: String, kind: ProcessingErrorEvent },
}

impl TerminalEvent {
    /// One line for the console.
    pub(crate) fn describe(&self) -> String {
        match self {
            TerminalEvent::CardRead { payment_id } => format!("{payment_id}: card read"),
            TerminalEvent::Approved { payment_id } => format!("{payment_id}: approved"),
            TerminalEvent::Declined {
                payment_id,
                code,
                kind,
            } => format!("{payment_id}: declined, acquirer code {code} ({kind})"),
        }
    }
}

impl ProcessingEvent for TerminalEvent {
    fn error_kind(&self) -> Option<ProcessingErrorEvent> {
        match self {
            TerminalEvent::Declined { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub(crate) struct SimulatedTerminal {
    rng: Mutex<StdRng>,
    failure_rate: f64,
    work: Duration,
    codes: ErrorCodeTable,
    events: broadcast::Sender<TerminalEvent>,
    broker: InputBroker,
}

impl SimulatedTerminal {
    pub(crate) fn new(seed: u64, failure_rate: f64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            failure_rate: failure_rate.clamp(0.0, 1.0),
            work: Duration::from_millis(150),
            codes: ErrorCodeTable::new("acquirer", ACQUIRER_CODES),
            events: broadcast::channel(64).0,
            broker: InputBroker::default(),
        }
    }

    /// `Some(code)` when this attempt is declined.
    fn roll(&self) -> Option<String> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !rng.gen_bool(self.failure_rate) {
            return None;
        }
        ACQUIRER_CODES
            .choose(&mut *rng)
            .map(|(code, _)| (*code).to_string())
    }

    fn emit(&self, event: TerminalEvent) {
        // nobody listening is fine
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl QueueProcessor<Payment> for SimulatedTerminal {
    type Event = TerminalEvent;

    fn events(&self) -> broadcast::Receiver<TerminalEvent> {
        self.events.subscribe()
    }

    fn input_requests(&self) -> broadcast::Receiver<InputRequest> {
        self.broker.subscribe()
    }

    async fn process(&self, item: &Payment) -> Result<ProcessingResult, HopperError> {
        tokio::time::sleep(self.work).await;
        self.emit(TerminalEvent::CardRead {
            payment_id: item.id.clone(),
        });

        if item.amount_cents >= SIGNATURE_THRESHOLD_CENTS {
            let response = self.broker.request(InputRequest::signature(&item.id)).await;
            if !response.is_answered() {
                info!(payment_id = %item.id, "no signature; declining");
                return Ok(ProcessingResult::failed_with(ProcessingErrorEvent::OperationTimeout));
            }
        }

        match self.roll() {
            None => {
                debug!(payment_id = %item.id, amount = item.amount_cents, "approved");
                self.emit(TerminalEvent::Approved {
                    payment_id: item.id.clone(),
                });
                Ok(ProcessingResult::Success)
            }
            Some(code) => {
                let kind = self.codes.kind_for(&code);
                debug!(payment_id = %item.id, code = %code, %kind, "declined");
                self.emit(TerminalEvent::Declined {
                    payment_id: item.id.clone(),
                    code,
                    kind,
                });
                Ok(ProcessingResult::failed_with(kind))
            }
        }
    }

    async fn provide_input(&self, response: InputResponse) {
        if !self.broker.provide(response).await {
            debug!("late or unknown input response dropped");
        }
    }

    async fn abort(&self, item: Option<&Payment>) -> bool {
        let canceled = self.broker.cancel_all().await;
        info!(payment_id = ?item.map(|p| p.id.as_str()), canceled, "terminal aborted");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopper_core::domain::InputValue;
    use std::sync::Arc;

    #[tokio::test]
    async fn never_declines_with_zero_failure_rate() {
        let terminal = SimulatedTerminal::new(1, 0.0);
        let result = terminal.process(&Payment::new(1, 10_00, 0)).await.unwrap();
        assert_eq!(result, ProcessingResult::Success);
    }

    #[tokio::test]
    async fn declines_map_through_the_code_table() {
        let terminal = SimulatedTerminal::new(1, 1.0);
        let mut events = terminal.events();
        let result = terminal.process(&Payment::new(1, 10_00, 0)).await.unwrap();

        let kind = result.error_kind().unwrap();
        assert!(ACQUIRER_CODES.iter().any(|(_, k)| *k == kind));
        assert!(matches!(events.recv().await.unwrap(), TerminalEvent::CardRead { .. }));
        assert_eq!(events.recv().await.unwrap().error_kind(), Some(kind));
    }

    #[tokio::test]
    async fn large_amounts_wait_for_a_signature() {
        let terminal = Arc::new(SimulatedTerminal::new(1, 0.0));
        let mut requests = terminal.input_requests();
        let task = tokio::spawn({
            let terminal = terminal.clone();
            async move { terminal.process(&Payment::new(1, 80_00, 0)).await }
        });

        let request = requests.recv().await.unwrap();
        assert_eq!(request.kind(), "signature_input");
        terminal
            .provide_input(InputResponse::answered(
                request.id(),
                InputValue::Signature(vec![1, 2, 3]),
            ))
            .await;
        assert_eq!(task.await.unwrap().unwrap(), ProcessingResult::Success);
    }

    #[tokio::test]
    async fn events_name_the_payment_and_acquirer_code() {
        let terminal = SimulatedTerminal::new(3, 1.0);
        let mut events = terminal.events();
        terminal.process(&Payment::new(7, 10_00, 0)).await.unwrap();

        assert_eq!(events.recv().await.unwrap().describe(), "pay-007: card read");
        let declined = events.recv().await.unwrap();
        let TerminalEvent::Declined { code, kind, .. } = &declined else {
            panic!("expected a decline, got {declined:?}");
        };
        assert_eq!(
            declined.describe(),
            format!("pay-007: declined, acquirer code {code} ({kind})")
        );
        assert!(ACQUIRER_CODES.iter().any(|(c, k)| *c == code.as_str() && k == kind));
    }

    #[test]
    fn approvals_read_as_such() {
        let event = TerminalEvent::Approved {
            payment_id: "pay-001".to_string(),
        };
        assert_eq!(event.describe(), "pay-001: approved");
    }

    #[test]
    fn overrides_change_amount_and_method() {
        let mut payment = Payment::new(1, 10_00, 0);
        payment.apply_overrides(&serde_json::json!({"amount_cents": 12_34, "method": "DEBIT"}));
        assert_eq!(payment.amount_cents, 12_34);
        assert_eq!(payment.method, "DEBIT");
    }
}
