//! Test doubles shared by the app-layer tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, broadcast, watch};

use super::config::ManagerConfig;
use crate::domain::item::testing::TestItem;
use crate::domain::{
    InputRequest, InputResponse, PersistenceStrategy, ProcessingErrorEvent, ProcessingResult,
    ProcessingState, QueueInputRequest, QueueItemStatus,
};
use crate::error::HopperError;
use crate::impls::{InMemoryQueueStorage, InputBroker};
use crate::ports::{QueueProcessor, QueueStorage};

/// What one `process()` call does.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Return(ProcessingResult),
    Fault(&'static str),
    Panic(&'static str),
    /// Wait for the gate, then return.
    Gated(Arc<Notify>, ProcessingResult),
    /// Ask for a confirmation with this timeout; confirmed means Success.
    Confirm(Duration),
}

/// Processor driven by per-item scripts. Unscripted calls succeed.
pub(crate) struct ScriptedProcessor {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<TestItem>>,
    aborts: Mutex<Vec<Option<String>>>,
    events: broadcast::Sender<ProcessingErrorEvent>,
    broker: InputBroker,
}

impl Default for ScriptedProcessor {
    fn default() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            aborts: Mutex::new(Vec::new()),
            events: broadcast::channel(64).0,
            broker: InputBroker::default(),
        }
    }
}

impl ScriptedProcessor {
    pub(crate) fn script(&self, item_id: &str, steps: impl IntoIterator<Item = Step>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(item_id.to_string())
            .or_default()
            .extend(steps);
    }

    /// Ids in call order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|i| i.id.clone()).collect()
    }

    pub(crate) fn calls_with_items(&self) -> Vec<TestItem> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn aborts(&self) -> Vec<Option<String>> {
        self.aborts.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueProcessor<TestItem> for ScriptedProcessor {
    type Event = ProcessingErrorEvent;

    fn events(&self) -> broadcast::Receiver<ProcessingErrorEvent> {
        self.events.subscribe()
    }

    fn input_requests(&self) -> broadcast::Receiver<InputRequest> {
        self.broker.subscribe()
    }

    async fn process(&self, item: &TestItem) -> Result<ProcessingResult, HopperError> {
        self.calls.lock().unwrap().push(item.clone());
        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&item.id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Step::Return(ProcessingResult::Success));

        match step {
            Step::Return(result) => Ok(self.report(result)),
            Step::Gated(gate, result) => {
                gate.notified().await;
                Ok(self.report(result))
            }
            Step::Fault(message) => Err(HopperError::fault(message)),
            Step::Panic(message) => panic!("{message}"),
            Step::Confirm(timeout) => {
                let request =
                    InputRequest::confirmation(&item.id, "continue?").with_timeout(Some(timeout));
                let response = self.broker.request(request).await;
                if response.is_confirmed() {
                    Ok(ProcessingResult::Success)
                } else {
                    Ok(self.report(ProcessingResult::failed_with(
                        ProcessingErrorEvent::OperationTimeout,
                    )))
                }
            }
        }
    }

    async fn provide_input(&self, response: InputResponse) {
        self.broker.provide(response).await;
    }

    async fn abort(&self, item: Option<&TestItem>) -> bool {
        self.aborts
            .lock()
            .unwrap()
            .push(item.map(|i| i.id.clone()));
        self.broker.cancel_all().await;
        true
    }
}

impl ScriptedProcessor {
    fn report(&self, result: ProcessingResult) -> ProcessingResult {
        if let Some(kind) = result.error_kind() {
            let _ = self.events.send(kind);
        }
        result
    }
}

/// Storage decorator that counts calls per operation.
#[derive(Default)]
pub(crate) struct RecordingStorage {
    pub inner: InMemoryQueueStorage<TestItem>,
    inserts: AtomicUsize,
    removes: AtomicUsize,
    reads: AtomicUsize,
    updates: Mutex<Vec<(String, QueueItemStatus)>>,
}

impl RecordingStorage {
    pub(crate) fn with_rows(rows: Vec<TestItem>) -> Self {
        Self {
            inner: InMemoryQueueStorage::with_rows(rows),
            ..Self::default()
        }
    }

    pub(crate) fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub(crate) fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    pub(crate) fn updates(&self) -> Vec<(String, QueueItemStatus)> {
        self.updates.lock().unwrap().clone()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.inserts() + self.removes() + self.reads.load(Ordering::SeqCst) + self.updates().len()
    }

    pub(crate) async fn rows_with(&self, status: QueueItemStatus) -> Vec<String> {
        self.inner
            .get_all_by_status(status)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect()
    }
}

#[async_trait]
impl QueueStorage<TestItem> for RecordingStorage {
    async fn insert(&self, item: TestItem) -> Result<(), HopperError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(item).await
    }

    async fn get_next_pending(&self) -> Result<Option<TestItem>, HopperError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_next_pending().await
    }

    async fn update_status(&self, item: TestItem, status: QueueItemStatus) -> Result<(), HopperError> {
        self.updates.lock().unwrap().push((item.id.clone(), status));
        self.inner.update_status(item, status).await
    }

    async fn remove(&self, item: TestItem) -> Result<(), HopperError> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(item).await
    }

    async fn get_all_by_status(&self, status: QueueItemStatus) -> Result<Vec<TestItem>, HopperError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_all_by_status(status).await
    }

    fn observe_by_status(&self, status: QueueItemStatus) -> watch::Receiver<Vec<TestItem>> {
        self.inner.observe_by_status(status)
    }
}

/// No pause between items.
pub(crate) fn quick_config(strategy: PersistenceStrategy) -> ManagerConfig {
    ManagerConfig {
        persistence_strategy: strategy,
        item_delay_ms: 0,
        ..ManagerConfig::default()
    }
}

pub(crate) fn label(state: &ProcessingState<TestItem>) -> String {
    let id = state.item().map_or("-", |item| item.id.as_str());
    format!("{}:{}", state.name(), id)
}

pub(crate) async fn next_state(
    rx: &mut broadcast::Receiver<ProcessingState<TestItem>>,
) -> ProcessingState<TestItem> {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a state")
        .expect("transition channel closed")
}

/// Labels of every state up to and including the first `QueueDone`.
pub(crate) async fn until_done(rx: &mut broadcast::Receiver<ProcessingState<TestItem>>) -> Vec<String> {
    let mut labels = Vec::new();
    loop {
        let state = next_state(rx).await;
        labels.push(label(&state));
        if matches!(state, ProcessingState::QueueDone(_)) {
            return labels;
        }
    }
}

pub(crate) async fn wait_for(
    rx: &mut broadcast::Receiver<ProcessingState<TestItem>>,
    wanted: &str,
) -> ProcessingState<TestItem> {
    loop {
        let state = next_state(rx).await;
        if label(&state) == wanted {
            return state;
        }
    }
}

pub(crate) async fn next_request(
    rx: &mut watch::Receiver<Option<QueueInputRequest>>,
) -> QueueInputRequest {
    loop {
        let current = rx.borrow_and_update().clone();
        if let Some(request) = current {
            return request;
        }
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("timed out waiting for a queue input request")
            .expect("queue input channel closed");
    }
}
