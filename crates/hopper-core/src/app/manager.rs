//! HybridQueueManager - the public handle of one queue.
//!
//! The handle only sends commands; the state lives in the worker loop task
//! spawned by [`HybridQueueManager::new`]. Observers read the watch/broadcast
//! channels the loop publishes to.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::config::ManagerConfig;
use super::status::QueueStatus;
use super::worker_loop::{Command, Publishers, WorkerLoop};
use crate::domain::{
    InputRequest, InputResponse, PersistenceStrategy, ProcessingState, QueueInputRequest,
    QueueInputResponse, QueueItem,
};
use crate::error::HopperError;
use crate::ports::{QueueProcessor, QueueStorage};

pub struct HybridQueueManager<T: QueueItem, P: QueueProcessor<T>> {
    commands: mpsc::Sender<Command<T>>,
    processor: Arc<P>,
    strategy: PersistenceStrategy,
    queue_state: watch::Receiver<Vec<T>>,
    processing_state: watch::Receiver<Option<ProcessingState<T>>>,
    queue_inputs: watch::Receiver<Option<QueueInputRequest>>,
    transitions: broadcast::Sender<ProcessingState<T>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl<T: QueueItem, P: QueueProcessor<T>> HybridQueueManager<T, P> {
    /// Validate `config` and spawn the worker loop. Must be called inside a
    /// tokio runtime.
    pub fn new(
        storage: Arc<dyn QueueStorage<T>>,
        processor: Arc<P>,
        config: ManagerConfig,
    ) -> Result<Self, HopperError> {
        config.validate()?;

        let (commands, commands_rx) = mpsc::channel(config.command_buffer);
        let (queue_state_tx, queue_state) = watch::channel(Vec::new());
        let (processing_state_tx, processing_state) = watch::channel(None);
        let (queue_inputs_tx, queue_inputs) = watch::channel(None);
        let (transitions, _) = broadcast::channel(config.transition_buffer);

        let publishers = Publishers {
            queue_state: queue_state_tx,
            processing_state: processing_state_tx,
            transitions: transitions.clone(),
            queue_inputs: queue_inputs_tx,
        };

        let strategy = config.persistence_strategy;
        info!(strategy = ?strategy, start_mode = ?config.start_mode, escalation = ?config.escalation, "starting queue manager");

        let worker = WorkerLoop::new(
            config,
            Arc::clone(&processor),
            storage,
            commands_rx,
            commands.downgrade(),
            publishers,
        );
        let join = tokio::spawn(worker.run());

        Ok(Self {
            commands,
            processor,
            strategy,
            queue_state,
            processing_state,
            queue_inputs,
            transitions,
            worker: Mutex::new(Some(join)),
            closed: AtomicBool::new(false),
        })
    }

    pub fn persistence_strategy(&self) -> PersistenceStrategy {
        self.strategy
    }

    /// Add an item. Returns once the loop has accepted the command; storage
    /// writes (IMMEDIATE) happen in the background.
    pub async fn enqueue(&self, item: T) -> Result<(), HopperError> {
        debug!(item_id = item.id(), "enqueue");
        self.send(Command::Enqueue(item)).await
    }

    /// Remove by id. An item in the middle of `process()` is not interrupted;
    /// its eventual result is dropped.
    pub async fn remove(&self, item: &T) -> Result<(), HopperError> {
        self.send(Command::Remove(item.id().to_string())).await
    }

    /// Stop the loop, empty memory and delete PENDING/PROCESSING rows.
    /// Waits for the storage cleanup.
    pub async fn remove_all(&self) -> Result<(), HopperError> {
        self.round_trip(Command::RemoveAll).await?
    }

    /// ON_BACKGROUND: write every pending item and wait. No-op otherwise.
    pub async fn persist_pending_items(&self) -> Result<(), HopperError> {
        self.round_trip(Command::PersistPending).await?
    }

    /// Write every in-memory item regardless of strategy and wait.
    pub async fn force_persist(&self) -> Result<(), HopperError> {
        self.round_trip(Command::ForcePersist).await?
    }

    /// Delete COMPLETED rows from storage in the background.
    pub async fn clear_completed(&self) -> Result<(), HopperError> {
        self.send(Command::ClearCompleted).await
    }

    /// Wait until every storage write queued so far has been applied.
    pub async fn flush_storage(&self) -> Result<(), HopperError> {
        self.round_trip(Command::FlushStorage).await?
    }

    /// Start processing items that are queued but idle (e.g. restored ones).
    pub async fn start_processing(&self) -> Result<(), HopperError> {
        self.send(Command::StartProcessing).await
    }

    /// Swap the head item for a modified copy with the same id.
    /// Returns `false` when the head has a different id (or the queue is empty).
    pub async fn replace_current_item(&self, item: T) -> Result<bool, HopperError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::ReplaceCurrent(item, reply)).await?;
        Ok(rx.await?)
    }

    /// Answer the outstanding queue-level request.
    pub async fn provide_queue_input(&self, response: QueueInputResponse) -> Result<(), HopperError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::QueueInput(response, reply)).await?;
        rx.await?
    }

    /// Forward an answer to the processor's own input request.
    pub async fn provide_input(&self, response: InputResponse) {
        self.processor.provide_input(response).await;
    }

    pub async fn status(&self) -> Result<QueueStatus, HopperError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Status(reply)).await?;
        Ok(rx.await?)
    }

    pub fn processor(&self) -> &Arc<P> {
        &self.processor
    }

    pub fn processor_events(&self) -> broadcast::Receiver<P::Event> {
        self.processor.events()
    }

    pub fn input_requests(&self) -> broadcast::Receiver<InputRequest> {
        self.processor.input_requests()
    }

    /// Current queue contents, in processing order.
    pub fn queue_state(&self) -> watch::Receiver<Vec<T>> {
        self.queue_state.clone()
    }

    /// Latest state only; intermediate states may be skipped by slow readers.
    pub fn processing_state(&self) -> watch::Receiver<Option<ProcessingState<T>>> {
        self.processing_state.clone()
    }

    /// Every published state, in order.
    pub fn subscribe_transitions(&self) -> broadcast::Receiver<ProcessingState<T>> {
        self.transitions.subscribe()
    }

    /// The queue-level question waiting for an answer, if any. A new
    /// subscriber sees the outstanding one immediately.
    pub fn queue_inputs(&self) -> watch::Receiver<Option<QueueInputRequest>> {
        self.queue_inputs.clone()
    }

    pub fn current_item(&self) -> Option<T> {
        self.queue_state.borrow().first().cloned()
    }

    pub fn len(&self) -> usize {
        self.queue_state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue_state.borrow().is_empty()
    }

    /// Stop accepting commands, let the in-flight item resolve, drain the
    /// storage writer and wait for the loop to exit. Idempotent.
    ///
    /// Every command issued once shutdown has started fails with
    /// [`HopperError::ManagerClosed`], including the fire-and-forget ones
    /// (`enqueue`, `remove`, `clear_completed`, `start_processing`). A command
    /// racing with this call from another task may still be accepted and then
    /// dropped by the loop; it is logged.
    pub async fn shutdown(&self) -> Result<(), HopperError> {
        self.closed.store(true, Ordering::Release);
        // a closed channel means the loop is already gone
        let _ = self.commands.send(Command::Shutdown).await;
        let join = self.worker.lock().await.take();
        if let Some(join) = join {
            join.await
                .map_err(|e| HopperError::Other(format!("worker loop failed: {e}")))?;
        }
        Ok(())
    }

    async fn send(&self, command: Command<T>) -> Result<(), HopperError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(HopperError::ManagerClosed);
        }
        self.commands.send(command).await?;
        Ok(())
    }

    async fn round_trip<R>(
        &self,
        command: impl FnOnce(oneshot::Sender<R>) -> Command<T>,
    ) -> Result<R, HopperError> {
        let (reply, rx) = oneshot::channel();
        self.send(command(reply)).await?;
        Ok(rx.await?)
    }
}
