//! WorkerLoop - the single task that owns the queue.
//!
//! Every mutation of the in-memory list and the pending-persistence set goes
//! through this loop, either as a [`Command`] from the manager handle or as a
//! [`PhaseEvent`] from its own work (a finished `process()` call, an elapsed
//! delay, an unanswered operator question).
//!
//! # Flow per item
//! 1. (Confirmation mode) ask CONFIRM_NEXT_PROCESSOR and wait
//! 2. mark PROCESSING, publish `ItemProcessing`, spawn `process()`
//! 3. Success -> COMPLETED, Error -> FAILED (or operator escalation),
//!    Retry -> back to the tail
//! 4. optional pause, then the next head
//!
//! The head item stays at index 0 while the loop is engaged with it; nothing is
//! ever inserted ahead of it. Removing the engaged item detaches it: a late
//! result is logged and dropped.

use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Sleep, sleep};
use tracing::{debug, error, info, warn};

use super::config::{EscalationMode, ManagerConfig, ProcessorStartMode};
use super::persistence::{PersistenceWriter, WriteAck, WriteOp};
use super::status::QueueStatus;
use crate::domain::{
    ErrorHandlingAction, PersistenceStrategy, ProcessingResult, ProcessingState,
    QueueInputRequest, QueueInputResponse, QueueItem, QueueItemStatus, QueueRequestId,
};
use crate::error::HopperError;
use crate::ports::{QueueProcessor, QueueStorage};

pub(crate) enum Command<T> {
    Enqueue(T),
    Remove(String),
    RemoveAll(WriteAck),
    PersistPending(WriteAck),
    /// A failed `PersistPending` hands its items back.
    RestorePending(Vec<T>),
    ForcePersist(WriteAck),
    ClearCompleted,
    FlushStorage(WriteAck),
    StartProcessing,
    ReplaceCurrent(T, oneshot::Sender<bool>),
    QueueInput(QueueInputResponse, oneshot::Sender<Result<(), HopperError>>),
    Status(oneshot::Sender<QueueStatus>),
    Shutdown,
}

/// Sending halves of everything observers can watch.
pub(crate) struct Publishers<T> {
    pub queue_state: watch::Sender<Vec<T>>,
    pub processing_state: watch::Sender<Option<ProcessingState<T>>>,
    pub transitions: broadcast::Sender<ProcessingState<T>>,
    pub queue_inputs: watch::Sender<Option<QueueInputRequest>>,
}

type ProcessHandle = JoinHandle<Result<ProcessingResult, HopperError>>;

enum Phase {
    Idle,
    Cooldown(Pin<Box<Sleep>>),
    Processing {
        item_id: String,
        handle: ProcessHandle,
        detached: bool,
    },
    AwaitingConfirmation {
        item_id: String,
        request_id: QueueRequestId,
        deadline: Pin<Box<Sleep>>,
    },
    AwaitingEscalation {
        item_id: String,
        message: String,
        request_id: QueueRequestId,
        deadline: Pin<Box<Sleep>>,
    },
}

enum PhaseEvent {
    CooldownElapsed,
    Processed(Result<Result<ProcessingResult, HopperError>, JoinError>),
    InputTimedOut,
}

impl Phase {
    /// Cancel-safe: dropping the future and calling again resumes the wait.
    async fn next_event(&mut self) -> PhaseEvent {
        match self {
            Phase::Idle => std::future::pending().await,
            Phase::Cooldown(delay) => {
                delay.as_mut().await;
                PhaseEvent::CooldownElapsed
            }
            Phase::Processing { handle, .. } => PhaseEvent::Processed(handle.await),
            Phase::AwaitingConfirmation { deadline, .. }
            | Phase::AwaitingEscalation { deadline, .. } => {
                deadline.as_mut().await;
                PhaseEvent::InputTimedOut
            }
        }
    }

    /// Id of the head item the loop is working on.
    fn engaged_item(&self) -> Option<&str> {
        match self {
            Phase::Processing {
                item_id,
                detached: false,
                ..
            }
            | Phase::AwaitingConfirmation { item_id, .. }
            | Phase::AwaitingEscalation { item_id, .. } => Some(item_id),
            _ => None,
        }
    }

    fn in_flight(&self) -> Option<&str> {
        match self {
            Phase::Processing {
                item_id,
                detached: false,
                ..
            } => Some(item_id),
            _ => None,
        }
    }

    fn awaiting_request(&self) -> Option<QueueRequestId> {
        match self {
            Phase::AwaitingConfirmation { request_id, .. }
            | Phase::AwaitingEscalation { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }

    fn is_resting(&self) -> bool {
        matches!(self, Phase::Idle | Phase::Cooldown(_))
    }
}

pub(crate) struct WorkerLoop<T: QueueItem, P: QueueProcessor<T>> {
    config: ManagerConfig,
    processor: Arc<P>,
    storage: Arc<dyn QueueStorage<T>>,
    writer: PersistenceWriter<T>,
    commands: mpsc::Receiver<Command<T>>,
    loopback: mpsc::WeakSender<Command<T>>,
    out: Publishers<T>,
    queue: Vec<T>,
    pending: Vec<T>,
    phase: Phase,
    running: bool,
    closing: bool,
}

impl<T: QueueItem, P: QueueProcessor<T>> WorkerLoop<T, P> {
    pub(crate) fn new(
        config: ManagerConfig,
        processor: Arc<P>,
        storage: Arc<dyn QueueStorage<T>>,
        commands: mpsc::Receiver<Command<T>>,
        loopback: mpsc::WeakSender<Command<T>>,
        out: Publishers<T>,
    ) -> Self {
        let (writer, _join) = PersistenceWriter::spawn(Arc::clone(&storage));
        Self {
            config,
            processor,
            storage,
            writer,
            commands,
            loopback,
            out,
            queue: Vec::new(),
            pending: Vec::new(),
            phase: Phase::Idle,
            running: false,
            closing: false,
        }
    }

    pub(crate) async fn run(mut self) {
        if self.config.restores() {
            self.restore().await;
        }

        loop {
            self.advance();
            if self.closing && self.phase.is_resting() {
                break;
            }

            tokio::select! {
                command = self.commands.recv(), if !self.closing => match command {
                    Some(command) => self.handle(command),
                    None => self.begin_shutdown(),
                },
                event = self.phase.next_event() => self.on_phase_event(event),
            }
        }

        // dropping a drained command resolves its reply to ManagerClosed
        let mut rejected = 0usize;
        while self.commands.try_recv().is_ok() {
            rejected += 1;
        }
        if rejected > 0 {
            warn!(rejected, "commands sent during shutdown were rejected");
        }

        if let Err(e) = self.writer.submit(WriteOp::Flush).await {
            warn!(error = %e, "final storage flush failed");
        }
        info!("worker loop stopped");
    }

    /// Load rows left over from a previous run. Interrupted (PROCESSING) rows
    /// go back to PENDING.
    async fn restore(&mut self) {
        let mut restored = Vec::new();
        for status in [QueueItemStatus::Processing, QueueItemStatus::Pending] {
            match self.storage.get_all_by_status(status).await {
                Ok(rows) => restored.extend(rows),
                Err(e) => warn!(%status, error = %e, "failed to restore rows"),
            }
        }
        if restored.is_empty() {
            return;
        }

        for item in &mut restored {
            if item.status() == QueueItemStatus::Processing {
                item.set_status(QueueItemStatus::Pending);
                self.writer
                    .detached(WriteOp::UpdateStatus(item.clone(), QueueItemStatus::Pending));
            }
        }
        // stable: ties keep storage order
        restored.sort_by_key(|item| std::cmp::Reverse(item.priority()));
        self.queue = restored;
        info!(count = self.queue.len(), "restored items from storage");
        self.publish_queue();

        if self.config.resume_on_start {
            self.running = true;
        } else {
            self.publish(ProcessingState::QueueIdle(self.queue.first().cloned()));
        }
    }

    fn handle(&mut self, command: Command<T>) {
        match command {
            Command::Enqueue(item) => self.enqueue(item),
            Command::Remove(item_id) => self.remove(&item_id),
            Command::RemoveAll(ack) => self.remove_all(ack),
            Command::PersistPending(reply) => self.persist_pending(reply),
            Command::RestorePending(items) => self.restore_pending(items),
            Command::ForcePersist(reply) => {
                self.pending.clear();
                self.writer
                    .acked(WriteOp::InsertAll(self.queue.clone()), reply);
            }
            Command::ClearCompleted => {
                if self.persists() {
                    self.writer
                        .detached(WriteOp::RemoveByStatus(vec![QueueItemStatus::Completed]));
                }
            }
            Command::FlushStorage(reply) => self.writer.acked(WriteOp::Flush, reply),
            Command::StartProcessing => {
                if !self.running {
                    info!(queued = self.queue.len(), "processing started");
                    self.running = true;
                }
            }
            Command::ReplaceCurrent(item, reply) => {
                let _ = reply.send(self.replace_current(item));
            }
            Command::QueueInput(response, reply) => {
                let result = if self.phase.awaiting_request() == Some(response.request_id) {
                    self.resolve_request(Some(response));
                    Ok(())
                } else {
                    warn!(request_id = %response.request_id, "no pending queue input request");
                    Err(HopperError::UnknownRequest(response.request_id.to_string()))
                };
                let _ = reply.send(result);
            }
            Command::Status(reply) => {
                let _ = reply.send(self.status());
            }
            Command::Shutdown => self.begin_shutdown(),
        }
    }

    fn on_phase_event(&mut self, event: PhaseEvent) {
        match event {
            PhaseEvent::CooldownElapsed => self.phase = Phase::Idle,
            PhaseEvent::Processed(joined) => self.on_processed(joined),
            PhaseEvent::InputTimedOut => {
                if let Some(request_id) = self.phase.awaiting_request() {
                    warn!(request_id = %request_id, "queue input request timed out");
                }
                self.resolve_request(None);
            }
        }
    }

    // ---- commands -------------------------------------------------------

    fn enqueue(&mut self, mut item: T) {
        if self.position(item.id()).is_some() {
            warn!(item_id = item.id(), "item already queued; ignoring enqueue");
            return;
        }
        item.set_status(QueueItemStatus::Pending);

        // before the first strictly lower priority, never ahead of the engaged head
        let start = usize::from(self.phase.engaged_item().is_some());
        let index = self
            .queue
            .iter()
            .skip(start)
            .position(|queued| queued.priority() < item.priority())
            .map_or(self.queue.len(), |offset| offset + start);
        self.queue.insert(index, item.clone());
        debug!(item_id = item.id(), priority = item.priority(), index, "enqueued");

        match self.config.persistence_strategy {
            PersistenceStrategy::Immediate => self.writer.detached(WriteOp::Insert(item)),
            PersistenceStrategy::OnBackground => self.mark_pending(item),
            PersistenceStrategy::Never => {}
        }
        self.publish_queue();

        if !self.running && !self.closing {
            self.running = true;
        }
    }

    fn remove(&mut self, item_id: &str) {
        let Some(index) = self.position(item_id) else {
            debug!(item_id, "remove: item not queued");
            return;
        };
        self.release(item_id);
        let item = self.queue.remove(index);
        self.pending.retain(|p| p.id() != item_id);
        if self.persists() {
            self.writer.detached(WriteOp::Remove(item));
        }
        info!(item_id, "item removed");
        self.publish_queue();
    }

    fn remove_all(&mut self, ack: WriteAck) {
        if let Some(item_id) = self.phase.engaged_item().map(str::to_string) {
            self.release(&item_id);
        }
        if matches!(self.phase, Phase::Cooldown(_)) {
            self.phase = Phase::Idle;
        }
        self.clear_everything(Some(ack));
        self.out.processing_state.send_replace(None);
        info!("queue cleared");
    }

    fn persist_pending(&mut self, reply: WriteAck) {
        if self.config.persistence_strategy != PersistenceStrategy::OnBackground
            || self.pending.is_empty()
        {
            let _ = reply.send(Ok(()));
            return;
        }

        let items = std::mem::take(&mut self.pending);
        info!(count = items.len(), "persisting pending items");
        let (ack, done) = oneshot::channel();
        self.writer.acked(WriteOp::InsertAll(items.clone()), ack);

        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            let result = done.await.unwrap_or(Err(HopperError::ManagerClosed));
            if result.is_err()
                && let Some(commands) = loopback.upgrade()
                && commands.send(Command::RestorePending(items)).await.is_err()
            {
                warn!("worker loop gone; failed items not returned to the pending set");
            }
            let _ = reply.send(result);
        });
    }

    fn restore_pending(&mut self, items: Vec<T>) {
        for item in items {
            if let Some(index) = self.position(item.id()) {
                let current = self.queue[index].clone();
                self.mark_pending(current);
            }
        }
        warn!(pending = self.pending.len(), "pending items kept after failed persist");
    }

    fn replace_current(&mut self, item: T) -> bool {
        let Some(head) = self.queue.first_mut() else {
            return false;
        };
        if head.id() != item.id() {
            warn!(item_id = item.id(), head_id = head.id(), "replacement does not match head");
            return false;
        }
        *head = item.clone();
        match self.config.persistence_strategy {
            PersistenceStrategy::Immediate => {
                let status = item.status();
                self.writer.detached(WriteOp::UpdateStatus(item, status));
            }
            PersistenceStrategy::OnBackground => self.mark_pending(item),
            PersistenceStrategy::Never => {}
        }
        self.publish_queue();
        true
    }

    fn begin_shutdown(&mut self) {
        if self.closing {
            return;
        }
        info!(queued = self.queue.len(), "worker loop shutting down");
        self.closing = true;
        self.commands.close();
        // nobody can answer any more
        if self.phase.awaiting_request().is_some() {
            self.resolve_request(None);
        }
    }

    fn status(&self) -> QueueStatus {
        QueueStatus {
            captured_at: chrono::Utc::now(),
            strategy: self.config.persistence_strategy,
            queued: self.queue.len(),
            pending_persistence: self.pending.len(),
            in_flight: self.phase.in_flight().map(str::to_string),
            running: self.running,
            awaiting_input: self.out.queue_inputs.borrow().clone(),
        }
    }

    // ---- processing -----------------------------------------------------

    /// Start on the head item if the loop is running and free.
    fn advance(&mut self) {
        if self.closing || !self.running || !matches!(self.phase, Phase::Idle) {
            return;
        }
        let Some(head) = self.queue.first() else {
            self.running = false;
            info!("queue drained");
            self.publish(ProcessingState::QueueDone(None));
            return;
        };

        match self.config.start_mode {
            ProcessorStartMode::Immediate => self.begin_processing(),
            ProcessorStartMode::Confirmation => {
                let request = QueueInputRequest::confirm_next(
                    0,
                    self.queue.len(),
                    head.id(),
                    self.queue.get(1).map(|next| next.id().to_string()),
                    self.config.confirmation_timeout(),
                );
                self.phase = Phase::AwaitingConfirmation {
                    item_id: head.id().to_string(),
                    request_id: request.id(),
                    deadline: Box::pin(sleep(request.timeout())),
                };
                self.ask(request);
            }
        }
    }

    fn begin_processing(&mut self) {
        let Some(head) = self.queue.first_mut() else {
            return;
        };
        head.set_status(QueueItemStatus::Processing);
        let item = head.clone();
        let item_id = item.id().to_string();

        if self.persists() {
            self.writer
                .detached(WriteOp::UpdateStatus(item.clone(), QueueItemStatus::Processing));
        }
        self.publish_queue();
        self.publish(ProcessingState::ItemProcessing(item.clone()));
        info!(item_id = %item_id, priority = item.priority(), "processing item");

        let processor = Arc::clone(&self.processor);
        let handle = tokio::spawn(async move { processor.process(&item).await });
        self.phase = Phase::Processing {
            item_id,
            handle,
            detached: false,
        };
    }

    fn on_processed(&mut self, joined: Result<Result<ProcessingResult, HopperError>, JoinError>) {
        let Phase::Processing {
            item_id, detached, ..
        } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return;
        };

        let outcome = match joined {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(describe_join_error(e)),
        };

        if detached {
            info!(item_id = %item_id, ?outcome, "dropping result of removed item");
            self.rest();
            return;
        }

        match outcome {
            Ok(ProcessingResult::Success) => self.complete(&item_id),
            Ok(ProcessingResult::Retry) => self.retry_later(&item_id),
            Ok(ProcessingResult::Error(message)) => self.on_failure(&item_id, message),
            Err(fault) => {
                error!(item_id = %item_id, fault = %fault, "processor fault");
                self.on_failure(&item_id, fault);
            }
        }
    }

    fn on_failure(&mut self, item_id: &str, message: String) {
        match self.config.escalation {
            EscalationMode::Disabled => self.fail(item_id, message, true),
            EscalationMode::Operator => {
                let Some(item) = self.find(item_id).cloned() else {
                    self.rest();
                    return;
                };
                self.publish(ProcessingState::ItemFailed {
                    item,
                    error: message.clone(),
                });
                let request = QueueInputRequest::error_retry_or_skip(
                    item_id,
                    message.as_str(),
                    self.config.escalation_timeout(),
                );
                self.phase = Phase::AwaitingEscalation {
                    item_id: item_id.to_string(),
                    message,
                    request_id: request.id(),
                    deadline: Box::pin(sleep(request.timeout())),
                };
                self.ask(request);
            }
        }
    }

    /// `None` means no usable answer (timeout, cancel, shutdown).
    fn resolve_request(&mut self, response: Option<QueueInputResponse>) {
        self.out.queue_inputs.send_replace(None);
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::AwaitingConfirmation { item_id, .. } => {
                let proceed = response.as_ref().is_some_and(QueueInputResponse::proceeds);
                if proceed && !self.closing {
                    let overrides = response.and_then(|r| r.overrides);
                    if let (Some(overrides), Some(head)) = (overrides, self.queue.first_mut()) {
                        head.apply_overrides(&overrides);
                        debug!(item_id = %item_id, "applied operator overrides");
                    }
                    self.begin_processing();
                } else if self.closing {
                    debug!(item_id = %item_id, "confirmation abandoned on shutdown");
                } else {
                    info!(item_id = %item_id, "operator skipped item");
                    self.requeue_tail(&item_id, ProcessingState::ItemSkipped);
                }
            }
            Phase::AwaitingEscalation {
                item_id, message, ..
            } => {
                let action = response.and_then(|r| r.error_handling_action());
                self.apply_action(&item_id, message, action);
            }
            other => self.phase = other,
        }
    }

    fn apply_action(&mut self, item_id: &str, message: String, action: Option<ErrorHandlingAction>) {
        info!(item_id, ?action, "escalation resolved");
        match action {
            Some(ErrorHandlingAction::RetryImmediately) if !self.closing => {
                if let Some(item) = self.find(item_id).cloned() {
                    self.publish(ProcessingState::ItemRetrying(item));
                }
                self.begin_processing();
            }
            Some(ErrorHandlingAction::RetryImmediately) | Some(ErrorHandlingAction::RetryLater) => {
                self.retry_later(item_id)
            }
            Some(ErrorHandlingAction::AbortCurrent) => {
                if let Some(item) = self.settle(item_id, QueueItemStatus::Cancelled) {
                    self.abort_in_processor(Some(item.clone()));
                    self.publish(ProcessingState::ItemSkipped(item));
                }
                self.rest();
            }
            Some(ErrorHandlingAction::AbortAll) => {
                let item = self
                    .find(item_id)
                    .map(|item| item.with_status(QueueItemStatus::Cancelled));
                self.abort_in_processor(None);
                self.clear_everything(None);
                warn!(item_id, "queue aborted by operator");
                self.publish(ProcessingState::QueueCanceled(item));
            }
            // ItemFailed was already published before asking
            None => self.fail(item_id, message, false),
        }
    }

    fn complete(&mut self, item_id: &str) {
        if let Some(item) = self.settle(item_id, QueueItemStatus::Completed) {
            info!(item_id, "item done");
            self.publish(ProcessingState::ItemDone(item));
        }
        self.rest();
    }

    fn fail(&mut self, item_id: &str, message: String, announce: bool) {
        if let Some(item) = self.settle(item_id, QueueItemStatus::Failed) {
            warn!(item_id, error = %message, "item failed");
            if announce {
                self.publish(ProcessingState::ItemFailed {
                    item,
                    error: message,
                });
            }
        }
        self.rest();
    }

    fn retry_later(&mut self, item_id: &str) {
        info!(item_id, "item will be retried");
        self.requeue_tail(item_id, ProcessingState::ItemRetrying);
    }

    fn requeue_tail(&mut self, item_id: &str, state: fn(T) -> ProcessingState<T>) {
        if let Some(mut item) = self.take(item_id) {
            item.set_status(QueueItemStatus::Pending);
            self.queue.push(item.clone());
            if self.persists() {
                self.writer
                    .detached(WriteOp::UpdateStatus(item.clone(), QueueItemStatus::Pending));
            }
            if self.config.persistence_strategy == PersistenceStrategy::OnBackground {
                self.mark_pending(item.clone());
            }
            self.publish_queue();
            self.publish(state(item));
        }
        self.rest();
    }

    /// Pause before the next item (or go straight to idle).
    fn rest(&mut self) {
        let delay = self.config.item_delay();
        self.phase = if delay.is_zero() {
            Phase::Idle
        } else {
            Phase::Cooldown(Box::pin(sleep(delay)))
        };
    }

    fn abort_in_processor(&self, item: Option<T>) {
        let processor = Arc::clone(&self.processor);
        tokio::spawn(async move {
            let item_id = item.as_ref().map(|i| i.id().to_string());
            if !processor.abort(item.as_ref()).await {
                warn!(item_id = ?item_id, "processor abort did not complete cleanly");
            }
        });
    }

    // ---- list bookkeeping -----------------------------------------------

    fn persists(&self) -> bool {
        self.config.persistence_strategy.persists()
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.queue.iter().position(|item| item.id() == item_id)
    }

    fn find(&self, item_id: &str) -> Option<&T> {
        self.queue.iter().find(|item| item.id() == item_id)
    }

    /// Remove from the list and the pending set.
    fn take(&mut self, item_id: &str) -> Option<T> {
        let index = self.position(item_id)?;
        self.pending.retain(|p| p.id() != item_id);
        Some(self.queue.remove(index))
    }

    /// Take the item out for good with its final status.
    fn settle(&mut self, item_id: &str, status: QueueItemStatus) -> Option<T> {
        let mut item = self.take(item_id)?;
        item.set_status(status);
        if self.persists() {
            self.writer
                .detached(WriteOp::UpdateStatus(item.clone(), status));
        }
        self.publish_queue();
        Some(item)
    }

    fn mark_pending(&mut self, item: T) {
        match self.pending.iter_mut().find(|p| p.id() == item.id()) {
            Some(existing) => *existing = item,
            None => self.pending.push(item),
        }
    }

    /// Let go of the engaged item: an in-flight call is detached, an open
    /// question is withdrawn.
    fn release(&mut self, item_id: &str) {
        if self.phase.engaged_item() != Some(item_id) {
            return;
        }
        match &mut self.phase {
            Phase::Processing { detached, .. } => *detached = true,
            _ => {
                self.out.queue_inputs.send_replace(None);
                self.phase = Phase::Idle;
            }
        }
    }

    fn clear_everything(&mut self, ack: Option<WriteAck>) {
        self.queue.clear();
        self.pending.clear();
        self.running = false;
        self.publish_queue();

        let op = WriteOp::RemoveByStatus(vec![QueueItemStatus::Pending, QueueItemStatus::Processing]);
        match (self.persists(), ack) {
            (true, Some(ack)) => self.writer.acked(op, ack),
            (true, None) => self.writer.detached(op),
            (false, Some(ack)) => {
                let _ = ack.send(Ok(()));
            }
            (false, None) => {}
        }
    }

    // ---- publishing -----------------------------------------------------

    fn publish_queue(&self) {
        self.out.queue_state.send_replace(self.queue.clone());
    }

    fn publish(&self, state: ProcessingState<T>) {
        debug!(state = state.name(), item_id = state.item().map(|i| i.id()), "state");
        // no subscribers is fine
        let _ = self.out.transitions.send(state.clone());
        self.out.processing_state.send_replace(Some(state));
    }

    fn ask(&self, request: QueueInputRequest) {
        info!(request_id = %request.id(), item_id = request.item_id(), "waiting for operator");
        self.out.queue_inputs.send_replace(Some(request));
    }
}

fn describe_join_error(e: JoinError) -> String {
    if !e.is_panic() {
        return "processing task was cancelled".to_string();
    }
    let payload = e.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("processor panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("processor panicked: {message}")
    } else {
        "processor panicked".to_string()
    }
}
