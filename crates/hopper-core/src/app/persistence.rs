//! Persistence writer - the only task that talks to `QueueStorage` on behalf
//! of the manager.
//!
//! Writes are applied strictly in submission order, so an insert can never land
//! after the status update that follows it. Detached writes log their failures;
//! awaited writes hand the result back through a oneshot.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::{QueueItem, QueueItemStatus};
use crate::error::HopperError;
use crate::ports::QueueStorage;

pub(crate) type WriteAck = oneshot::Sender<Result<(), HopperError>>;

#[derive(Debug)]
pub(crate) enum WriteOp<T> {
    Insert(T),
    InsertAll(Vec<T>),
    UpdateStatus(T, QueueItemStatus),
    Remove(T),
    /// Remove every row currently in one of these statuses.
    RemoveByStatus(Vec<QueueItemStatus>),
    /// Completes once everything submitted before it has been applied.
    Flush,
}

impl<T> WriteOp<T> {
    fn name(&self) -> &'static str {
        match self {
            WriteOp::Insert(_) => "insert",
            WriteOp::InsertAll(_) => "insert_all",
            WriteOp::UpdateStatus(..) => "update_status",
            WriteOp::Remove(_) => "remove",
            WriteOp::RemoveByStatus(_) => "remove_by_status",
            WriteOp::Flush => "flush",
        }
    }
}

struct WriteRequest<T> {
    op: WriteOp<T>,
    ack: Option<WriteAck>,
}

/// Submission side of the writer. Dropping every handle stops the writer
/// once the backlog is applied.
pub(crate) struct PersistenceWriter<T> {
    tx: mpsc::UnboundedSender<WriteRequest<T>>,
}

impl<T: QueueItem> PersistenceWriter<T> {
    pub(crate) fn spawn(storage: Arc<dyn QueueStorage<T>>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let join = tokio::spawn(run_writer(storage, rx));
        (Self { tx }, join)
    }

    /// Fire-and-forget.
    pub(crate) fn detached(&self, op: WriteOp<T>) {
        if self.tx.send(WriteRequest { op, ack: None }).is_err() {
            warn!("persistence writer is gone; dropping write");
        }
    }

    /// Submit `op`; `ack` receives its result once applied.
    pub(crate) fn acked(&self, op: WriteOp<T>, ack: WriteAck) {
        if let Err(mpsc::error::SendError(request)) = self.tx.send(WriteRequest { op, ack: Some(ack) })
            && let Some(ack) = request.ack
        {
            let _ = ack.send(Err(HopperError::ManagerClosed));
        }
    }

    pub(crate) async fn submit(&self, op: WriteOp<T>) -> Result<(), HopperError> {
        let (ack, done) = oneshot::channel();
        self.acked(op, ack);
        done.await?
    }
}

async fn run_writer<T: QueueItem>(
    storage: Arc<dyn QueueStorage<T>>,
    mut rx: mpsc::UnboundedReceiver<WriteRequest<T>>,
) {
    while let Some(WriteRequest { op, ack }) = rx.recv().await {
        let name = op.name();
        let result = apply(storage.as_ref(), op).await;
        match ack {
            Some(ack) => {
                let _ = ack.send(result);
            }
            None => {
                if let Err(e) = result {
                    warn!(op = name, error = %e, "background storage write failed");
                }
            }
        }
    }
    debug!("persistence writer stopped");
}

/// Bulk operations keep going after a failed row and report the first error.
async fn apply<T: QueueItem>(
    storage: &dyn QueueStorage<T>,
    op: WriteOp<T>,
) -> Result<(), HopperError> {
    match op {
        WriteOp::Insert(item) => storage.insert(item).await,
        WriteOp::InsertAll(items) => {
            let mut first_error = None;
            for item in items {
                if let Err(e) = storage.insert(item).await {
                    first_error.get_or_insert(e);
                }
            }
            first_error.map_or(Ok(()), Err)
        }
        WriteOp::UpdateStatus(item, status) => storage.update_status(item, status).await,
        WriteOp::Remove(item) => storage.remove(item).await,
        WriteOp::RemoveByStatus(statuses) => {
            let mut first_error = None;
            for status in statuses {
                let rows = match storage.get_all_by_status(status).await {
                    Ok(rows) => rows,
                    Err(e) => {
                        first_error.get_or_insert(e);
                        continue;
                    }
                };
                for row in rows {
                    if let Err(e) = storage.remove(row).await {
                        first_error.get_or_insert(e);
                    }
                }
            }
            first_error.map_or(Ok(()), Err)
        }
        WriteOp::Flush => Ok(()),
    }
}
