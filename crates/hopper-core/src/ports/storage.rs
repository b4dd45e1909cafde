//! QueueStorage port: durability for queued items.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{QueueItem, QueueItemStatus};
use crate::error::HopperError;

/// Durable store for queue items.
///
/// # Contract
/// - Rows are keyed by `QueueItem::id`.
/// - Every call is awaited from the manager's persistence writer task, never
///   from the processing loop, so a slow backend cannot stall processing.
/// - No ordering guarantee is required beyond "eventually visible to a
///   subsequent read".
#[async_trait]
pub trait QueueStorage<T: QueueItem>: Send + Sync + 'static {
    async fn insert(&self, item: T) -> Result<(), HopperError>;

    /// Highest-priority PENDING row (oldest among ties), if any.
    async fn get_next_pending(&self) -> Result<Option<T>, HopperError>;

    /// Store `item` with `status`. Missing rows are left alone.
    async fn update_status(&self, item: T, status: QueueItemStatus) -> Result<(), HopperError>;

    async fn remove(&self, item: T) -> Result<(), HopperError>;

    async fn get_all_by_status(&self, status: QueueItemStatus) -> Result<Vec<T>, HopperError>;

    /// Live view of every row with `status`; the current value is available
    /// immediately and each change replaces it.
    fn observe_by_status(&self, status: QueueItemStatus) -> watch::Receiver<Vec<T>>;
}
