//! InMemoryQueueStorage - a `QueueStorage` kept in process memory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};

use crate::domain::{QueueItem, QueueItemStatus};
use crate::error::HopperError;
use crate::ports::QueueStorage;

const ALL_STATUSES: [QueueItemStatus; 5] = [
    QueueItemStatus::Pending,
    QueueItemStatus::Processing,
    QueueItemStatus::Completed,
    QueueItemStatus::Failed,
    QueueItemStatus::Cancelled,
];

/// Rows live in insertion order; each status has a watch channel that is
/// refreshed after every write.
pub struct InMemoryQueueStorage<T: QueueItem> {
    rows: Mutex<Vec<T>>,
    watchers: HashMap<QueueItemStatus, watch::Sender<Vec<T>>>,
    failing: AtomicBool,
}

impl<T: QueueItem> InMemoryQueueStorage<T> {
    pub fn new() -> Self {
        let watchers = ALL_STATUSES
            .iter()
            .map(|status| (*status, watch::channel(Vec::new()).0))
            .collect();
        Self {
            rows: Mutex::new(Vec::new()),
            watchers,
            failing: AtomicBool::new(false),
        }
    }

    /// Storage pre-filled with `items` (as if left over from a previous run).
    pub fn with_rows(items: Vec<T>) -> Self {
        let storage = Self::new();
        storage.publish(&items);
        Self {
            rows: Mutex::new(items),
            ..storage
        }
    }

    /// While set, every write fails with `HopperError::Storage`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }

    /// Every row, regardless of status.
    pub async fn snapshot(&self) -> Vec<T> {
        self.rows.lock().await.clone()
    }

    fn check_writable(&self) -> Result<(), HopperError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HopperError::storage("in-memory storage is set to fail"));
        }
        Ok(())
    }

    fn publish(&self, rows: &[T]) {
        for (status, sender) in &self.watchers {
            let matching = rows.iter().filter(|r| r.status() == *status).cloned().collect();
            sender.send_replace(matching);
        }
    }
}

impl<T: QueueItem> Default for InMemoryQueueStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: QueueItem> QueueStorage<T> for InMemoryQueueStorage<T> {
    /// Upsert by id.
    async fn insert(&self, item: T) -> Result<(), HopperError> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        match rows.iter_mut().find(|row| row.id() == item.id()) {
            Some(row) => *row = item,
            None => rows.push(item),
        }
        self.publish(&rows);
        Ok(())
    }

    async fn get_next_pending(&self) -> Result<Option<T>, HopperError> {
        let rows = self.rows.lock().await;
        let mut best: Option<&T> = None;
        for row in rows.iter().filter(|r| r.status() == QueueItemStatus::Pending) {
            if best.is_none_or(|b| row.priority() > b.priority()) {
                best = Some(row);
            }
        }
        Ok(best.cloned())
    }

    async fn update_status(&self, item: T, status: QueueItemStatus) -> Result<(), HopperError> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        match rows.iter_mut().find(|row| row.id() == item.id()) {
            Some(row) => {
                *row = item.with_status(status);
                self.publish(&rows);
            }
            None => tracing::debug!(item_id = item.id(), %status, "update_status on missing row"),
        }
        Ok(())
    }

    async fn remove(&self, item: T) -> Result<(), HopperError> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        rows.retain(|row| row.id() != item.id());
        self.publish(&rows);
        Ok(())
    }

    async fn get_all_by_status(&self, status: QueueItemStatus) -> Result<Vec<T>, HopperError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().filter(|r| r.status() == status).cloned().collect())
    }

    fn observe_by_status(&self, status: QueueItemStatus) -> watch::Receiver<Vec<T>> {
        match self.watchers.get(&status) {
            Some(sender) => sender.subscribe(),
            // every status is registered in new()
            None => watch::channel(Vec::new()).1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::testing::TestItem;

    #[tokio::test]
    async fn insert_is_an_upsert() {
        let storage = InMemoryQueueStorage::new();
        storage.insert(TestItem::new("a", 1)).await.unwrap();
        let mut changed = TestItem::new("a", 1);
        changed.amount = 10;
        storage.insert(changed).await.unwrap();

        let rows = storage.snapshot().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 10);
    }

    #[tokio::test]
    async fn next_pending_prefers_priority_then_age() {
        let storage = InMemoryQueueStorage::new();
        storage.insert(TestItem::new("low", 1)).await.unwrap();
        storage.insert(TestItem::new("high-1", 9)).await.unwrap();
        storage.insert(TestItem::new("high-2", 9)).await.unwrap();

        let next = storage.get_next_pending().await.unwrap().unwrap();
        assert_eq!(next.id, "high-1");

        storage
            .update_status(next, QueueItemStatus::Completed)
            .await
            .unwrap();
        let next = storage.get_next_pending().await.unwrap().unwrap();
        assert_eq!(next.id, "high-2");
    }

    #[tokio::test]
    async fn update_status_on_missing_row_is_ignored() {
        let storage = InMemoryQueueStorage::new();
        storage
            .update_status(TestItem::new("ghost", 1), QueueItemStatus::Failed)
            .await
            .unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn observe_by_status_tracks_changes() {
        let storage = InMemoryQueueStorage::new();
        let mut completed = storage.observe_by_status(QueueItemStatus::Completed);
        assert!(completed.borrow().is_empty());

        storage.insert(TestItem::new("a", 1)).await.unwrap();
        storage
            .update_status(TestItem::new("a", 1), QueueItemStatus::Completed)
            .await
            .unwrap();

        completed.changed().await.unwrap();
        assert_eq!(completed.borrow().len(), 1);

        storage.remove(TestItem::new("a", 1)).await.unwrap();
        completed.changed().await.unwrap();
        assert!(completed.borrow().is_empty());
    }

    #[tokio::test]
    async fn failing_storage_rejects_writes() {
        let storage = InMemoryQueueStorage::new();
        storage.set_failing(true);
        let err = storage.insert(TestItem::new("a", 1)).await.unwrap_err();
        assert!(matches!(err, HopperError::Storage(_)));

        storage.set_failing(false);
        storage.insert(TestItem::new("a", 1)).await.unwrap();
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn with_rows_preloads_storage() {
        let storage = InMemoryQueueStorage::with_rows(vec![TestItem::new("old", 3)]);
        let pending = storage
            .get_all_by_status(QueueItemStatus::Pending)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(storage.observe_by_status(QueueItemStatus::Pending).borrow().len(), 1);
    }
}
