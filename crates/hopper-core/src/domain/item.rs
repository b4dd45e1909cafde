//! The contract every queued unit satisfies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a queue item.
///
/// State transitions driven by the manager:
/// - Pending -> Processing -> Completed
/// - Pending -> Processing -> Failed
/// - Pending -> Processing -> Pending (retry later / skipped confirmation)
/// - Pending -> Processing -> Cancelled (aborted by the operator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueItemStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl QueueItemStatus {
    /// No further transitions happen once an item reaches one of these.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            QueueItemStatus::Completed | QueueItemStatus::Failed | QueueItemStatus::Cancelled
        )
    }

    /// Rows in these states still belong to the live queue.
    pub fn is_active(self) -> bool {
        matches!(self, QueueItemStatus::Pending | QueueItemStatus::Processing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueueItemStatus::Pending => "PENDING",
            QueueItemStatus::Processing => "PROCESSING",
            QueueItemStatus::Completed => "COMPLETED",
            QueueItemStatus::Failed => "FAILED",
            QueueItemStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for QueueItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work the manager can order, process and persist.
///
/// The manager owns items by value while they are queued and is the only
/// writer of `status` during processing. Business types (payments, reprint
/// jobs, ...) implement this trait; the engine never looks inside them.
pub trait QueueItem: Clone + fmt::Debug + Send + Sync + 'static {
    /// Opaque, unique identity.
    fn id(&self) -> &str;

    /// Higher sorts first.
    fn priority(&self) -> i32;

    fn status(&self) -> QueueItemStatus;

    fn set_status(&mut self, status: QueueItemStatus);

    /// Copy with a new status; the manager uses this when it needs a value
    /// to hand to storage while keeping its own copy untouched.
    fn with_status(&self, status: QueueItemStatus) -> Self {
        let mut item = self.clone();
        item.set_status(status);
        item
    }

    /// Apply operator overrides attached to a confirmation response
    /// (e.g. a modified amount or method). Items that do not support
    /// overrides ignore them.
    fn apply_overrides(&mut self, _overrides: &serde_json::Value) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Minimal item used across the crate's tests.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TestItem {
        pub id: String,
        pub priority: i32,
        pub status: QueueItemStatus,
        pub amount: i64,
    }

    impl TestItem {
        pub fn new(id: &str, priority: i32) -> Self {
            Self {
                id: id.to_string(),
                priority,
                status: QueueItemStatus::Pending,
                amount: 0,
            }
        }
    }

    impl QueueItem for TestItem {
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
            if let Some(amount) = overrides.get("amount").and_then(|v| v.as_i64()) {
                self.amount = amount;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::TestItem;
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::completed(QueueItemStatus::Completed, true)]
    #[case::failed(QueueItemStatus::Failed, true)]
    #[case::cancelled(QueueItemStatus::Cancelled, true)]
    #[case::pending(QueueItemStatus::Pending, false)]
    #[case::processing(QueueItemStatus::Processing, false)]
    fn terminal_statuses(#[case] status: QueueItemStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
        assert_eq!(status.is_active(), !terminal);
    }

    #[test]
    fn status_serializes_screaming_snake() {
        let s = serde_json::to_string(&QueueItemStatus::Cancelled).unwrap();
        assert_eq!(s, "\"CANCELLED\"");
        assert_eq!(QueueItemStatus::Processing.to_string(), "PROCESSING");
    }

    #[test]
    fn with_status_leaves_original_untouched() {
        let item = TestItem::new("p1", 5);
        let copy = item.with_status(QueueItemStatus::Completed);

        assert_eq!(item.status(), QueueItemStatus::Pending);
        assert_eq!(copy.status(), QueueItemStatus::Completed);
        assert_eq!(copy.id(), "p1");
    }
}
