//! QueueProcessor port: runs one item to completion.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::{InputRequest, InputResponse, ProcessingEvent, ProcessingResult, QueueItem};
use crate::error::HopperError;

/// Business logic for one kind of item.
///
/// # Contract
/// - `process` resolves to exactly one [`ProcessingResult`]. Expected business
///   failures are `Ok(ProcessingResult::Error(..))` whose message names a
///   canonical error kind. `Err` (or a panic) is reserved for faults; the
///   manager turns both into `ItemFailed`.
/// - When operator data is needed, `process` emits an [`InputRequest`] on
///   [`input_requests`](Self::input_requests) and waits for the matching
///   [`InputResponse`]. The processor enforces each request's timeout itself
///   and carries on as if the operator declined; it never hangs.
/// - `provide_input` tolerates responses that arrive after their request was
///   resolved (they are dropped).
#[async_trait]
pub trait QueueProcessor<T: QueueItem>: Send + Sync + 'static {
    /// Progress narration emitted while processing.
    type Event: ProcessingEvent;

    fn events(&self) -> broadcast::Receiver<Self::Event>;

    fn input_requests(&self) -> broadcast::Receiver<InputRequest>;

    async fn process(&self, item: &T) -> Result<ProcessingResult, HopperError>;

    async fn provide_input(&self, response: InputResponse);

    /// Graceful cleanup after an operator abort. `None` means the whole
    /// queue was aborted. Returns whether cleanup succeeded.
    async fn abort(&self, _item: Option<&T>) -> bool {
        true
    }
}
