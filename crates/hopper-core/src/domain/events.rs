//! Processor events: progress narration, not control flow.

use std::fmt;

pub use super::error_kind::{ProcessingErrorEvent, Remediation, UnknownErrorKind};

/// Bound for the event type a processor streams to observers.
///
/// Events are informational. The only thing the engine ever asks of them is
/// whether one reports a canonical error, which lets an outer controller pair
/// an `Error` result with the kind the processor emitted just before.
pub trait ProcessingEvent: Clone + fmt::Debug + Send + Sync + 'static {
    fn error_kind(&self) -> Option<ProcessingErrorEvent> {
        None
    }
}

/// The canonical kinds are themselves valid events, for processors that have
/// nothing richer to say.
impl ProcessingEvent for ProcessingErrorEvent {
    fn error_kind(&self) -> Option<ProcessingErrorEvent> {
        Some(*self)
    }
}
