//! Domain model (items, results, states, input protocols, error kinds).

pub mod error_codes;
pub mod error_kind;
pub mod events;
pub mod ids;
pub mod input;
pub mod item;
pub mod outcome;
pub mod queue_input;
pub mod state;

pub use error_codes::ErrorCodeTable;
pub use events::{ProcessingErrorEvent, ProcessingEvent, Remediation, UnknownErrorKind};
pub use ids::{Id, IdMarker, InputRequestId, QueueRequestId};
pub use input::{InputRequest, InputResponse, InputValue};
pub use item::{QueueItem, QueueItemStatus};
pub use outcome::ProcessingResult;
pub use queue_input::{ErrorHandlingAction, QueueInputRequest, QueueInputResponse, QueueInputValue};
pub use state::{PersistenceStrategy, ProcessingState};
