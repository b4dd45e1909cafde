//! Ports: the two seams a host application plugs into.
//!
//! - [`QueueStorage`] persists items (Room tables, SQL, files, ...).
//! - [`QueueProcessor`] knows how to run one item to completion.
//!
//! The manager never depends on a concrete implementation of either.

pub mod processor;
pub mod storage;

pub use self::processor::QueueProcessor;
pub use self::storage::QueueStorage;
