//! hopper-core
//!
//! A priority queue of work items handed one at a time to a pluggable
//! processor, with optional persistence and operator escalation.
//!
//! # Modules
//! - **domain**: items, states, error kinds, input requests
//! - **ports**: `QueueStorage` and `QueueProcessor`
//! - **app**: the manager, its worker loop, builder and escalation
//! - **impls**: in-memory storage and the input broker

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

pub use app::{HybridQueueManager, ManagerBuilder, ManagerConfig};
pub use error::HopperError;
