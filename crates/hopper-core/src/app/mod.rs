//! App - the queue engine built on top of the ports.
//!
//! # Main components
//! - **HybridQueueManager**: public handle; sends commands to the loop
//! - **WorkerLoop**: owns the queue (enqueue -> process -> resolve -> rest)
//! - **PersistenceWriter**: applies storage writes in order, off the loop
//! - **EscalationController**: answers queue-level questions from a policy
//! - **ManagerBuilder**: wiring with fail-fast checks

pub mod builder;
pub mod config;
pub mod escalation;
pub mod manager;
pub(crate) mod persistence;
pub mod status;
pub(crate) mod worker_loop;

#[cfg(test)]
pub(crate) mod testing;

pub use self::builder::{BuildError, ManagerBuilder};
pub use self::config::{EscalationMode, ManagerConfig, ProcessorStartMode};
pub use self::escalation::{EscalationController, EscalationPolicy, FixedPolicy, RetryLimitPolicy};
pub use self::manager::HybridQueueManager;
pub use self::status::QueueStatus;
