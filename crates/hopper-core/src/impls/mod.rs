//! In-process implementations of the ports and helpers for processors.
//!
//! - **InMemoryQueueStorage**: storage for tests, demos and the NEVER-persist
//!   path of hosts that do not need durability.
//! - **InputBroker**: request/response correlation for processors that ask
//!   the operator for data mid-item.

pub mod input_broker;
pub mod memory_storage;

pub use self::input_broker::InputBroker;
pub use self::memory_storage::InMemoryQueueStorage;
