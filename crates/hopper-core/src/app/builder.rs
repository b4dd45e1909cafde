//! ManagerBuilder - wiring a manager with fail-fast checks.

use std::sync::Arc;
use std::time::Duration;

use super::config::{EscalationMode, ManagerConfig, ProcessorStartMode};
use super::manager::HybridQueueManager;
use crate::domain::{PersistenceStrategy, QueueItem};
use crate::error::HopperError;
use crate::impls::InMemoryQueueStorage;
use crate::ports::{QueueProcessor, QueueStorage};

/// # Example
/// ```ignore
/// let manager = ManagerBuilder::new(processor)
///     .storage(storage)
///     .persistence_strategy(PersistenceStrategy::OnBackground)
///     .escalation(EscalationMode::Operator)
///     .build()?;
/// ```
///
/// `build()` refuses a persisting strategy without a storage instead of
/// silently keeping everything in memory.
pub struct ManagerBuilder<T: QueueItem, P: QueueProcessor<T>> {
    processor: Arc<P>,
    storage: Option<Arc<dyn QueueStorage<T>>>,
    config: ManagerConfig,
}

/// Errors raised while building a manager.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("persistence strategy {0:?} needs a storage")]
    MissingStorage(PersistenceStrategy),

    #[error(transparent)]
    Invalid(#[from] HopperError),
}

impl<T: QueueItem, P: QueueProcessor<T>> ManagerBuilder<T, P> {
    pub fn new(processor: Arc<P>) -> Self {
        Self {
            processor,
            storage: None,
            config: ManagerConfig::default(),
        }
    }

    pub fn storage(mut self, storage: Arc<dyn QueueStorage<T>>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Replace the whole configuration (e.g. one loaded from a file).
    pub fn config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn persistence_strategy(mut self, strategy: PersistenceStrategy) -> Self {
        self.config.persistence_strategy = strategy;
        self
    }

    pub fn start_mode(mut self, mode: ProcessorStartMode) -> Self {
        self.config.start_mode = mode;
        self
    }

    pub fn escalation(mut self, mode: EscalationMode) -> Self {
        self.config.escalation = mode;
        self
    }

    pub fn item_delay(mut self, delay: Duration) -> Self {
        self.config = self.config.with_item_delay(delay);
        self
    }

    pub fn build(self) -> Result<HybridQueueManager<T, P>, BuildError> {
        let strategy = self.config.persistence_strategy;
        let storage: Arc<dyn QueueStorage<T>> = match (self.storage, strategy.persists()) {
            (Some(storage), _) => storage,
            (None, true) => return Err(BuildError::MissingStorage(strategy)),
            // only force_persist would ever write here
            (None, false) => Arc::new(InMemoryQueueStorage::new()),
        };
        Ok(HybridQueueManager::new(storage, self.processor, self.config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::ScriptedProcessor;
    use crate::domain::item::testing::TestItem;

    #[tokio::test]
    async fn build_with_storage() {
        let storage: Arc<dyn QueueStorage<TestItem>> = Arc::new(InMemoryQueueStorage::new());
        let manager = ManagerBuilder::new(Arc::new(ScriptedProcessor::default()))
            .storage(storage)
            .persistence_strategy(PersistenceStrategy::OnBackground)
            .build()
            .unwrap();
        assert_eq!(manager.persistence_strategy(), PersistenceStrategy::OnBackground);
    }

    #[tokio::test]
    async fn persisting_without_storage_fails_fast() {
        let result = ManagerBuilder::<TestItem, _>::new(Arc::new(ScriptedProcessor::default()))
            .persistence_strategy(PersistenceStrategy::Immediate)
            .build();
        assert!(matches!(
            result,
            Err(BuildError::MissingStorage(PersistenceStrategy::Immediate))
        ));
    }

    #[tokio::test]
    async fn memory_only_needs_no_storage() {
        let result = ManagerBuilder::<TestItem, _>::new(Arc::new(ScriptedProcessor::default()))
            .persistence_strategy(PersistenceStrategy::Never)
            .build();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let config = ManagerConfig {
            command_buffer: 0,
            ..ManagerConfig::default()
        };
        let result = ManagerBuilder::<TestItem, _>::new(Arc::new(ScriptedProcessor::default()))
            .config(config)
            .persistence_strategy(PersistenceStrategy::Never)
            .build();
        assert!(matches!(result, Err(BuildError::Invalid(HopperError::Config(_)))));
    }
}
