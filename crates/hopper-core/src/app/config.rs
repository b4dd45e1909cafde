//! Manager configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::PersistenceStrategy;
use crate::error::HopperError;

/// How the loop starts each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessorStartMode {
    /// Start as soon as the previous item is resolved.
    #[default]
    Immediate,
    /// Ask the operator (CONFIRM_NEXT_PROCESSOR) before every item.
    Confirmation,
}

/// What happens when `process` resolves to `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscalationMode {
    /// Mark the item FAILED and move on.
    #[default]
    Disabled,
    /// Ask the operator (ERROR_RETRY_OR_SKIP) how to recover.
    Operator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub persistence_strategy: PersistenceStrategy,
    pub start_mode: ProcessorStartMode,
    /// Pause between items so observers can render transient states; 0 disables it.
    pub item_delay_ms: u64,
    pub confirmation_timeout_secs: u64,
    pub escalation_timeout_secs: u64,
    pub escalation: EscalationMode,
    /// Load PENDING rows from storage when the manager starts (persisting strategies only).
    pub restore_on_start: bool,
    /// Start processing restored rows right away instead of waiting for
    /// `start_processing` or the next enqueue.
    pub resume_on_start: bool,
    pub command_buffer: usize,
    pub transition_buffer: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            persistence_strategy: PersistenceStrategy::default(),
            start_mode: ProcessorStartMode::default(),
            item_delay_ms: 500,
            confirmation_timeout_secs: 60,
            escalation_timeout_secs: 60,
            escalation: EscalationMode::default(),
            restore_on_start: true,
            resume_on_start: false,
            command_buffer: 64,
            transition_buffer: 256,
        }
    }
}

impl ManagerConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, HopperError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| HopperError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HopperError> {
        if self.command_buffer == 0 {
            return Err(HopperError::Config("command_buffer must be > 0".into()));
        }
        if self.transition_buffer == 0 {
            return Err(HopperError::Config("transition_buffer must be > 0".into()));
        }
        if self.confirmation_timeout_secs == 0 {
            return Err(HopperError::Config(
                "confirmation_timeout_secs must be > 0".into(),
            ));
        }
        if self.escalation_timeout_secs == 0 {
            return Err(HopperError::Config("escalation_timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    pub fn with_persistence_strategy(mut self, strategy: PersistenceStrategy) -> Self {
        self.persistence_strategy = strategy;
        self
    }

    pub fn with_start_mode(mut self, mode: ProcessorStartMode) -> Self {
        self.start_mode = mode;
        self
    }

    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay_ms = delay.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn with_escalation(mut self, mode: EscalationMode) -> Self {
        self.escalation = mode;
        self
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn escalation_timeout(&self) -> Duration {
        Duration::from_secs(self.escalation_timeout_secs)
    }

    /// Restore only makes sense when something was written in the first place.
    pub(crate) fn restores(&self) -> bool {
        self.restore_on_start && self.persistence_strategy.persists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.persistence_strategy, PersistenceStrategy::Immediate);
        assert_eq!(config.item_delay(), Duration::from_millis(500));
        assert_eq!(config.confirmation_timeout(), Duration::from_secs(60));
        assert_eq!(config.escalation, EscalationMode::Disabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ManagerConfig::from_json(
            r#"{"persistence_strategy": "ON_BACKGROUND", "item_delay_ms": 0, "escalation": "OPERATOR"}"#,
        )
        .unwrap();
        assert_eq!(config.persistence_strategy, PersistenceStrategy::OnBackground);
        assert_eq!(config.item_delay_ms, 0);
        assert_eq!(config.escalation, EscalationMode::Operator);
        assert_eq!(config.command_buffer, 64);
    }

    #[rstest]
    #[case::commands(r#"{"command_buffer": 0}"#)]
    #[case::transitions(r#"{"transition_buffer": 0}"#)]
    #[case::confirmation(r#"{"confirmation_timeout_secs": 0}"#)]
    #[case::escalation(r#"{"escalation_timeout_secs": 0}"#)]
    #[case::malformed(r#"{"item_delay_ms": "soon"}"#)]
    fn rejects_invalid(#[case] raw: &str) {
        assert!(matches!(
            ManagerConfig::from_json(raw),
            Err(HopperError::Config(_))
        ));
    }

    #[test]
    fn never_strategy_does_not_restore() {
        let config =
            ManagerConfig::default().with_persistence_strategy(PersistenceStrategy::Never);
        assert!(!config.restores());
    }
}
