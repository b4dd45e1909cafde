//! Command line for the hopper demo.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use hopper_core::app::{EscalationMode, ManagerConfig, ProcessorStartMode};
use hopper_core::domain::PersistenceStrategy;
use hopper_core::HopperError;

/// Push a batch of simulated payments through a hybrid queue.
#[derive(Parser, Debug)]
#[command(name = "hopper")]
#[command(version)]
pub(crate) struct Cli {
    /// Manager configuration (JSON); flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Number of payments to enqueue
    #[arg(short = 'n', long, default_value_t = 8)]
    pub count: usize,

    /// Chance that a payment is declined
    #[arg(long, default_value_t = 0.3)]
    pub failure_rate: f64,

    /// Pause between items, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Ask the operator policy how to recover from declines
    #[arg(long)]
    pub escalate: bool,

    /// Ask for confirmation before each payment
    #[arg(long)]
    pub confirm: bool,

    /// Seed for the simulated terminal
    #[arg(long, default_value_t = 7)]
    pub seed: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub(crate) enum Strategy {
    Never,
    Immediate,
    OnBackground,
}

impl From<Strategy> for PersistenceStrategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::Never => PersistenceStrategy::Never,
            Strategy::Immediate => PersistenceStrategy::Immediate,
            Strategy::OnBackground => PersistenceStrategy::OnBackground,
        }
    }
}

impl Cli {
    pub(crate) fn manager_config(&self) -> Result<ManagerConfig, HopperError> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    HopperError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                ManagerConfig::from_json(&raw)?
            }
            None => ManagerConfig::default(),
        };

        if let Some(strategy) = self.strategy {
            config = config.with_persistence_strategy(strategy.into());
        }
        if let Some(delay) = self.delay_ms {
            config = config.with_item_delay(Duration::from_millis(delay));
        }
        if self.escalate {
            config = config.with_escalation(EscalationMode::Operator);
        }
        if self.confirm {
            config = config.with_start_mode(ProcessorStartMode::Confirmation);
        }
        config.validate()?;
        Ok(config)
    }
}
