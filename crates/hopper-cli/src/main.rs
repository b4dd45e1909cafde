//! hopper - runs a batch of simulated card payments through a hybrid queue.

mod cli;
mod terminal;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hopper_core::app::{EscalationController, RetryLimitPolicy};
use hopper_core::domain::{
    InputRequest, InputResponse, InputValue, PersistenceStrategy, ProcessingState,
};
use hopper_core::impls::InMemoryQueueStorage;
use hopper_core::ports::QueueStorage;
use hopper_core::{HybridQueueManager, ManagerBuilder};

use crate::cli::Cli;
use crate::terminal::{Payment, SimulatedTerminal};

type Manager = HybridQueueManager<Payment, SimulatedTerminal>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.manager_config()?;
    let strategy = config.persistence_strategy;

    let terminal = Arc::new(SimulatedTerminal::new(cli.seed, cli.failure_rate));
    let storage: Arc<InMemoryQueueStorage<Payment>> = Arc::new(InMemoryQueueStorage::new());
    let manager: Arc<Manager> = Arc::new(
        ManagerBuilder::new(terminal)
            .storage(storage.clone() as Arc<dyn QueueStorage<Payment>>)
            .config(config)
            .build()?,
    );

    // the policy answers both confirmations and escalations
    let controller = EscalationController::spawn(manager.clone(), RetryLimitPolicy::default());
    let signer = tokio::spawn(sign_everything(manager.clone()));
    let narrator = tokio::spawn(narrate_terminal(manager.clone()));
    let mut states = manager.subscribe_transitions();

    let mut rng = StdRng::seed_from_u64(cli.seed);
    for seq in 1..=cli.count {
        let amount = rng.gen_range(1_00..100_00);
        let priority = if rng.gen_bool(0.2) { 10 } else { 0 };
        manager.enqueue(Payment::new(seq, amount, priority)).await?;
    }
    info!(count = cli.count, ?strategy, "payments enqueued");

    tokio::select! {
        _ = watch_until_finished(&mut states) => {}
        _ = tokio::signal::ctrl_c() => warn!("interrupted"),
    }

    if strategy == PersistenceStrategy::OnBackground {
        // what a host does when it goes to the background
        manager.persist_pending_items().await?;
    }
    manager.flush_storage().await?;

    let status = manager.status().await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    println!("rows in storage: {}", storage.len().await);

    controller.stop();
    signer.abort();
    narrator.abort();
    manager.shutdown().await?;
    Ok(())
}

/// Print transitions until the queue drains or is canceled.
async fn watch_until_finished(states: &mut tokio::sync::broadcast::Receiver<ProcessingState<Payment>>) {
    loop {
        match states.recv().await {
            Ok(state) => {
                let payment = state.item().map_or("-", |p| p.id.as_str());
                match &state {
                    ProcessingState::ItemFailed { error, .. } => {
                        println!("{:<16} {payment} ({error})", state.name())
                    }
                    _ => println!("{:<16} {payment}", state.name()),
                }
                if matches!(
                    state,
                    ProcessingState::QueueDone(_) | ProcessingState::QueueCanceled(_)
                ) {
                    return;
                }
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "missed transitions"),
            Err(RecvError::Closed) => return,
        }
    }
}

/// Print what the terminal reports about each payment.
async fn narrate_terminal(manager: Arc<Manager>) {
    let mut events = manager.processor_events();
    loop {
        match events.recv().await {
            Ok(event) => println!("  terminal  {}", event.describe()),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "missed terminal events"),
            Err(RecvError::Closed) => return,
        }
    }
}

/// Stand-in for the customer: signs whenever the terminal asks.
async fn sign_everything(manager: Arc<Manager>) {
    let mut requests = manager.input_requests();
    loop {
        match requests.recv().await {
            Ok(request) => {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let value = match &request {
                    InputRequest::SignatureInput { .. } => InputValue::Signature(vec![0x5a; 16]),
                    InputRequest::ConfirmationInput { .. } => InputValue::Confirmed(true),
                    InputRequest::SelectionInput { .. } => InputValue::Selected(0),
                    InputRequest::PinInput { .. } => InputValue::Text("0000".to_string()),
                };
                manager
                    .provide_input(InputResponse::answered(request.id(), value))
                    .await;
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "missed input requests"),
            Err(RecvError::Closed) => {
                error!("input request channel closed");
                return;
            }
        }
    }
}
