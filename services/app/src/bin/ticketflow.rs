//! services/app/src/bin/ticketflow.rs

use app_lib::{
    adapters::{FileStore, MemoryStore, SystemClock},
    config::{Config, StorageKind},
    error::AppError,
    ui::{run, AppState, Controller, Shell},
};
use std::sync::Arc;
use ticketflow_core::ports::KeyValueStore;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    // Logs go to stderr so they never interleave with the rendered screens.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting TicketFlow...");

    // --- 2. Open Storage ---
    let store: Arc<dyn KeyValueStore> = match config.storage {
        StorageKind::File => {
            info!("Using file storage in {}", config.data_dir.display());
            Arc::new(FileStore::open(&config.data_dir)?)
        }
        StorageKind::Memory => {
            info!("Using in-memory storage; nothing will be kept after exit");
            Arc::new(MemoryStore::new())
        }
    };

    // --- 3. Build the Shared AppState & Controller ---
    let app_state = Arc::new(AppState::new(config.clone(), store, Arc::new(SystemClock)));
    let controller = Controller::start(app_state);

    // --- 4. Run the Front End ---
    let (shell, expired) = Shell::new(controller);
    run(
        shell,
        expired,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    info!("TicketFlow stopped");
    Ok(())
}
