//! EnviTrack Dashboard - Main Entry Point

use anyhow::Context;
use dashboard::{init_logging, AppConfig, Collaborators, Dashboard, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use std::sync::Arc;
use thresholds::JsonFileStore;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    init_logging(&config.log_level, config.json_logs);
    info!("=== EnviTrack Dashboard v{} ===", env!("CARGO_PKG_VERSION"));

    let store = JsonFileStore::open(&config.settings_path)
        .with_context(|| format!("opening settings {}", config.settings_path.display()))?;
    let dashboard = Dashboard::new(&config, Arc::new(store), Collaborators::headless());
    dashboard.enable_audio();

    if let Some(path) = &config.replay_csv {
        match readings::load_csv(path) {
            Ok(batch) => {
                for reading in batch {
                    dashboard.ingest(reading);
                }
                info!("Replayed {} readings", dashboard.history().len());
                dashboard.run_predictive_analysis();
            }
            Err(e) => warn!("Could not replay {}: {}", path.display(), e),
        }
    }

    dashboard.start_prediction_cycle();
    info!("Running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;

    if !dashboard.history().is_empty() {
        dashboard.export_csv();
    }
    dashboard.teardown();
    Ok(())
}
