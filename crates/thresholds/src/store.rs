//! Threshold Store and user preferences

use crate::{KeyValueStore, SettingsForm, StoreError, ThresholdConfig, ThresholdError};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Storage key for the serialized threshold configuration
pub const THRESHOLDS_KEY: &str = "thresholds";

/// Storage key for the dark-mode flag
pub const DARK_MODE_KEY: &str = "darkMode";

/// Owner of the process-wide threshold configuration.
///
/// Every update goes through [`ThresholdStore::set`], which validates,
/// persists, and then publishes the new value to all subscribers. Consumers
/// hold a [`watch::Receiver`] and read the live value at evaluation time.
pub struct ThresholdStore {
    /// Backing settings storage
    store: Arc<dyn KeyValueStore>,
    /// Publisher for the current configuration
    tx: watch::Sender<ThresholdConfig>,
}

impl ThresholdStore {
    /// Load the persisted configuration, falling back to defaults when the
    /// stored blob is missing or unreadable
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let config = read_config(store.as_ref());
        let (tx, _rx) = watch::channel(config);
        Self { store, tx }
    }

    /// Snapshot of the current configuration
    pub fn current(&self) -> ThresholdConfig {
        self.tx.borrow().clone()
    }

    /// Live view of the configuration
    pub fn subscribe(&self) -> watch::Receiver<ThresholdConfig> {
        self.tx.subscribe()
    }

    /// Validate, persist, and publish a new configuration
    pub fn set(&self, config: ThresholdConfig) -> Result<(), ThresholdError> {
        config.validate()?;
        let blob = serde_json::to_string(&config).map_err(StoreError::from)?;
        self.store.set(THRESHOLDS_KEY, &blob)?;
        info!(
            "Thresholds updated: temp {}-{}, humidity {}-{}, air < {}, sound {}",
            config.temp_min,
            config.temp_max,
            config.humidity_min,
            config.humidity_max,
            config.air_max,
            config.alert_sound
        );
        self.tx.send_replace(config);
        Ok(())
    }

    /// Parse settings-panel input and apply it
    pub fn apply_form(&self, form: &SettingsForm) -> Result<ThresholdConfig, ThresholdError> {
        let config = ThresholdConfig::try_from(form)?;
        self.set(config.clone())?;
        Ok(config)
    }

    /// Restore and persist the default configuration
    pub fn reset(&self) -> Result<(), ThresholdError> {
        info!("Resetting thresholds to defaults");
        self.set(ThresholdConfig::default())
    }
}

fn read_config(store: &dyn KeyValueStore) -> ThresholdConfig {
    match store.get(THRESHOLDS_KEY) {
        Ok(Some(blob)) => match serde_json::from_str::<ThresholdConfig>(&blob) {
            Ok(config) => match config.validate() {
                Ok(()) => {
                    debug!("Loaded persisted thresholds");
                    config
                }
                Err(e) => {
                    warn!("Persisted thresholds invalid ({}), using defaults", e);
                    ThresholdConfig::default()
                }
            },
            Err(e) => {
                warn!("Persisted thresholds unreadable ({}), using defaults", e);
                ThresholdConfig::default()
            }
        },
        Ok(None) => ThresholdConfig::default(),
        Err(e) => {
            warn!("Settings store unavailable ({}), using defaults", e);
            ThresholdConfig::default()
        }
    }
}

/// Display preferences persisted next to the thresholds
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
    dark_mode: bool,
}

impl Preferences {
    /// Load preferences; anything other than a stored `true` means light mode
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let dark_mode = match store.get(DARK_MODE_KEY) {
            Ok(value) => value.as_deref().map(str::trim) == Some("true"),
            Err(e) => {
                warn!("Could not read dark mode flag: {}", e);
                false
            }
        };
        Self { store, dark_mode }
    }

    /// Whether dark mode is active
    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Set and persist the dark-mode flag
    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.store
            .set(DARK_MODE_KEY, &serde_json::to_string(&enabled)?)?;
        self.dark_mode = enabled;
        Ok(())
    }

    /// Flip dark mode and return the new state
    pub fn toggle_dark_mode(&mut self) -> Result<bool, StoreError> {
        let enabled = !self.dark_mode;
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }
}
