//! Threshold Store
//!
//! Owns the alert threshold configuration and user preferences, validates
//! settings-form input, and persists both to a key-value settings store.

mod config;
mod error;
mod persist;
mod store;

pub use config::{AlertSound, SettingsForm, ThresholdConfig};
pub use error::{StoreError, ThresholdError};
pub use persist::{JsonFileStore, KeyValueStore, MemoryStore};
pub use store::{Preferences, ThresholdStore, DARK_MODE_KEY, THRESHOLDS_KEY};
