//! Application configuration
//!
//! Values come from an optional TOML file layered under `ENVITRACK_*`
//! environment variables, e.g. `ENVITRACK_EXPORT_DIR=/tmp/out`.

use crate::DashboardError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "envitrack.toml";

/// Environment variable prefix
const ENV_PREFIX: &str = "ENVITRACK";

/// Runtime configuration for the dashboard binary
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file holding thresholds and preferences
    pub settings_path: PathBuf,
    /// Directory exports are written into
    pub export_dir: PathBuf,
    /// Seconds between prediction runs
    pub prediction_interval_secs: u64,
    /// Sample rate for synthesized cues (Hz)
    pub sample_rate: u32,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    /// Optional CSV file used to seed the reading history
    pub replay_csv: Option<PathBuf>,
    /// Alerts kept by the alert monitor
    pub alert_history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from("envitrack-settings.json"),
            export_dir: PathBuf::from("exports"),
            prediction_interval_secs: predictor::DEFAULT_PREDICTION_INTERVAL.as_secs(),
            sample_rate: sound::DEFAULT_SAMPLE_RATE,
            log_level: "info".to_string(),
            json_logs: false,
            replay_csv: None,
            alert_history_limit: 1000,
        }
    }
}

impl AppConfig {
    /// Load from `file` (optional on disk) and the environment
    pub fn load(file: &Path) -> Result<Self, DashboardError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        let app: AppConfig = settings.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Reject values the dashboard cannot run with
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.prediction_interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "prediction_interval_secs must be greater than zero".to_string(),
            )
            .into());
        }
        if self.sample_rate < 8_000 {
            return Err(config::ConfigError::Message(format!(
                "sample_rate {} is below 8000 Hz",
                self.sample_rate
            ))
            .into());
        }
        Ok(())
    }

    /// Time between prediction runs
    pub fn prediction_interval(&self) -> Duration {
        Duration::from_secs(self.prediction_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/envitrack.toml")).unwrap();
        assert_eq!(config.prediction_interval(), Duration::from_secs(120));
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.replay_csv, None);
    }

    #[test]
    fn test_file_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "export_dir = \"/var/lib/envitrack\"\nprediction_interval_secs = 30\njson_logs = true"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.export_dir, PathBuf::from("/var/lib/envitrack"));
        assert_eq!(config.prediction_interval_secs, 30);
        assert!(config.json_logs);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = AppConfig {
            prediction_interval_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DashboardError::Config(_))));
    }
}
