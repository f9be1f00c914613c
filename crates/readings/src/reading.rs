//! Reading and metric types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Device id reported when a reading arrives without one
pub const DEFAULT_DEVICE_ID: &str = "ESP32_001";

/// One sample from a monitoring device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// When the device took the sample
    pub timestamp: DateTime<Utc>,
    /// Temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Air quality (ppm)
    pub air_quality: f64,
    /// Reporting device
    #[serde(default)]
    pub device_id: Option<String>,
}

impl Reading {
    /// Create a reading without a device id
    pub fn new(timestamp: DateTime<Utc>, temperature: f64, humidity: f64, air_quality: f64) -> Self {
        Self {
            timestamp,
            temperature,
            humidity,
            air_quality,
            device_id: None,
        }
    }

    /// Attach a device id
    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Device id, or the placeholder when none was reported
    pub fn device_or_default(&self) -> &str {
        self.device_id.as_deref().unwrap_or(DEFAULT_DEVICE_ID)
    }

    /// Value of a single metric
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::AirQuality => self.air_quality,
        }
    }
}

/// Monitored quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Temperature,
    Humidity,
    AirQuality,
}

impl Metric {
    /// All metrics in dashboard card order
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::AirQuality];

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::AirQuality => "Air Quality",
        }
    }

    /// Measurement unit
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::AirQuality => "ppm",
        }
    }

    /// Dashboard card identifier, used as the alert loop key
    pub fn card_key(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::AirQuality => "air_quality",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
