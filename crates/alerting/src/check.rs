//! Threshold checks for a single reading

use chrono::{DateTime, Utc};
use readings::{Metric, Reading};
use serde::{Deserialize, Serialize};
use std::fmt;
use thresholds::ThresholdConfig;

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which bound a reading crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    TemperatureHigh,
    TemperatureLow,
    HumidityHigh,
    HumidityLow,
    AirQualityPoor,
}

impl AlertKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::TemperatureHigh => "TEMPERATURE_HIGH",
            AlertKind::TemperatureLow => "TEMPERATURE_LOW",
            AlertKind::HumidityHigh => "HUMIDITY_HIGH",
            AlertKind::HumidityLow => "HUMIDITY_LOW",
            AlertKind::AirQualityPoor => "AIR_QUALITY_POOR",
        }
    }

    /// Metric the alert belongs to
    pub fn metric(&self) -> Metric {
        match self {
            AlertKind::TemperatureHigh | AlertKind::TemperatureLow => Metric::Temperature,
            AlertKind::HumidityHigh | AlertKind::HumidityLow => Metric::Humidity,
            AlertKind::AirQualityPoor => Metric::AirQuality,
        }
    }

    /// Severity assigned to this kind of breach
    pub fn severity(&self) -> Severity {
        match self {
            AlertKind::AirQualityPoor => Severity::Critical,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bound crossed by the latest reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdAlert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub value: f64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ThresholdAlert {
    fn new(kind: AlertKind, value: f64, message: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            value,
            message,
            timestamp,
        }
    }
}

/// Check one reading against the thresholds.
///
/// Each metric contributes at most one alert; high is checked before low.
pub fn check_thresholds(reading: &Reading, config: &ThresholdConfig) -> Vec<ThresholdAlert> {
    let mut alerts = Vec::new();
    let ts = reading.timestamp;

    if reading.temperature > config.temp_max {
        alerts.push(ThresholdAlert::new(
            AlertKind::TemperatureHigh,
            reading.temperature,
            format!(
                "Temperature too high: {:.1}°C (max: {}°C)",
                reading.temperature, config.temp_max
            ),
            ts,
        ));
    } else if reading.temperature < config.temp_min {
        alerts.push(ThresholdAlert::new(
            AlertKind::TemperatureLow,
            reading.temperature,
            format!(
                "Temperature too low: {:.1}°C (min: {}°C)",
                reading.temperature, config.temp_min
            ),
            ts,
        ));
    }

    if reading.humidity > config.humidity_max {
        alerts.push(ThresholdAlert::new(
            AlertKind::HumidityHigh,
            reading.humidity,
            format!(
                "Humidity too high: {:.1}% (max: {}%)",
                reading.humidity, config.humidity_max
            ),
            ts,
        ));
    } else if reading.humidity < config.humidity_min {
        alerts.push(ThresholdAlert::new(
            AlertKind::HumidityLow,
            reading.humidity,
            format!(
                "Humidity too low: {:.1}% (min: {}%)",
                reading.humidity, config.humidity_min
            ),
            ts,
        ));
    }

    if reading.air_quality > config.air_max {
        alerts.push(ThresholdAlert::new(
            AlertKind::AirQualityPoor,
            reading.air_quality,
            format!(
                "Poor air quality: {:.0} ppm (max: {} ppm)",
                reading.air_quality, config.air_max
            ),
            ts,
        ));
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temp: f64, humidity: f64, air: f64) -> Reading {
        Reading::new(Utc::now(), temp, humidity, air)
    }

    #[test]
    fn test_nominal_reading() {
        let alerts = check_thresholds(&reading(22.0, 50.0, 300.0), &ThresholdConfig::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_all_breaches() {
        let alerts = check_thresholds(&reading(40.0, 10.0, 900.0), &ThresholdConfig::default());
        let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![AlertKind::TemperatureHigh, AlertKind::HumidityLow, AlertKind::AirQualityPoor]
        );
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert_eq!(alerts[2].severity, Severity::Critical);
        assert_eq!(alerts[0].message, "Temperature too high: 40.0°C (max: 35°C)");
    }

    #[test]
    fn test_bounds_are_exclusive() {
        let config = ThresholdConfig::default();
        let alerts = check_thresholds(&reading(35.0, 80.0, 600.0), &config);
        assert!(alerts.is_empty());
    }
}
