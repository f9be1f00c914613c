//! Summary statistics over the reading history

use crate::Reading;
use serde::{Deserialize, Serialize};

/// Averages shown in the report summary and fed to the insight generator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of readings
    pub count: usize,
    /// Mean temperature, one decimal
    pub avg_temp: f64,
    /// Mean humidity, one decimal
    pub avg_humidity: f64,
    /// Mean air quality, whole ppm
    pub avg_air: f64,
}

impl SummaryStats {
    /// Compute averages; an empty slice yields all zeros
    pub fn compute(readings: &[Reading]) -> Self {
        if readings.is_empty() {
            return Self::default();
        }

        let (temp, humidity, air) = readings.iter().fold((0.0, 0.0, 0.0), |acc, r| {
            (acc.0 + r.temperature, acc.1 + r.humidity, acc.2 + r.air_quality)
        });
        let n = readings.len() as f64;

        Self {
            count: readings.len(),
            avg_temp: round_to(temp / n, 1),
            avg_humidity: round_to(humidity / n, 1),
            avg_air: (air / n).round(),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
