//! Threshold prediction over recent history

use crate::trend::{predict, DEFAULT_PERIODS, FIT_WINDOW};
use readings::{Metric, ReadingHistory};
use serde::{Deserialize, Serialize};
use thresholds::ThresholdConfig;
use tracing::{debug, info};

/// History length required before predictions run
pub const MIN_HISTORY: usize = 20;

/// Which way the forecast crosses a bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Rising,
    Falling,
}

impl Direction {
    /// Arrow shown next to the predicted value
    pub fn icon(&self) -> &'static str {
        match self {
            Direction::Rising => "📈",
            Direction::Falling => "📉",
        }
    }
}

/// A forecast that crosses a configured bound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionAlert {
    pub metric: Metric,
    /// First forecast step
    pub predicted: f64,
    pub direction: Direction,
    /// e.g. "will exceed maximum threshold"
    pub message: &'static str,
}

impl PredictionAlert {
    fn new(metric: Metric, predicted: f64, direction: Direction, message: &'static str) -> Self {
        Self {
            metric,
            predicted,
            direction,
            message,
        }
    }

    /// "Temperature will exceed maximum threshold"
    pub fn description(&self) -> String {
        format!("{} {}", self.metric, self.message)
    }

    /// "Predicted: 36.2 📈"
    pub fn predicted_text(&self) -> String {
        format!("Predicted: {:.1} {}", self.predicted, self.direction.icon())
    }
}

/// Forecast every metric and compare the next step against the thresholds.
///
/// Returns nothing when fewer than [`MIN_HISTORY`] readings are held. Each
/// metric is judged independently.
pub fn run_predictive_analysis(
    history: &ReadingHistory,
    config: &ThresholdConfig,
) -> Vec<PredictionAlert> {
    let held = history.len();
    if held < MIN_HISTORY {
        debug!("Skipping prediction: {} of {} readings", held, MIN_HISTORY);
        return Vec::new();
    }

    let next = |metric: Metric| {
        predict(&history.series(metric, FIT_WINDOW), DEFAULT_PERIODS)
            .and_then(|forecast| forecast.first().copied())
    };

    let mut alerts = Vec::new();

    if let Some(temp) = next(Metric::Temperature) {
        if temp > config.temp_max {
            alerts.push(PredictionAlert::new(
                Metric::Temperature,
                temp,
                Direction::Rising,
                "will exceed maximum threshold",
            ));
        } else if temp < config.temp_min {
            alerts.push(PredictionAlert::new(
                Metric::Temperature,
                temp,
                Direction::Falling,
                "will drop below minimum threshold",
            ));
        }
    }

    if let Some(humidity) = next(Metric::Humidity) {
        if humidity > config.humidity_max {
            alerts.push(PredictionAlert::new(
                Metric::Humidity,
                humidity,
                Direction::Rising,
                "will exceed maximum threshold",
            ));
        }
    }

    if let Some(air) = next(Metric::AirQuality) {
        if air > config.air_max {
            alerts.push(PredictionAlert::new(
                Metric::AirQuality,
                air,
                Direction::Rising,
                "will exceed safe threshold",
            ));
        }
    }

    for alert in &alerts {
        metrics::counter!("envitrack_prediction_alerts_total", "metric" => alert.metric.card_key())
            .increment(1);
        info!("{} (predicted {:.1})", alert.description(), alert.predicted);
    }
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use readings::Reading;

    fn history(points: impl IntoIterator<Item = (f64, f64, f64)>) -> ReadingHistory {
        let history = ReadingHistory::new();
        let start = Utc::now();
        history.extend(points.into_iter().enumerate().map(|(i, (t, h, a))| {
            Reading::new(start + Duration::seconds(i as i64 * 30), t, h, a)
        }));
        history
    }

    #[test]
    fn test_requires_twenty_readings() {
        let rising = history((0..19).map(|i| (30.0 + i as f64, 50.0, 200.0)));
        assert!(run_predictive_analysis(&rising, &ThresholdConfig::default()).is_empty());
    }

    #[test]
    fn test_rising_temperature() {
        // 17.0 .. 36.0, next step 37.0
        let data = history((0..20).map(|i| (17.0 + i as f64, 50.0, 200.0)));
        let alerts = run_predictive_analysis(&data, &ThresholdConfig::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].metric, Metric::Temperature);
        assert_eq!(alerts[0].direction, Direction::Rising);
        assert!((alerts[0].predicted - 37.0).abs() < 1e-9);
        assert_eq!(alerts[0].description(), "Temperature will exceed maximum threshold");
        assert_eq!(alerts[0].predicted_text(), "Predicted: 37.0 📈");
    }

    #[test]
    fn test_falling_temperature() {
        let data = history((0..20).map(|i| (34.0 - i as f64, 50.0, 200.0)));
        let alerts = run_predictive_analysis(&data, &ThresholdConfig::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].direction, Direction::Falling);
        assert_eq!(alerts[0].message, "will drop below minimum threshold");
    }

    #[test]
    fn test_metrics_are_independent() {
        let data = history((0..20).map(|i| (22.0, 70.0 + i as f64, 500.0 + 10.0 * i as f64)));
        let alerts = run_predictive_analysis(&data, &ThresholdConfig::default());
        let flagged: Vec<Metric> = alerts.iter().map(|a| a.metric).collect();
        assert_eq!(flagged, vec![Metric::Humidity, Metric::AirQuality]);
        assert_eq!(alerts[1].message, "will exceed safe threshold");
    }

    #[test]
    fn test_quiet_when_in_range() {
        let data = history((0..40).map(|i| (22.0 + (i % 3) as f64, 50.0, 300.0)));
        assert!(run_predictive_analysis(&data, &ThresholdConfig::default()).is_empty());
    }

    #[test]
    fn test_uses_live_thresholds() {
        let data = history((0..20).map(|_| (25.0, 50.0, 300.0)));
        let config = ThresholdConfig {
            temp_max: 24.0,
            ..Default::default()
        };
        assert_eq!(run_predictive_analysis(&data, &config).len(), 1);
    }
}
