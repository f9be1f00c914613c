//! Append-only reading history

use crate::{Metric, Reading, SummaryStats};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// In-memory history in arrival order.
///
/// Shared between the ingestion path, the prediction timer, and exports.
/// Readings are never reordered or deduplicated.
#[derive(Debug, Default)]
pub struct ReadingHistory {
    readings: RwLock<Vec<Reading>>,
}

impl ReadingHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reading
    pub fn push(&self, reading: Reading) {
        let mut readings = self.readings.write().unwrap_or_else(PoisonError::into_inner);
        readings.push(reading);
        debug!("History now holds {} readings", readings.len());
    }

    /// Append many readings, preserving their order
    pub fn extend(&self, batch: impl IntoIterator<Item = Reading>) {
        let mut readings = self.readings.write().unwrap_or_else(PoisonError::into_inner);
        readings.extend(batch);
    }

    /// Number of readings held
    pub fn len(&self) -> usize {
        self.readings.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the full history
    pub fn snapshot(&self) -> Vec<Reading> {
        self.readings.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The most recent `limit` readings, oldest first
    pub fn recent(&self, limit: usize) -> Vec<Reading> {
        let readings = self.readings.read().unwrap_or_else(PoisonError::into_inner);
        let start = readings.len().saturating_sub(limit);
        readings[start..].to_vec()
    }

    /// Latest reading, if any
    pub fn latest(&self) -> Option<Reading> {
        self.readings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// The most recent `limit` values of one metric, oldest first
    pub fn series(&self, metric: Metric, limit: usize) -> Vec<f64> {
        self.recent(limit).iter().map(|r| r.value(metric)).collect()
    }

    /// Summary statistics over the whole history
    pub fn stats(&self) -> SummaryStats {
        let readings = self.readings.read().unwrap_or_else(PoisonError::into_inner);
        SummaryStats::compute(&readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn history_of(n: usize) -> ReadingHistory {
        let history = ReadingHistory::new();
        let start = Utc::now();
        for i in 0..n {
            history.push(Reading::new(
                start + Duration::seconds(i as i64),
                i as f64,
                50.0,
                100.0 + i as f64,
            ));
        }
        history
    }

    #[test]
    fn test_arrival_order_preserved() {
        let history = ReadingHistory::new();
        let now = Utc::now();
        history.push(Reading::new(now, 2.0, 0.0, 0.0));
        history.push(Reading::new(now - Duration::hours(1), 1.0, 0.0, 0.0));
        history.push(Reading::new(now, 2.0, 0.0, 0.0));

        let temps: Vec<f64> = history.snapshot().iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_recent_window() {
        let history = history_of(25);
        let recent = history.recent(20);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].temperature, 5.0);
        assert_eq!(recent[19].temperature, 24.0);

        assert_eq!(history_of(3).recent(20).len(), 3);
    }

    #[test]
    fn test_series() {
        let history = history_of(12);
        let air = history.series(Metric::AirQuality, 2);
        assert_eq!(air, vec![110.0, 111.0]);
        assert_eq!(history.latest().map(|r| r.temperature), Some(11.0));
    }

    #[test]
    fn test_stats_cover_whole_history() {
        let stats = history_of(25).stats();
        assert_eq!(stats.count, 25);
        assert_eq!(stats.avg_temp, 12.0);
        assert!(ReadingHistory::new().latest().is_none());
    }
}
