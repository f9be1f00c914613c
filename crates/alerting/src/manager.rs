//! Alert Monitor Implementation

use crate::{check_thresholds, AlertKind, Severity, ThresholdAlert};
use readings::{Metric, Reading};
use std::collections::{BTreeMap, HashMap};
use thresholds::ThresholdConfig;
use tracing::{debug, info, warn};

/// Display state of a dashboard card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardSeverity {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl CardSeverity {
    /// Whether the card is showing an alert
    pub fn is_alerting(&self) -> bool {
        !matches!(self, CardSeverity::Normal)
    }
}

impl From<Severity> for CardSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Warning => CardSeverity::Warning,
            Severity::Critical => CardSeverity::Critical,
        }
    }
}

/// A card whose severity differs from the previous reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityChange {
    pub metric: Metric,
    pub previous: CardSeverity,
    pub current: CardSeverity,
}

/// Keeps alert history and per-card severity
pub struct AlertMonitor {
    /// Every alert raised, oldest first
    history: Vec<ThresholdAlert>,
    /// Current severity by card
    cards: HashMap<Metric, CardSeverity>,
    /// Maximum history length
    max_history: usize,
}

impl AlertMonitor {
    /// Create a monitor that retains at most `max_history` alerts
    pub fn new(max_history: usize) -> Self {
        info!("Creating alert monitor (history limit {})", max_history);
        Self {
            history: Vec::new(),
            cards: HashMap::new(),
            max_history,
        }
    }

    /// Check a reading, record any alerts, and report card severity changes
    pub fn observe(&mut self, reading: &Reading, config: &ThresholdConfig) -> Vec<SeverityChange> {
        let alerts = check_thresholds(reading, config);

        let mut next: HashMap<Metric, CardSeverity> =
            Metric::ALL.iter().map(|m| (*m, CardSeverity::Normal)).collect();
        for alert in &alerts {
            warn!("ALERT [{}] {} ({})", alert.kind, alert.message, alert.severity);
            next.insert(alert.kind.metric(), alert.severity.into());
        }
        self.record(alerts);

        let mut changes = Vec::new();
        for metric in Metric::ALL {
            let previous = self.severity(metric);
            let current = next[&metric];
            if previous != current {
                debug!("Card {} changed {:?} -> {:?}", metric, previous, current);
                changes.push(SeverityChange {
                    metric,
                    previous,
                    current,
                });
                self.cards.insert(metric, current);
            }
        }
        changes
    }

    fn record(&mut self, alerts: Vec<ThresholdAlert>) {
        self.history.extend(alerts);
        if self.history.len() > self.max_history {
            let excess = self.history.len() - self.max_history;
            self.history.drain(..excess);
        }
    }

    /// Current severity of a card
    pub fn severity(&self, metric: Metric) -> CardSeverity {
        self.cards.get(&metric).copied().unwrap_or_default()
    }

    /// Alerts raised so far
    pub fn history(&self) -> &[ThresholdAlert] {
        &self.history
    }

    /// Alert count per kind
    pub fn summary(&self) -> BTreeMap<AlertKind, usize> {
        let mut counts = BTreeMap::new();
        for alert in &self.history {
            *counts.entry(alert.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Clear history and reset every card to normal
    pub fn clear(&mut self) {
        self.history.clear();
        self.cards.clear();
    }
}

impl Default for AlertMonitor {
    fn default() -> Self {
        Self::new(1000)
    }
}
