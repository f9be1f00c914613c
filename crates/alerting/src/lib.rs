//! Alerting System
//!
//! Checks each incoming reading against the live thresholds, keeps the alert
//! history, and tracks the severity of every dashboard card so that sound
//! loops only react to changes.

mod check;
mod manager;

pub use check::{check_thresholds, AlertKind, Severity, ThresholdAlert};
pub use manager::{AlertMonitor, CardSeverity, SeverityChange};
