//! Insight Generator
//!
//! Evaluates summary statistics against the configured thresholds and turns
//! the result into short diagnostic statements for reports.

mod compliance;
mod generator;

pub use compliance::{compliance_score, recommendations, ComplianceVerdict};
pub use generator::{generate_insights, Insight, TREND_WINDOW};
