//! Trend Predictor
//!
//! Fits a least-squares line to the most recent readings of each metric and
//! raises a prediction alert when the next step crosses a configured bound.

mod analysis;
mod popup;
mod trend;

pub use analysis::{run_predictive_analysis, Direction, PredictionAlert, MIN_HISTORY};
pub use popup::{
    PopupPresenter, PopupSink, PredictionPopup, POPUP_EXIT, POPUP_VISIBLE, PREDICTION_HORIZON,
};
pub use trend::{predict, LinearTrend, DEFAULT_PERIODS, FIT_WINDOW, MIN_POINTS};

use std::time::Duration;

/// Default time between prediction runs
pub const DEFAULT_PREDICTION_INTERVAL: Duration = Duration::from_secs(120);
