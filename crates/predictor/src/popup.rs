//! Prediction popups with timed dismissal

use crate::PredictionAlert;
use chrono::{DateTime, Utc};
use scheduler::{LoopRegistry, LoopSpec};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// How long a popup stays fully visible
pub const POPUP_VISIBLE: Duration = Duration::from_secs(8);

/// Length of the closing animation before removal
pub const POPUP_EXIT: Duration = Duration::from_millis(300);

/// Forecast horizon shown on every popup
pub const PREDICTION_HORIZON: &str = "Next 10 minutes";

/// One prediction alert as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPopup {
    pub id: Uuid,
    pub title: &'static str,
    pub alert: PredictionAlert,
    pub horizon: &'static str,
    pub shown_at: DateTime<Utc>,
}

impl PredictionPopup {
    /// Wrap an alert with a fresh id
    pub fn new(alert: PredictionAlert) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Prediction Alert",
            alert,
            horizon: PREDICTION_HORIZON,
            shown_at: Utc::now(),
        }
    }
}

/// Surface that displays prediction popups
pub trait PopupSink: Send + Sync {
    /// Display a new popup
    fn show(&self, popup: &PredictionPopup);

    /// Start the closing animation
    fn begin_close(&self, id: Uuid);

    /// Remove the popup entirely
    fn remove(&self, id: Uuid);
}

/// Shows popups and dismisses them on a timer.
///
/// The user may close a popup early; later timer callbacks for it are then
/// harmless no-ops on the sink side.
pub struct PopupPresenter {
    sink: Arc<dyn PopupSink>,
    timers: LoopRegistry,
}

impl PopupPresenter {
    /// Presenter whose dismissal timers run on `timers`
    pub fn new(sink: Arc<dyn PopupSink>, timers: LoopRegistry) -> Self {
        Self { sink, timers }
    }

    /// Show each alert as its own popup; returns the popup ids
    pub fn present(&self, alerts: Vec<PredictionAlert>) -> Vec<Uuid> {
        alerts
            .into_iter()
            .map(|alert| {
                let popup = PredictionPopup::new(alert);
                self.sink.show(&popup);
                self.schedule_dismissal(popup.id);
                popup.id
            })
            .collect()
    }

    /// Cancel pending dismissal timers; returns how many were pending
    pub fn dismiss_all(&self) -> usize {
        self.timers.stop_all()
    }

    fn schedule_dismissal(&self, id: Uuid) {
        let sink = self.sink.clone();
        self.timers.start(
            format!("popup:{id}:close"),
            LoopSpec::once_after(POPUP_VISIBLE),
            move || sink.begin_close(id),
        );

        let sink = self.sink.clone();
        self.timers.start(
            format!("popup:{id}:remove"),
            LoopSpec::once_after(POPUP_VISIBLE + POPUP_EXIT),
            move || {
                debug!("Removing prediction popup {}", id);
                sink.remove(id);
            },
        );
    }
}
