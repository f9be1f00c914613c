//! User-facing toasts and popups

use predictor::{PopupSink, PredictionPopup};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Toast style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A short transient message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, message)
    }

    fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Displays toasts for [`TOAST_DURATION`]
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Notifier that writes toasts to the log
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Info | ToastKind::Success => info!(target: "toast", "{}", toast.message),
            ToastKind::Warning => warn!(target: "toast", "{}", toast.message),
            ToastKind::Error => error!(target: "toast", "{}", toast.message),
        }
    }
}

/// Popup surface that writes prediction popups to the log
#[derive(Debug, Default)]
pub struct TracingPopups;

impl PopupSink for TracingPopups {
    fn show(&self, popup: &PredictionPopup) {
        warn!(
            target: "popup",
            id = %popup.id,
            "{}: {}. {} ({})",
            popup.title,
            popup.alert.description(),
            popup.alert.predicted_text(),
            popup.horizon
        );
    }

    fn begin_close(&self, _id: Uuid) {}

    fn remove(&self, id: Uuid) {
        debug!(target: "popup", id = %id, "Popup dismissed");
    }
}
