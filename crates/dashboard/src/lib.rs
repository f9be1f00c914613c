//! EnviTrack Dashboard
//!
//! Application layer over the threshold store, alert sounds, trend
//! predictions and exports. UI surfaces (toasts, popups, the chart, the PDF
//! writer, the audio device) are supplied by the host through traits.

mod app;
mod config;
mod error;
mod logging;
mod notify;
mod theme;

pub use app::{Collaborators, Dashboard};
pub use config::{AppConfig, DEFAULT_CONFIG_FILE};
pub use error::DashboardError;
pub use logging::init_logging;
pub use notify::{Notifier, Toast, ToastKind, TracingNotifier, TracingPopups, TOAST_DURATION};
pub use theme::{ChartHandle, ChartPalette, Theme};
