//! Dashboard facade
//!
//! Wires the threshold store, reading history, alert monitor, sound engine,
//! predictor and exporter together behind the handlers the UI calls.

use crate::notify::{Notifier, Toast, TracingNotifier, TracingPopups};
use crate::theme::{ChartHandle, Theme};
use crate::{AppConfig, DashboardError};
use alerting::{AlertKind, AlertMonitor, CardSeverity, SeverityChange};
use chrono::{NaiveDate, Utc};
use export::{ExportError, Exporter, PdfBackend, ReportData};
use insights::generate_insights;
use predictor::{run_predictive_analysis, PopupPresenter, PopupSink};
use readings::{Metric, Reading, ReadingHistory, SummaryStats};
use scheduler::{LoopRegistry, LoopSpec};
use sound::{AlertSoundEngine, AudioContext, AudioOutput, HeartbeatTier, OutputFactory, TracingOutput};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thresholds::{KeyValueStore, Preferences, SettingsForm, ThresholdConfig, ThresholdError, ThresholdStore};
use tracing::{info, warn};
use uuid::Uuid;

const PREDICTION_LOOP: &str = "prediction";

/// External surfaces the dashboard talks to
pub struct Collaborators {
    pub notifier: Arc<dyn Notifier>,
    pub popups: Arc<dyn PopupSink>,
    pub chart: Option<Arc<dyn ChartHandle>>,
    pub pdf: Option<Arc<dyn PdfBackend>>,
    pub audio: OutputFactory,
}

impl Collaborators {
    /// Log-only surfaces, no chart and no PDF backend
    pub fn headless() -> Self {
        Self {
            notifier: Arc::new(TracingNotifier),
            popups: Arc::new(TracingPopups),
            chart: None,
            pdf: None,
            audio: Box::new(|| Ok(Arc::new(TracingOutput::new()) as Arc<dyn AudioOutput>)),
        }
    }
}

/// The dashboard core
pub struct Dashboard {
    thresholds: ThresholdStore,
    preferences: Mutex<Preferences>,
    history: Arc<ReadingHistory>,
    monitor: Mutex<AlertMonitor>,
    sound: AlertSoundEngine,
    popups: Arc<PopupPresenter>,
    exporter: Exporter,
    notifier: Arc<dyn Notifier>,
    chart: Option<Arc<dyn ChartHandle>>,
    pdf: Option<Arc<dyn PdfBackend>>,
    cycle: LoopRegistry,
    prediction_interval: Duration,
    settings_open: AtomicBool,
}

impl Dashboard {
    /// Build the dashboard on the current tokio runtime
    pub fn new(config: &AppConfig, store: Arc<dyn KeyValueStore>, collaborators: Collaborators) -> Self {
        let thresholds = ThresholdStore::load(store.clone());
        let preferences = Preferences::load(store);
        let context = Arc::new(AudioContext::new(collaborators.audio, config.sample_rate));
        let sound = AlertSoundEngine::new(context, thresholds.subscribe());

        let dashboard = Self {
            thresholds,
            preferences: Mutex::new(preferences),
            history: Arc::new(ReadingHistory::new()),
            monitor: Mutex::new(AlertMonitor::new(config.alert_history_limit)),
            sound,
            popups: Arc::new(PopupPresenter::new(collaborators.popups, LoopRegistry::current())),
            exporter: Exporter::new(config.export_dir.clone()),
            notifier: collaborators.notifier,
            chart: collaborators.chart,
            pdf: collaborators.pdf,
            cycle: LoopRegistry::current(),
            prediction_interval: config.prediction_interval(),
            settings_open: AtomicBool::new(false),
        };
        dashboard.apply_theme(dashboard.theme());
        info!(
            "Dashboard ready (theme {:?}, exports in {})",
            dashboard.theme(),
            dashboard.exporter.dir().display()
        );
        dashboard
    }

    /// Current thresholds
    pub fn thresholds(&self) -> ThresholdConfig {
        self.thresholds.current()
    }

    /// Reading history shared with the ingestion path
    pub fn history(&self) -> &Arc<ReadingHistory> {
        &self.history
    }

    /// The alert sound engine
    pub fn sound(&self) -> &AlertSoundEngine {
        &self.sound
    }

    /// Active theme
    pub fn theme(&self) -> Theme {
        Theme::from_dark_mode(lock(&self.preferences).dark_mode())
    }

    /// Display severity of a metric card
    pub fn card_severity(&self, metric: Metric) -> CardSeverity {
        lock(&self.monitor).severity(metric)
    }

    /// Whether the settings panel is showing
    pub fn is_settings_open(&self) -> bool {
        self.settings_open.load(Ordering::Relaxed)
    }

    /// Flip light/dark mode, persist it, and restyle the chart
    pub fn toggle_dark_mode(&self) -> Result<Theme, DashboardError> {
        let dark = lock(&self.preferences).toggle_dark_mode()?;
        let theme = Theme::from_dark_mode(dark);
        self.apply_theme(theme);
        Ok(theme)
    }

    fn apply_theme(&self, theme: Theme) {
        if let Some(chart) = &self.chart {
            chart.apply_palette(theme.palette());
        }
    }

    /// Show the settings panel pre-filled with the current thresholds
    pub fn open_settings(&self) -> SettingsForm {
        self.settings_open.store(true, Ordering::Relaxed);
        SettingsForm::from_config(&self.thresholds.current())
    }

    /// Hide the settings panel
    pub fn close_settings(&self) {
        self.settings_open.store(false, Ordering::Relaxed);
    }

    /// Validate and store the settings form.
    ///
    /// On success the panel closes; on failure it stays open and nothing is
    /// stored.
    pub fn save_settings(&self, form: &SettingsForm) -> Result<ThresholdConfig, ThresholdError> {
        let previous = self.thresholds.current();
        match self.thresholds.apply_form(form) {
            Ok(config) => {
                self.reconcile_sound_loops(&previous, &config);
                self.close_settings();
                self.notifier.notify(Toast::success("✓ Settings saved successfully!"));
                Ok(config)
            }
            Err(e) => {
                warn!("Rejected settings: {}", e);
                self.notifier.notify(Toast::error(format!("✗ {}", e)));
                Err(e)
            }
        }
    }

    /// Restore default thresholds once the user has confirmed.
    ///
    /// Returns whether a reset happened.
    pub fn reset_settings(&self, confirmed: bool) -> Result<bool, ThresholdError> {
        if !confirmed {
            return Ok(false);
        }
        let previous = self.thresholds.current();
        self.thresholds.reset()?;
        self.reconcile_sound_loops(&previous, &self.thresholds.current());
        self.notifier.notify(Toast::success("✓ Settings reset to defaults"));
        Ok(true)
    }

    /// Bring running loops in line with new sound settings.
    ///
    /// Disabled families stop, re-enabled families start for alerting cards,
    /// and background loops restart when the timbre changes.
    fn reconcile_sound_loops(&self, previous: &ThresholdConfig, config: &ThresholdConfig) {
        let timbre_changed = previous.alert_sound != config.alert_sound;
        for metric in Metric::ALL {
            let key = metric.card_key();
            if !config.heartbeat_sound {
                self.sound.stop_loop(key);
            }
            if !config.background_alert_sound {
                self.sound.stop_background(key);
            }

            let Some(tier) = heartbeat_tier(self.card_severity(metric)) else {
                continue;
            };
            if config.heartbeat_sound && !previous.heartbeat_sound {
                self.sound.start_loop(key, tier);
            }
            if config.background_alert_sound && (timbre_changed || !previous.background_alert_sound) {
                self.sound.stop_background(key);
                self.sound.start_background(key);
            }
        }
    }

    /// Play the selected alert timbre
    pub fn test_alert_sound(&self) {
        self.sound.play_configured();
        self.notifier.notify(Toast::info("🔊 Playing selected alert sound"));
    }

    /// Play both heartbeat tiers and a short heartbeat loop
    pub fn test_heartbeat_sound(&self) {
        self.notifier.notify(Toast::info("💓 Testing heartbeat sounds..."));
        let notifier = self.notifier.clone();
        self.sound.test_heartbeat(move || {
            notifier.notify(Toast::success("💓 Heartbeat test completed"));
        });
    }

    /// First user gesture: create the audio output
    pub fn enable_audio(&self) -> bool {
        self.sound.enable_audio()
    }

    /// Append a reading and update card alerts and their sounds
    pub fn ingest(&self, reading: Reading) -> Vec<SeverityChange> {
        let config = self.thresholds.current();
        let changes = lock(&self.monitor).observe(&reading, &config);
        self.history.push(reading);
        metrics::counter!("envitrack_readings_ingested_total").increment(1);

        for change in &changes {
            self.apply_card_change(change);
        }
        changes
    }

    fn apply_card_change(&self, change: &SeverityChange) {
        let key = change.metric.card_key();
        match heartbeat_tier(change.current) {
            Some(tier) => {
                self.sound.start_loop(key, tier);
                self.sound.start_background(key);
            }
            None => {
                self.sound.stop_loop(key);
                self.sound.stop_background(key);
            }
        }
    }

    /// Export the whole history as CSV
    pub fn export_csv(&self) -> Option<PathBuf> {
        let readings = self.history.snapshot();
        match self.exporter.export_csv(&readings, today()) {
            Ok(path) => {
                self.notifier.notify(Toast::success("✓ CSV exported successfully!"));
                Some(path)
            }
            Err(ExportError::NoData) => {
                self.notifier.notify(Toast::warning("⚠️ No data available to export"));
                None
            }
            Err(e) => {
                warn!("CSV export failed: {}", e);
                self.notifier.notify(Toast::error("✗ CSV export failed"));
                None
            }
        }
    }

    /// Build and save the PDF report
    pub fn export_pdf(&self) -> Option<PathBuf> {
        let Some(backend) = self.pdf.as_deref() else {
            self.notifier.notify(Toast::warning("⚠️ PDF library not loaded"));
            return None;
        };
        self.notifier.notify(Toast::info("📄 Generating AI-powered report..."));

        let readings = self.history.snapshot();
        let stats = SummaryStats::compute(&readings);
        let insights = generate_insights(&stats, &readings, &self.thresholds.current());
        let chart = self.chart.as_ref().and_then(|chart| chart.snapshot_png());
        let data = ReportData {
            stats: &stats,
            insights: &insights,
            chart_png: chart.as_deref(),
            generated_at: Utc::now(),
        };

        match self.exporter.export_pdf(Some(backend), &data, today()) {
            Ok(path) => {
                self.notifier.notify(Toast::success("✓ AI-powered report generated!"));
                Some(path)
            }
            Err(e) => {
                warn!("PDF generation error: {}", e);
                self.notifier.notify(Toast::error("✗ PDF generation failed"));
                None
            }
        }
    }

    /// Run one prediction pass and show any alerts; returns the popup ids
    pub fn run_predictive_analysis(&self) -> Vec<Uuid> {
        let alerts = run_predictive_analysis(&self.history, &self.thresholds.current());
        self.popups.present(alerts)
    }

    /// Run predictions every configured interval, first run one interval from now
    pub fn start_prediction_cycle(&self) {
        let history = self.history.clone();
        let config = self.thresholds.subscribe();
        let popups = self.popups.clone();
        let interval = self.prediction_interval;

        self.cycle.start(
            PREDICTION_LOOP,
            LoopSpec::every(interval).after(interval),
            move || {
                let current = config.borrow().clone();
                popups.present(run_predictive_analysis(&history, &current));
            },
        );
        info!("Prediction cycle every {:?}", interval);
    }

    /// Whether the prediction cycle is running
    pub fn is_prediction_cycle_active(&self) -> bool {
        self.cycle.is_active(PREDICTION_LOOP)
    }

    /// Alerts raised so far, counted per kind
    pub fn alert_summary(&self) -> BTreeMap<AlertKind, usize> {
        lock(&self.monitor).summary()
    }

    /// Stop every loop and timer the dashboard started
    pub fn teardown(&self) {
        let sounds = self.sound.stop_all_loops();
        self.cycle.stop_all();
        self.popups.dismiss_all();

        let summary = self.alert_summary();
        if summary.is_empty() {
            info!("No alerts raised this session");
        }
        for (kind, count) in summary {
            info!("Alert summary: {} x{}", kind, count);
        }
        info!("Dashboard stopped ({} sound loops cancelled)", sounds);
    }
}

fn heartbeat_tier(severity: CardSeverity) -> Option<HeartbeatTier> {
    match severity {
        CardSeverity::Normal => None,
        CardSeverity::Warning => Some(HeartbeatTier::Warning),
        CardSeverity::Critical => Some(HeartbeatTier::Critical),
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
