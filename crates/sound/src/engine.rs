//! Alert Sound Engine Implementation

use crate::cues::{background_interval, Cue, HeartbeatTier};
use crate::device::{AudioContext, DeviceState};
use crate::synth::render;
use scheduler::{LoopRegistry, LoopSpec};
use std::sync::Arc;
use std::time::Duration;
use thresholds::{AlertSound, ThresholdConfig};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Heartbeat test: delay before the critical cue
const TEST_CRITICAL_DELAY: Duration = Duration::from_secs(2);

/// Heartbeat test: total length of the temporary warning loop
const TEST_LOOP_LENGTH: Duration = Duration::from_secs(10);

const TEST_LOOP_KEY: &str = "heartbeat-test";
const TEST_CRITICAL_KEY: &str = "heartbeat-test:critical";
const TEST_DONE_KEY: &str = "heartbeat-test:done";

/// Snapshot for debugging the sound state
#[derive(Debug, Clone)]
pub struct SoundStatus {
    /// Keys with an active heartbeat loop
    pub heartbeat_loops: Vec<String>,
    /// Keys with an active background alert loop
    pub background_loops: Vec<String>,
    /// Preferences the engine is reading
    pub preferences: ThresholdConfig,
    /// Audio output state, `None` before the first user gesture
    pub device: Option<DeviceState>,
}

/// Plays alert cues and runs the heartbeat and background loop families
pub struct AlertSoundEngine {
    /// Shared audio output
    context: Arc<AudioContext>,
    /// Live threshold configuration
    config: watch::Receiver<ThresholdConfig>,
    /// Heartbeat loops by card key
    heartbeats: LoopRegistry,
    /// Background alert loops by card key
    backgrounds: LoopRegistry,
}

impl AlertSoundEngine {
    /// Create an engine; loops are spawned on the current tokio runtime
    pub fn new(context: Arc<AudioContext>, config: watch::Receiver<ThresholdConfig>) -> Self {
        Self {
            context,
            config,
            heartbeats: LoopRegistry::current(),
            backgrounds: LoopRegistry::current(),
        }
    }

    /// Initialize the audio output (first user gesture). Safe to call repeatedly.
    pub fn enable_audio(&self) -> bool {
        self.context.get().is_ok()
    }

    /// Play one of the built-in timbres
    pub fn play_alert(&self, sound: AlertSound) {
        play_cue(&self.context, Cue::Alert(sound));
    }

    /// Play the timbre currently selected in the settings
    pub fn play_configured(&self) {
        let sound = self.config.borrow().alert_sound;
        self.play_alert(sound);
    }

    /// Start the heartbeat loop for `key`, replacing any heartbeat already
    /// running there. Returns `false` when heartbeat sounds are disabled.
    pub fn start_loop(&self, key: &str, tier: HeartbeatTier) -> bool {
        if !self.config.borrow().heartbeat_sound {
            debug!("Heartbeat sound disabled in settings");
            return false;
        }
        info!("Starting {} heartbeat for {}", tier.as_str(), key);
        let context = self.context.clone();
        self.heartbeats.start(key, LoopSpec::every(tier.period()), move || {
            play_cue(&context, Cue::Heartbeat(tier));
        });
        true
    }

    /// Stop the heartbeat loop for `key`
    pub fn stop_loop(&self, key: &str) -> bool {
        let stopped = self.heartbeats.stop(key);
        if stopped {
            info!("Stopping heartbeat sound for {}", key);
        }
        stopped
    }

    /// Start the background alert loop for `key` using the configured timbre.
    ///
    /// Does nothing when background alerts are disabled or a background loop
    /// is already running for `key`.
    pub fn start_background(&self, key: &str) -> bool {
        let (enabled, sound) = {
            let config = self.config.borrow();
            (config.background_alert_sound, config.alert_sound)
        };
        if !enabled {
            debug!("Background alert sound disabled in settings");
            return false;
        }
        let context = self.context.clone();
        let started = self.backgrounds.start_if_idle(
            key,
            LoopSpec::every(background_interval(sound)),
            move || play_cue(&context, Cue::Alert(sound)),
        );
        if started {
            info!("Starting background {} alert for {}", sound, key);
        }
        started
    }

    /// Stop the background alert loop for `key`
    pub fn stop_background(&self, key: &str) -> bool {
        let stopped = self.backgrounds.stop(key);
        if stopped {
            info!("Stopping background alert for {}", key);
        }
        stopped
    }

    /// Cancel every heartbeat and background loop
    pub fn stop_all_loops(&self) -> usize {
        self.heartbeats.stop_all() + self.backgrounds.stop_all()
    }

    /// Whether a heartbeat loop is running for `key`
    pub fn is_heartbeat_active(&self, key: &str) -> bool {
        self.heartbeats.is_active(key)
    }

    /// Whether a background alert loop is running for `key`
    pub fn is_background_active(&self, key: &str) -> bool {
        self.backgrounds.is_active(key)
    }

    /// Number of running loops across both families
    pub fn active_loop_count(&self) -> usize {
        self.heartbeats.active_count() + self.backgrounds.active_count()
    }

    /// Play both heartbeat tiers and a short warning loop.
    ///
    /// Warning cue now, critical cue after 2 s, a warning cue every 2 s
    /// for 10 s, then `on_complete` runs.
    pub fn test_heartbeat<F>(&self, on_complete: F)
    where
        F: FnOnce() + Send + 'static,
    {
        info!("Testing heartbeat sounds");
        play_cue(&self.context, Cue::Heartbeat(HeartbeatTier::Warning));

        let context = self.context.clone();
        self.heartbeats.start(
            TEST_CRITICAL_KEY,
            LoopSpec::once_after(TEST_CRITICAL_DELAY),
            move || play_cue(&context, Cue::Heartbeat(HeartbeatTier::Critical)),
        );

        let period = HeartbeatTier::Warning.period();
        let repeats = (TEST_LOOP_LENGTH.as_millis() / period.as_millis()).saturating_sub(1) as u64;
        let context = self.context.clone();
        self.heartbeats.start(
            TEST_LOOP_KEY,
            LoopSpec::every(period).after(period).times(repeats),
            move || play_cue(&context, Cue::Heartbeat(HeartbeatTier::Warning)),
        );

        let mut on_complete = Some(on_complete);
        self.heartbeats.start(TEST_DONE_KEY, LoopSpec::once_after(TEST_LOOP_LENGTH), move || {
            if let Some(done) = on_complete.take() {
                done();
            }
        });
    }

    /// Active loops, preferences, and device state
    pub fn debug_status(&self) -> SoundStatus {
        SoundStatus {
            heartbeat_loops: self.heartbeats.active_keys(),
            background_loops: self.backgrounds.active_keys(),
            preferences: self.config.borrow().clone(),
            device: self.context.state(),
        }
    }
}

/// Render and play a cue; failures are logged and swallowed
fn play_cue(context: &AudioContext, cue: Cue) {
    let output = match context.get() {
        Ok(output) => output,
        Err(e) => {
            debug!("Skipping {} cue: {}", cue.name(), e);
            return;
        }
    };
    let buffer = render(&cue.tones(), context.sample_rate());
    match output.play(&buffer) {
        Ok(()) => {
            metrics::counter!("envitrack_sound_cues_total", "cue" => cue.name()).increment(1);
            debug!("Played {} cue", cue.name());
        }
        Err(e) => warn!("Alert sound error ({}): {}", cue.name(), e),
    }
}
