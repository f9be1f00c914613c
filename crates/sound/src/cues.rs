//! Cue recipes

use crate::synth::{Tone, Waveform};
use std::time::Duration;
use thresholds::AlertSound;

/// Bell fundamental (Hz)
const BELL_FUNDAMENTAL: f64 = 800.0;

/// Harmonic multiples layered over the bell fundamental
const BELL_HARMONICS: [u32; 4] = [2, 3, 4, 5];

/// Number of back-to-back siren sweeps
const SIREN_SWEEPS: usize = 2;

/// Chime notes: C5, E5, G5
const CHIME_NOTES: [f64; 3] = [523.25, 659.25, 783.99];

/// Heartbeat loop tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeartbeatTier {
    Warning,
    Critical,
}

impl HeartbeatTier {
    /// Loop period for this tier
    pub fn period(&self) -> Duration {
        match self {
            HeartbeatTier::Warning => Duration::from_secs(2),
            HeartbeatTier::Critical => Duration::from_secs(1),
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            HeartbeatTier::Warning => "warning",
            HeartbeatTier::Critical => "critical",
        }
    }
}

/// Repeat period of a background alert loop for the configured timbre
pub fn background_interval(sound: AlertSound) -> Duration {
    match sound {
        AlertSound::Siren | AlertSound::Chime => Duration::from_secs(2),
        AlertSound::Bell | AlertSound::Default => Duration::from_secs(3),
    }
}

/// Something the engine can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Alert(AlertSound),
    Heartbeat(HeartbeatTier),
}

impl Cue {
    /// Metric label for this cue
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Alert(AlertSound::Default) => "default",
            Cue::Alert(AlertSound::Chime) => "chime",
            Cue::Alert(AlertSound::Bell) => "bell",
            Cue::Alert(AlertSound::Siren) => "siren",
            Cue::Heartbeat(HeartbeatTier::Warning) => "heartbeat_warning",
            Cue::Heartbeat(HeartbeatTier::Critical) => "heartbeat_critical",
        }
    }

    /// Oscillators making up the cue
    pub fn tones(&self) -> Vec<Tone> {
        match self {
            Cue::Alert(AlertSound::Default) => vec![
                Tone::new(Waveform::Sine, 900.0, 0.3, 0.3),
                Tone::new(Waveform::Sine, 700.0, 0.3, 0.3).at(0.2),
            ],
            Cue::Alert(AlertSound::Chime) => CHIME_NOTES
                .iter()
                .enumerate()
                .map(|(i, &hz)| Tone::new(Waveform::Sine, hz, 0.5, 0.2).at(i as f64 * 0.1))
                .collect(),
            Cue::Alert(AlertSound::Bell) => {
                let mut tones = vec![Tone::new(Waveform::Triangle, BELL_FUNDAMENTAL, 1.0, 0.4)];
                tones.extend(BELL_HARMONICS.iter().map(|&k| {
                    let k = k as f64;
                    Tone::new(Waveform::Sine, BELL_FUNDAMENTAL * k, 1.0 / k, 0.4 / k)
                }));
                tones
            }
            Cue::Alert(AlertSound::Siren) => (0..SIREN_SWEEPS)
                .map(|i| {
                    Tone::new(Waveform::Sawtooth, 400.0, 1.0, 0.3)
                        .ramp_to(1200.0, 0.5)
                        .ramp_to(400.0, 1.0)
                        .at(i as f64)
                })
                .collect(),
            Cue::Heartbeat(HeartbeatTier::Warning) => vec![
                Tone::new(Waveform::Sine, 400.0, 0.1, 0.15),
                Tone::new(Waveform::Sine, 350.0, 0.08, 0.12).at(0.2),
            ],
            Cue::Heartbeat(HeartbeatTier::Critical) => vec![
                Tone::new(Waveform::Sine, 500.0, 0.12, 0.2),
                Tone::new(Waveform::Sine, 450.0, 0.1, 0.18).at(0.2),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_shapes() {
        assert_eq!(Cue::Alert(AlertSound::Default).tones().len(), 2);
        assert_eq!(Cue::Alert(AlertSound::Chime).tones().len(), 3);
        assert_eq!(Cue::Alert(AlertSound::Bell).tones().len(), 5);
        assert_eq!(Cue::Alert(AlertSound::Siren).tones().len(), SIREN_SWEEPS);

        let chime = Cue::Alert(AlertSound::Chime).tones();
        assert!(chime.windows(2).all(|w| w[0].frequency[0].1 < w[1].frequency[0].1));

        let siren = Cue::Alert(AlertSound::Siren).tones();
        assert!(siren.iter().all(|t| t.waveform == Waveform::Sawtooth));
    }

    #[test]
    fn test_bell_harmonics_decay() {
        let bell = Cue::Alert(AlertSound::Bell).tones();
        for pair in bell.windows(2) {
            assert!(pair[1].gain < pair[0].gain);
            assert!(pair[1].duration <= pair[0].duration);
        }
    }

    #[test]
    fn test_intervals() {
        assert_eq!(HeartbeatTier::Warning.period(), Duration::from_secs(2));
        assert_eq!(HeartbeatTier::Critical.period(), Duration::from_secs(1));
        assert_eq!(background_interval(AlertSound::Siren), Duration::from_secs(2));
        assert_eq!(background_interval(AlertSound::Chime), Duration::from_secs(2));
        assert_eq!(background_interval(AlertSound::Bell), Duration::from_secs(3));
        assert_eq!(background_interval(AlertSound::Default), Duration::from_secs(3));
    }
}
