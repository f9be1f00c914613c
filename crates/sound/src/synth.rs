//! Oscillator synthesis
//!
//! Tones are described the way an oscillator/gain graph would schedule them:
//! a waveform, a start offset, an exponential gain decay, and optional
//! exponential frequency ramps. [`render`] mixes them into one mono buffer.

use std::f64::consts::TAU;
use std::time::Duration;

/// Default output sample rate (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Level every tone decays to by the end of its duration
const GAIN_FLOOR: f64 = 0.01;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Sample the waveform at `phase` cycles
    fn sample(&self, phase: f64) -> f64 {
        let p = phase.fract();
        match self {
            Waveform::Sine => (TAU * p).sin(),
            Waveform::Triangle => 4.0 * (p - 0.5).abs() - 1.0,
            Waveform::Sawtooth => 2.0 * p - 1.0,
        }
    }
}

/// One scheduled oscillator
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Offset from the start of the cue (seconds)
    pub start: f64,
    /// Length (seconds)
    pub duration: f64,
    /// Initial gain; decays exponentially to 0.01
    pub gain: f64,
    /// Frequency breakpoints `(seconds from tone start, Hz)`, ramped exponentially
    pub frequency: Vec<(f64, f64)>,
}

impl Tone {
    /// Fixed-pitch tone starting at the beginning of the cue
    pub fn new(waveform: Waveform, hz: f64, duration: f64, gain: f64) -> Self {
        Self {
            waveform,
            start: 0.0,
            duration,
            gain,
            frequency: vec![(0.0, hz)],
        }
    }

    /// Shift the tone later in the cue
    pub fn at(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    /// Add an exponential ramp reaching `hz` at `time` seconds into the tone
    pub fn ramp_to(mut self, hz: f64, time: f64) -> Self {
        self.frequency.push((time, hz));
        self
    }

    /// End of the tone relative to the cue start
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    fn gain_at(&self, t: f64) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        let progress = (t / self.duration).clamp(0.0, 1.0);
        self.gain * (GAIN_FLOOR / self.gain).powf(progress)
    }

    fn frequency_at(&self, t: f64) -> f64 {
        let points = &self.frequency;
        let Some(&(_, first)) = points.first() else {
            return 0.0;
        };
        let mut current = first;
        for window in points.windows(2) {
            let (t0, f0) = window[0];
            let (t1, f1) = window[1];
            if t <= t0 {
                return f0;
            }
            if t < t1 && t1 > t0 {
                let progress = (t - t0) / (t1 - t0);
                return f0 * (f1 / f0).powf(progress);
            }
            current = f1;
        }
        current
    }
}

/// Mono PCM audio
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl PcmBuffer {
    /// Playback length
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }
}

/// Mix tones into one buffer, clamped to [-1, 1]
pub fn render(tones: &[Tone], sample_rate: u32) -> PcmBuffer {
    let sr = sample_rate as f64;
    let length = tones.iter().map(Tone::end).fold(0.0, f64::max);
    let total = (length * sr).ceil() as usize;
    let mut mix = vec![0.0f64; total];

    for tone in tones {
        let first = (tone.start * sr).round() as usize;
        let count = (tone.duration * sr).round() as usize;
        let mut phase = 0.0;
        for i in 0..count {
            let Some(slot) = mix.get_mut(first + i) else {
                break;
            };
            let t = i as f64 / sr;
            *slot += tone.waveform.sample(phase) * tone.gain_at(t);
            phase += tone.frequency_at(t) / sr;
        }
    }

    PcmBuffer {
        sample_rate,
        samples: mix.into_iter().map(|s| s.clamp(-1.0, 1.0) as f32).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_ranges() {
        for waveform in [Waveform::Sine, Waveform::Triangle, Waveform::Sawtooth] {
            for i in 0..100 {
                let s = waveform.sample(i as f64 / 100.0);
                assert!((-1.0..=1.0).contains(&s), "{waveform:?} out of range: {s}");
            }
        }
    }

    #[test]
    fn test_gain_decays_to_floor() {
        let tone = Tone::new(Waveform::Sine, 900.0, 0.3, 0.3);
        assert!((tone.gain_at(0.0) - 0.3).abs() < 1e-9);
        assert!((tone.gain_at(0.3) - 0.01).abs() < 1e-9);
        assert!(tone.gain_at(0.15) < 0.3 && tone.gain_at(0.15) > 0.01);
    }

    #[test]
    fn test_exponential_sweep() {
        let tone = Tone::new(Waveform::Sawtooth, 400.0, 1.0, 0.3)
            .ramp_to(1200.0, 0.5)
            .ramp_to(400.0, 1.0);
        assert!((tone.frequency_at(0.0) - 400.0).abs() < 1e-6);
        assert!((tone.frequency_at(0.5) - 1200.0).abs() < 1e-6);
        assert!((tone.frequency_at(1.0) - 400.0).abs() < 1e-6);
        // geometric midpoint of 400 and 1200
        assert!((tone.frequency_at(0.25) - (400.0f64 * 1200.0).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_render_length_covers_offsets() {
        let tones = vec![
            Tone::new(Waveform::Sine, 900.0, 0.3, 0.3),
            Tone::new(Waveform::Sine, 700.0, 0.3, 0.3).at(0.2),
        ];
        let buffer = render(&tones, 1_000);
        assert_eq!(buffer.samples.len(), 500);
        assert!(buffer.peak() <= 1.0);
        assert!(buffer.peak() > 0.0);
        assert_eq!(buffer.duration(), Duration::from_millis(500));
    }
}
