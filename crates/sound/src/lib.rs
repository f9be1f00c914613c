//! Alert Sound Engine
//!
//! Synthesizes the built-in alert timbres and heartbeat cues to PCM and plays
//! them through a lazily created audio context. Repeating cues run as keyed
//! loops on the [`scheduler::LoopRegistry`].

mod cues;
mod device;
mod engine;
mod error;
mod synth;

pub use cues::{background_interval, Cue, HeartbeatTier};
pub use device::{AudioContext, AudioOutput, DeviceState, OutputFactory, TracingOutput};
pub use engine::{AlertSoundEngine, SoundStatus};
pub use error::SoundError;
pub use synth::{render, PcmBuffer, Tone, Waveform, DEFAULT_SAMPLE_RATE};
