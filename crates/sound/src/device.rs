//! Audio output and the shared audio context

use crate::{PcmBuffer, SoundError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Run state of an audio output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Running,
    Suspended,
    Closed,
}

/// A sink that can play PCM buffers
pub trait AudioOutput: Send + Sync {
    /// Current run state
    fn state(&self) -> DeviceState;

    /// Bring a suspended output back to running
    fn resume(&self) -> Result<(), SoundError>;

    /// Queue a buffer for playback
    fn play(&self, buffer: &PcmBuffer) -> Result<(), SoundError>;
}

/// Creates the audio output on first use
pub type OutputFactory = Box<dyn Fn() -> Result<Arc<dyn AudioOutput>, SoundError> + Send + Sync>;

/// The single shared audio output.
///
/// The output is created lazily on the first call to [`AudioContext::get`]
/// and reused afterwards. Every access resumes a suspended output.
pub struct AudioContext {
    factory: OutputFactory,
    output: Mutex<Option<Arc<dyn AudioOutput>>>,
    sample_rate: u32,
    unavailable_reported: AtomicBool,
}

impl AudioContext {
    /// Create a context that will build its output with `factory`
    pub fn new(factory: OutputFactory, sample_rate: u32) -> Self {
        Self {
            factory,
            output: Mutex::new(None),
            sample_rate,
            unavailable_reported: AtomicBool::new(false),
        }
    }

    /// Sample rate cues are rendered at
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Whether the output has been created
    pub fn is_initialized(&self) -> bool {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// State of the output, if created
    pub fn state(&self) -> Option<DeviceState> {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|output| output.state())
    }

    /// Get the output, creating it on first use and resuming it if suspended
    pub fn get(&self) -> Result<Arc<dyn AudioOutput>, SoundError> {
        let mut slot = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        let output = match slot.as_ref() {
            Some(output) => output.clone(),
            None => match (self.factory)() {
                Ok(output) => {
                    info!("Audio context initialized ({} Hz)", self.sample_rate);
                    *slot = Some(output.clone());
                    output
                }
                Err(e) => {
                    if !self.unavailable_reported.swap(true, Ordering::Relaxed) {
                        warn!("Audio not supported: {}", e);
                    }
                    return Err(e);
                }
            },
        };
        drop(slot);

        if output.state() == DeviceState::Suspended {
            debug!("Resuming suspended audio output");
            if let Err(e) = output.resume() {
                warn!("{}", e);
            }
        }
        Ok(output)
    }
}

/// Output that logs buffers instead of sending them to hardware
#[derive(Debug)]
pub struct TracingOutput {
    suspended: AtomicBool,
    played: AtomicUsize,
}

impl TracingOutput {
    /// A running output
    pub fn new() -> Self {
        Self {
            suspended: AtomicBool::new(false),
            played: AtomicUsize::new(0),
        }
    }

    /// An output that starts suspended, like a browser audio context before
    /// the first user gesture
    pub fn suspended() -> Self {
        Self {
            suspended: AtomicBool::new(true),
            played: AtomicUsize::new(0),
        }
    }

    /// Number of buffers played so far
    pub fn played(&self) -> usize {
        self.played.load(Ordering::SeqCst)
    }

    /// Force the output into the suspended state
    pub fn suspend(&self) {
        self.suspended.store(true, Ordering::SeqCst);
    }
}

impl Default for TracingOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for TracingOutput {
    fn state(&self) -> DeviceState {
        if self.suspended.load(Ordering::SeqCst) {
            DeviceState::Suspended
        } else {
            DeviceState::Running
        }
    }

    fn resume(&self) -> Result<(), SoundError> {
        self.suspended.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn play(&self, buffer: &PcmBuffer) -> Result<(), SoundError> {
        if self.state() != DeviceState::Running {
            return Err(SoundError::Playback("output is suspended".to_string()));
        }
        self.played.fetch_add(1, Ordering::SeqCst);
        debug!(
            "Playing {} samples ({:?}, peak {:.2})",
            buffer.samples.len(),
            buffer.duration(),
            buffer.peak()
        );
        Ok(())
    }
}
