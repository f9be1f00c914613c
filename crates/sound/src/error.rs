//! Sound Error Types

use thiserror::Error;

/// Errors from the audio path. None of these escape a playback call.
#[derive(Debug, Clone, Error)]
pub enum SoundError {
    /// No audio output could be created
    #[error("Audio output unavailable: {0}")]
    Unavailable(String),

    /// Output exists but refused to resume
    #[error("Failed to resume audio output: {0}")]
    Resume(String),

    /// Output rejected a buffer
    #[error("Playback failed: {0}")]
    Playback(String),
}
