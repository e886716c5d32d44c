//! Speech-to-text and audio transcoding types.
//!
//! Transcription outcomes are a tagged type rather than exception control
//! flow: a recognizer that hears nothing usable is a normal outcome
//! ([`Transcript::Unintelligible`]), not an error. Only a failure of the
//! service itself is an error.

use thiserror::Error;

/// Outcome of a successful round-trip to the speech-to-text service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    /// The recognizer produced text.
    Text(String),
    /// The audio reached the service but could not be understood.
    Unintelligible,
}

/// Errors from the speech-to-text service.
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("speech recognition service error: {0}")]
    Service(String),
}

/// Errors from converting a compressed voice message into waveform audio.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("audio transcoder failed: {0}")]
    Failed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
