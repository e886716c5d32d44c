//! Speech-to-text and audio transcoding trait definitions.

use causerie_types::transcribe::{TranscodeError, TranscribeError, Transcript};

/// Trait for the speech-to-text backend.
///
/// Takes waveform audio and a spoken-language tag; a recognizer that cannot
/// make out the words returns `Ok(Transcript::Unintelligible)`, while a
/// failure of the service itself is an `Err`.
///
/// Implementations live in causerie-infra (e.g., `HttpTranscriber`).
pub trait SpeechTranscriber: Send + Sync {
    fn transcribe(
        &self,
        wav: &[u8],
        language: &str,
    ) -> impl std::future::Future<Output = Result<Transcript, TranscribeError>> + Send;
}

/// Trait for converting a compressed voice-message buffer (opus in an ogg
/// container, as delivered by the messaging platform) into the waveform
/// format the speech-to-text backend expects.
pub trait AudioTranscoder: Send + Sync {
    fn to_wav(
        &self,
        audio: &[u8],
    ) -> impl std::future::Future<Output = Result<Vec<u8>, TranscodeError>> + Send;
}
