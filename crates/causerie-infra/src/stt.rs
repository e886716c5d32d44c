//! HTTP speech-to-text client.
//!
//! Talks to a Whisper-style `audio/transcriptions` endpoint: the waveform
//! audio goes up as a multipart file with the model name, language tag, and
//! `response_format=text`, and the transcription comes back as the plain
//! response body. The API key is service-level configuration -- it is not
//! the per-user model credential, because transcription runs before the
//! credential precondition is checked.

use causerie_core::transcribe::SpeechTranscriber;
use causerie_types::transcribe::{TranscribeError, Transcript};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use std::time::Duration;

/// Speech-to-text client for a Whisper-compatible HTTP API.
pub struct HttpTranscriber {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpTranscriber {
    /// Build a transcriber against `{api_base}/audio/transcriptions`.
    ///
    /// An empty `api_key` sends no Authorization header (for keyless local
    /// deployments).
    pub fn new(
        api_base: &str,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TranscribeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TranscribeError::Service(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            endpoint: format!("{}/audio/transcriptions", api_base.trim_end_matches('/')),
            model: model.into(),
            api_key: api_key.into(),
        })
    }
}

impl SpeechTranscriber for HttpTranscriber {
    async fn transcribe(&self, wav: &[u8], language: &str) -> Result<Transcript, TranscribeError> {
        debug!("transcribing {} bytes of wav audio", wav.len());

        let part = Part::bytes(wav.to_vec())
            .file_name("voice.wav")
            .mime_str("audio/wav")
            .map_err(|err| TranscribeError::Service(err.to_string()))?;

        let form = Form::new()
            .text("model", self.model.clone())
            .text("language", language.to_string())
            .text("response_format", "text")
            .part("file", part);

        let mut request = self.http.post(&self.endpoint).multipart(form);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| TranscribeError::Service(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TranscribeError::Service(err.to_string()))?;

        interpret_response(status, &body)
    }
}

/// Turn the raw HTTP outcome into a [`Transcript`].
///
/// A success with an empty body means the recognizer heard nothing usable.
fn interpret_response(status: StatusCode, body: &str) -> Result<Transcript, TranscribeError> {
    if !status.is_success() {
        let detail: String = body.trim().chars().take(240).collect();
        return Err(TranscribeError::Service(format!("{status}: {detail}")));
    }

    let text = body.trim();
    if text.is_empty() {
        Ok(Transcript::Unintelligible)
    } else {
        Ok(Transcript::Text(text.to_string()))
    }
}
