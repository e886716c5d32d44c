//! ffmpeg audio transcoder.
//!
//! Voice messages arrive as opus in an ogg container; the speech-to-text
//! service wants 16 kHz mono wav. The conversion shells out to ffmpeg inside
//! a temporary scratch directory, which is removed when it goes out of scope
//! -- on every exit path, success or failure.

use causerie_core::transcribe::AudioTranscoder;
use causerie_types::transcribe::TranscodeError;
use tokio::process::Command;
use tracing::debug;

use std::path::PathBuf;

/// Target sample rate for the speech recognizer.
const SAMPLE_RATE: &str = "16000";

/// Audio transcoder that shells out to ffmpeg.
pub struct FfmpegTranscoder {
    ffmpeg: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }
}

impl AudioTranscoder for FfmpegTranscoder {
    async fn to_wav(&self, audio: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("voice.ogg");
        let output = scratch.path().join("voice.wav");

        tokio::fs::write(&input, audio).await?;

        let result = Command::new(&self.ffmpeg)
            .arg("-y")
            .arg("-i")
            .arg(&input)
            .arg("-ar")
            .arg(SAMPLE_RATE)
            .arg("-ac")
            .arg("1")
            .arg(&output)
            .output()
            .await?;

        if !result.status.success() {
            let stderr: String = String::from_utf8_lossy(&result.stderr)
                .trim()
                .chars()
                .take(240)
                .collect();
            return Err(TranscodeError::Failed(stderr));
        }

        let wav = tokio::fs::read(&output).await?;
        debug!(
            "transcoded {} ogg bytes to {} wav bytes",
            audio.len(),
            wav.len()
        );
        Ok(wav)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_an_error_not_a_panic() {
        let transcoder = FfmpegTranscoder::new("/nonexistent/ffmpeg-binary");
        let err = transcoder.to_wav(&[0u8; 16]).await.unwrap_err();
        assert!(matches!(err, TranscodeError::Io(_)));
    }
}
