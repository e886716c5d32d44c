//! Global configuration types for Causerie.
//!
//! `BotConfig` represents the top-level `config.toml` that controls the
//! model, language, and I/O settings. All fields have sensible defaults, so
//! an empty (or absent) file is valid. Secrets -- the Telegram bot token and
//! the transcription API key -- are never part of this file; they arrive via
//! environment variables at process start.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the bot.
///
/// Loaded from `{data_dir}/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Chat model identifier sent to the gateway.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible chat completion API.
    #[serde(default = "default_chat_api_base")]
    pub chat_api_base: String,

    /// Base URL of the Whisper-style transcription API.
    #[serde(default = "default_stt_api_base")]
    pub stt_api_base: String,

    /// Transcription model identifier.
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Spoken language for voice messages (ISO 639-1 tag, e.g. "fr").
    #[serde(default = "default_language")]
    pub language: String,

    /// Maximum number of turns kept per chat. Oldest exchanges are trimmed
    /// in whole user/assistant pairs. 0 disables the cap.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Timeout for outbound HTTP calls (chat and transcription), in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Path of the ffmpeg binary used to transcode voice messages.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// Filename of the persisted credential store, relative to the data dir.
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
}

fn default_model() -> String {
    "llama3-8b-8192".to_string()
}

fn default_chat_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_stt_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_stt_model() -> String {
    "whisper-large-v3".to_string()
}

fn default_language() -> String {
    "fr".to_string()
}

fn default_history_limit() -> usize {
    64
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_credentials_file() -> String {
    "user_api_keys.json".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            chat_api_base: default_chat_api_base(),
            stt_api_base: default_stt_api_base(),
            stt_model: default_stt_model(),
            language: default_language(),
            history_limit: default_history_limit(),
            request_timeout_secs: default_request_timeout_secs(),
            ffmpeg_path: default_ffmpeg_path(),
            credentials_file: default_credentials_file(),
        }
    }
}
