//! Application state wiring all services together.
//!
//! The core dispatcher is generic over its ports; `AppState` pins it to the
//! concrete infra implementations and owns the wired instance. No globals:
//! everything the handlers touch hangs off this struct.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use causerie_core::conversation::ConversationState;
use causerie_core::credential::CredentialStore;
use causerie_core::dispatcher::Dispatcher;
use causerie_infra::audio::FfmpegTranscoder;
use causerie_infra::credential::JsonCredentialRepository;
use causerie_infra::llm::GroqGateway;
use causerie_infra::stt::HttpTranscriber;
use causerie_types::config::BotConfig;

/// The dispatcher generics pinned to the infra implementations.
pub type ConcreteDispatcher =
    Dispatcher<JsonCredentialRepository, GroqGateway, HttpTranscriber, FfmpegTranscoder>;

/// Shared application state handed to every update handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ConcreteDispatcher>,
}

impl AppState {
    /// Wire the services: load persisted credentials, build the gateways.
    pub async fn init(
        config: BotConfig,
        data_dir: PathBuf,
        stt_api_key: String,
    ) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let credentials_path = data_dir.join(&config.credentials_file);
        let credentials = Arc::new(
            CredentialStore::load(JsonCredentialRepository::new(credentials_path)).await,
        );
        let conversations = Arc::new(ConversationState::new(config.history_limit));

        let timeout = Duration::from_secs(config.request_timeout_secs);
        let gateway = GroqGateway::new(&config.chat_api_base, &config.model, timeout);
        let transcriber =
            HttpTranscriber::new(&config.stt_api_base, &config.stt_model, stt_api_key, timeout)?;
        let transcoder = FfmpegTranscoder::new(&config.ffmpeg_path);

        let dispatcher = Dispatcher::new(
            credentials,
            conversations,
            gateway,
            transcriber,
            transcoder,
            config.language.clone(),
        );

        Ok(Self {
            dispatcher: Arc::new(dispatcher),
        })
    }
}
