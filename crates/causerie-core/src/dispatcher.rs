//! Event dispatcher orchestrating credentials, conversation state, and the
//! external gateways.
//!
//! Each inbound event produces a list of outbound replies -- one reply per
//! event, except voice messages which may produce a transcription status
//! reply followed by the answer. The dispatcher itself never fails: every
//! fault from a collaborator is converted into a user-visible reply, so the
//! platform loop keeps running no matter what the external services do.
//!
//! Generic over the four ports so the core stays independent of the
//! infrastructure layer and the whole flow is testable with mocks.

use causerie_types::credential::CredentialError;
use causerie_types::identity::{ChatId, UserId};
use causerie_types::transcribe::{TranscribeError, Transcript};
use tracing::{error, info, warn};

use std::sync::Arc;

use crate::conversation::ConversationState;
use crate::credential::{CredentialRepository, CredentialStore};
use crate::gateway::ChatGateway;
use crate::transcribe::{AudioTranscoder, SpeechTranscriber};

/// Fixed user-facing vocabulary. The bot speaks French.
pub mod messages {
    pub const MENU_PROMPT: &str = "Bonjour! Choisissez une commande:";
    pub const KEY_SAVED: &str = "Votre clé API a été enregistrée avec succès.";
    pub const KEY_INVALID: &str = "Veuillez fournir une clé API valide.";
    pub const GREETING: &str =
        "Bonjour! Je suis prêt à répondre à vos questions. Quel est votre premier question?";
    pub const NEED_KEY: &str =
        "Vous devez d'abord définir votre clé API avec la commande /setapikey <votre-cle-api>.";
    pub const SET_KEY_HINT: &str =
        "Envoyez /setapikey <votre-cle-api> pour enregistrer votre clé.";
    pub const TRANSCRIPT_PREFIX: &str = "Transcription : ";
    pub const UNINTELLIGIBLE: &str = "Je n'ai pas pu comprendre l'audio.";
    pub const STT_ERROR_PREFIX: &str = "Erreur de service de reconnaissance vocale: ";
    pub const GATEWAY_ERROR: &str =
        "Une erreur est survenue lors de l'appel au modèle. Veuillez réessayer plus tard.";
    pub const SOMETHING_WRONG: &str = "Une erreur est survenue. Veuillez réessayer plus tard.";
}

/// One inbound event from the messaging platform.
#[derive(Debug, Clone)]
pub enum Event {
    /// `/start` command or the Start menu button.
    Start,
    /// `/setapikey <key>` command.
    SetCredential { key: String },
    /// `/groq` command or the Groq menu button.
    BeginConversation,
    /// Free-text message.
    TextQuestion { text: String },
    /// Voice message payload (opus/ogg bytes as downloaded from the platform).
    VoiceMessage { audio: Vec<u8> },
}

/// An action offered on the start menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    SetApiKey,
    BeginConversation,
}

impl MenuAction {
    pub const ALL: [MenuAction; 3] = [
        MenuAction::Start,
        MenuAction::SetApiKey,
        MenuAction::BeginConversation,
    ];

    /// Button label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Start => "Start",
            MenuAction::SetApiKey => "Set API Key",
            MenuAction::BeginConversation => "Groq",
        }
    }

    /// Stable callback payload carried by the button.
    pub fn data(&self) -> &'static str {
        match self {
            MenuAction::Start => "start",
            MenuAction::SetApiKey => "setapikey",
            MenuAction::BeginConversation => "groq",
        }
    }

    /// Parse a callback payload back into an action.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "start" => Some(MenuAction::Start),
            "setapikey" => Some(MenuAction::SetApiKey),
            "groq" => Some(MenuAction::BeginConversation),
            _ => None,
        }
    }
}

/// One outbound reply to the chat the event came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text message.
    Text(String),
    /// Text message with an inline action menu attached.
    Menu {
        text: String,
        actions: Vec<MenuAction>,
    },
}

impl Reply {
    fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }
}

/// Routes one inbound event to the right handler and collaborators.
///
/// Holds the owned state stores by `Arc` handle (no globals) and the three
/// external ports by value.
pub struct Dispatcher<R, G, T, A>
where
    R: CredentialRepository,
    G: ChatGateway,
    T: SpeechTranscriber,
    A: AudioTranscoder,
{
    credentials: Arc<CredentialStore<R>>,
    conversations: Arc<ConversationState>,
    gateway: G,
    transcriber: T,
    transcoder: A,
    /// Spoken-language tag for voice transcription.
    language: String,
}

impl<R, G, T, A> Dispatcher<R, G, T, A>
where
    R: CredentialRepository,
    G: ChatGateway,
    T: SpeechTranscriber,
    A: AudioTranscoder,
{
    pub fn new(
        credentials: Arc<CredentialStore<R>>,
        conversations: Arc<ConversationState>,
        gateway: G,
        transcriber: T,
        transcoder: A,
        language: String,
    ) -> Self {
        Self {
            credentials,
            conversations,
            gateway,
            transcriber,
            transcoder,
            language,
        }
    }

    /// Handle one inbound event, producing the replies to send back.
    ///
    /// Never fails: collaborator faults become replies.
    pub async fn handle(&self, user: UserId, chat: ChatId, event: Event) -> Vec<Reply> {
        match event {
            Event::Start => {
                info!(%chat, "start command");
                self.conversations.start_session(chat);
                vec![Reply::Menu {
                    text: messages::MENU_PROMPT.to_string(),
                    actions: MenuAction::ALL.to_vec(),
                }]
            }

            Event::SetCredential { key } => match self.credentials.set(user, &key).await {
                Ok(()) => {
                    info!(%user, "credential stored");
                    vec![Reply::text(messages::KEY_SAVED)]
                }
                Err(CredentialError::Invalid) => vec![Reply::text(messages::KEY_INVALID)],
                Err(err) => {
                    error!(%user, "credential store failure: {err}");
                    vec![Reply::text(messages::SOMETHING_WRONG)]
                }
            },

            Event::BeginConversation => {
                self.conversations.start_session(chat);
                vec![Reply::text(messages::GREETING)]
            }

            Event::TextQuestion { text } => self.answer_question(user, chat, &text).await,

            Event::VoiceMessage { audio } => self.handle_voice(user, chat, &audio).await,
        }
    }

    /// The text-question flow: credential precondition, gateway call, then
    /// history append. Also reached from the voice flow once transcribed.
    async fn answer_question(&self, user: UserId, chat: ChatId, text: &str) -> Vec<Reply> {
        let api_key = match self.credentials.get(user).await {
            Ok(key) => key,
            Err(_) => return vec![Reply::text(messages::NEED_KEY)],
        };

        let history = self.conversations.history(chat);
        match self.gateway.complete(&api_key, &history, text).await {
            Ok(answer) => {
                self.conversations.append_exchange(chat, text, &answer);
                vec![Reply::Text(answer)]
            }
            Err(err) => {
                error!(%chat, "gateway call failed: {err}");
                vec![Reply::text(messages::GATEWAY_ERROR)]
            }
        }
    }

    /// The voice flow: transcode, transcribe, then hand off to the text
    /// flow. Temporary audio artifacts are scoped to the transcoder call and
    /// are gone by the time this returns, on every path.
    async fn handle_voice(&self, user: UserId, chat: ChatId, audio: &[u8]) -> Vec<Reply> {
        let wav = match self.transcoder.to_wav(audio).await {
            Ok(wav) => wav,
            Err(err) => {
                warn!(%chat, "voice transcode failed: {err}");
                return vec![Reply::Text(format!("{}{err}", messages::STT_ERROR_PREFIX))];
            }
        };

        match self.transcriber.transcribe(&wav, &self.language).await {
            Ok(Transcript::Text(text)) => {
                let mut replies = vec![Reply::Text(format!(
                    "{}{text}",
                    messages::TRANSCRIPT_PREFIX
                ))];
                replies.extend(self.answer_question(user, chat, &text).await);
                replies
            }
            Ok(Transcript::Unintelligible) => vec![Reply::text(messages::UNINTELLIGIBLE)],
            Err(TranscribeError::Service(detail)) => {
                warn!(%chat, "transcription service failure: {detail}");
                vec![Reply::Text(format!(
                    "{}{detail}",
                    messages::STT_ERROR_PREFIX
                ))]
            }
        }
    }
}
