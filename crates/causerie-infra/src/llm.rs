//! Groq chat gateway.
//!
//! Groq exposes an OpenAI-compatible chat completion API, so the gateway is
//! built on [`async_openai`] with a custom base URL. Unlike a fixed-key
//! deployment, every user authenticates with their own key, so the client is
//! configured per call rather than once at construction. Calls are bounded
//! by a configurable timeout.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};

use causerie_core::gateway::ChatGateway;
use causerie_types::chat::{MessageRole, Turn};
use causerie_types::credential::ApiKey;
use causerie_types::llm::GatewayError;

use std::time::Duration;

/// Chat gateway for Groq's OpenAI-compatible endpoint.
#[derive(Debug)]
pub struct GroqGateway {
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GroqGateway {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout,
        }
    }

    /// Map stored turns plus the new question into the wire message list.
    fn build_messages(history: &[Turn], question: &str) -> Vec<ChatCompletionRequestMessage> {
        let mut messages: Vec<ChatCompletionRequestMessage> =
            Vec::with_capacity(history.len() + 1);

        for turn in history {
            let msg = match turn.role {
                MessageRole::User => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(
                            turn.content.clone(),
                        ),
                        name: None,
                    })
                }
                MessageRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                            turn.content.clone(),
                        )),
                        refusal: None,
                        name: None,
                        audio: None,
                        tool_calls: None,
                        function_call: None,
                    })
                }
            };
            messages.push(msg);
        }

        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(question.to_string()),
                name: None,
            },
        ));

        messages
    }
}

impl ChatGateway for GroqGateway {
    async fn complete(
        &self,
        api_key: &ApiKey,
        history: &[Turn],
        question: &str,
    ) -> Result<String, GatewayError> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.expose())
            .with_api_base(&self.base_url);
        let client = Client::with_config(config);

        let request = CreateChatCompletionRequest {
            model: self.model.clone(),
            messages: Self::build_messages(history, question),
            ..Default::default()
        };

        let response = tokio::time::timeout(self.timeout, client.chat().create(request))
            .await
            .map_err(|_| GatewayError::Provider {
                message: format!("request timed out after {:?}", self.timeout),
            })?
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        Ok(content)
    }
}

/// Map an `async_openai::error::OpenAIError` to a [`GatewayError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> GatewayError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API Key")
            {
                GatewayError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                GatewayError::RateLimited
            } else {
                GatewayError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) => GatewayError::AuthenticationFailed,
            Some(429) => GatewayError::RateLimited,
            _ => GatewayError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            GatewayError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => GatewayError::InvalidRequest(msg.clone()),
        _ => GatewayError::Provider {
            message: err.to_string(),
        },
    }
}
