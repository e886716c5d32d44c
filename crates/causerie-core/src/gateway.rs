//! ChatGateway trait definition.

use causerie_types::chat::Turn;
use causerie_types::credential::ApiKey;
use causerie_types::llm::GatewayError;

/// Trait for the chat completion backend.
///
/// Stateless: the caller owns the conversation history and passes the slice
/// to send as context. The implementation appends one user turn carrying
/// `question`, authenticates with `api_key`, and returns the text of the
/// first completion choice. No retry on failure.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in causerie-infra (e.g., `GroqGateway`).
pub trait ChatGateway: Send + Sync {
    fn complete(
        &self,
        api_key: &ApiKey,
        history: &[Turn],
        question: &str,
    ) -> impl std::future::Future<Output = Result<String, GatewayError>> + Send;
}
