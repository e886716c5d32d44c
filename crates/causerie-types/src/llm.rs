//! Model gateway error taxonomy.

use thiserror::Error;

/// Errors from chat gateway operations.
///
/// The dispatcher converts every variant into a user-visible reply; none of
/// them are retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited")]
    RateLimited,

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Provider {
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "provider error: boom");
        assert_eq!(
            GatewayError::AuthenticationFailed.to_string(),
            "authentication failed"
        );
    }
}
