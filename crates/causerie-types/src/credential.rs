//! Credential types for Causerie.
//!
//! Each user supplies their own API key for the model gateway. The value is
//! an opaque secret: [`ApiKey`] masks itself in `Debug` output so keys never
//! leak into logs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;

/// An API key a user supplies to authenticate to the model gateway.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiKey(pub String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw secret value. Only the gateway should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Mask the key for display, showing only the last 4 characters.
    ///
    /// - "gsk_abcdefghijklmnop" -> "****mnop"
    /// - "abc" -> "****"
    pub fn masked(&self) -> String {
        if self.0.len() <= 4 {
            "****".to_string()
        } else {
            format!("****{}", &self.0[self.0.len() - 4..])
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(\"{}\")", self.masked())
    }
}

/// Errors from credential store operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no credential stored for this user")]
    NotFound,

    #[error("credential is empty")]
    Invalid,

    #[error("storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_debug_is_masked() {
        let key = ApiKey::new("gsk_abcdefghijklmnop");
        let debug = format!("{key:?}");
        assert!(!debug.contains("abcdefgh"));
        assert!(debug.contains("mnop"));
    }

    #[test]
    fn test_masked_short_key() {
        assert_eq!(ApiKey::new("abc").masked(), "****");
        assert_eq!(ApiKey::new("abcd").masked(), "****");
        assert_eq!(ApiKey::new("abcde").masked(), "****bcde");
    }

    #[test]
    fn test_api_key_serde_is_plain_string() {
        // The persisted credential file stores raw string values.
        let json = serde_json::to_string(&ApiKey::new("xyz")).unwrap();
        assert_eq!(json, "\"xyz\"");
        let parsed: ApiKey = serde_json::from_str("\"xyz\"").unwrap();
        assert_eq!(parsed.expose(), "xyz");
    }

    #[test]
    fn test_credential_error_display() {
        let err = CredentialError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "storage error: disk full");
    }
}
