//! Per-user credential store.
//!
//! Users supply their own model API key; the store keeps the mapping in
//! memory and mirrors every change to a persistence backend. The backend is
//! a port trait so the core stays free of filesystem concerns -- the JSON
//! file implementation lives in `causerie-infra`.

use causerie_types::credential::{ApiKey, CredentialError};
use causerie_types::identity::UserId;
use tokio::sync::RwLock;
use tracing::warn;

use std::collections::HashMap;

/// Trait for credential persistence backends.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in causerie-infra.
pub trait CredentialRepository: Send + Sync {
    /// Read the persisted mapping. An absent store yields an empty mapping,
    /// not an error.
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<HashMap<UserId, ApiKey>, CredentialError>> + Send;

    /// Persist the entire mapping (full rewrite, no append).
    fn persist(
        &self,
        keys: &HashMap<UserId, ApiKey>,
    ) -> impl std::future::Future<Output = Result<(), CredentialError>> + Send;
}

/// In-memory credential mapping backed by a [`CredentialRepository`].
///
/// At most one key per user; last write wins. Every successful `set`
/// rewrites the whole persisted mapping.
pub struct CredentialStore<R: CredentialRepository> {
    repo: R,
    keys: RwLock<HashMap<UserId, ApiKey>>,
}

impl<R: CredentialRepository> CredentialStore<R> {
    /// Build the store, loading whatever the repository has persisted.
    ///
    /// A repository read failure is downgraded to an empty mapping with a
    /// warning: the bot must come up even when the store file is unreadable,
    /// at the cost of silently losing the previous keys.
    pub async fn load(repo: R) -> Self {
        let keys = match repo.load().await {
            Ok(keys) => keys,
            Err(err) => {
                warn!("failed to load credential store, starting empty: {err}");
                HashMap::new()
            }
        };

        Self {
            repo,
            keys: RwLock::new(keys),
        }
    }

    /// Store a key for a user, overwriting any previous one.
    ///
    /// The key is trimmed first; an empty result is rejected with
    /// [`CredentialError::Invalid`] and the mapping is left untouched.
    pub async fn set(&self, user: UserId, key: &str) -> Result<(), CredentialError> {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(CredentialError::Invalid);
        }

        let snapshot = {
            let mut keys = self.keys.write().await;
            keys.insert(user, ApiKey::new(trimmed));
            keys.clone()
        };

        self.repo.persist(&snapshot).await
    }

    /// The user's stored key, or [`CredentialError::NotFound`].
    pub async fn get(&self, user: UserId) -> Result<ApiKey, CredentialError> {
        self.keys
            .read()
            .await
            .get(&user)
            .cloned()
            .ok_or(CredentialError::NotFound)
    }
}
