//! JSON-file credential repository.
//!
//! Persists the user -> API key mapping as a single JSON object with string
//! keys (`{"123456": "gsk_..."}`). Every update rewrites the whole file; no
//! atomic rename or partial-write protection, so a crash mid-write can
//! corrupt the store. The core layer treats an unreadable store as empty.

use causerie_core::credential::CredentialRepository;
use causerie_types::credential::{ApiKey, CredentialError};
use causerie_types::identity::UserId;
use tracing::warn;

use std::collections::HashMap;
use std::path::PathBuf;

/// Credential store backed by a flat JSON file.
pub struct JsonCredentialRepository {
    path: PathBuf,
}

impl JsonCredentialRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialRepository for JsonCredentialRepository {
    async fn load(&self) -> Result<HashMap<UserId, ApiKey>, CredentialError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            // Absent store: first run, start empty. Not an error.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HashMap::new());
            }
            Err(err) => return Err(CredentialError::Storage(err.to_string())),
        };

        let raw: HashMap<String, String> = serde_json::from_str(&content)
            .map_err(|err| CredentialError::Storage(format!("corrupt credential store: {err}")))?;

        let mut keys = HashMap::with_capacity(raw.len());
        for (user, key) in raw {
            match user.parse::<UserId>() {
                Ok(id) => {
                    keys.insert(id, ApiKey::new(key));
                }
                Err(_) => {
                    warn!("skipping credential entry with non-numeric user id '{user}'");
                }
            }
        }
        Ok(keys)
    }

    async fn persist(&self, keys: &HashMap<UserId, ApiKey>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| CredentialError::Storage(err.to_string()))?;
        }

        let raw: HashMap<String, &str> = keys
            .iter()
            .map(|(user, key)| (user.to_string(), key.expose()))
            .collect();
        let json = serde_json::to_string(&raw)
            .map_err(|err| CredentialError::Storage(err.to_string()))?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|err| CredentialError::Storage(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causerie_core::credential::CredentialStore;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let repo = JsonCredentialRepository::new(dir.path().join("keys.json"));
        let keys = repo.load().await.unwrap();
        assert!(keys.is_empty());
    }

    #[tokio::test]
    async fn test_persist_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keys.json");
        let repo = JsonCredentialRepository::new(&path);

        let keys = HashMap::from([
            (UserId(1), ApiKey::new("one")),
            (UserId(-100), ApiKey::new("group")),
        ]);
        repo.persist(&keys).await.unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&UserId(1)].expose(), "one");
        assert_eq!(loaded[&UserId(-100)].expose(), "group");
    }

    #[tokio::test]
    async fn test_persist_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("keys.json");
        let repo = JsonCredentialRepository::new(&path);

        repo.persist(&HashMap::new()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keys.json");
        tokio::fs::write(&path, "not json at all").await.unwrap();

        let repo = JsonCredentialRepository::new(&path);
        let err = repo.load().await.unwrap_err();
        assert!(matches!(err, CredentialError::Storage(_)));
    }

    #[tokio::test]
    async fn test_non_numeric_user_ids_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keys.json");
        tokio::fs::write(&path, r#"{"7": "xyz", "not-a-number": "junk"}"#)
            .await
            .unwrap();

        let repo = JsonCredentialRepository::new(&path);
        let keys = repo.load().await.unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[&UserId(7)].expose(), "xyz");
    }

    #[tokio::test]
    async fn test_store_over_seeded_file() {
        // End-to-end through the core store: a pre-existing file is loaded at
        // start; known users resolve, unknown users do not.
        let dir = tempdir().unwrap();
        let path = dir.path().join("user_api_keys.json");
        tokio::fs::write(&path, r#"{"7": "xyz"}"#).await.unwrap();

        let store = CredentialStore::load(JsonCredentialRepository::new(&path)).await;
        assert_eq!(store.get(UserId(7)).await.unwrap().expose(), "xyz");
        assert!(matches!(
            store.get(UserId(8)).await.unwrap_err(),
            CredentialError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_set_rewrites_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user_api_keys.json");

        let store = CredentialStore::load(JsonCredentialRepository::new(&path)).await;
        store.set(UserId(42), "abc123").await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let raw: HashMap<String, String> = serde_json::from_str(&content).unwrap();
        assert_eq!(raw["42"], "abc123");
    }
}
