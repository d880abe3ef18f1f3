//! In-memory secrets storage for the model API key.
//!
//! Secrets live in memory only and are lost when the server restarts.
//! Values are write-only through the API: they can be set and deleted but
//! never read back. The store doubles as the [`CredentialProvider`] for the
//! Gemini provider, falling back to the environment when a key is not set.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::agents::llm::CredentialProvider;

/// Known secret key identifiers
pub mod keys {
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
}

/// In-memory secrets store
#[derive(Debug, Default)]
pub struct SecretsStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl SecretsStore {
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
        }
    }

    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut secrets = self.secrets.write().await;
        secrets.insert(key.into(), value.into());
    }

    /// Get a secret value (internal use only)
    pub async fn get(&self, key: &str) -> Option<String> {
        let secrets = self.secrets.read().await;
        secrets.get(key).cloned()
    }

    pub async fn delete(&self, key: &str) -> bool {
        let mut secrets = self.secrets.write().await;
        secrets.remove(key).is_some()
    }

    /// List all secret keys (not values), sorted
    pub async fn list_keys(&self) -> Vec<String> {
        let secrets = self.secrets.read().await;
        let mut keys: Vec<String> = secrets.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn exists(&self, key: &str) -> bool {
        let secrets = self.secrets.read().await;
        secrets.contains_key(key)
    }

    pub async fn clear(&self) {
        let mut secrets = self.secrets.write().await;
        secrets.clear();
    }

    /// Get secret with fallback to environment variable
    pub async fn get_or_env(&self, key: &str) -> Option<String> {
        if let Some(value) = self.get(key).await {
            return Some(value);
        }
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// Thread-safe shared secrets store
pub type SharedSecretsStore = Arc<SecretsStore>;

pub fn create_secrets_store() -> SharedSecretsStore {
    Arc::new(SecretsStore::new())
}

/// Resolves the API key from the secrets store, then the named environment variable
pub struct SecretsCredentials {
    secrets: SharedSecretsStore,
    key: String,
}

impl SecretsCredentials {
    pub fn new(secrets: SharedSecretsStore, key: impl Into<String>) -> Self {
        Self {
            secrets,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl CredentialProvider for SecretsCredentials {
    async fn api_key(&self) -> Option<String> {
        self.secrets.get_or_env(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = SecretsStore::new();
        store.set("TEST_KEY", "test_value").await;
        assert_eq!(store.get("TEST_KEY").await, Some("test_value".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = SecretsStore::new();
        store.set("TEST_KEY", "test_value").await;
        assert!(store.delete("TEST_KEY").await);
        assert!(!store.delete("TEST_KEY").await);
        assert_eq!(store.get("TEST_KEY").await, None);
    }

    #[tokio::test]
    async fn test_list_keys_sorted() {
        let store = SecretsStore::new();
        store.set("KEY2", "value2").await;
        store.set("KEY1", "value1").await;
        assert_eq!(store.list_keys().await, vec!["KEY1", "KEY2"]);
        store.clear().await;
        assert!(store.list_keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_credentials_read_fresh_each_call() {
        let store = create_secrets_store();
        let creds = SecretsCredentials::new(store.clone(), "HANGAR_TEST_ROTATING_KEY");
        assert_eq!(creds.api_key().await, None);

        store.set("HANGAR_TEST_ROTATING_KEY", "first").await;
        assert_eq!(creds.api_key().await.as_deref(), Some("first"));

        store.set("HANGAR_TEST_ROTATING_KEY", "second").await;
        assert_eq!(creds.api_key().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_env_fallback() {
        std::env::set_var("HANGAR_TEST_ENV_ONLY_KEY", "from-env");
        let store = SecretsStore::new();
        assert_eq!(
            store.get_or_env("HANGAR_TEST_ENV_ONLY_KEY").await.as_deref(),
            Some("from-env")
        );
        store.set("HANGAR_TEST_ENV_ONLY_KEY", "from-store").await;
        assert_eq!(
            store.get_or_env("HANGAR_TEST_ENV_ONLY_KEY").await.as_deref(),
            Some("from-store")
        );
        std::env::remove_var("HANGAR_TEST_ENV_ONLY_KEY");
    }
}
