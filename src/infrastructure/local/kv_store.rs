use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Key of the technician's offline vehicle mirror.
pub const VEHICLE_CACHE_KEY: &str = "technician_vehicles";

#[derive(Error, Debug)]
pub enum LocalStoreError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Raw string blobs under string keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn put(&self, key: &str, value: String) -> Result<(), LocalStoreError>;
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;
    async fn delete(&self, key: &str) -> Result<(), LocalStoreError>;
    async fn clear(&self) -> Result<(), LocalStoreError>;
}

/// Typed JSON facade over a `KeyValueStore`. Never fails: errors are logged and reported
/// as `false` or `None`, and a blob that no longer parses reads as absent.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub async fn save<T: Serialize + Sync>(&self, key: &str, value: &T) -> bool {
        let blob = match serde_json::to_string(value) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(key, error = %err, "local_store_encode_failed");
                return false;
            }
        };
        match self.backend.put(key, blob).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "local_store_save_failed");
                false
            }
        }
    }

    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let blob = match self.backend.get(key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "local_store_load_failed");
                return None;
            }
        };
        match serde_json::from_str(&blob) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "local_store_blob_malformed");
                None
            }
        }
    }

    pub async fn remove(&self, key: &str) -> bool {
        match self.backend.delete(key).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "local_store_remove_failed");
                false
            }
        }
    }

    pub async fn clear_all(&self) -> bool {
        match self.backend.clear().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "local_store_clear_failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::local::MemoryKeyValueStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Draft {
        plate: String,
        open_tasks: u32,
    }

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn put(&self, _key: &str, _value: String) -> Result<(), LocalStoreError> {
            Err(LocalStoreError::Io(std::io::Error::other("disk full")))
        }

        async fn get(&self, _key: &str) -> Result<Option<String>, LocalStoreError> {
            Err(LocalStoreError::Io(std::io::Error::other("disk gone")))
        }

        async fn delete(&self, _key: &str) -> Result<(), LocalStoreError> {
            Err(LocalStoreError::Io(std::io::Error::other("disk gone")))
        }

        async fn clear(&self) -> Result<(), LocalStoreError> {
            Err(LocalStoreError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[tokio::test]
    async fn given_saved_value_when_load_should_return_it() {
        let store = LocalStore::new(Arc::new(MemoryKeyValueStore::new()));
        let draft = Draft {
            plate: "LHR-2231".to_string(),
            open_tasks: 3,
        };

        assert!(store.save("draft", &draft).await);

        assert_eq!(store.load::<Draft>("draft").await, Some(draft));
    }

    #[tokio::test]
    async fn given_malformed_blob_when_load_should_read_as_absent() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        backend.put("draft", "{not json".to_string()).await.unwrap();
        let store = LocalStore::new(backend);

        assert_eq!(store.load::<Draft>("draft").await, None);
    }

    #[tokio::test]
    async fn given_missing_key_when_load_should_return_none() {
        let store = LocalStore::new(Arc::new(MemoryKeyValueStore::new()));

        assert_eq!(store.load::<Draft>(VEHICLE_CACHE_KEY).await, None);
    }

    #[tokio::test]
    async fn given_failing_backend_when_called_should_report_false_or_none() {
        let store = LocalStore::new(Arc::new(BrokenStore));

        assert!(!store.save("draft", &1u32).await);
        assert_eq!(store.load::<u32>("draft").await, None);
        assert!(!store.remove("draft").await);
        assert!(!store.clear_all().await);
    }

    #[tokio::test]
    async fn given_saved_keys_when_clear_all_should_drop_everything() {
        let store = LocalStore::new(Arc::new(MemoryKeyValueStore::new()));
        store.save("a", &1u32).await;
        store.save("b", &2u32).await;

        assert!(store.clear_all().await);

        assert_eq!(store.load::<u32>("a").await, None);
        assert_eq!(store.load::<u32>("b").await, None);
    }
}
