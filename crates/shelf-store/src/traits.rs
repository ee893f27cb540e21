//! BlobStore trait: the abstract interface for durable catalog state.
//!
//! The catalog persists everything as JSON text under string keys, the same
//! model as a browser's local storage. This trait keeps the stores
//! storage-agnostic. Implementations include SQLite (primary) and in-memory
//! (for tests).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// The BlobStore trait: async string-keyed blob persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
/// Callers always know the exact key they want, so there is no listing.
///
/// # Design Notes
///
/// - **Last write wins**: `set` replaces any previous value without conflict detection.
/// - **Idempotent removal**: removing an absent key is not an error.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value under `key`, if any.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check if a value exists under `key`.
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Extension trait for storing typed values as JSON.
#[async_trait]
pub trait StoreExt: BlobStore {
    /// Get and decode the JSON value under `key`.
    ///
    /// A value that exists but does not decode yields
    /// [`StoreError::Serialization`].
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send;

    /// Encode `value` as JSON and store it under `key`.
    async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized;
}

#[async_trait]
impl<S: BlobStore + ?Sized> StoreExt for S {
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Serialization {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Serialization {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        self.set(key, &raw).await
    }
}
