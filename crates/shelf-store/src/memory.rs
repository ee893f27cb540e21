//! In-memory implementation of the BlobStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::traits::BlobStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    blobs: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Poisoned(e.to_string())
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let blobs = self.blobs.read().map_err(poisoned)?;
        Ok(blobs.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut blobs = self.blobs.write().map_err(poisoned)?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut blobs = self.blobs.write().map_err(poisoned)?;
        blobs.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreExt;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();

        // Set
        store.set("users", "[]").await.unwrap();

        // Get
        assert_eq!(store.get("users").await.unwrap().as_deref(), Some("[]"));
        assert!(store.contains("users").await.unwrap());
        assert_eq!(store.get("auth").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();

        store.set("auth", "first").await.unwrap();
        store.set("auth", "second").await.unwrap();
        assert_eq!(store.get("auth").await.unwrap().as_deref(), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_remove_idempotent() {
        let store = MemoryStore::new();
        store.set("auth", "{}").await.unwrap();

        store.remove("auth").await.unwrap();
        store.remove("auth").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_keys_are_exact() {
        let store = MemoryStore::new();
        store.set("authors:a@x.com", "[1]").await.unwrap();
        store.set("authors:a@x.co", "[2]").await.unwrap();

        assert_eq!(store.get("authors:a@x.com").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.get("authors:a@x.c").await.unwrap(), None);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let store = MemoryStore::new();
        store.set_json("ids", &vec![1u64, 2, 3]).await.unwrap();

        let ids: Option<Vec<u64>> = store.get_json("ids").await.unwrap();
        assert_eq!(ids, Some(vec![1, 2, 3]));

        let missing: Option<Vec<u64>> = store.get_json("nothing").await.unwrap();
        assert_eq!(missing, None);

        store.set("ids", "not json").await.unwrap();
        let corrupt: Result<Option<Vec<u64>>> = store.get_json("ids").await;
        assert!(corrupt.unwrap_err().is_corrupt());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashMap;

        #[derive(Debug, Clone)]
        enum Edit {
            Set(String, String),
            Remove(String),
        }

        fn edit() -> impl Strategy<Value = Edit> {
            let key = "(users|auth|authors:[ab]|books:[ab])";
            prop_oneof![
                (key, "[a-z]{0,4}").prop_map(|(k, v)| Edit::Set(k, v)),
                key.prop_map(Edit::Remove),
            ]
        }

        proptest! {
            #[test]
            fn edits_match_a_plain_map(edits in prop::collection::vec(edit(), 0..24)) {
                let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
                let store = MemoryStore::new();
                let mut model = HashMap::new();

                rt.block_on(async {
                    for e in &edits {
                        match e {
                            Edit::Set(k, v) => {
                                store.set(k, v).await.unwrap();
                                model.insert(k.clone(), v.clone());
                            }
                            Edit::Remove(k) => {
                                store.remove(k).await.unwrap();
                                model.remove(k);
                            }
                        }
                    }
                });

                prop_assert_eq!(store.len(), model.len());
                for (k, v) in &model {
                    let got = rt.block_on(store.get(k)).unwrap();
                    prop_assert_eq!(got.as_deref(), Some(v.as_str()));
                }
            }
        }
    }
}
