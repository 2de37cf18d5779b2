pub mod disk;
pub mod memory;
pub mod userdata;

use async_trait::async_trait;
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
    time::Duration,
};
use tracing::debug;

/// A named set of byte keys and values with optional expiry.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    async fn put(&self, key: &[u8], value: &[u8], ttl: Option<Duration>);
    async fn remove(&self, key: &[u8]);
}

/// A thread-safe key-value store that hands out named collections, persisted
/// as fjall partitions when a keyspace could be opened.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Arc<Keyspace>>,
}

impl KeyValueStore {
    /// Opens a store rooted at `data_path`. When the keyspace cannot be
    /// opened the store still works, with memory-only collections.
    pub fn open(data_path: &Path) -> Self {
        let keyspace = fjall::Config::new(data_path.join("store")).open().ok();
        if keyspace.is_none() {
            debug!(
                "Could not open keyspace at {}, collections will not persist",
                data_path.display()
            );
        }

        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: keyspace.map(Arc::new),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    /// Returns the named collection, creating it on first use. `persist`
    /// requests a disk partition; a memory collection stands in when the
    /// keyspace is unavailable.
    pub fn collection(&self, name: &str, persist: bool) -> Arc<dyn KeyValueCollection> {
        {
            let collections = self.collections.read().unwrap();
            if let Some(collection) = collections.get(name) {
                return Arc::clone(collection);
            }
        }

        let mut collections = self.collections.write().unwrap();
        let collection = collections.entry(name.to_string()).or_insert_with(|| {
            let on_disk = if persist {
                self.keyspace.as_ref().and_then(|ks| {
                    ks.open_partition(name, PartitionCreateOptions::default())
                        .ok()
                        .map(|partition| {
                            Arc::new(DiskCollection::new(partition)) as Arc<dyn KeyValueCollection>
                        })
                })
            } else {
                None
            };

            on_disk.unwrap_or_else(|| Arc::new(MemoryCollection::new()))
        });
        Arc::clone(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_collections_are_shared_by_name() {
        let store = KeyValueStore::in_memory();

        let first = store.collection("nav", false);
        first.put(b"key", b"value", None).await;

        let second = store.collection("nav", false);
        assert_eq!(second.get(b"key").await, Some(b"value".to_vec()));

        let other = store.collection("other", false);
        assert!(other.get(b"key").await.is_none());
    }

    #[tokio::test]
    async fn test_persistent_collection_survives_reopen() {
        let dir = tempdir().unwrap();

        {
            let store = KeyValueStore::open(dir.path());
            store.collection("nav", true).put(b"key", b"value", None).await;
        }

        let store = KeyValueStore::open(dir.path());
        assert_eq!(
            store.collection("nav", true).get(b"key").await,
            Some(b"value".to_vec())
        );
    }

    #[tokio::test]
    async fn test_in_memory_store_honors_persist_flag_gracefully() {
        let store = KeyValueStore::in_memory();
        let collection = store.collection("nav", true);
        collection.put(b"key", b"value", None).await;
        assert_eq!(collection.get(b"key").await, Some(b"value".to_vec()));
    }
}
