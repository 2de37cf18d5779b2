use crate::store::KeyValueCollection;
use anyhow::Result;
use async_trait::async_trait;
use fjall::PartitionHandle;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct DiskEntry {
    value: Vec<u8>,
    expires_at: Option<SystemTime>,
}

/// Persistent collection backed by one fjall partition. Disk failures
/// degrade to misses rather than surfacing to callers.
pub struct DiskCollection {
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(partition: PartitionHandle) -> Self {
        Self { partition }
    }
}

#[async_trait]
impl KeyValueCollection for DiskCollection {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let res: Result<Option<Vec<u8>>> = (|| {
            if let Some(raw) = self.partition.get(key)? {
                let entry: DiskEntry = serde_json::from_slice(&raw)?;
                if let Some(expires_at) = entry.expires_at {
                    if SystemTime::now() > expires_at {
                        debug!("Entry expired for key: {}", String::from_utf8_lossy(key));
                        self.partition.remove(key)?;
                        return Ok(None);
                    }
                }
                debug!("Store HIT for key: {}", String::from_utf8_lossy(key));
                return Ok(Some(entry.value));
            }
            debug!("Store MISS for key: {}", String::from_utf8_lossy(key));
            Ok(None)
        })();

        match res {
            Ok(val) => val,
            Err(e) => {
                debug!("DiskCollection get error: {}", e);
                None
            }
        }
    }

    async fn put(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) {
        let res: Result<()> = (|| {
            let entry = DiskEntry {
                value: value.to_vec(),
                expires_at: ttl.map(|d| SystemTime::now() + d),
            };
            self.partition.insert(key, serde_json::to_vec(&entry)?)?;
            debug!("Store PUT for key: {}", String::from_utf8_lossy(key));
            Ok(())
        })();
        if let Err(e) = res {
            debug!("DiskCollection put error: {}", e);
        }
    }

    async fn remove(&self, key: &[u8]) {
        if let Err(e) = self.partition.remove(key) {
            debug!("DiskCollection remove error: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fjall::PartitionCreateOptions;
    use tempfile::tempdir;
    use tokio::time::sleep;

    fn open_collection(path: &std::path::Path) -> DiskCollection {
        let keyspace = fjall::Config::new(path).open().unwrap();
        let partition = keyspace
            .open_partition("test", PartitionCreateOptions::default())
            .unwrap();
        DiskCollection::new(partition)
    }

    #[tokio::test]
    async fn test_get_put() {
        let dir = tempdir().unwrap();
        let collection = open_collection(dir.path());

        assert!(collection.get(b"key1").await.is_none());

        collection.put(b"key1", b"value1", None).await;
        assert_eq!(collection.get(b"key1").await, Some(b"value1".to_vec()));
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let dir = tempdir().unwrap();
        let collection = open_collection(dir.path());

        collection
            .put(b"key1", b"value1", Some(Duration::from_millis(10)))
            .await;
        assert_eq!(collection.get(b"key1").await, Some(b"value1".to_vec()));

        sleep(Duration::from_millis(20)).await;
        assert!(collection.get(b"key1").await.is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempdir().unwrap();
        let collection = open_collection(dir.path());

        collection.put(b"key1", b"value1", None).await;
        collection.remove(b"key1").await;
        assert!(collection.get(b"key1").await.is_none());
    }
}
