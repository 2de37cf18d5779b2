use crate::store::KeyValueCollection;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

/// In-memory collection used for tests and when no keyspace is available.
pub struct MemoryCollection {
    inner: Arc<Mutex<HashMap<Vec<u8>, Entry>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueCollection for MemoryCollection {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let entries = self.inner.lock().await;
        if let Some(entry) = entries.get(key) {
            if let Some(expiry) = entry.expires_at {
                if expiry < Instant::now() {
                    debug!("Entry expired for key: {}", String::from_utf8_lossy(key));
                    return None;
                }
            }
            debug!("Store HIT for key: {}", String::from_utf8_lossy(key));
            return Some(entry.value.clone());
        }
        debug!("Store MISS for key: {}", String::from_utf8_lossy(key));
        None
    }

    async fn put(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) {
        let entry = Entry {
            value: value.to_vec(),
            expires_at: ttl.map(|duration| Instant::now() + duration),
        };

        let mut entries = self.inner.lock().await;
        debug!("Store PUT for key: {}", String::from_utf8_lossy(key));
        entries.insert(key.to_vec(), entry);
    }

    async fn remove(&self, key: &[u8]) {
        let mut entries = self.inner.lock().await;
        entries.remove(key);
        debug!("Store REMOVE for key: {}", String::from_utf8_lossy(key));
    }
}
