use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use tokio::sync::RwLock;

use super::{new_submission_id, StoreError, SubStore};

#[derive(Debug, Clone)]
struct Entry {
    content: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process submission store
///
/// Expired entries are never returned; they are dropped when read and
/// swept on every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, expired ones included until swept
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn purge_expired(&self, now: Instant) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        if entries.len() != before {
            debug!("Purged {} expired submission(s)", before - entries.len());
        }
    }
}

impl SubStore for MemoryStore {
    async fn put(&self, content: String, ttl: Duration) -> Result<String, StoreError> {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).ok_or_else(|| {
            StoreError::StorageError(format!("TTL of {}s is out of range", ttl.as_secs()))
        })?;
        self.purge_expired(now).await;

        let id = new_submission_id();
        self.entries
            .write()
            .await
            .insert(id.clone(), Entry { content, expires_at });
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(id) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.content.clone())),
                Some(_) => {}
            }
        }

        self.entries.write().await.remove(id);
        Ok(None)
    }
}
