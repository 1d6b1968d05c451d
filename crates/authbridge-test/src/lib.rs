//! Internal test helpers for the authbridge crates. Do not use.

use std::{
    collections::HashMap,
    sync::RwLock,
};

use authbridge_state::{CacheConnection, StoreError};

/// In-memory [`CacheConnection`] double for tests that exercise cache-backed
/// storage without a running cache service.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every key currently held, in no particular order.
    pub fn key_names(&self) -> Vec<String> {
        self.entries
            .read()
            .expect("RwLock is not poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.read().expect("RwLock is not poisoned").len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl CacheConnection for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .read()
            .expect("RwLock is not poisoned")
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries
            .write()
            .expect("RwLock is not poisoned")
            .insert(key.to_owned(), value);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .expect("RwLock is not poisoned")
            .remove(key);
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let prefix = pattern.trim_end_matches('*');
        Ok(self
            .entries
            .read()
            .expect("RwLock is not poisoned")
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
