//! Test doubles shared by this crate's unit tests.

use std::{collections::HashMap, sync::RwLock};

use crate::{cache::CacheConnection, store::StoreError};

/// In-memory stand-in for the shared cache.
#[derive(Default)]
pub(crate) struct FakeConnection {
    pub(crate) entries: RwLock<HashMap<String, String>>,
}

#[async_trait::async_trait]
impl CacheConnection for FakeConnection {
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
