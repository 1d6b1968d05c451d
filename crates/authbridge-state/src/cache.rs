use std::sync::Arc;

use serde_json::Value;

use crate::{
    key::KeyNamespace,
    store::{Store, StoreError, is_truthy},
};

/// Minimal surface of the shared key/value service backing [`CacheStore`].
///
/// Implemented for [`redis::aio::ConnectionManager`]; tests substitute an
/// in-memory double. The service is shared by every process serving the
/// application, with per-key atomicity and no cross-key transactions.
#[async_trait::async_trait]
pub trait CacheConnection: Send + Sync {
    /// Read the raw value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Delete `key`. No-op when absent.
    async fn del(&self, key: &str) -> Result<(), StoreError>;

    /// Enumerate keys matching `pattern` (`*` wildcard suffix).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;
}

#[async_trait::async_trait]
impl CacheConnection for redis::aio::ConnectionManager {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.clone();
        redis::AsyncCommands::get(&mut connection, key)
            .await
            .map_err(into_store_error)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut connection = self.clone();
        redis::AsyncCommands::set(&mut connection, key, value)
            .await
            .map_err(into_store_error)
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        let mut connection = self.clone();
        redis::AsyncCommands::del(&mut connection, key)
            .await
            .map_err(into_store_error)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut connection = self.clone();
        redis::AsyncCommands::keys(&mut connection, pattern)
            .await
            .map_err(into_store_error)
    }
}

fn into_store_error(err: redis::RedisError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

/// Storage backend delegating to a shared cache reachable by all processes.
///
/// Values cross the boundary as JSON strings. [`purge`](Store::purge)
/// enumerates `"<prefix>:*"` and deletes each match, so only keys owned by
/// this store's prefix are affected.
pub struct CacheStore {
    connection: Arc<dyn CacheConnection>,
    namespace: KeyNamespace,
}

impl CacheStore {
    /// Default key prefix for cache-backed SDK storage.
    pub const DEFAULT_PREFIX: &'static str = "authbridge-cache-storage";

    /// Create a store over `connection`, namespacing keys with `prefix`.
    pub fn new(connection: Arc<dyn CacheConnection>, prefix: &str) -> Self {
        Self {
            connection,
            namespace: KeyNamespace::new(prefix),
        }
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Store for CacheStore {
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&value)?;
        self.connection
            .set(&self.namespace.key_name(key), raw)
            .await
    }

    async fn get(&self, key: &str, default: Value) -> Result<Value, StoreError> {
        match self.connection.get(&self.namespace.key_name(key)).await? {
            Some(raw) => {
                let value: Value = serde_json::from_str(&raw)?;
                if is_truthy(&value) {
                    Ok(value)
                } else {
                    Ok(default)
                }
            }
            None => Ok(default),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.connection.del(&self.namespace.key_name(key)).await
    }

    async fn purge(&self) -> Result<(), StoreError> {
        let keys = self.connection.keys(&self.namespace.pattern()).await?;
        log::debug!(
            "purging {} keys under `{}`",
            keys.len(),
            self.namespace.prefix()
        );
        for key in keys {
            self.connection.del(&key).await?;
        }
        Ok(())
    }

    async fn defer(&self, _deferring: bool) {}
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testutil::FakeConnection;

    #[tokio::test]
    async fn test_set_then_get_roundtrips_json() {
        let store = CacheStore::new(Arc::new(FakeConnection::default()), "cache");
        store.set("token", json!({"sub": "user"})).await.expect("set");
        let value = store.get("token", json!(null)).await.expect("get");
        assert_eq!(value, json!({"sub": "user"}));
    }

    #[tokio::test]
    async fn test_get_missing_returns_default() {
        let store = CacheStore::new(Arc::new(FakeConnection::default()), "cache");
        let value = store.get("missing", json!("d")).await.expect("get");
        assert_eq!(value, json!("d"));
    }

    #[tokio::test]
    async fn test_falsy_value_reads_as_default() {
        let store = CacheStore::new(Arc::new(FakeConnection::default()), "cache");
        store.set("zero", json!(0)).await.expect("set");
        let value = store.get("zero", json!("d")).await.expect("get");
        assert_eq!(value, json!("d"));
    }

    #[tokio::test]
    async fn test_purge_respects_prefix_boundary() {
        let connection = Arc::new(FakeConnection::default());
        let mine = CacheStore::new(connection.clone(), "mine");
        let other = CacheStore::new(connection.clone(), "other");

        mine.set("a", json!("1")).await.expect("set");
        mine.set("b", json!("2")).await.expect("set");
        other.set("a", json!("3")).await.expect("set");

        mine.purge().await.expect("purge");

        assert_eq!(mine.get("a", json!("d")).await.expect("get"), json!("d"));
        assert_eq!(mine.get("b", json!("d")).await.expect("get"), json!("d"));
        assert_eq!(other.get("a", json!("d")).await.expect("get"), json!("3"));
    }

    #[tokio::test]
    async fn test_store_scenario() {
        // prefix "x": a="1", b=""; get a -> "1", get b -> default; purge; a -> default
        let store = CacheStore::new(Arc::new(FakeConnection::default()), "x");
        store.set("a", json!("1")).await.expect("set");
        store.set("b", json!("")).await.expect("set");

        assert_eq!(store.get("a", json!("d")).await.expect("get"), json!("1"));
        assert_eq!(store.get("b", json!("d")).await.expect("get"), json!("d"));

        store.purge().await.expect("purge");
        assert_eq!(store.get("a", json!("d")).await.expect("get"), json!("d"));
    }

    #[tokio::test]
    async fn test_defer_has_no_observable_effect() {
        let store = CacheStore::new(Arc::new(FakeConnection::default()), "cache");
        store.defer(true).await;
        store.set("a", json!("1")).await.expect("set");
        assert_eq!(store.get("a", json!("d")).await.expect("get"), json!("1"));
    }
}
