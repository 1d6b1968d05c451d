use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::store::{Store, StoreError};

/// Name of the private-tier entry holding the per-session storage id.
const STORAGE_ID_KEY: &str = "storage-id";
/// Name of the private-tier entry holding the manifest of written keys.
const MANIFEST_KEY: &str = "storage-keys";

/// Two-tier storage: values in a shared public tier, the per-session index
/// in a session-affine private tier.
///
/// The private tier holds a random storage id; public-tier keys are
/// `"<id>/<key>"` under the public store's own namespace, so concurrent
/// sessions sharing one cache never collide. The private tier also carries a
/// manifest of every key written through this store, which makes
/// [`purge`](Store::purge) exact without enumerating the shared tier.
pub struct TieredStore {
    public: Arc<dyn Store>,
    private: Arc<dyn Store>,
}

impl TieredStore {
    /// Create a store from a shared `public` tier and a session-affine
    /// `private` tier.
    pub fn new(public: Arc<dyn Store>, private: Arc<dyn Store>) -> Self {
        Self { public, private }
    }

    fn public_key(id: &str, key: &str) -> String {
        format!("{id}/{key}")
    }

    async fn storage_id(&self) -> Result<Option<String>, StoreError> {
        let id = self.private.get(STORAGE_ID_KEY, Value::Null).await?;
        Ok(id.as_str().map(str::to_owned))
    }

    async fn ensure_storage_id(&self) -> Result<String, StoreError> {
        if let Some(id) = self.storage_id().await? {
            return Ok(id);
        }
        let id = Uuid::new_v4().to_string();
        self.private
            .set(STORAGE_ID_KEY, Value::String(id.clone()))
            .await?;
        Ok(id)
    }

    async fn manifest(&self) -> Result<Vec<String>, StoreError> {
        let value = self.private.get(MANIFEST_KEY, Value::Array(Vec::new())).await?;
        Ok(value
            .as_array()
            .map(|keys| {
                keys.iter()
                    .filter_map(|key| key.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn write_manifest(&self, manifest: Vec<String>) -> Result<(), StoreError> {
        self.private
            .set(
                MANIFEST_KEY,
                Value::Array(manifest.into_iter().map(Value::String).collect()),
            )
            .await
    }

    async fn remember_key(&self, key: &str) -> Result<(), StoreError> {
        let mut manifest = self.manifest().await?;
        if !manifest.iter().any(|entry| entry == key) {
            manifest.push(key.to_owned());
            self.write_manifest(manifest).await?;
        }
        Ok(())
    }

    async fn forget_key(&self, key: &str) -> Result<(), StoreError> {
        let mut manifest = self.manifest().await?;
        manifest.retain(|entry| entry != key);
        self.write_manifest(manifest).await
    }
}

impl std::fmt::Debug for TieredStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredStore").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Store for TieredStore {
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let id = self.ensure_storage_id().await?;
        self.public
            .set(&Self::public_key(&id, key), value)
            .await?;
        self.remember_key(key).await
    }

    async fn get(&self, key: &str, default: Value) -> Result<Value, StoreError> {
        match self.storage_id().await? {
            Some(id) => self.public.get(&Self::public_key(&id, key), default).await,
            None => Ok(default),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        if let Some(id) = self.storage_id().await? {
            self.public.delete(&Self::public_key(&id, key)).await?;
            self.forget_key(key).await?;
        }
        Ok(())
    }

    /// Deletes this session's public-tier entries (by manifest, not by scan)
    /// and drops the private-tier index. Other sessions' entries survive.
    async fn purge(&self) -> Result<(), StoreError> {
        if let Some(id) = self.storage_id().await? {
            for key in self.manifest().await? {
                self.public.delete(&Self::public_key(&id, &key)).await?;
            }
        }
        self.private.delete(MANIFEST_KEY).await?;
        self.private.delete(STORAGE_ID_KEY).await
    }

    async fn defer(&self, deferring: bool) {
        self.public.defer(deferring).await;
        self.private.defer(deferring).await;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        cache::CacheStore,
        session::{MemorySession, SessionStore},
        testutil::FakeConnection,
    };

    fn tiered_over(connection: Arc<FakeConnection>) -> TieredStore {
        let public = Arc::new(CacheStore::new(connection, "public"));
        let private = Arc::new(SessionStore::new(
            Arc::new(MemorySession::new()),
            "private",
        ));
        TieredStore::new(public, private)
    }

    #[tokio::test]
    async fn test_roundtrip_through_public_tier() {
        let connection = Arc::new(FakeConnection::default());
        let store = tiered_over(connection.clone());

        store.set("user", json!({"sub": "alice"})).await.expect("set");
        let value = store.get("user", json!(null)).await.expect("get");
        assert_eq!(value, json!({"sub": "alice"}));

        // The value landed in the shared tier, not the private one.
        let entries = connection.entries.read().expect("RwLock is not poisoned");
        assert!(entries.keys().any(|key| key.starts_with("public:")));
    }

    #[tokio::test]
    async fn test_get_without_prior_writes_returns_default() {
        let store = tiered_over(Arc::new(FakeConnection::default()));
        let value = store.get("user", json!("d")).await.expect("get");
        assert_eq!(value, json!("d"));
    }

    #[tokio::test]
    async fn test_sessions_do_not_collide_in_shared_tier() {
        let connection = Arc::new(FakeConnection::default());
        let first = tiered_over(connection.clone());
        let second = tiered_over(connection.clone());

        first.set("user", json!("alice")).await.expect("set");
        second.set("user", json!("bob")).await.expect("set");

        assert_eq!(
            first.get("user", json!("d")).await.expect("get"),
            json!("alice")
        );
        assert_eq!(
            second.get("user", json!("d")).await.expect("get"),
            json!("bob")
        );
    }

    #[tokio::test]
    async fn test_purge_removes_only_own_entries() {
        let connection = Arc::new(FakeConnection::default());
        let first = tiered_over(connection.clone());
        let second = tiered_over(connection.clone());

        first.set("user", json!("alice")).await.expect("set");
        first.set("token", json!("t1")).await.expect("set");
        second.set("user", json!("bob")).await.expect("set");

        first.purge().await.expect("purge");

        assert_eq!(first.get("user", json!("d")).await.expect("get"), json!("d"));
        assert_eq!(
            first.get("token", json!("d")).await.expect("get"),
            json!("d")
        );
        assert_eq!(
            second.get("user", json!("d")).await.expect("get"),
            json!("bob")
        );
    }

    #[tokio::test]
    async fn test_delete_updates_manifest() {
        let store = tiered_over(Arc::new(FakeConnection::default()));
        store.set("a", json!("1")).await.expect("set");
        store.delete("a").await.expect("delete");

        assert_eq!(store.get("a", json!("d")).await.expect("get"), json!("d"));
        assert_eq!(store.manifest().await.expect("manifest"), Vec::<String>::new());
    }
}
