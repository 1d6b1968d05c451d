use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use serde_json::Value;

use crate::{
    key::KeyNamespace,
    store::{Store, StoreError, is_truthy},
};

/// The host application's session, scoped to the current request or user.
///
/// Implementations adapt whatever session engine the host runs. The facade
/// receives one by explicit injection; [`MemorySession`] serves hosts without
/// a session engine and tests.
pub trait Session: Send + Sync {
    /// Store `value` under `name`.
    fn put(&self, name: &str, value: Value);

    /// Retrieve the value stored under `name`.
    fn get(&self, name: &str) -> Option<Value>;

    /// Remove the value stored under `name`.
    fn forget(&self, name: &str);

    /// Remove every value in the session, regardless of owner.
    fn flush(&self);
}

/// In-process [`Session`] backed by a map.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: RwLock<HashMap<String, Value>>,
}

impl MemorySession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Session for MemorySession {
    fn put(&self, name: &str, value: Value) {
        self.values
            .write()
            .expect("RwLock is not poisoned")
            .insert(name.to_owned(), value);
    }

    fn get(&self, name: &str) -> Option<Value> {
        self.values
            .read()
            .expect("RwLock is not poisoned")
            .get(name)
            .cloned()
    }

    fn forget(&self, name: &str) {
        self.values
            .write()
            .expect("RwLock is not poisoned")
            .remove(name);
    }

    fn flush(&self) {
        self.values.write().expect("RwLock is not poisoned").clear();
    }
}

/// Storage backend delegating to the host session.
pub struct SessionStore {
    session: Arc<dyn Session>,
    namespace: KeyNamespace,
}

impl SessionStore {
    /// Default key prefix for session-backed SDK storage.
    pub const DEFAULT_PREFIX: &'static str = "authbridge-session-storage";

    /// Create a store over `session`, namespacing keys with `prefix`.
    pub fn new(session: Arc<dyn Session>, prefix: &str) -> Self {
        Self {
            session,
            namespace: KeyNamespace::new(prefix),
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Store for SessionStore {
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.session.put(&self.namespace.key_name(key), value);
        Ok(())
    }

    async fn get(&self, key: &str, default: Value) -> Result<Value, StoreError> {
        match self.session.get(&self.namespace.key_name(key)) {
            Some(value) if is_truthy(&value) => Ok(value),
            _ => Ok(default),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.session.forget(&self.namespace.key_name(key));
        Ok(())
    }

    /// Flushes the ENTIRE host session, not only keys under this store's
    /// prefix. Callers that co-locate other data in the session lose it here.
    async fn purge(&self) -> Result<(), StoreError> {
        self.session.flush();
        Ok(())
    }

    async fn defer(&self, _deferring: bool) {}
}
