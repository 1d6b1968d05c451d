use serde_json::Value;

/// An error resulting from operations on a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing service could not be reached or failed mid-operation.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// A serialization or deserialization error at the storage boundary.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// The key/value contract the identity-provider SDK persists session and
/// token state through.
///
/// Values are opaque JSON: the SDK stores heterogeneous session data and the
/// backends hold it blindly. Every backend namespaces its keys with a prefix
/// (see [`KeyNamespace`](crate::KeyNamespace)) so SDK state never collides
/// with other data in the same storage medium.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Persist `value` under the namespaced key.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Retrieve the value stored under `key`, or `default` when absent.
    ///
    /// Presence is weaker than key existence: a stored `null`, `false`, `0`,
    /// empty string, or empty container reads back as `default`.
    async fn get(&self, key: &str, default: Value) -> Result<Value, StoreError>;

    /// Remove the value stored under `key`. No-op when absent.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Remove every key owned by this store.
    async fn purge(&self) -> Result<(), StoreError>;

    /// Hint that a block of mutations follows and writes may be batched.
    ///
    /// All current backends write immediately and ignore the hint.
    async fn defer(&self, deferring: bool);
}

/// Whether a stored value counts as present under the weak-existence
/// semantics of [`Store::get`].
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
