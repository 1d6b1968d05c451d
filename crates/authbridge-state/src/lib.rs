#![doc = include_str!("../README.md")]

/// This module provides the uniform key/value contract all storage backends
/// satisfy.
pub mod store;

/// Key namespacing shared by all storage backends.
pub mod key;

/// This module provides the session-backed storage backend.
pub mod session;

/// This module provides the shared-cache storage backend.
pub mod cache;

/// Two-tier storage combining the cache and session backends.
pub mod tiered;

#[cfg(test)]
pub(crate) mod testutil;

pub use cache::{CacheConnection, CacheStore};
pub use key::KeyNamespace;
pub use session::{MemorySession, Session, SessionStore};
pub use store::{Store, StoreError};
pub use tiered::TieredStore;
