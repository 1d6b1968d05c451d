//! Request-scoped authentication state tracked outside the SDK's storage.

use std::sync::RwLock;

use serde_json::Value;

/// Mutable bag tracking the authentication state of the current request.
///
/// Lives outside the SDK's session storage: middleware and guards record
/// here whether the request has been authenticated and which user claims it
/// resolved, without touching the persisted session.
#[derive(Debug, Default)]
pub struct AuthState {
    authenticated: RwLock<bool>,
    user: RwLock<Option<Value>>,
}

impl AuthState {
    /// Whether the current request has been authenticated.
    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.read().expect("RwLock is not poisoned")
    }

    /// Record the outcome of an authentication check.
    pub fn set_authenticated(&self, authenticated: bool) {
        *self.authenticated.write().expect("RwLock is not poisoned") = authenticated;
    }

    /// The user claims resolved for the current request, if any.
    pub fn user(&self) -> Option<Value> {
        self.user.read().expect("RwLock is not poisoned").clone()
    }

    /// Record the resolved user claims.
    pub fn set_user(&self, user: Value) {
        *self.user.write().expect("RwLock is not poisoned") = Some(user);
    }

    /// Reset to the unauthenticated state.
    pub fn clear(&self) {
        *self.authenticated.write().expect("RwLock is not poisoned") = false;
        *self.user.write().expect("RwLock is not poisoned") = None;
    }
}
