use std::sync::Arc;

use crate::observe::{Observable, Subscription};
use crate::storage::KeyValueStore;

use super::secure::SecureString;

/// Durable-store key holding the auth token.
pub const TOKEN_KEY: &str = "authToken";

/// Holds the current auth token and persists it when it changes.
///
/// Cloning is cheap; clones share the same token.
#[derive(Clone)]
pub struct TokenHolder {
    token: Observable<SecureString>,
    store: Arc<dyn KeyValueStore>,
}

impl TokenHolder {
    /// Create a holder seeded from `store`.
    ///
    /// A read failure is logged and leaves the holder empty.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let initial = match store.get(TOKEN_KEY) {
            Ok(Some(token)) => SecureString::new(token),
            Ok(None) => SecureString::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored auth token");
                SecureString::default()
            }
        };
        tracing::debug!(present = !initial.is_empty(), "Auth token loaded");

        Self {
            token: Observable::new(initial),
            store,
        }
    }

    /// Current token; empty when unset.
    pub fn get(&self) -> SecureString {
        self.token.get()
    }

    /// Replace the token. Non-empty tokens are written to the durable store.
    ///
    /// No format validation happens here.
    pub fn set(&self, token: impl Into<String>) {
        let token = SecureString::new(token);
        if !token.is_empty() {
            if let Err(e) = self.store.set(TOKEN_KEY, token.expose()) {
                tracing::warn!(error = %e, "Failed to persist auth token");
            }
        }
        self.token.set(token);
    }

    /// Forget the token, both in memory and in the durable store.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "Failed to remove stored auth token");
        }
        self.token.set(SecureString::default());
    }

    pub fn subscribe(&self, f: impl Fn(&SecureString) + Send + Sync + 'static) -> Subscription {
        self.token.subscribe(f)
    }
}

impl std::fmt::Debug for TokenHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenHolder")
            .field("token", &self.token.get())
            .finish()
    }
}
