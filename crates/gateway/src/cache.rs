//! Explicit client-side caching for session-scoped objects.
//!
//! The current-user object is read by several screens but owned by none of
//! them. Rather than a free-floating side-channel, the session keeps one
//! [`CachedValue`] with defined refresh triggers: `set` after a profile or
//! avatar update, `invalidate` on logout, `get_or_refresh` everywhere else.

use rxpad_uuid::UserUuid;
use serde::{Deserialize, Serialize};

/// The authenticated user as the builder screens see them.
///
/// Obtained from an external collaborator (the session layer); only
/// identity and display fields matter here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserUuid,
    pub display_name: String,
}

/// An explicitly-invalidated cache around one value.
#[derive(Clone, Debug, Default)]
pub struct CachedValue<T> {
    value: Option<T>,
}

impl<T> CachedValue<T> {
    /// An empty cache; the first `get_or_refresh` fetches.
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// The cached value, if any. Never fetches.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the cached value, fetching it first when the cache is empty.
    /// A failed fetch leaves the cache empty so the next call retries.
    pub async fn get_or_refresh<F, Fut, E>(&mut self, fetch: F) -> Result<&T, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        if self.value.is_none() {
            self.value = Some(fetch().await?);
        }
        Ok(self.value.as_ref().expect("just populated"))
    }

    /// Replaces the cached value. This is the refresh trigger to call after
    /// the underlying object is known to have changed (for example after a
    /// profile update).
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    /// Drops the cached value; the next `get_or_refresh` fetches again.
    pub fn invalidate(&mut self) {
        self.value = None;
    }
}
