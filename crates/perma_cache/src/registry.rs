// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The store slot memoized methods fall back to when no store was injected.

use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::{CacheStore, Error, Result};

static GLOBAL: LazyLock<CacheRegistry> = LazyLock::new(CacheRegistry::new);

/// A replaceable slot holding the active cache store.
///
/// Memoized methods without an injected store read the process-wide instance
/// returned by [`CacheRegistry::global`] on every call. Setting replaces the
/// previous store unconditionally.
///
/// # Examples
///
/// ```
/// use perma_cache::CacheRegistry;
/// use perma_cache_store::testing::MockStore;
///
/// let registry = CacheRegistry::new();
/// assert!(matches!(registry.get(), Err(e) if e.is_undefined_cache()));
///
/// registry.set(MockStore::new());
/// assert!(registry.is_set());
/// ```
pub struct CacheRegistry {
    slot: RwLock<Option<Arc<dyn CacheStore>>>,
}

impl CacheRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { slot: RwLock::new(None) }
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Stores `store`, replacing any previous one.
    pub fn set(&self, store: impl CacheStore + 'static) {
        self.set_shared(Arc::new(store));
    }

    /// Stores an already shared store, replacing any previous one.
    pub fn set_shared(&self, store: Arc<dyn CacheStore>) {
        *self.slot.write() = Some(store);

        #[cfg(feature = "logs")]
        tracing::info!("perma_cache: cache store set");
    }

    /// Returns the current store.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UndefinedCache`](crate::ErrorKind::UndefinedCache)
    /// if no store was set or the registry was cleared.
    pub fn get(&self) -> Result<Arc<dyn CacheStore>> {
        self.slot.read().as_ref().map(Arc::clone).ok_or_else(Error::undefined_cache)
    }

    /// Empties the slot and returns the store it held, if any.
    pub fn clear(&self) -> Option<Arc<dyn CacheStore>> {
        self.slot.write().take()
    }

    /// Returns `true` if a store is currently set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.slot.read().is_some()
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegistry").field("is_set", &self.is_set()).finish()
    }
}

/// Sets the process-wide store.
pub fn set_cache(store: impl CacheStore + 'static) {
    CacheRegistry::global().set(store);
}

/// Returns the process-wide store.
///
/// # Errors
///
/// Returns [`ErrorKind::UndefinedCache`](crate::ErrorKind::UndefinedCache) if none is set.
pub fn cache() -> Result<Arc<dyn CacheStore>> {
    CacheRegistry::global().get()
}

/// Clears the process-wide store, returning the previous one.
pub fn clear_cache() -> Option<Arc<dyn CacheStore>> {
    CacheRegistry::global().clear()
}
