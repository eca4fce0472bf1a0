// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory store implementation using moka.

use std::time::{Duration, Instant};

use moka::{Expiry, sync::Cache};
use perma_cache_store::{CacheStore, Result, WriteOptions};
use serde_json::Value;

use crate::builder::MemoryStoreBuilder;

#[derive(Debug, Clone)]
struct StoredEntry {
    value: Value,
    expires_in: Option<Duration>,
}

/// Expires each entry after the `expires_in` hint it was written with.
///
/// An overwrite restarts the entry's lifetime from its new hint.
#[derive(Debug, Clone, Copy)]
struct WriteHintExpiry;

impl Expiry<String, StoredEntry> for WriteHintExpiry {
    fn expire_after_create(&self, _key: &String, entry: &StoredEntry, _created_at: Instant) -> Option<Duration> {
        entry.expires_in
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.expires_in
    }
}

/// An in-memory store backed by moka.
///
/// This store provides:
/// - Concurrent access from any number of threads
/// - Per-entry expiration driven by the `expires_in` write hint
/// - Optional capacity bound with `TinyLFU` eviction
///
/// Clones share the same underlying storage.
///
/// # Examples
///
/// ```
/// use perma_cache_memory::MemoryStore;
/// use perma_cache_store::{CacheStore, WriteOptions};
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// store.write("key", json!([1, 2, 3]), WriteOptions::new())?;
/// assert_eq!(store.read("key")?, Some(json!([1, 2, 3])));
/// # Ok::<(), perma_cache_store::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Cache<String, StoredEntry>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates a new unbounded in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new in-memory store holding at most `max_capacity` entries.
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::builder().max_capacity(max_capacity).build()
    }

    /// Creates a new builder for configuring an in-memory store.
    #[must_use]
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::new()
    }

    pub(crate) fn from_builder(builder: &MemoryStoreBuilder) -> Self {
        let mut moka_builder = Cache::builder().expire_after(WriteHintExpiry);

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(ttl) = builder.time_to_live {
            moka_builder = moka_builder.time_to_live(ttl);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: moka_builder.build(),
        }
    }

    /// Returns the name given to this store, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    /// Returns `true` if a live entry is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns the approximate number of stored entries.
    ///
    /// Pending maintenance is flushed first, so the count reflects all completed writes.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    /// Removes the entry stored under `key`.
    pub fn invalidate(&self, key: &str) {
        self.inner.invalidate(key);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

impl CacheStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.inner.get(key).map(|entry| entry.value))
    }

    fn write(&self, key: &str, value: Value, options: WriteOptions) -> Result<()> {
        self.inner.insert(
            key.to_string(),
            StoredEntry {
                value,
                expires_in: options.expires_in,
            },
        );
        Ok(())
    }
}
