// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory stores.
//!
//! This module provides a builder API for `MemoryStore` that abstracts
//! the underlying moka configuration.

use std::time::Duration;

use crate::store::MemoryStore;

/// Builder for configuring a `MemoryStore`.
///
/// # Examples
///
/// ```
/// use perma_cache_memory::MemoryStore;
/// use std::time::Duration;
///
/// let store = MemoryStore::builder()
///     .max_capacity(1000)
///     .initial_capacity(100)
///     .time_to_live(Duration::from_secs(300))
///     .name("reports")
///     .build();
/// assert_eq!(store.name(), Some("reports"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryStoreBuilder {
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) time_to_live: Option<Duration>,
    pub(crate) name: Option<String>,
}

impl MemoryStoreBuilder {
    /// Creates a new builder with default settings.
    ///
    /// The default configuration creates an unbounded store in which entries written without an
    /// `expires_in` hint never expire.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of entries.
    ///
    /// Once the capacity is reached, entries are evicted using the `TinyLFU` policy.
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the initial capacity (pre-allocation hint).
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets a store-wide time-to-live.
    ///
    /// This bounds every entry, including entries written with a longer `expires_in` hint:
    /// whichever lifetime ends first wins.
    #[must_use]
    pub fn time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    /// Sets a name for the store, used by moka for diagnostics.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the `MemoryStore` with the configured settings.
    #[must_use]
    pub fn build(self) -> MemoryStore {
        MemoryStore::from_builder(&self)
    }
}
