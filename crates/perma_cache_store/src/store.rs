// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for cache store backends.
//!
//! [`CacheStore`] is the whole contract a backend has to satisfy: a keyed read and a keyed write
//! carrying an optional lifetime hint. Persistence, eviction and expiry enforcement belong to the
//! store; the memoization layer only supplies keys and the `expires_in` hint.

use std::{sync::Arc, time::Duration};

use serde_json::Value;

use crate::Result;

/// Options passed alongside every write.
///
/// # Examples
///
/// ```
/// use perma_cache_store::WriteOptions;
/// use std::time::Duration;
///
/// let options = WriteOptions::new().with_expires_in(Some(Duration::from_secs(5)));
/// assert_eq!(options.expires_in, Some(Duration::from_secs(5)));
/// assert_eq!(WriteOptions::default().expires_in, None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WriteOptions {
    /// How long the written entry should live. `None` leaves the lifetime to the store.
    pub expires_in: Option<Duration>,
}

impl WriteOptions {
    /// Creates options with no lifetime hint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lifetime hint.
    #[must_use]
    pub fn with_expires_in(mut self, expires_in: Option<Duration>) -> Self {
        self.expires_in = expires_in;
        self
    }
}

/// Trait for cache store implementations.
///
/// Values cross this boundary as [`serde_json::Value`], so a store can hold the results of any
/// number of differently typed memoized methods. A store is free to keep the value as is, or to
/// encode it however its backing medium requires.
///
/// Implementations must be thread-safe when the surrounding program is multi-threaded: the
/// memoization layer adds no locking of its own around reads and writes.
pub trait CacheStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored or the stored entry has expired.
    fn read(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: Value, options: WriteOptions) -> Result<()>;
}

impl<S> CacheStore for Arc<S>
where
    S: CacheStore + ?Sized,
{
    fn read(&self, key: &str) -> Result<Option<Value>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: Value, options: WriteOptions) -> Result<()> {
        (**self).write(key, value, options)
    }
}

impl<S> CacheStore for Box<S>
where
    S: CacheStore + ?Sized,
{
    fn read(&self, key: &str) -> Result<Option<Value>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: Value, options: WriteOptions) -> Result<()> {
        (**self).write(key, value, options)
    }
}
