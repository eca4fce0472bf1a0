// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock store implementation for testing.
//!
//! This module provides `MockStore`, a configurable in-memory store that
//! records all operations and supports failure injection for testing error paths.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use serde_json::Value;

use crate::{CacheStore, Error, Result, WriteOptions};

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// A read was performed with the given key.
    Read(String),
    /// A write was performed with the given key, value and options.
    Write {
        /// The key that was written.
        key: String,
        /// The value that was written.
        value: Value,
        /// The options the write carried.
        options: WriteOptions,
    },
}

impl StoreOp {
    /// Returns the key this operation touched.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Read(key) | Self::Write { key, .. } => key,
        }
    }
}

type FailPredicate = Arc<dyn Fn(&StoreOp) -> bool + Send + Sync>;

/// A configurable mock store for testing.
///
/// The store keeps values in memory, ignores lifetime hints (it only records them) and can be
/// configured to fail operations on demand. All operations are recorded for later verification.
///
/// # Examples
///
/// ```
/// use perma_cache_store::testing::{MockStore, StoreOp};
/// use perma_cache_store::{CacheStore, WriteOptions};
/// use serde_json::json;
///
/// let store = MockStore::new();
///
/// store.write("key", json!(42), WriteOptions::new()).unwrap();
/// assert_eq!(store.read("key").unwrap(), Some(json!(42)));
///
/// assert_eq!(
///     store.operations(),
///     vec![
///         StoreOp::Write {
///             key: "key".to_string(),
///             value: json!(42),
///             options: WriteOptions::new(),
///         },
///         StoreOp::Read("key".to_string()),
///     ]
/// );
/// ```
///
/// # Failure Injection
///
/// ```
/// use perma_cache_store::testing::{MockStore, StoreOp};
/// use perma_cache_store::CacheStore;
///
/// let store = MockStore::new();
///
/// store.fail_when(|op| matches!(op, StoreOp::Read(key) if key == "forbidden"));
/// assert!(store.read("forbidden").is_err());
/// assert!(store.read("allowed").is_ok());
/// ```
#[derive(Clone, Default)]
pub struct MockStore {
    data: Arc<Mutex<HashMap<String, Value>>>,
    operations: Arc<Mutex<Vec<StoreOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl MockStore {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock store with pre-populated data.
    #[must_use]
    pub fn with_data(data: HashMap<String, Value>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            ..Self::default()
        }
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if a value is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Returns the value stored under `key` without recording a read.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.data.lock().get(key).cloned()
    }

    /// Sets a predicate that determines when operations should fail.
    ///
    /// Failing operations are still recorded, but leave the stored data untouched.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Arc::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().clone()
    }

    /// Returns the number of recorded reads.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.operations.lock().iter().filter(|op| matches!(op, StoreOp::Read(_))).count()
    }

    /// Returns the number of recorded writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.operations
            .lock()
            .iter()
            .filter(|op| matches!(op, StoreOp::Write { .. }))
            .count()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn record(&self, op: StoreOp) -> Result<()> {
        // The predicate may call back into this store, so it runs unlocked.
        let predicate = self.fail_when.lock().clone();
        let fail = predicate.is_some_and(|predicate| predicate(&op));
        let message = match &op {
            StoreOp::Read(_) => "mock: read failed",
            StoreOp::Write { .. } => "mock: write failed",
        };
        self.operations.lock().push(op);
        if fail { Err(Error::from_message(message)) } else { Ok(()) }
    }
}

impl CacheStore for MockStore {
    fn read(&self, key: &str) -> Result<Option<Value>> {
        self.record(StoreOp::Read(key.to_string()))?;
        Ok(self.data.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: Value, options: WriteOptions) -> Result<()> {
        self.record(StoreOp::Write {
            key: key.to_string(),
            value: value.clone(),
            options,
        })?;
        self.data.lock().insert(key.to_string(), value);
        Ok(())
    }
}
