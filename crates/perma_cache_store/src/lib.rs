// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Store contract for the `perma_cache` memoization library.
//!
//! This crate defines the [`CacheStore`] trait every backing store must satisfy, the
//! [`WriteOptions`] passed alongside each write, and the [`Error`] type shared by all
//! perma cache crates.
//!
//! # Overview
//!
//! The memoization layer derives keys and decides when to read or write; the store decides
//! how bytes are kept, when they expire and how they are evicted. Implement [`CacheStore`]
//! for your backend, then hand it to `perma_cache`.
//!
//! # Implementing a Store
//!
//! ```
//! use perma_cache_store::{CacheStore, Result, WriteOptions};
//! use serde_json::Value;
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! #[derive(Default)]
//! struct SimpleStore(RwLock<HashMap<String, Value>>);
//!
//! impl CacheStore for SimpleStore {
//!     fn read(&self, key: &str) -> Result<Option<Value>> {
//!         Ok(self.0.read().unwrap().get(key).cloned())
//!     }
//!
//!     fn write(&self, key: &str, value: Value, _options: WriteOptions) -> Result<()> {
//!         self.0.write().unwrap().insert(key.to_string(), value);
//!         Ok(())
//!     }
//! }
//!
//! let store = SimpleStore::default();
//! store.write("greeting", Value::from("hello"), WriteOptions::new())?;
//! assert_eq!(store.read("greeting")?, Some(Value::from("hello")));
//! # Ok::<(), perma_cache_store::Error>(())
//! ```
//!
//! # Testing
//!
//! Enable the `test-util` feature for [`testing::MockStore`], a recording store with failure
//! injection.

pub mod error;
pub(crate) mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use store::{CacheStore, WriteOptions};
