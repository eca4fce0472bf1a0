// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-memory cache store backed by moka.
//!
//! This crate provides [`MemoryStore`], a concurrent in-memory [`CacheStore`](perma_cache_store::CacheStore)
//! using moka's `TinyLFU` eviction. The `expires_in` hint of every write becomes the lifetime of
//! that entry. Use [`MemoryStoreBuilder`] to configure capacity and a store-wide time-to-live
//! without exposing moka types directly.
//!
//! # Quick Start
//!
//! ```
//! use perma_cache_memory::MemoryStore;
//! use perma_cache_store::{CacheStore, WriteOptions};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! let store = MemoryStore::builder()
//!     .max_capacity(1000)
//!     .time_to_live(Duration::from_secs(300))
//!     .build();
//!
//! store.write("perma_cache/v1/Report/total", json!(42), WriteOptions::new())?;
//! assert_eq!(store.read("perma_cache/v1/Report/total")?, Some(json!(42)));
//! # Ok::<(), perma_cache_store::Error>(())
//! ```

pub mod builder;
pub mod store;

#[doc(inline)]
pub use builder::MemoryStoreBuilder;
#[doc(inline)]
pub use store::MemoryStore;
