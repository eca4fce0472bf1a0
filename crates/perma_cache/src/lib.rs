// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Method-level memoization with deterministic cache keys.
//!
//! A memoized method pairs a computation on a host object with a cache key
//! derived from the host's type, a declared version, an optional auxiliary key
//! object and an optional per-method key companion. Calls are routed through a
//! pluggable [`CacheStore`]:
//!
//! - [`Memoized::call`] reads through: a stored value is returned as-is, a miss
//!   runs the body and writes the result.
//! - [`Memoized::rebuild`] always runs the body and writes, without reading.
//! - [`Memoized::get_perma_cache`] only reads.
//! - [`Memoized::without_perma_cache`] ignores the store entirely.
//!
//! Keys look like `perma_cache/v1/KlassOne/v2/method3` and are rebuilt from the
//! host's live state on every call.
//!
//! # Examples
//!
//! ```
//! use std::sync::LazyLock;
//!
//! use perma_cache::{Cacheable, Error, KeyFragment, KeyObject, Memoized, Options, RebuildFlags};
//! use perma_cache_store::testing::MockStore;
//!
//! struct Owner {
//!     id: i64,
//! }
//!
//! impl KeyObject for Owner {
//!     fn id(&self) -> Option<Result<KeyFragment, Error>> {
//!         Some(Ok(self.id.into()))
//!     }
//! }
//!
//! struct Dashboard {
//!     owner: Owner,
//!     flags: RebuildFlags,
//! }
//!
//! impl Cacheable for Dashboard {
//!     type Error = Error;
//!
//!     fn rebuild_flags(&self) -> &RebuildFlags {
//!         &self.flags
//!     }
//!
//!     fn key_object(&self, name: &str) -> Result<Box<dyn KeyObject + '_>, Error> {
//!         match name {
//!             "owner" => Ok(Box::new(Owner { id: self.owner.id })),
//!             other => Err(Error::undefined_method(other)),
//!         }
//!     }
//! }
//!
//! static WIDGETS: LazyLock<Memoized<Dashboard, Vec<String>>> = LazyLock::new(|| {
//!     Memoized::declare("widgets", Options::new().obj("owner"), |_: &Dashboard| {
//!         Ok(vec!["sales".to_owned(), "alerts".to_owned()])
//!     })
//!     .with_store(MockStore::new())
//! });
//!
//! let dashboard = Dashboard {
//!     owner: Owner { id: 12 },
//!     flags: RebuildFlags::new(),
//! };
//!
//! assert_eq!(
//!     WIDGETS.perma_cache_key(&dashboard)?,
//!     "perma_cache/v1/Dashboard/Owner/12/widgets"
//! );
//! assert_eq!(WIDGETS.call(&dashboard)?.len(), 2);
//! assert!(WIDGETS.was_rebuilt(&dashboard));
//! # Ok::<(), Error>(())
//! ```
//!
//! # Choosing a store
//!
//! Inject a store per method with [`Memoized::with_store`] (an in-process
//! `MemoryStore` ships behind the `memory` feature), or set one for the
//! whole process with [`set_cache`]. Methods without an injected store fail
//! with [`ErrorKind::UndefinedCache`] until one is set.
//!
//! # Features
//!
//! - `memory` (default): re-exports `MemoryStore`, an in-process store.
//! - `logs`: `Telemetry::with_logs` emits `tracing` events.
//! - `metrics`: `Telemetry::with_metrics` records OpenTelemetry metrics.
//! - `test-util`: enables `perma_cache_store::testing::MockStore`.

mod host;
pub mod key;
mod memoized;
mod names;
mod object;
mod options;
mod registry;
mod telemetry;

#[doc(inline)]
pub use host::{Cacheable, RebuildFlags};
#[doc(inline)]
pub use memoized::{Declaration, Memoized};
#[doc(inline)]
pub use names::MethodNames;
#[doc(inline)]
pub use object::{KeyFragment, KeyObject, build_key_from_object, short_type_name};
#[doc(inline)]
pub use options::{ACCEPTED_OPTIONS, Options};
#[cfg(feature = "memory")]
#[doc(inline)]
pub use perma_cache_memory::{MemoryStore, MemoryStoreBuilder};
#[doc(inline)]
pub use perma_cache_store::{CacheStore, Error, ErrorKind, Result, WriteOptions};
#[doc(inline)]
pub use registry::{CacheRegistry, cache, clear_cache, set_cache};
#[doc(inline)]
pub use telemetry::Telemetry;
