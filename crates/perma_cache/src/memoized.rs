// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Memoized methods and their call surface.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::telemetry::{Activity, Operation, Telemetry};
use crate::{CacheRegistry, CacheStore, Cacheable, Error, MethodNames, Options, WriteOptions, key};

/// Everything captured about a memoized method when it is declared.
///
/// A declaration is immutable. It holds the derived name family, the declared
/// options, and whether the host provides a `<method>_key` companion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    names: MethodNames,
    options: Options,
    has_method_key: bool,
}

impl Declaration {
    /// Declares `name` on host type `H`.
    ///
    /// [`Cacheable::has_method_key`] is consulted here, once.
    #[must_use]
    pub fn new<H: Cacheable>(name: impl Into<String>, options: Options) -> Self {
        let names = MethodNames::new(name);
        let has_method_key = H::has_method_key(names.original());
        Self {
            names,
            options,
            has_method_key,
        }
    }

    /// The derived name family.
    #[must_use]
    pub fn names(&self) -> &MethodNames {
        &self.names
    }

    /// The declared options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Whether keys include the `<method>_key` companion segment.
    #[must_use]
    pub fn has_method_key(&self) -> bool {
        self.has_method_key
    }
}

type Body<H, V> = dyn Fn(&H) -> Result<V, <H as Cacheable>::Error> + Send + Sync;

/// A memoized method on host type `H` returning `V`.
///
/// `Memoized` holds the original method body and exposes the family of entry
/// points derived from it:
///
/// | Method | Store reads | Store writes | Runs body |
/// |---|---|---|---|
/// | [`with_perma_cache`](Self::with_perma_cache) / [`call`](Self::call) | yes | on miss | on miss |
/// | [`rebuild`](Self::rebuild) | no | yes | yes |
/// | [`get_perma_cache`](Self::get_perma_cache) | yes | no | no |
/// | [`without_perma_cache`](Self::without_perma_cache) | no | no | yes |
///
/// Values cross the store boundary as JSON. A stored `null` reads as absent.
///
/// The store is the one injected with [`with_store`](Self::with_store), or
/// else the process-wide [`CacheRegistry`] store at call time. It is resolved
/// before the key is built or the body runs.
///
/// # Examples
///
/// ```
/// use perma_cache::{Cacheable, Error, Memoized, Options, RebuildFlags};
/// use perma_cache_store::testing::MockStore;
///
/// #[derive(Default)]
/// struct Report {
///     flags: RebuildFlags,
/// }
///
/// impl Cacheable for Report {
///     type Error = Error;
///
///     fn rebuild_flags(&self) -> &RebuildFlags {
///         &self.flags
///     }
/// }
///
/// let total: Memoized<Report, u64> = Memoized::declare("total", Options::new().version(2), |_: &Report| Ok(42))
///     .with_store(MockStore::new());
///
/// let report = Report::default();
/// assert_eq!(total.perma_cache_key(&report)?, "perma_cache/v1/Report/v2/total");
///
/// assert_eq!(total.call(&report)?, 42);
/// assert!(total.was_rebuilt(&report));
///
/// assert_eq!(total.call(&report)?, 42);
/// assert!(!total.was_rebuilt(&report));
/// # Ok::<(), Error>(())
/// ```
pub struct Memoized<H: Cacheable, V> {
    declaration: Declaration,
    body: Box<Body<H, V>>,
    store: Option<Arc<dyn CacheStore>>,
    telemetry: Telemetry,
}

struct Outcome<T> {
    value: T,
    key: Option<String>,
    activity: Activity,
}

impl<H, V> Memoized<H, V>
where
    H: Cacheable,
    V: Serialize + DeserializeOwned,
{
    /// Declares a memoized method named `name` with the given body.
    pub fn declare<F>(name: impl Into<String>, options: Options, body: F) -> Self
    where
        F: Fn(&H) -> Result<V, H::Error> + Send + Sync + 'static,
    {
        Self {
            declaration: Declaration::new::<H>(name, options),
            body: Box::new(body),
            store: None,
            telemetry: Telemetry::default(),
        }
    }

    /// Declares a memoized method from untyped options.
    ///
    /// # Errors
    ///
    /// Fails before anything is declared if `options` contains an unknown key
    /// or a malformed value; see [`Options::from_pairs`].
    pub fn try_declare<F>(name: impl Into<String>, options: Map<String, Value>, body: F) -> crate::Result<Self>
    where
        F: Fn(&H) -> Result<V, H::Error> + Send + Sync + 'static,
    {
        Ok(Self::declare(name, Options::try_from(options)?, body))
    }

    /// Uses `store` instead of the process-wide registry.
    #[must_use]
    pub fn with_store(self, store: impl CacheStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Uses an already shared `store` instead of the process-wide registry.
    #[must_use]
    pub fn with_shared_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Attaches telemetry to every entry point.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// The declaration captured for this method.
    #[must_use]
    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// The derived name family.
    #[must_use]
    pub fn names(&self) -> &MethodNames {
        self.declaration.names()
    }

    /// The key prefix for `host`, without the method segment.
    ///
    /// # Errors
    ///
    /// Propagates failures of the host's key object and method key companion.
    pub fn base_key(&self, host: &H) -> Result<String, H::Error> {
        key::base_key(&self.declaration, host)
    }

    /// The full cache key for `host`.
    ///
    /// # Errors
    ///
    /// Propagates failures of the host's key object and method key companion.
    pub fn perma_cache_key(&self, host: &H) -> Result<String, H::Error> {
        key::full_key(&self.declaration, host)
    }

    /// Returns the stored value, or runs the body and stores its result.
    ///
    /// A hit clears the rebuild flag and a miss sets it.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::UndefinedCache`](crate::ErrorKind::UndefinedCache) when
    /// no store is available. Host, body and store failures propagate unchanged.
    pub fn with_perma_cache(&self, host: &H) -> Result<V, H::Error> {
        let started = Instant::now();
        let outcome = self.read_through(host);
        self.observe(Operation::ReadThrough, started, outcome)
    }

    /// Same as [`with_perma_cache`](Self::with_perma_cache).
    ///
    /// # Errors
    ///
    /// See [`with_perma_cache`](Self::with_perma_cache).
    pub fn call(&self, host: &H) -> Result<V, H::Error> {
        self.with_perma_cache(host)
    }

    /// Runs the body and stores its result without reading first.
    ///
    /// Sets the rebuild flag.
    ///
    /// # Errors
    ///
    /// See [`with_perma_cache`](Self::with_perma_cache).
    pub fn rebuild(&self, host: &H) -> Result<V, H::Error> {
        let started = Instant::now();
        let outcome = self.force(host);
        self.observe(Operation::Rebuild, started, outcome)
    }

    /// Returns the stored value without running the body or writing.
    ///
    /// # Errors
    ///
    /// Fails when no store is available, when the key cannot be built, when the
    /// store read fails, or with [`ErrorKind::Value`](crate::ErrorKind::Value)
    /// when the stored value does not decode as `V`.
    pub fn get_perma_cache(&self, host: &H) -> Result<Option<V>, H::Error> {
        let started = Instant::now();
        let outcome = self.peek(host);
        self.observe(Operation::Get, started, outcome)
    }

    /// Runs the body directly, without touching the store.
    ///
    /// # Errors
    ///
    /// Returns whatever the body returns.
    pub fn without_perma_cache(&self, host: &H) -> Result<V, H::Error> {
        let started = Instant::now();
        let outcome = (self.body)(host).map(|value| Outcome {
            value,
            key: None,
            activity: Activity::Bypassed,
        });
        self.observe(Operation::Bypass, started, outcome)
    }

    /// Whether the last read-through call on `host` rebuilt the value.
    #[must_use]
    pub fn was_rebuilt(&self, host: &H) -> bool {
        host.rebuild_flags().get(self.names().stem())
    }

    fn store(&self) -> crate::Result<Arc<dyn CacheStore>> {
        match &self.store {
            Some(store) => Ok(Arc::clone(store)),
            None => CacheRegistry::global().get(),
        }
    }

    fn read_through(&self, host: &H) -> Result<Outcome<V>, H::Error> {
        let store = self.store()?;
        let key = self.perma_cache_key(host)?;

        if let Some(value) = decode(store.read(&key)?)? {
            host.rebuild_flags().set(self.names().stem(), false);
            return Ok(Outcome {
                value,
                key: Some(key),
                activity: Activity::Hit,
            });
        }

        let value = self.compute_and_write(host, store.as_ref(), &key)?;
        Ok(Outcome {
            value,
            key: Some(key),
            activity: Activity::Miss,
        })
    }

    fn force(&self, host: &H) -> Result<Outcome<V>, H::Error> {
        let store = self.store()?;
        let key = self.perma_cache_key(host)?;
        let value = self.compute_and_write(host, store.as_ref(), &key)?;
        Ok(Outcome {
            value,
            key: Some(key),
            activity: Activity::Rebuilt,
        })
    }

    fn peek(&self, host: &H) -> Result<Outcome<Option<V>>, H::Error> {
        let store = self.store()?;
        let key = self.perma_cache_key(host)?;
        let value = decode(store.read(&key)?)?;
        let activity = if value.is_some() { Activity::Hit } else { Activity::Miss };
        Ok(Outcome {
            value,
            key: Some(key),
            activity,
        })
    }

    fn compute_and_write(&self, host: &H, store: &dyn CacheStore, key: &str) -> Result<V, H::Error> {
        let value = (self.body)(host)?;
        let encoded = serde_json::to_value(&value).map_err(Error::value)?;
        let options = WriteOptions::new().with_expires_in(self.declaration.options().expires_in);
        store.write(key, encoded, options)?;
        host.rebuild_flags().set(self.names().stem(), true);
        Ok(value)
    }

    fn observe<T>(&self, operation: Operation, started: Instant, outcome: Result<Outcome<T>, H::Error>) -> Result<T, H::Error> {
        let method = self.names().original();
        match outcome {
            Ok(Outcome { value, key, activity }) => {
                self.telemetry
                    .record(method, key.as_deref(), operation, activity, started.elapsed());
                Ok(value)
            }
            Err(error) => {
                self.telemetry
                    .record(method, None, operation, Activity::Error, started.elapsed());
                Err(error)
            }
        }
    }
}

fn decode<V: DeserializeOwned>(stored: Option<Value>) -> crate::Result<Option<V>> {
    match stored {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some).map_err(Error::value),
    }
}

impl<H: Cacheable, V> fmt::Debug for Memoized<H, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("declaration", &self.declaration)
            .field("has_store", &self.store.is_some())
            .field("telemetry", &self.telemetry)
            .finish_non_exhaustive()
    }
}
