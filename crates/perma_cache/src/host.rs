// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Capabilities a type provides to host memoized methods.

use std::borrow::Cow;
use std::collections::HashMap;

use parking_lot::Mutex;

use crate::{Error, KeyObject, object::short_type_name};

/// A type whose methods can be memoized.
///
/// Only [`rebuild_flags`](Self::rebuild_flags) is required. The remaining
/// methods supply optional key material and default to "not provided".
///
/// `Error` is the error type every memoized operation on this host returns.
/// Failures raised by the host's own methods travel through it unchanged,
/// while store and configuration failures convert in through `From<Error>`.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
///
/// use perma_cache::{Cacheable, Error, RebuildFlags};
///
/// struct Invoice {
///     flags: RebuildFlags,
///     region: String,
/// }
///
/// impl Cacheable for Invoice {
///     type Error = Error;
///
///     fn rebuild_flags(&self) -> &RebuildFlags {
///         &self.flags
///     }
///
///     fn has_method_key(method: &str) -> bool {
///         method == "total"
///     }
///
///     fn method_key(&self, _method: &str) -> Result<String, Error> {
///         Ok(self.region.clone())
///     }
/// }
/// ```
pub trait Cacheable {
    /// The error type returned by memoized operations on this host.
    type Error: From<Error>;

    /// Per-instance storage for the outcome of the last read-through call.
    fn rebuild_flags(&self) -> &RebuildFlags;

    /// The type segment of every key built for this host.
    ///
    /// Defaults to the last path segment of the Rust type name. Singletons
    /// standing in for a module return the module's name instead.
    fn type_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(short_type_name::<Self>())
    }

    /// Resolves the auxiliary method named by the `obj` option.
    ///
    /// # Errors
    ///
    /// The default returns [`ErrorKind::UndefinedMethod`](crate::ErrorKind::UndefinedMethod).
    /// Implementations return whatever the auxiliary method itself fails with.
    fn key_object(&self, name: &str) -> Result<Box<dyn KeyObject<Self::Error> + '_>, Self::Error> {
        Err(Error::undefined_method(name).into())
    }

    /// Whether the host defines a `<method>_key` companion for `method`.
    ///
    /// Consulted once, when the memoized method is declared.
    #[must_use]
    fn has_method_key(_method: &str) -> bool
    where
        Self: Sized,
    {
        false
    }

    /// Evaluates the `<method>_key` companion for `method`.
    ///
    /// # Errors
    ///
    /// The default returns [`ErrorKind::UndefinedMethod`](crate::ErrorKind::UndefinedMethod).
    fn method_key(&self, method: &str) -> Result<String, Self::Error> {
        Err(Error::undefined_method(format!("{method}_key")).into())
    }
}

/// Records, per memoized method, whether the last read-through call rebuilt
/// the stored value.
///
/// Flags are keyed by the method's internal stem. A method that has never been
/// called reads as not rebuilt. Concurrent calls on the same host race, and the
/// last one to finish decides the flag.
#[derive(Debug, Default)]
pub struct RebuildFlags {
    flags: Mutex<HashMap<String, bool>>,
}

impl RebuildFlags {
    /// Creates an empty flag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the flag for `stem`, or `false` if never set.
    #[must_use]
    pub fn get(&self, stem: &str) -> bool {
        self.flags.lock().get(stem).copied().unwrap_or(false)
    }

    /// Sets the flag for `stem`.
    pub fn set(&self, stem: &str, rebuilt: bool) {
        self.flags.lock().insert(stem.to_owned(), rebuilt);
    }

    /// Forgets every recorded flag.
    pub fn clear(&self) {
        self.flags.lock().clear();
    }
}

impl Clone for RebuildFlags {
    fn clone(&self) -> Self {
        Self {
            flags: Mutex::new(self.flags.lock().clone()),
        }
    }
}
