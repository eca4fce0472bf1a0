// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Turning arbitrary objects into cache key fragments.

use std::borrow::Cow;
use std::fmt;

use crate::Error;

/// One component of a cache key contributed by an object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyFragment {
    /// A textual component.
    Str(String),
    /// An integer identity.
    Int(i64),
}

impl fmt::Display for KeyFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for KeyFragment {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for KeyFragment {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for KeyFragment {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for KeyFragment {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for KeyFragment {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

/// An object that can describe itself inside a cache key.
///
/// Objects contribute to keys in one of three ways, checked in order:
///
/// 1. [`cache_key`](Self::cache_key) returns `Some`: that string is the whole contribution.
/// 2. [`id`](Self::id) returns `Some`: the contribution is the type name followed by the id.
/// 3. Otherwise: the contribution is the type name alone.
///
/// The error parameter lets the object's own failures flow out unchanged through the
/// host's error type.
///
/// # Examples
///
/// ```
/// use perma_cache::{KeyFragment, KeyObject, build_key_from_object};
///
/// struct Account {
///     id: i64,
/// }
///
/// impl KeyObject for Account {
///     fn id(&self) -> Option<Result<KeyFragment, perma_cache::Error>> {
///         Some(Ok(self.id.into()))
///     }
/// }
///
/// let fragments = build_key_from_object::<perma_cache::Error, _>(&Account { id: 7 })?;
/// assert_eq!(fragments, vec![KeyFragment::from("Account"), KeyFragment::Int(7)]);
/// # Ok::<(), perma_cache::Error>(())
/// ```
pub trait KeyObject<E = Error> {
    /// The name used when the object contributes its type to a key.
    ///
    /// Defaults to the last path segment of the Rust type name.
    fn type_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(short_type_name::<Self>())
    }

    /// A string that fully describes this object inside a key, if it has one.
    fn cache_key(&self) -> Option<Result<String, E>> {
        None
    }

    /// A stable identity for this object, if it has one.
    fn id(&self) -> Option<Result<KeyFragment, E>> {
        None
    }
}

/// Returns the ordered key fragments an object contributes.
///
/// # Errors
///
/// Returns any error produced by the object's own [`KeyObject::cache_key`] or
/// [`KeyObject::id`].
pub fn build_key_from_object<E, O>(object: &O) -> Result<Vec<KeyFragment>, E>
where
    O: KeyObject<E> + ?Sized,
{
    if let Some(cache_key) = object.cache_key() {
        return Ok(vec![KeyFragment::Str(cache_key?)]);
    }

    let type_name = KeyFragment::Str(object.type_name().into_owned());
    match object.id() {
        Some(id) => Ok(vec![type_name, id?]),
        None => Ok(vec![type_name]),
    }
}

/// Returns the last path segment of `T`'s type name, without generic arguments.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.find('<').map_or(full, |generics| &full[..generics]);
    path.rfind("::").map_or(path, |separator| &path[separator + 2..])
}
