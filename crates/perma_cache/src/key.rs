// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cache key assembly.
//!
//! A full key is the `/`-joined sequence:
//!
//! ```text
//! perma_cache / v1 / <type> [/ v<version>] [/ <obj fragments>...] [/ <method key>] / <method>
//! ```
//!
//! The base key is everything before the final method segment. Keys are rebuilt
//! from the host's live state on every call and never cached.

use crate::{Cacheable, Declaration, build_key_from_object};

/// The first segment of every key.
pub const NAMESPACE: &str = "perma_cache";

/// The key layout version, the second segment of every key.
pub const SCHEMA_VERSION: &str = "v1";

/// Assembles the key prefix for `declaration` on `host`, without the method segment.
///
/// # Errors
///
/// Returns any error raised while resolving the `obj` key object, evaluating it,
/// or evaluating the `<method>_key` companion.
pub fn base_key<H: Cacheable>(declaration: &Declaration, host: &H) -> Result<String, H::Error> {
    let options = declaration.options();
    let mut segments = vec![NAMESPACE.to_owned(), SCHEMA_VERSION.to_owned(), host.type_name().into_owned()];

    if let Some(version) = options.version {
        segments.push(format!("v{version}"));
    }

    if let Some(obj) = options.obj.as_deref() {
        let object = host.key_object(obj)?;
        segments.extend(build_key_from_object::<H::Error, _>(object.as_ref())?.iter().map(ToString::to_string));
    }

    if declaration.has_method_key() {
        let method_key = host.method_key(declaration.names().original())?;
        segments.push(underscore_whitespace(&method_key));
    }

    Ok(segments.join("/"))
}

/// Assembles the complete key for `declaration` on `host`.
///
/// # Errors
///
/// Same as [`base_key`].
pub fn full_key<H: Cacheable>(declaration: &Declaration, host: &H) -> Result<String, H::Error> {
    let mut key = base_key(declaration, host)?;
    key.push('/');
    key.push_str(declaration.names().key_segment());
    Ok(key)
}

fn underscore_whitespace(fragment: &str) -> String {
    fragment.chars().map(|c| if c.is_whitespace() { '_' } else { c }).collect()
}
