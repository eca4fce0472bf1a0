// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Options accepted when declaring a memoized method.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::{Error, ErrorKind, Result};

/// The option keys a declaration accepts, in sorted order.
pub const ACCEPTED_OPTIONS: &[&str] = &["expires_in", "obj", "version"];

/// Declaration options for a memoized method.
///
/// Build them with the chainable setters, or from untyped configuration with
/// [`Options::from_pairs`] or `Options::try_from(map)`, which reject unknown keys.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use perma_cache::Options;
///
/// let options = Options::new()
///     .version(2)
///     .obj("account")
///     .expires_in(Duration::from_secs(300));
///
/// assert_eq!(options.version, Some(2));
/// assert_eq!(options.obj.as_deref(), Some("account"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Adds a `v<version>` key segment.
    pub version: Option<u64>,
    /// Names the host method whose returned object contributes key fragments.
    pub obj: Option<String>,
    /// Expiry hint passed to the store on every write.
    pub expires_in: Option<Duration>,
}

impl Options {
    /// Creates options with nothing declared.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key version.
    #[must_use]
    pub fn version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the auxiliary key object method name.
    #[must_use]
    pub fn obj(mut self, method: impl Into<String>) -> Self {
        self.obj = Some(method.into());
        self
    }

    /// Sets the expiry hint.
    #[must_use]
    pub fn expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Parses options from untyped key/value pairs.
    ///
    /// Every key is checked against [`ACCEPTED_OPTIONS`] before any value is
    /// interpreted. A `null` value leaves the option undeclared.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidOption`] for an unknown key and
    /// [`ErrorKind::InvalidOptionValue`] for a value of the wrong shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use perma_cache::{ErrorKind, Options};
    /// use serde_json::json;
    ///
    /// let options = Options::from_pairs([("version", json!(3)), ("expires_in", json!(1.5))])?;
    /// assert_eq!(options.version, Some(3));
    ///
    /// let error = Options::from_pairs([("expire_in", json!(60))]).unwrap_err();
    /// assert!(matches!(error.kind(), ErrorKind::InvalidOption { .. }));
    /// # Ok::<(), perma_cache::Error>(())
    /// ```
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut version = None;
        let mut obj = None;
        let mut expires_in = None;

        for (key, value) in pairs {
            match key.as_ref() {
                "version" => version = Some(value),
                "obj" => obj = Some(value),
                "expires_in" => expires_in = Some(value),
                other => {
                    return Err(Error::from_kind(ErrorKind::InvalidOption {
                        option: other.to_owned(),
                        accepted: ACCEPTED_OPTIONS,
                    }));
                }
            }
        }

        Ok(Self {
            version: version.as_ref().map(parse_version).transpose()?.flatten(),
            obj: obj.map(parse_obj).transpose()?.flatten(),
            expires_in: expires_in.as_ref().map(parse_expires_in).transpose()?.flatten(),
        })
    }
}

impl TryFrom<Map<String, Value>> for Options {
    type Error = Error;

    fn try_from(map: Map<String, Value>) -> Result<Self> {
        Self::from_pairs(map)
    }
}

fn invalid_value(option: &str, expected: &'static str) -> Error {
    Error::from_kind(ErrorKind::InvalidOptionValue {
        option: option.to_owned(),
        expected,
    })
}

fn parse_version(value: &Value) -> Result<Option<u64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_u64().map(Some).ok_or_else(|| invalid_value("version", "a non-negative integer")),
        _ => Err(invalid_value("version", "a non-negative integer")),
    }
}

fn parse_obj(value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(method) => Ok(Some(method)),
        _ => Err(invalid_value("obj", "a method name string")),
    }
}

fn parse_expires_in(value: &Value) -> Result<Option<Duration>> {
    const EXPECTED: &str = "a non-negative number of seconds";

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(secs) = n.as_u64() {
                return Ok(Some(Duration::from_secs(secs)));
            }
            n.as_f64()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .map(Some)
                .ok_or_else(|| invalid_value("expires_in", EXPECTED))
        }
        _ => Err(invalid_value("expires_in", EXPECTED)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builder_sets_fields() {
        let options = Options::new().version(2).obj("aux").expires_in(Duration::from_secs(5));
        assert_eq!(
            options,
            Options {
                version: Some(2),
                obj: Some("aux".to_owned()),
                expires_in: Some(Duration::from_secs(5)),
            }
        );
    }

    #[test]
    fn empty_pairs_declare_nothing() {
        let options = Options::from_pairs(Vec::<(&str, Value)>::new()).unwrap();
        assert_eq!(options, Options::new());
    }

    #[test]
    fn unknown_key_lists_accepted_set() {
        let error = Options::from_pairs([("if", json!(true))]).unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::InvalidOption {
                option: "if".to_owned(),
                accepted: ACCEPTED_OPTIONS,
            }
        );
        assert_eq!(
            error.kind().to_string(),
            "unknown option `if`, expected keys are [expires_in, obj, version]"
        );
    }

    #[test]
    fn unknown_key_is_reported_before_bad_values() {
        let error = Options::from_pairs([("version", json!("two")), ("bogus", json!(1))]).unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::InvalidOption { option, .. } if option == "bogus"));
    }

    #[test]
    fn parses_every_option() {
        let options = Options::from_pairs([("version", json!(2)), ("obj", json!("aux")), ("expires_in", json!(5))]).unwrap();
        assert_eq!(options, Options::new().version(2).obj("aux").expires_in(Duration::from_secs(5)));
    }

    #[test]
    fn fractional_expiry() {
        let options = Options::from_pairs([("expires_in", json!(0.25))]).unwrap();
        assert_eq!(options.expires_in, Some(Duration::from_millis(250)));
    }

    #[test]
    fn null_values_are_undeclared() {
        let options = Options::from_pairs([("version", Value::Null), ("obj", Value::Null), ("expires_in", Value::Null)]).unwrap();
        assert_eq!(options, Options::new());
    }

    #[test]
    fn wrong_value_shapes_are_rejected() {
        for (key, value) in [
            ("version", json!(-1)),
            ("version", json!(1.5)),
            ("obj", json!(7)),
            ("expires_in", json!(-3)),
            ("expires_in", json!("soon")),
        ] {
            let error = Options::from_pairs([(key, value)]).unwrap_err();
            assert!(
                matches!(error.kind(), ErrorKind::InvalidOptionValue { option, .. } if option == key),
                "unexpected error for {key}: {error}"
            );
        }
    }

    #[test]
    fn try_from_map() {
        let Value::Object(map) = json!({ "version": 4, "obj": "owner" }) else {
            unreachable!()
        };
        let options = Options::try_from(map).unwrap();
        assert_eq!(options.version, Some(4));
        assert_eq!(options.obj.as_deref(), Some("owner"));
    }
}
