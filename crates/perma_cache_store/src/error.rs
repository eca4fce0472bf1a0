// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for store and memoization operations.

use std::fmt;

/// The category of an [`Error`].
///
/// Every failure surfaced by the perma cache crates carries exactly one kind. Errors raised by the
/// host object's own methods are never wrapped in a kind; they travel through the host's error type
/// untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A declaration named an option outside the accepted set.
    InvalidOption {
        /// The offending option key.
        option: String,
        /// The keys a declaration accepts.
        accepted: &'static [&'static str],
    },
    /// A recognized option carried a value of the wrong shape.
    InvalidOptionValue {
        /// The option key.
        option: String,
        /// A short description of the accepted value.
        expected: &'static str,
    },
    /// A memoized call needed the process-wide store but none was set.
    UndefinedCache,
    /// A declaration referenced a host method the host cannot resolve.
    UndefinedMethod {
        /// The unresolved method name.
        name: String,
    },
    /// The store failed to read or write.
    Store,
    /// A value could not be converted to or from its stored representation.
    Value,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOption { option, accepted } => {
                write!(f, "unknown option `{option}`, expected keys are [{}]", accepted.join(", "))
            }
            Self::InvalidOptionValue { option, expected } => write!(f, "option `{option}` expects {expected}"),
            Self::UndefinedCache => f.write_str("undefined cache: no cache store has been set"),
            Self::UndefinedMethod { name } => write!(f, "undefined method `{name}`"),
            Self::Store => f.write_str("cache store operation failed"),
            Self::Value => f.write_str("cached value could not be converted"),
        }
    }
}

/// An error from a store or memoization operation.
///
/// Use [`kind()`](Self::kind) to branch on the failure category and [`std::error::Error::source()`]
/// to reach the underlying cause, if any.
///
/// # Example
///
/// ```
/// use perma_cache_store::{Error, ErrorKind};
///
/// let error = Error::from_message("connection reset");
/// assert_eq!(error.kind(), &ErrorKind::Store);
/// ```
#[ohno::error]
#[display("{kind}")]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Creates an error of the given kind without an underlying cause.
    #[must_use]
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind)
    }

    /// Creates an error of the given kind wrapping an underlying cause.
    pub fn with_cause(kind: ErrorKind, cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(kind, cause)
    }

    /// Creates a store error from any type that can be converted to an error.
    ///
    /// This is the constructor store implementations use to report their own failures.
    pub fn from_message(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Store, cause)
    }

    /// Creates the error returned when no store is available.
    #[must_use]
    pub fn undefined_cache() -> Self {
        Self::new(ErrorKind::UndefinedCache)
    }

    /// Creates the error returned when a declaration names a host method that does not exist.
    #[must_use]
    pub fn undefined_method(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UndefinedMethod { name: name.into() })
    }

    /// Creates a value conversion error.
    pub fn value(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Value, cause)
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns `true` if this error was raised because no store was set.
    #[must_use]
    pub fn is_undefined_cache(&self) -> bool {
        matches!(self.kind, ErrorKind::UndefinedCache)
    }
}

/// A specialized [`Result`] type for store and memoization operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_message_is_a_store_error_carrying_the_cause() {
        let error = Error::from_message("disk full");
        assert_eq!(error.kind(), &ErrorKind::Store);

        let display = format!("{error}");
        assert!(display.contains("cache store operation failed"), "got: {display}");
        assert!(display.contains("disk full"), "got: {display}");
    }

    #[test]
    fn invalid_option_lists_the_accepted_keys() {
        let error = Error::from_kind(ErrorKind::InvalidOption {
            option: "foobar".to_string(),
            accepted: &["expires_in", "obj", "version"],
        });

        let display = format!("{error}");
        assert!(
            display.contains("expected keys are [expires_in, obj, version]"),
            "got: {display}"
        );
        assert!(display.contains("foobar"), "got: {display}");
    }

    #[test]
    fn undefined_cache_is_distinct() {
        let error = Error::undefined_cache();
        assert!(error.is_undefined_cache());
        assert!(!Error::from_message("boom").is_undefined_cache());
        assert!(format!("{error}").starts_with("undefined cache"));
    }

    #[test]
    fn undefined_method_names_the_method() {
        let error = Error::undefined_method("other_klass");
        assert_eq!(
            error.kind(),
            &ErrorKind::UndefinedMethod {
                name: "other_klass".to_string()
            }
        );
        assert!(format!("{error}").contains("`other_klass`"));
    }

    #[test]
    fn result_alias_propagates_errors() {
        fn fails() -> Result<i32> {
            Err(Error::value("not a number"))
        }

        let err = fails().expect_err("should return an error");
        assert_eq!(err.kind(), &ErrorKind::Value);
    }
}
