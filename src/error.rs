//! Error types for cache operations.
//!
//! Every failing operation returns a [`CacheError`] the caller can branch on.
//! A failed write never publishes anything: the table that was visible before
//! the call is still the one visible after it.

/// Errors returned by cache operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The key is absent from the version of the table the operation observed.
    #[error("key not found")]
    KeyNotFound,

    /// The cache has no entries to pop.
    #[error("cache is empty")]
    EmptyCache,

    /// The operation is refused by design.
    #[error("{operation} is not supported: {hint}")]
    UnsupportedOperation {
        /// Name of the refused operation.
        operation: &'static str,
        /// What to do instead.
        hint: &'static str,
    },
}

impl CacheError {
    /// The error returned for membership tests.
    ///
    /// Checking for a key and then reading it are two separate observations of
    /// a table that may be replaced in between, so the cache refuses to answer.
    pub const fn membership_refused() -> Self {
        Self::UnsupportedOperation {
            operation: "membership test",
            hint: "read the key directly with `get` and handle `KeyNotFound`",
        }
    }

    /// Returns `true` for [`CacheError::KeyNotFound`].
    #[inline]
    pub const fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound)
    }
}

/// Result alias for cache operations.
pub type Result<T> = core::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    extern crate alloc;
    use alloc::string::ToString;

    #[test]
    fn test_error_messages() {
        assert_eq!(CacheError::KeyNotFound.to_string(), "key not found");
        assert_eq!(CacheError::EmptyCache.to_string(), "cache is empty");
        assert_eq!(
            CacheError::membership_refused().to_string(),
            "membership test is not supported: read the key directly with `get` and handle `KeyNotFound`"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(CacheError::KeyNotFound.is_key_not_found());
        assert!(!CacheError::EmptyCache.is_key_not_found());
        assert!(matches!(
            CacheError::membership_refused(),
            CacheError::UnsupportedOperation { operation: "membership test", .. }
        ));
    }
}
