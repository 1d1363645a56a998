//! Error types for operator configuration and application.
//!
//! Every operator reports failures through the single [`Error`] enum. Errors
//! raised while configuring an operator (for example a pool limit of zero)
//! are returned immediately; errors raised while applying an operator to a
//! value travel through the returned [`Eventual`](crate::eventual::Eventual).
//!
//! Failures produced by user-supplied functions are passed through untouched:
//! the library never retries, suppresses, or logs them.
//!
//! # Examples
//!
//! ```rust
//! use tacit::Error;
//!
//! let error = Error::message("boom");
//! assert_eq!(format!("{error}"), "boom");
//! assert!(!error.is_cancelled());
//! assert!(Error::Cancelled.is_cancelled());
//! ```

use std::sync::Arc;

/// Errors that can occur when configuring or applying an operator.
///
/// The type is `Clone` so that a single failure can be observed by several
/// concurrently joined computations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// An operator was configured with an argument it cannot work with.
    #[error("{operator}: invalid configuration: {reason}")]
    InvalidConfiguration {
        /// The operator that rejected its configuration.
        operator: &'static str,
        /// Why the configuration was rejected.
        reason: String,
    },

    /// The value given to a configured operator has no supported shape.
    #[error("{operator}: unsupported operand of type {found}")]
    InvalidOperand {
        /// The operator that rejected the value.
        operator: &'static str,
        /// The type name of the rejected value.
        found: &'static str,
    },

    /// A pool operator was configured with a concurrency limit below 1.
    #[error("{operator}: concurrency limit must be at least 1, got {limit}")]
    InvalidConcurrencyLimit {
        /// The pool operator.
        operator: &'static str,
        /// The rejected limit.
        limit: usize,
    },

    /// A reduction over an empty container had no initial value.
    #[error("cannot reduce empty container without initial value")]
    EmptyReduction,

    /// A pending result appeared where a synchronous sequence must decide
    /// what to yield (filtering, or flattening an element).
    ///
    /// Reported lazily, at the pull where the pending result shows up.
    #[error("{operator}: pending result inside a synchronous sequence")]
    SyncSequenceMisuse {
        /// The operator that observed the pending result.
        operator: &'static str,
    },

    /// An asynchronous reduction was cancelled through its handle.
    #[error("reduction cancelled")]
    Cancelled,

    /// A failure raised by a user-supplied function.
    #[error("{0}")]
    Message(String),

    /// A foreign error raised by a user-supplied function.
    #[error(transparent)]
    External(Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Creates an [`Error::Message`] from anything printable.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Wraps a foreign error.
    pub fn external<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::External(Arc::new(error))
    }

    /// Returns `true` for the dedicated cancellation marker.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub(crate) const fn invalid_operand(operator: &'static str, found: &'static str) -> Self {
        Self::InvalidOperand { operator, found }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_operand_display() {
        let error = Error::invalid_operand("map", "Int");
        assert_eq!(format!("{error}"), "map: unsupported operand of type Int");
    }

    #[test]
    fn test_invalid_concurrency_limit_display() {
        let error = Error::InvalidConcurrencyLimit {
            operator: "map_pool",
            limit: 0,
        };
        assert_eq!(
            format!("{error}"),
            "map_pool: concurrency limit must be at least 1, got 0"
        );
    }

    #[test]
    fn test_empty_reduction_display() {
        assert_eq!(
            format!("{}", Error::EmptyReduction),
            "cannot reduce empty container without initial value"
        );
    }

    #[test]
    fn test_external_is_transparent() {
        let error = Error::external(std::io::Error::other("disk on fire"));
        assert_eq!(format!("{error}"), "disk on fire");
    }

    #[test]
    fn test_only_cancelled_is_cancelled() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::EmptyReduction.is_cancelled());
        assert!(!Error::message("cancelled").is_cancelled());
    }
}
