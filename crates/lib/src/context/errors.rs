//! Error types for per-invocation mapping state.

use thiserror::Error;

/// Structured error types for the mapping context.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ContextError {
    /// The same source instance was mapped twice for one type pair
    #[error("Source instance already mapped for ({source_type} -> {target_type})")]
    DuplicateTarget {
        source_type: String,
        target_type: String,
    },

    /// Only objects and collections have an identity to key on
    #[error("Value of type {value_type} has no reference identity")]
    NotAReference { value_type: String },
}

impl ContextError {
    /// Check if this error is a duplicate target cache key
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ContextError::DuplicateTarget { .. })
    }
}

// Conversion from ContextError to the main Error type
impl From<ContextError> for crate::Error {
    fn from(err: ContextError) -> Self {
        crate::Error::Context(err)
    }
}
