//! Error types for injection resolution and application.
//!
//! This module defines structured error types for invalid injection construction,
//! resolution misses surfaced by callers, and shape mismatches detected while an
//! injection is being applied.

use thiserror::Error;

use crate::injection::Capability;

/// Structured error types for injection operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InjectionError {
    /// An argument had the wrong shape for the requested operation
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// No store produced an injection for the requested pair
    #[error("No {capability} injection for ({source_type} -> {target_type})")]
    NoInjection {
        source_type: String,
        target_type: String,
        capability: Capability,
    },

    /// A resolved injection does not offer the requested capability
    #[error("Injection ({source_type} -> {target_type}) does not support {capability}")]
    UnsupportedCapability {
        source_type: String,
        target_type: String,
        capability: Capability,
    },

    /// A value did not have the shape the injection expects
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A fixed-size collection cannot change length in place
    #[error("Cannot resize fixed-size collection {collection_type} from {current} to {required}")]
    FixedSizeCollection {
        collection_type: String,
        current: usize,
        required: usize,
    },
}

impl InjectionError {
    /// Check if this error is an invalid argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            InjectionError::InvalidArgument { .. } | InjectionError::FixedSizeCollection { .. }
        )
    }

    /// Check if this error reports a resolution miss
    pub fn is_no_injection(&self) -> bool {
        matches!(self, InjectionError::NoInjection { .. })
    }

    /// Check if this error is a value shape mismatch
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            InjectionError::TypeMismatch { .. } | InjectionError::UnsupportedCapability { .. }
        )
    }

    /// Check if this error comes from resizing a fixed-size collection
    pub fn is_fixed_size_error(&self) -> bool {
        matches!(self, InjectionError::FixedSizeCollection { .. })
    }
}

// Conversion from InjectionError to the main Error type
impl From<InjectionError> for crate::Error {
    fn from(err: InjectionError) -> Self {
        crate::Error::Injection(err)
    }
}
