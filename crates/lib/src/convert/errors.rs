//! Error types for value conversion.
//!
//! Conversion errors are data errors: they propagate unmodified to the caller of
//! the transform or merge that triggered them.

use thiserror::Error;

/// Structured error types for conversion operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Input text could not be parsed as the target type
    #[error("Input '{input}' is not in a valid format for {target_type}")]
    Format { input: String, target_type: String },

    /// Value is outside the range of the target type
    #[error("Value '{input}' is out of range for {target_type}")]
    Overflow { input: String, target_type: String },

    /// No conversion is defined between the two types
    #[error("Invalid cast from {source_type} to {target_type}")]
    InvalidCast {
        source_type: String,
        target_type: String,
    },

    /// An enum conversion found no member for the value
    #[error("Value '{input}' has no matching member in {enum_type}")]
    NoMatchingMember { input: String, enum_type: String },

    /// A null value cannot be stored in a non-nullable value type
    #[error("Cannot convert null to non-nullable {target_type}")]
    NullToNonNullable { target_type: String },
}

impl ConversionError {
    /// Check if this error is a parse failure
    pub fn is_format_error(&self) -> bool {
        matches!(self, ConversionError::Format { .. })
    }

    /// Check if this error is a range failure
    pub fn is_overflow(&self) -> bool {
        matches!(self, ConversionError::Overflow { .. })
    }

    /// Check if this error is an undefined conversion
    pub fn is_invalid_cast(&self) -> bool {
        matches!(self, ConversionError::InvalidCast { .. })
    }

    /// Check if this error comes from enum member lookup
    pub fn is_enum_error(&self) -> bool {
        matches!(self, ConversionError::NoMatchingMember { .. })
    }

    /// Check if this error comes from null handling
    pub fn is_null_error(&self) -> bool {
        matches!(self, ConversionError::NullToNonNullable { .. })
    }
}

// Conversion from ConversionError to the main Error type
impl From<ConversionError> for crate::Error {
    fn from(err: ConversionError) -> Self {
        crate::Error::Conversion(err)
    }
}
