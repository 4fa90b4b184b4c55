//!
//! Graft: the resolution kernel of an object-graph mapper.
//! This library decides, for a requested `(source type, target type)` pair, which
//! mapping strategy applies, and runs it over dynamically typed object graphs.
//!
//! ## Core Concepts
//!
//! * **Types (`types::Type`)**: Explicit type metadata (primitives, enums, nullable wrappers, classes, interfaces, collections, arrays) with base-chain and interface-distance queries.
//! * **Values (`value::Value`)**: Dynamically typed values. Objects and collections are shared references, so merges can update them in place.
//! * **Injections (`injection::Injection`)**: Strategies bound to a declared type pair, offering a transform (build a new target) and/or a merge (update an existing target).
//! * **Stores (`store::InjectionStore`)**: Resolve an injection for a type pair. Stores compose in priority order, synthesize injections for primitives, enums and collections, and can sit behind a concurrent resolution cache.
//! * **Resolution strategies (`resolution::ResolutionStrategy`)**: Pick one injection among candidates by exact match or by inheritance distance.
//! * **Collections (`collection::CollectionMerger`)**: Merge enumerable sources into collections, preserving the identity of matched target items.
//! * **Context (`context::MappingContext`)**: Per-invocation state that keeps shared and cyclic graphs consistent.
//! * **Mapper (`mapper::Mapper`)**: The top-level entry point over the default store pipeline.

pub mod collection;
pub mod config;
pub mod context;
pub mod convert;
pub mod injection;
pub mod kernel;
pub mod mapper;
pub mod resolution;
pub mod store;
pub mod types;
pub mod value;

pub use config::{Culture, MapperConfig};
pub use context::{ContextError, MappingContext};
pub use convert::ConversionError;
pub use injection::{
    Capability, DelegateInjection, Hint, Injection, InjectionError, InjectionRef, Merge,
    MergeAction, MergeResult, PassThroughInjection, Transform,
};
pub use kernel::Kernel;
pub use mapper::Mapper;
pub use store::{CollectionInjectionStore, InjectionStore, InjectionStoreRef};
pub use types::Type;
pub use value::Value;

/// Result type used throughout the Graft library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Graft library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured injection errors from the injection module
    #[error(transparent)]
    Injection(injection::InjectionError),

    /// Structured conversion errors from the convert module
    #[error(transparent)]
    Conversion(convert::ConversionError),

    /// Structured mapping context errors from the context module
    #[error(transparent)]
    Context(context::ContextError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Injection(_) => "injection",
            Error::Conversion(_) => "convert",
            Error::Context(_) => "context",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error is an invalid argument.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Injection(injection_err) => injection_err.is_invalid_argument(),
            _ => false,
        }
    }

    /// Check if this error reports that no injection exists for a pair.
    pub fn is_no_injection(&self) -> bool {
        match self {
            Error::Injection(injection_err) => injection_err.is_no_injection(),
            _ => false,
        }
    }

    /// Check if this error is a value conversion failure.
    pub fn is_conversion_error(&self) -> bool {
        matches!(self, Error::Conversion(_))
    }

    /// Check if this error is an unparsable input.
    pub fn is_format_error(&self) -> bool {
        match self {
            Error::Conversion(conversion_err) => conversion_err.is_format_error(),
            _ => false,
        }
    }

    /// Check if this error is an out-of-range conversion.
    pub fn is_overflow(&self) -> bool {
        match self {
            Error::Conversion(conversion_err) => conversion_err.is_overflow(),
            _ => false,
        }
    }

    /// Check if this error comes from mapping null into a non-nullable target.
    pub fn is_null_error(&self) -> bool {
        match self {
            Error::Conversion(conversion_err) => conversion_err.is_null_error(),
            _ => false,
        }
    }

    /// Check if this error is type-related.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Injection(injection_err) => injection_err.is_type_error(),
            Error::Conversion(conversion_err) => {
                conversion_err.is_invalid_cast() || conversion_err.is_enum_error()
            }
            _ => false,
        }
    }

    /// Check if this error comes from resizing a fixed-size collection.
    pub fn is_fixed_size_error(&self) -> bool {
        match self {
            Error::Injection(injection_err) => injection_err.is_fixed_size_error(),
            _ => false,
        }
    }

    /// Check if this error is related to per-invocation mapping state.
    pub fn is_context_error(&self) -> bool {
        matches!(self, Error::Context(_))
    }

    /// Check if this error indicates a source instance was mapped twice.
    pub fn is_duplicate(&self) -> bool {
        match self {
            Error::Context(context_err) => context_err.is_duplicate(),
            _ => false,
        }
    }

    /// Check if this error is a serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
