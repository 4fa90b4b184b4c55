//! Injections: strategies bound to a declared `(source, target)` type pair.
//!
//! An [`Injection`] is built once at configuration time, never mutated afterwards,
//! and shared read-only across every mapping invocation. It offers one or both
//! capabilities:
//!
//! - [`Transform`] - produce a new target from a source
//! - [`Merge`] - update an existing target from a source, reporting through
//!   [`MergeResult`] whether the caller must replace its reference
//!
//! # Leaf injections
//!
//! - [`PassThroughInjection`] - identity for identical primitives and safe upcasts
//! - [`ConvertibleInjection`] - culture-aware primitive conversion
//! - [`EnumInjection`] - enum to enum/string/number with an override table
//! - [`EnumerableToEnumerableInjection`] / [`EnumerableToArrayInjection`] - collection adapters
//! - [`DelegateInjection`] - closure-backed transforms supplied by a build layer

use std::{any::Any, fmt, sync::Arc};

use crate::{Result, context::MappingContext, types::Type, value::Value};

mod errors;
pub use errors::InjectionError;

mod convertible;
mod delegate;
mod enumerable;
mod enumeration;
mod pass_through;

pub use convertible::ConvertibleInjection;
pub use delegate::{DelegateInjection, MergeFn, TransformFn};
pub use enumerable::{EnumerableToArrayInjection, EnumerableToEnumerableInjection};
pub use enumeration::EnumInjection;
pub use pass_through::PassThroughInjection;

/// The capability a caller requests when resolving an injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Any injection for the pair, whatever it supports.
    Injection,
    Transform,
    Merge,
}

impl Capability {
    /// Whether `injection` offers this capability.
    pub fn is_supported_by(self, injection: &dyn Injection) -> bool {
        match self {
            Capability::Injection => true,
            Capability::Transform => injection.as_transform().is_some(),
            Capability::Merge => injection.as_merge().is_some(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Injection => "injection",
            Capability::Transform => "transform",
            Capability::Merge => "merge",
        };
        f.write_str(name)
    }
}

/// Position of an element inside the collection being mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerableInjectionHint {
    pub index: usize,
}

/// Contextual value passed through transform and merge calls.
#[derive(Debug, Clone)]
pub enum Hint {
    /// The call maps the nth element of a collection.
    Enumerable(EnumerableInjectionHint),
    /// Any caller-defined value.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Hint {
    pub fn index(index: usize) -> Self {
        Hint::Enumerable(EnumerableInjectionHint { index })
    }

    /// The collection index carried by this hint, if any.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Hint::Enumerable(hint) => Some(hint.index),
            Hint::Custom(_) => None,
        }
    }
}

/// What the caller of a merge must do with its target reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// The existing target was updated in place and must be reused.
    None,
    /// The caller must overwrite its reference with [`MergeResult::target`].
    Replace,
}

/// Outcome of a merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub action: MergeAction,
    pub target: Value,
}

impl MergeResult {
    /// The existing target was updated in place.
    pub fn in_place(target: Value) -> Self {
        MergeResult {
            action: MergeAction::None,
            target,
        }
    }

    /// The caller must replace its reference with `target`.
    pub fn replace(target: Value) -> Self {
        MergeResult {
            action: MergeAction::Replace,
            target,
        }
    }

    /// The reference the caller holds after honouring this result.
    pub fn apply(self, current: Value) -> Value {
        match self.action {
            MergeAction::None => current,
            MergeAction::Replace => self.target,
        }
    }
}

/// A strategy bound to a declared `(source, target)` pair.
pub trait Injection: Send + Sync {
    /// The declared source type.
    fn source(&self) -> &Type;

    /// The declared target type.
    fn target(&self) -> &Type;

    /// This injection as a transform, if it can transform.
    fn as_transform(&self) -> Option<&dyn Transform> {
        None
    }

    /// This injection as a merge, if it can merge.
    fn as_merge(&self) -> Option<&dyn Merge> {
        None
    }
}

/// Produces a new target instance from a source.
pub trait Transform: Injection {
    fn transform(
        &self,
        source: &Value,
        ctx: &mut MappingContext<'_>,
        hint: Option<&Hint>,
    ) -> Result<Value>;
}

/// Updates an existing target instance from a source.
pub trait Merge: Injection {
    fn merge(
        &self,
        source: &Value,
        target: &Value,
        ctx: &mut MappingContext<'_>,
        hint: Option<&Hint>,
    ) -> Result<MergeResult>;
}

impl dyn Injection {
    /// Whether the declared pair is exactly `(source, target)`.
    pub fn declares(&self, source: &Type, target: &Type) -> bool {
        self.source() == source && self.target() == target
    }

    fn unsupported(&self, capability: Capability) -> InjectionError {
        InjectionError::UnsupportedCapability {
            source_type: self.source().name().to_string(),
            target_type: self.target().name().to_string(),
            capability,
        }
    }

    /// Transforms through this injection, failing if it cannot transform.
    pub fn apply_transform(
        &self,
        source: &Value,
        ctx: &mut MappingContext<'_>,
        hint: Option<&Hint>,
    ) -> Result<Value> {
        let transform = self
            .as_transform()
            .ok_or_else(|| self.unsupported(Capability::Transform))?;
        transform.transform(source, ctx, hint)
    }

    /// Merges through this injection, failing if it cannot merge.
    pub fn apply_merge(
        &self,
        source: &Value,
        target: &Value,
        ctx: &mut MappingContext<'_>,
        hint: Option<&Hint>,
    ) -> Result<MergeResult> {
        let merge = self
            .as_merge()
            .ok_or_else(|| self.unsupported(Capability::Merge))?;
        merge.merge(source, target, ctx, hint)
    }
}

impl fmt::Debug for dyn Injection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Injection({} -> {})",
            self.source().name(),
            self.target().name()
        )
    }
}

/// Shared handle to an injection.
pub type InjectionRef = Arc<dyn Injection>;
