//! Injection stores: answer "resolve me an injection for `(source, target)`".
//!
//! Stores compose into a priority-ordered pipeline. A resolution miss is not an
//! error: stores return `Ok(None)` and the caller either falls through to the next
//! store or reports [`InjectionError::NoInjection`](crate::InjectionError::NoInjection).
//!
//! # Stores
//!
//! - [`CollectionInjectionStore`] - explicit registrations, exact pair match
//! - [`StrategyInjectionStore`] - registrations chosen by a [`ResolutionStrategy`](crate::resolution::ResolutionStrategy)
//! - [`CompositeInjectionStore`] - first non-empty answer from ordered sub-stores
//! - [`CachingInjectionStore`] - memoizes an underlying store through an [`InjectionCache`]
//! - [`IdenticalPrimitiveInjectionStore`], [`ConvertibleInjectionStore`],
//!   [`EnumInjectionStore`], [`EnumerableToArrayInjectionStore`],
//!   [`EnumerableToEnumerableInjectionStore`] - stateless synthesizing fallbacks

use std::sync::Arc;

use crate::{
    Result,
    injection::{Capability, InjectionRef},
    types::Type,
};

mod cache;
mod caching;
mod collection;
mod composite;
mod pipeline;
mod strategy;
mod synthesized;

pub use cache::{ConcurrentInjectionCache, InjectionCache};
pub use caching::CachingInjectionStore;
pub use collection::CollectionInjectionStore;
pub use composite::CompositeInjectionStore;
pub use pipeline::default_pipeline;
pub use strategy::StrategyInjectionStore;
pub use synthesized::{
    ConvertibleInjectionStore, EnumInjectionStore, EnumerableToArrayInjectionStore,
    EnumerableToEnumerableInjectionStore, IdenticalPrimitiveInjectionStore,
};

/// A source of injections keyed by `(source, target)` type pairs.
///
/// Implementations must be safe to share between threads; only
/// [`ConcurrentInjectionCache`] mutates state after construction.
pub trait InjectionStore: Send + Sync {
    /// Resolves an injection for the pair offering `capability`.
    ///
    /// # Returns
    /// `Ok(None)` when this store has no applicable injection.
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>>;
}

impl<S: InjectionStore + ?Sized> InjectionStore for Arc<S> {
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>> {
        (**self).resolve(source, target, capability)
    }
}

/// Shared handle to an injection store.
pub type InjectionStoreRef = Arc<dyn InjectionStore>;
