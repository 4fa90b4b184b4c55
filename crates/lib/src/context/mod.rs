//! Per-invocation mapping state.
//!
//! A [`MappingContext`] is created for one top-level mapping call and threaded
//! through every nested transform and merge. It owns the visited-set state used for
//! shared and cyclic object graphs:
//!
//! - [`TargetCache`] - which target was produced for a given source instance
//! - [`InjectionTrail`] - which targets have already been merged into
//!
//! Contexts are never shared between concurrent invocations.

use tracing::trace;

use crate::{
    Result,
    config::Culture,
    injection::{Capability, Hint, InjectionError, InjectionRef},
    kernel::Kernel,
    types::Type,
    value::Value,
};

mod errors;
pub use errors::ContextError;

mod target_cache;
pub use target_cache::TargetCache;

mod trail;
pub use trail::{InjectionTrail, InjectionTrailItem};

/// State owned by a single top-level mapping invocation.
pub struct MappingContext<'k> {
    kernel: &'k Kernel,
    culture: Culture,
    target_cache: TargetCache,
    trail: InjectionTrail,
}

impl<'k> MappingContext<'k> {
    pub fn new(kernel: &'k Kernel, culture: Culture) -> Self {
        MappingContext {
            kernel,
            culture,
            target_cache: TargetCache::default(),
            trail: InjectionTrail::default(),
        }
    }

    /// The kernel this invocation resolves through.
    pub fn kernel(&self) -> &'k Kernel {
        self.kernel
    }

    pub fn culture(&self) -> &Culture {
        &self.culture
    }

    pub fn target_cache(&self) -> &TargetCache {
        &self.target_cache
    }

    pub fn target_cache_mut(&mut self) -> &mut TargetCache {
        &mut self.target_cache
    }

    pub fn trail(&self) -> &InjectionTrail {
        &self.trail
    }

    pub fn trail_mut(&mut self) -> &mut InjectionTrail {
        &mut self.trail
    }

    /// Resolves an injection through the kernel's store.
    ///
    /// # Errors
    ///
    /// [`InjectionError::NoInjection`] when no store has an injection for the pair.
    pub fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<InjectionRef> {
        self.kernel
            .store()
            .resolve(source, target, capability)?
            .ok_or_else(|| {
                InjectionError::NoInjection {
                    source_type: source.name().to_string(),
                    target_type: target.name().to_string(),
                    capability,
                }
                .into()
            })
    }

    /// Records that `source` was mapped to `target` for this type pair.
    ///
    /// Call this right after creating a target and before mapping its members, so a
    /// cycle back to `source` resolves to the target under construction.
    pub fn remember(
        &mut self,
        source_type: &Type,
        target_type: &Type,
        source: &Value,
        target: &Value,
    ) -> Result<()> {
        self.target_cache
            .add(source_type, target_type, source, target.clone())
    }

    /// Transforms `source` into a new `target_type` value.
    ///
    /// The injection is resolved for the source's runtime type (or `source_type`
    /// for `Null`). A source instance already mapped for this pair in this
    /// invocation yields the previously produced target.
    pub fn transform(
        &mut self,
        source_type: &Type,
        target_type: &Type,
        source: &Value,
        hint: Option<&Hint>,
    ) -> Result<Value> {
        let effective = source.runtime_type().unwrap_or_else(|| source_type.clone());
        if let Some(existing) = self.target_cache.get(&effective, target_type, source) {
            trace!(source = %effective, target = %target_type, "Reusing already mapped target");
            return Ok(existing);
        }
        let injection = self.resolve(&effective, target_type, Capability::Transform)?;
        injection.apply_transform(source, self, hint)
    }

    /// Transforms `source` with the injection declared for `(source_type, target_type)`.
    ///
    /// Unlike [`MappingContext::transform`] the source's runtime type does not take
    /// part in resolution, so an element whose runtime type derives from the
    /// declared element type uses the declared pair's transform. A target already
    /// remembered for either the declared or the runtime pair is reused.
    pub fn transform_declared(
        &mut self,
        source_type: &Type,
        target_type: &Type,
        source: &Value,
        hint: Option<&Hint>,
    ) -> Result<Value> {
        let runtime = source.runtime_type();
        let remembered = self
            .target_cache
            .get(source_type, target_type, source)
            .or_else(|| {
                runtime
                    .as_ref()
                    .and_then(|ty| self.target_cache.get(ty, target_type, source))
            });
        if let Some(existing) = remembered {
            trace!(source = %source_type, target = %target_type, "Reusing already mapped target");
            return Ok(existing);
        }
        let injection = self.resolve(source_type, target_type, Capability::Transform)?;
        injection.apply_transform(source, self, hint)
    }

    /// Merges `source` into `target` and returns the reference to keep.
    ///
    /// A `Null` target is transformed instead. The merge injection is resolved for
    /// the exact runtime pair. A target that was already merged into during this
    /// invocation is returned untouched.
    pub fn merge(
        &mut self,
        source_type: &Type,
        target_type: &Type,
        source: &Value,
        target: &Value,
        hint: Option<&Hint>,
    ) -> Result<Value> {
        let Some(target_runtime) = target.runtime_type() else {
            return self.transform(source_type, target_type, source, hint);
        };
        let effective = source.runtime_type().unwrap_or_else(|| source_type.clone());
        let injection = self.resolve(&effective, &target_runtime, Capability::Merge)?;

        let item = InjectionTrailItem {
            injection: injection.clone(),
            source: source.clone(),
            target: target.clone(),
        };
        if !self.trail.add(item) {
            trace!(target = %target_runtime, "Target already merged in this invocation");
            return Ok(target.clone());
        }

        let result = injection.apply_merge(source, target, self, hint)?;
        Ok(result.apply(target.clone()))
    }
}
