//! Stateless stores that synthesize injections from the shape of the requested pair.
//!
//! None of these hold registrations. Each one recognises a fixed type class and
//! builds (or shares) an injection on demand, returning `Ok(None)` for every other
//! pair so a composite store can fall through.

use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    Result,
    injection::{
        Capability, ConvertibleInjection, EnumInjection, EnumerableToArrayInjection,
        EnumerableToEnumerableInjection, Injection, InjectionRef, PassThroughInjection,
    },
    store::InjectionStore,
    types::Type,
};

fn offer<I: Injection + 'static>(injection: I, capability: Capability) -> Option<InjectionRef> {
    capability
        .is_supported_by(&injection)
        .then(|| Arc::new(injection) as InjectionRef)
}

/// Pass-through for a primitive (or nullable primitive) mapped onto itself.
///
/// One injection is shared per primitive type for the lifetime of the store.
#[derive(Default)]
pub struct IdenticalPrimitiveInjectionStore {
    shared: DashMap<Type, InjectionRef>,
}

impl IdenticalPrimitiveInjectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InjectionStore for IdenticalPrimitiveInjectionStore {
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>> {
        if source != target || !source.underlying().is_primitive() {
            return Ok(None);
        }
        let injection = self
            .shared
            .entry(source.clone())
            .or_insert_with(|| Arc::new(PassThroughInjection::identity(source)) as InjectionRef)
            .clone();
        Ok(capability
            .is_supported_by(injection.as_ref())
            .then_some(injection))
    }
}

/// Conversion between convertible primitives.
///
/// The synthesized injection declares the convertible marker as its source, so it
/// serves every concrete convertible source type.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConvertibleInjectionStore;

impl InjectionStore for ConvertibleInjectionStore {
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>> {
        if !source.is_convertible_source() || !target.is_convertible_target() {
            return Ok(None);
        }
        Ok(offer(ConvertibleInjection::new(target)?, capability))
    }
}

/// Default enum mapping for pairs with an enumeration on at least one side.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumInjectionStore;

impl InjectionStore for EnumInjectionStore {
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>> {
        match EnumInjection::new(source, target) {
            Ok(injection) => Ok(offer(injection, capability)),
            Err(_) => Ok(None),
        }
    }
}

/// Enumerable sources onto single-dimension arrays.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumerableToArrayInjectionStore;

impl InjectionStore for EnumerableToArrayInjectionStore {
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>> {
        if !source.is_enumerable() || !target.is_vector() {
            return Ok(None);
        }
        Ok(offer(EnumerableToArrayInjection::new(target)?, capability))
    }
}

/// Enumerable sources onto generic collection targets.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumerableToEnumerableInjectionStore;

impl InjectionStore for EnumerableToEnumerableInjectionStore {
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>> {
        if !source.is_enumerable() || target.collection_shape().is_none() {
            return Ok(None);
        }
        Ok(offer(EnumerableToEnumerableInjection::new(target)?, capability))
    }
}
