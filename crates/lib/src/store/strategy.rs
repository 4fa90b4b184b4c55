use std::sync::Arc;

use tracing::debug;

use crate::{
    Result,
    injection::{Capability, Injection, InjectionRef},
    resolution::{InheritanceInjectionResolutionStrategy, ResolutionStrategy},
    store::InjectionStore,
    types::Type,
};

/// Registrations of one mapping family resolved through a [`ResolutionStrategy`].
///
/// Unlike [`CollectionInjectionStore`](super::CollectionInjectionStore), a query may
/// be answered by a registration for a base type, so mapping definitions declared
/// for a base class also apply to derived classes unless a more specific (or more
/// recent) registration shadows them.
pub struct StrategyInjectionStore {
    injections: Vec<InjectionRef>,
    strategy: Box<dyn ResolutionStrategy>,
}

impl StrategyInjectionStore {
    pub fn new(strategy: impl ResolutionStrategy + 'static) -> Self {
        StrategyInjectionStore {
            injections: Vec::new(),
            strategy: Box::new(strategy),
        }
    }

    /// A store resolving by inheritance distance.
    pub fn inheritance() -> Self {
        Self::new(InheritanceInjectionResolutionStrategy)
    }

    /// Appends a registration; later registrations win ties.
    pub fn add<I: Injection + 'static>(&mut self, injection: I) {
        self.injections.push(Arc::new(injection));
    }

    pub fn add_shared(&mut self, injection: InjectionRef) {
        self.injections.push(injection);
    }

    /// Builder-style [`StrategyInjectionStore::add`].
    pub fn with<I: Injection + 'static>(mut self, injection: I) -> Self {
        self.add(injection);
        self
    }

    pub fn len(&self) -> usize {
        self.injections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.injections.is_empty()
    }
}

impl InjectionStore for StrategyInjectionStore {
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>> {
        let chosen = self
            .strategy
            .choose(source, target, capability, &self.injections);
        if let Some(injection) = &chosen {
            debug!(
                source = %source,
                target = %target,
                declared_source = %injection.source(),
                declared_target = %injection.target(),
                "Strategy chose injection"
            );
        }
        Ok(chosen)
    }
}
