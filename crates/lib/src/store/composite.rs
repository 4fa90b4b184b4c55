use std::sync::Arc;

use tracing::debug;

use crate::{
    Result,
    injection::{Capability, InjectionRef},
    store::{InjectionStore, InjectionStoreRef},
    types::Type,
};

/// An ordered collection of sub-stores queried in registration order.
///
/// The first sub-store producing an injection wins, which gives deterministic
/// priority layering: user registrations before generated defaults before the
/// convertible and enum fallbacks.
#[derive(Default, Clone)]
pub struct CompositeInjectionStore {
    stores: Vec<InjectionStoreRef>,
}

impl CompositeInjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sub-store with the lowest priority so far.
    pub fn add<S: InjectionStore + 'static>(&mut self, store: S) {
        self.stores.push(Arc::new(store));
    }

    /// Appends an already shared sub-store.
    pub fn add_shared(&mut self, store: InjectionStoreRef) {
        self.stores.push(store);
    }

    /// Builder-style [`CompositeInjectionStore::add`].
    pub fn with<S: InjectionStore + 'static>(mut self, store: S) -> Self {
        self.add(store);
        self
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl InjectionStore for CompositeInjectionStore {
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>> {
        for (position, store) in self.stores.iter().enumerate() {
            if let Some(injection) = store.resolve(source, target, capability)? {
                debug!(
                    source = %source,
                    target = %target,
                    %capability,
                    position,
                    "Resolved injection from composite store"
                );
                return Ok(Some(injection));
            }
        }
        Ok(None)
    }
}
