use std::sync::Arc;

use crate::{
    Result,
    injection::{Capability, Injection, InjectionRef},
    store::InjectionStore,
    types::Type,
};

/// An ordered, mutable collection of explicitly registered injections.
///
/// Resolution returns the first registration whose declared pair equals the
/// requested pair exactly and which offers the requested capability.
///
/// # Examples
///
/// ```
/// use graft::{Capability, CollectionInjectionStore, InjectionStore, PassThroughInjection, Type};
///
/// let mut store = CollectionInjectionStore::new();
/// store.add(PassThroughInjection::identity(&Type::int32()));
///
/// let found = store.resolve(&Type::int32(), &Type::int32(), Capability::Merge).unwrap();
/// assert!(found.is_some());
/// let missing = store.resolve(&Type::int32(), &Type::int64(), Capability::Transform).unwrap();
/// assert!(missing.is_none());
/// ```
#[derive(Debug, Default, Clone)]
pub struct CollectionInjectionStore {
    injections: Vec<InjectionRef>,
}

impl CollectionInjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an injection.
    pub fn add<I: Injection + 'static>(&mut self, injection: I) {
        self.injections.push(Arc::new(injection));
    }

    /// Appends an already shared injection.
    pub fn add_shared(&mut self, injection: InjectionRef) {
        self.injections.push(injection);
    }

    /// Builder-style [`CollectionInjectionStore::add`].
    pub fn with<I: Injection + 'static>(mut self, injection: I) -> Self {
        self.add(injection);
        self
    }

    pub fn remove_at(&mut self, index: usize) -> Option<InjectionRef> {
        (index < self.injections.len()).then(|| self.injections.remove(index))
    }

    pub fn clear(&mut self) {
        self.injections.clear();
    }

    pub fn len(&self) -> usize {
        self.injections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.injections.is_empty()
    }

    /// Registrations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &InjectionRef> {
        self.injections.iter()
    }
}

impl Extend<InjectionRef> for CollectionInjectionStore {
    fn extend<T: IntoIterator<Item = InjectionRef>>(&mut self, iter: T) {
        self.injections.extend(iter);
    }
}

impl InjectionStore for CollectionInjectionStore {
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>> {
        Ok(self
            .injections
            .iter()
            .find(|injection| {
                injection.declares(source, target) && capability.is_supported_by(&***injection)
            })
            .cloned())
    }
}
