use std::sync::Arc;

use crate::{
    Result,
    injection::{Capability, InjectionRef},
    store::{ConcurrentInjectionCache, InjectionCache, InjectionStore, InjectionStoreRef},
    types::Type,
};

/// Resolves through an [`InjectionCache`] in front of an underlying store.
#[derive(Clone)]
pub struct CachingInjectionStore {
    underlying: InjectionStoreRef,
    cache: Arc<dyn InjectionCache>,
}

impl CachingInjectionStore {
    pub fn new(underlying: InjectionStoreRef, cache: Arc<dyn InjectionCache>) -> Self {
        CachingInjectionStore { underlying, cache }
    }

    /// Wraps `underlying` in a fresh [`ConcurrentInjectionCache`].
    pub fn concurrent(underlying: InjectionStoreRef) -> Self {
        Self::new(underlying, Arc::new(ConcurrentInjectionCache::new()))
    }

    pub fn underlying(&self) -> &InjectionStoreRef {
        &self.underlying
    }

    pub fn cache(&self) -> &Arc<dyn InjectionCache> {
        &self.cache
    }
}

impl InjectionStore for CachingInjectionStore {
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>> {
        self.cache
            .get_or_add(source, target, capability, self.underlying.as_ref())
    }
}
