//! Concurrent memoization of store resolutions.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::trace;

use crate::{
    Result,
    injection::{Capability, InjectionRef},
    store::InjectionStore,
    types::Type,
};

/// Memoizes `(source, target, capability)` resolutions against a store.
pub trait InjectionCache: Send + Sync {
    /// Returns the cached resolution for the key, resolving through `store` on a miss.
    fn get_or_add(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
        store: &dyn InjectionStore,
    ) -> Result<Option<InjectionRef>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source: Type,
    target: Type,
    capability: Capability,
}

type CacheSlot = Arc<OnceCell<Option<InjectionRef>>>;

/// Thread-safe, append-only resolution cache.
///
/// For a fixed key the underlying store is consulted at most once, even under
/// concurrent callers, and every caller observes the same value (including a
/// cached miss). The map is sharded, and each key is initialised through its own
/// [`OnceCell`], so unrelated keys never wait on each other. A failed resolution
/// leaves the key uninitialised; it is not cached.
#[derive(Default)]
pub struct ConcurrentInjectionCache {
    entries: DashMap<CacheKey, CacheSlot>,
}

impl ConcurrentInjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys that have been requested so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn slot(&self, key: CacheKey) -> CacheSlot {
        if let Some(slot) = self.entries.get(&key) {
            return Arc::clone(slot.value());
        }
        // The shard lock is released when the entry guard drops at the end of this
        // statement, before the slot is initialised.
        Arc::clone(self.entries.entry(key).or_default().value())
    }
}

impl InjectionCache for ConcurrentInjectionCache {
    fn get_or_add(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
        store: &dyn InjectionStore,
    ) -> Result<Option<InjectionRef>> {
        let slot = self.slot(CacheKey {
            source: source.clone(),
            target: target.clone(),
            capability,
        });
        let resolved = slot.get_or_try_init(|| {
            trace!(source = %source, target = %target, %capability, "Injection cache miss");
            store.resolve(source, target, capability)
        })?;
        Ok(resolved.clone())
    }
}
