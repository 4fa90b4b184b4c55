//! The resolution kernel shared by every mapping invocation.

use std::sync::Arc;

use crate::{
    collection::{
        CollectionMerger, DefaultCollectionMerger, DefaultEnumerableFactory, EnumerableFactory,
        TargetFinderStore,
    },
    config::Culture,
    context::MappingContext,
    store::InjectionStoreRef,
};

/// Everything a mapping invocation resolves through.
///
/// A kernel is immutable once built and can be shared by any number of
/// concurrent invocations, each with its own [`MappingContext`].
#[derive(Clone)]
pub struct Kernel {
    store: InjectionStoreRef,
    target_finders: TargetFinderStore,
    enumerable_factory: Arc<dyn EnumerableFactory>,
    collection_merger: Arc<dyn CollectionMerger>,
}

impl Kernel {
    /// A kernel over `store` with default collection handling and no target finders.
    pub fn new(store: InjectionStoreRef) -> Self {
        Kernel {
            store,
            target_finders: TargetFinderStore::default(),
            enumerable_factory: Arc::new(DefaultEnumerableFactory::default()),
            collection_merger: Arc::new(DefaultCollectionMerger),
        }
    }

    pub fn with_target_finders(mut self, target_finders: TargetFinderStore) -> Self {
        self.target_finders = target_finders;
        self
    }

    pub fn with_enumerable_factory(mut self, factory: impl EnumerableFactory + 'static) -> Self {
        self.enumerable_factory = Arc::new(factory);
        self
    }

    pub fn with_collection_merger(mut self, merger: impl CollectionMerger + 'static) -> Self {
        self.collection_merger = Arc::new(merger);
        self
    }

    pub fn store(&self) -> &InjectionStoreRef {
        &self.store
    }

    pub fn target_finders(&self) -> &TargetFinderStore {
        &self.target_finders
    }

    pub fn enumerable_factory(&self) -> &dyn EnumerableFactory {
        self.enumerable_factory.as_ref()
    }

    pub fn collection_merger(&self) -> &dyn CollectionMerger {
        self.collection_merger.as_ref()
    }

    /// Starts a new mapping invocation.
    pub fn context(&self, culture: Culture) -> MappingContext<'_> {
        MappingContext::new(self, culture)
    }
}
