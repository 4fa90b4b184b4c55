use std::sync::Arc;

use crate::store::{
    CachingInjectionStore, CompositeInjectionStore, ConvertibleInjectionStore, EnumInjectionStore,
    EnumerableToArrayInjectionStore, EnumerableToEnumerableInjectionStore,
    IdenticalPrimitiveInjectionStore, InjectionStoreRef,
};

/// Builds the default store pipeline around the caller's registrations.
///
/// Priority order, first match wins:
///
/// 1. `user` - explicit registrations
/// 2. identical primitives (pass-through)
/// 3. enumerations
/// 4. convertible primitives
/// 5. enumerable to array
/// 6. enumerable to collection
///
/// With `cache` set, the whole pipeline sits behind a
/// [`ConcurrentInjectionCache`](super::ConcurrentInjectionCache).
pub fn default_pipeline(user: InjectionStoreRef, cache: bool) -> InjectionStoreRef {
    let mut composite = CompositeInjectionStore::new();
    composite.add_shared(user);
    composite.add(IdenticalPrimitiveInjectionStore::new());
    composite.add(EnumInjectionStore);
    composite.add(ConvertibleInjectionStore);
    composite.add(EnumerableToArrayInjectionStore);
    composite.add(EnumerableToEnumerableInjectionStore);

    let composite: InjectionStoreRef = Arc::new(composite);
    if cache {
        Arc::new(CachingInjectionStore::concurrent(composite))
    } else {
        composite
    }
}
