//! Target finders: locating the existing target item that corresponds to a source item.

use std::{
    collections::{HashMap, hash_map::DefaultHasher},
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    sync::Arc,
};

use tracing::debug;

use crate::{Result, context::MappingContext, types::Type, value::Value};

/// Finds the pre-existing target item matching a source item.
///
/// A finder is created per collection merge. [`TargetFinder::initialize`] receives a
/// snapshot of the target items before any of them is touched.
pub trait TargetFinder {
    fn initialize(&mut self, targets: &[Value], ctx: &MappingContext<'_>) -> Result<()>;

    /// The target matching `source`, if any. A `Null` source never matches.
    fn try_find(&self, source: &Value) -> Result<Option<Value>>;
}

/// Never finds a match, so every element is transformed fresh.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTargetFinder;

impl TargetFinder for NullTargetFinder {
    fn initialize(&mut self, _targets: &[Value], _ctx: &MappingContext<'_>) -> Result<()> {
        Ok(())
    }

    fn try_find(&self, _source: &Value) -> Result<Option<Value>> {
        Ok(None)
    }
}

/// Hashing and equality for finder keys.
pub trait KeyComparer<K>: Send + Sync {
    fn hash_key(&self, key: &K) -> u64;
    fn keys_equal(&self, a: &K, b: &K) -> bool;
}

/// Compares keys through their own `Hash` and `Eq`.
pub struct DefaultKeyComparer<K>(PhantomData<fn(&K)>);

impl<K> DefaultKeyComparer<K> {
    pub fn new() -> Self {
        DefaultKeyComparer(PhantomData)
    }
}

impl<K> Default for DefaultKeyComparer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for DefaultKeyComparer<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultKeyComparer")
    }
}

impl<K: Hash + Eq> KeyComparer<K> for DefaultKeyComparer<K> {
    fn hash_key(&self, key: &K) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn keys_equal(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Compares string keys ignoring case.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseInsensitiveComparer;

impl KeyComparer<String> for CaseInsensitiveComparer {
    fn hash_key(&self, key: &String) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.to_lowercase().hash(&mut hasher);
        hasher.finish()
    }

    fn keys_equal(&self, a: &String, b: &String) -> bool {
        a.to_lowercase() == b.to_lowercase()
    }
}

/// Computes the merge key of an item, `None` when the item has no key.
pub type KeySelector<K> = Arc<dyn Fn(&Value) -> Result<Option<K>> + Send + Sync>;

/// Selects an integral field of an object as its key.
pub fn integer_field(field: impl Into<String>) -> KeySelector<i128> {
    let field = field.into();
    Arc::new(move |value: &Value| -> Result<Option<i128>> {
        Ok(value
            .as_object()
            .and_then(|object| object.get(&field))
            .and_then(|key| key.as_integer()))
    })
}

/// Selects a string field of an object as its key.
pub fn string_field(field: impl Into<String>) -> KeySelector<String> {
    let field = field.into();
    Arc::new(move |value: &Value| -> Result<Option<String>> {
        Ok(value
            .as_object()
            .and_then(|object| object.get(&field))
            .and_then(|key| key.as_str().map(str::to_string)))
    })
}

/// Matches source and target items whose keys compare equal.
///
/// Targets are indexed by `target_key` at initialisation; lookups compute
/// `source_key` for the source item. When several targets share a key the first
/// one in collection order is matched.
pub struct IdenticalKeyTargetFinder<K> {
    source_key: KeySelector<K>,
    target_key: KeySelector<K>,
    comparer: Arc<dyn KeyComparer<K>>,
    index: HashMap<u64, Vec<(K, Value)>>,
}

impl<K> IdenticalKeyTargetFinder<K> {
    pub fn new(
        source_key: KeySelector<K>,
        target_key: KeySelector<K>,
        comparer: Arc<dyn KeyComparer<K>>,
    ) -> Self {
        IdenticalKeyTargetFinder {
            source_key,
            target_key,
            comparer,
            index: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + 'static> IdenticalKeyTargetFinder<K> {
    /// A finder comparing keys with [`DefaultKeyComparer`].
    pub fn with_default_comparer(source_key: KeySelector<K>, target_key: KeySelector<K>) -> Self {
        Self::new(source_key, target_key, Arc::new(DefaultKeyComparer::new()))
    }
}

impl<K> TargetFinder for IdenticalKeyTargetFinder<K> {
    fn initialize(&mut self, targets: &[Value], _ctx: &MappingContext<'_>) -> Result<()> {
        self.index.clear();
        for target in targets.iter().filter(|t| !t.is_null()) {
            let Some(key) = (self.target_key)(target)? else {
                continue;
            };
            let bucket = self.index.entry(self.comparer.hash_key(&key)).or_default();
            if !bucket.iter().any(|(k, _)| self.comparer.keys_equal(k, &key)) {
                bucket.push((key, target.clone()));
            }
        }
        Ok(())
    }

    fn try_find(&self, source: &Value) -> Result<Option<Value>> {
        if source.is_null() {
            return Ok(None);
        }
        let Some(key) = (self.source_key)(source)? else {
            return Ok(None);
        };
        Ok(self
            .index
            .get(&self.comparer.hash_key(&key))
            .and_then(|bucket| {
                bucket
                    .iter()
                    .find(|(k, _)| self.comparer.keys_equal(k, &key))
            })
            .map(|(_, target)| target.clone()))
    }
}

/// Creates a fresh finder for each collection merge.
pub type TargetFinderFactory = Arc<dyn Fn() -> Box<dyn TargetFinder> + Send + Sync>;

/// Finder registrations keyed by `(source element, target element)` type pair.
///
/// Pairs without a registration get a [`NullTargetFinder`].
#[derive(Clone, Default)]
pub struct TargetFinderStore {
    factories: HashMap<(Type, Type), TargetFinderFactory>,
}

impl TargetFinderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a finder factory, replacing any earlier one for the pair.
    pub fn register<F>(&mut self, source_element: &Type, target_element: &Type, factory: F)
    where
        F: Fn() -> Box<dyn TargetFinder> + Send + Sync + 'static,
    {
        self.factories.insert(
            (source_element.clone(), target_element.clone()),
            Arc::new(factory),
        );
    }

    /// Registers an [`IdenticalKeyTargetFinder`] for the pair.
    pub fn register_key<K: 'static>(
        &mut self,
        source_element: &Type,
        target_element: &Type,
        source_key: KeySelector<K>,
        target_key: KeySelector<K>,
        comparer: Arc<dyn KeyComparer<K>>,
    ) {
        self.register(source_element, target_element, move || {
            Box::new(IdenticalKeyTargetFinder::new(
                source_key.clone(),
                target_key.clone(),
                comparer.clone(),
            ))
        });
    }

    pub fn contains(&self, source_element: &Type, target_element: &Type) -> bool {
        self.factories
            .contains_key(&(source_element.clone(), target_element.clone()))
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// A new finder for the pair.
    pub fn resolve(&self, source_element: &Type, target_element: &Type) -> Box<dyn TargetFinder> {
        match self
            .factories
            .get(&(source_element.clone(), target_element.clone()))
        {
            Some(factory) => {
                debug!(
                    source = %source_element,
                    target = %target_element,
                    "Using registered target finder"
                );
                factory()
            }
            None => Box::new(NullTargetFinder),
        }
    }
}

impl fmt::Debug for TargetFinderStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetFinderStore")
            .field("registrations", &self.factories.len())
            .finish()
    }
}
