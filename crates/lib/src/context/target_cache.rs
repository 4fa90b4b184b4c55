use std::collections::HashMap;

use crate::{Result, context::ContextError, types::Type, value::Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TargetCacheKey {
    source_type: Type,
    target_type: Type,
    source: usize,
}

#[derive(Debug)]
struct TargetCacheEntry {
    // Holding the source keeps its address from being reused while cached.
    _source: Value,
    target: Value,
}

/// Maps `(source type, target type, source instance)` to the produced target.
///
/// The source component is compared by reference identity, never by value. A
/// given source instance maps to exactly one target per type pair, so adding the
/// same key twice is an error.
#[derive(Debug, Default)]
pub struct TargetCache {
    entries: HashMap<TargetCacheKey, TargetCacheEntry>,
}

impl TargetCache {
    fn key(source_type: &Type, target_type: &Type, source: &Value) -> Option<TargetCacheKey> {
        source.identity().map(|source| TargetCacheKey {
            source_type: source_type.clone(),
            target_type: target_type.clone(),
            source,
        })
    }

    /// Records `target` as the mapping of `source` for the pair.
    ///
    /// # Errors
    ///
    /// - [`ContextError::NotAReference`] when `source` is not an object or collection
    /// - [`ContextError::DuplicateTarget`] when the key is already present
    pub fn add(
        &mut self,
        source_type: &Type,
        target_type: &Type,
        source: &Value,
        target: Value,
    ) -> Result<()> {
        let key = Self::key(source_type, target_type, source).ok_or_else(|| {
            ContextError::NotAReference {
                value_type: source
                    .runtime_type()
                    .map_or_else(|| "Null".to_string(), |t| t.name().to_string()),
            }
        })?;
        if self.entries.contains_key(&key) {
            return Err(ContextError::DuplicateTarget {
                source_type: source_type.name().to_string(),
                target_type: target_type.name().to_string(),
            }
            .into());
        }
        self.entries.insert(
            key,
            TargetCacheEntry {
                _source: source.clone(),
                target,
            },
        );
        Ok(())
    }

    /// The target previously recorded for `source`, if any.
    pub fn get(&self, source_type: &Type, target_type: &Type, source: &Value) -> Option<Value> {
        let key = Self::key(source_type, target_type, source)?;
        self.entries.get(&key).map(|entry| entry.target.clone())
    }

    pub fn contains(&self, source_type: &Type, target_type: &Type, source: &Value) -> bool {
        self.get(source_type, target_type, source).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
