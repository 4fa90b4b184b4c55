use std::collections::HashSet;

use crate::{injection::InjectionRef, value::Value};

/// One `(injection, source, target)` step of an object-graph walk.
#[derive(Debug, Clone)]
pub struct InjectionTrailItem {
    pub injection: InjectionRef,
    pub source: Value,
    pub target: Value,
}

/// Ordered log of merge steps with set membership on targets.
///
/// Adding an item whose target instance is already the target of an earlier item
/// reports "already seen" instead of failing, so callers can stop re-processing
/// shared references and cycles.
#[derive(Debug, Default)]
pub struct InjectionTrail {
    items: Vec<InjectionTrailItem>,
    targets: HashSet<usize>,
}

impl InjectionTrail {
    /// Appends `item`, returning `false` if its target was already visited.
    ///
    /// Targets without reference identity (primitives, enums, `Null`) are never
    /// considered visited.
    pub fn add(&mut self, item: InjectionTrailItem) -> bool {
        if let Some(identity) = item.target.identity() {
            if !self.targets.insert(identity) {
                return false;
            }
        }
        self.items.push(item);
        true
    }

    pub fn contains_target(&self, target: &Value) -> bool {
        target
            .identity()
            .is_some_and(|identity| self.targets.contains(&identity))
    }

    pub fn iter(&self) -> impl Iterator<Item = &InjectionTrailItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
