//! Resolution strategies: choosing one injection among same-family candidates.
//!
//! A strategy works over an already gathered candidate list (for example every
//! registration of an inherited mapping definition) where list order is
//! registration order. Both strategies are pure functions of the candidate
//! declarations and their positions.

use std::cmp::Reverse;

use crate::{
    injection::{Capability, InjectionRef},
    types::{Type, TypeDistance, hierarchy},
};

/// Picks the best candidate for a `(source, target)` query.
pub trait ResolutionStrategy: Send + Sync {
    /// Returns the chosen candidate, or `None` when no candidate applies.
    fn choose(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
        candidates: &[InjectionRef],
    ) -> Option<InjectionRef>;
}

/// Chooses the last candidate declaring exactly `(source, target)`.
///
/// Last-wins models "the most recently registered definition overrides".
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactInjectionResolutionStrategy;

impl ResolutionStrategy for ExactInjectionResolutionStrategy {
    fn choose(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
        candidates: &[InjectionRef],
    ) -> Option<InjectionRef> {
        candidates
            .iter()
            .rev()
            .find(|c| c.declares(source, target) && capability.is_supported_by(&***c))
            .cloned()
    }
}

/// Chooses the most specific candidate by inheritance distance.
///
/// A candidate applies when:
///
/// 1. `source` is its declared source or derives from it, and an
///    interface-to-interface declaration is only matched by an
///    interface-to-interface query (and likewise for the other pairings);
/// 2. for transforms and plain lookups, its declared target is `target` or derives
///    from it; for merges, `target` is its declared target or derives from it.
///
/// Applicable candidates are ranked by source specificity, then target
/// specificity, then recency (later registrations win exact ties).
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritanceInjectionResolutionStrategy;

/// Ranking key of an applicable candidate; the minimum wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Rank {
    source: TypeDistance,
    target: TargetSpecificity,
    recency: Reverse<usize>,
}

/// Target specificity where smaller means more derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TargetSpecificity {
    /// Candidate target derives from the query target by this distance.
    Widened(Reverse<TypeDistance>),
    /// Query target derives from the candidate target by this distance.
    Narrowed(TypeDistance),
}

fn interface_pairing(source: &Type, target: &Type) -> bool {
    source.is_interface() && target.is_interface()
}

impl InheritanceInjectionResolutionStrategy {
    fn rank(
        source: &Type,
        target: &Type,
        capability: Capability,
        candidate: &InjectionRef,
        index: usize,
    ) -> Option<Rank> {
        if !capability.is_supported_by(&**candidate) {
            return None;
        }
        if interface_pairing(candidate.source(), candidate.target())
            != interface_pairing(source, target)
        {
            return None;
        }

        let source_distance = hierarchy::distance(source, candidate.source())?;
        let target_specificity = match capability {
            Capability::Merge => {
                TargetSpecificity::Narrowed(hierarchy::distance(target, candidate.target())?)
            }
            Capability::Injection | Capability::Transform => TargetSpecificity::Widened(Reverse(
                hierarchy::distance(candidate.target(), target)?,
            )),
        };

        Some(Rank {
            source: source_distance,
            target: target_specificity,
            recency: Reverse(index),
        })
    }
}

impl ResolutionStrategy for InheritanceInjectionResolutionStrategy {
    fn choose(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
        candidates: &[InjectionRef],
    ) -> Option<InjectionRef> {
        candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                Self::rank(source, target, capability, candidate, index).map(|rank| (rank, candidate))
            })
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, candidate)| candidate.clone())
    }
}
