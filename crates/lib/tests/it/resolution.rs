use std::sync::Arc;

use graft::{
    Capability, DelegateInjection, InjectionRef, Type,
    resolution::{
        ExactInjectionResolutionStrategy, InheritanceInjectionResolutionStrategy,
        ResolutionStrategy,
    },
};

use crate::helpers::*;

fn choose_tag(
    strategy: &dyn ResolutionStrategy,
    source: &Type,
    target: &Type,
    capability: Capability,
    candidates: &[InjectionRef],
) -> Option<String> {
    strategy
        .choose(source, target, capability, candidates)
        .map(|chosen| tag_of(&chosen))
}

#[test]
fn test_exact_strategy_returns_last_registration() {
    let class1 = Type::class("TestClass1").build();
    let class2 = Type::class("TestClass2").build();
    let candidates = vec![
        Tagged::shared(&class1, &class2, "first"),
        Tagged::shared(&class1, &class2, "second"),
        Tagged::shared(&class1, &class2, "third"),
    ];

    let chosen = ExactInjectionResolutionStrategy
        .choose(&class1, &class2, Capability::Injection, &candidates)
        .unwrap();

    assert!(Arc::ptr_eq(&chosen, &candidates[2]));
}

#[test]
fn test_exact_strategy_ignores_derived_pairs() {
    let f = family();
    let candidates = vec![Tagged::shared(&f.animal, &f.animal, "animal")];

    assert!(
        ExactInjectionResolutionStrategy
            .choose(&f.dog, &f.animal, Capability::Transform, &candidates)
            .is_none()
    );
}

#[test]
fn test_source_specificity_dominates_target_specificity() {
    let f = family();
    let candidates = vec![
        Tagged::shared(&f.animal, &f.puppy, "broad-source"),
        Tagged::shared(&f.puppy, &f.animal, "exact-source"),
    ];

    assert_eq!(
        choose_tag(
            &InheritanceInjectionResolutionStrategy,
            &f.puppy,
            &f.animal,
            Capability::Transform,
            &candidates
        )
        .as_deref(),
        Some("exact-source")
    );
}

#[test]
fn test_most_derived_target_breaks_source_ties() {
    let f = family();
    let candidates = vec![
        Tagged::shared(&f.dog, &f.puppy, "narrow"),
        Tagged::shared(&f.dog, &f.animal, "broad"),
    ];

    assert_eq!(
        choose_tag(
            &InheritanceInjectionResolutionStrategy,
            &f.dog,
            &f.animal,
            Capability::Transform,
            &candidates
        )
        .as_deref(),
        Some("narrow")
    );
}

#[test]
fn test_recency_breaks_exact_ties() {
    let f = family();
    let forward = vec![
        Tagged::shared(&f.dog, &f.animal, "old"),
        Tagged::shared(&f.dog, &f.animal, "new"),
    ];
    let backward = vec![
        Tagged::shared(&f.dog, &f.animal, "new"),
        Tagged::shared(&f.dog, &f.animal, "old"),
    ];

    let strategy = InheritanceInjectionResolutionStrategy;
    assert_eq!(
        choose_tag(&strategy, &f.puppy, &f.animal, Capability::Transform, &forward).as_deref(),
        Some("new")
    );
    assert_eq!(
        choose_tag(&strategy, &f.puppy, &f.animal, Capability::Transform, &backward).as_deref(),
        Some("old")
    );
}

#[test]
fn test_specific_registration_shadows_later_broad_one() {
    let f = family();
    let candidates = vec![
        Tagged::shared(&f.dog, &f.animal, "specific"),
        Tagged::shared(&f.animal, &f.animal, "broad-later"),
    ];

    assert_eq!(
        choose_tag(
            &InheritanceInjectionResolutionStrategy,
            &f.puppy,
            &f.animal,
            Capability::Transform,
            &candidates
        )
        .as_deref(),
        Some("specific")
    );
}

#[test]
fn test_interface_pairs_only_match_interface_queries() {
    let f = family();
    let candidates = vec![
        Tagged::shared(&f.pet, &f.pet, "iface"),
        Tagged::shared(&f.animal, &f.animal, "class"),
    ];
    let strategy = InheritanceInjectionResolutionStrategy;

    assert_eq!(
        choose_tag(&strategy, &f.pet, &f.pet, Capability::Transform, &candidates).as_deref(),
        Some("iface")
    );
    assert_eq!(
        choose_tag(&strategy, &f.dog, &f.animal, Capability::Transform, &candidates).as_deref(),
        Some("class")
    );
    assert_eq!(
        choose_tag(&strategy, &f.dog, &f.pet, Capability::Transform, &candidates).as_deref(),
        Some("class")
    );
}

#[test]
fn test_merge_accepts_base_targets() {
    let f = family();
    let candidates = vec![
        Tagged::shared(&f.dog, &f.animal, "far"),
        Tagged::shared(&f.dog, &f.dog, "near"),
    ];
    let strategy = InheritanceInjectionResolutionStrategy;

    assert_eq!(
        choose_tag(&strategy, &f.dog, &f.puppy, Capability::Merge, &candidates).as_deref(),
        Some("near")
    );
    assert_eq!(
        choose_tag(&strategy, &f.dog, &f.puppy, Capability::Transform, &candidates),
        None
    );
}

#[test]
fn test_unsupported_capability_is_skipped() {
    let f = family();
    let transform_only: InjectionRef = Arc::new(
        DelegateInjection::new(&f.dog, &f.dog)
            .with_transform(|source, _ctx, _hint| Ok(source.clone())),
    );
    let candidates = vec![transform_only];
    let strategy = InheritanceInjectionResolutionStrategy;

    assert!(
        strategy
            .choose(&f.dog, &f.dog, Capability::Merge, &candidates)
            .is_none()
    );
    assert!(
        strategy
            .choose(&f.dog, &f.dog, Capability::Transform, &candidates)
            .is_some()
    );
}

#[test]
fn test_resolution_is_independent_of_candidate_order() {
    let f = family();
    let animal = Tagged::shared(&f.animal, &f.animal, "animal");
    let dog = Tagged::shared(&f.dog, &f.animal, "dog");
    let puppy = Tagged::shared(&f.puppy, &f.animal, "puppy");
    let orders = [
        [&animal, &dog, &puppy],
        [&animal, &puppy, &dog],
        [&dog, &animal, &puppy],
        [&dog, &puppy, &animal],
        [&puppy, &animal, &dog],
        [&puppy, &dog, &animal],
    ];
    let strategy = InheritanceInjectionResolutionStrategy;

    for order in orders {
        let candidates: Vec<InjectionRef> = order.into_iter().cloned().collect();
        assert_eq!(
            choose_tag(&strategy, &f.puppy, &f.animal, Capability::Transform, &candidates)
                .as_deref(),
            Some("puppy")
        );
        assert_eq!(
            choose_tag(&strategy, &f.dog, &f.animal, Capability::Transform, &candidates).as_deref(),
            Some("dog")
        );
    }
}

#[test]
fn test_unrelated_source_has_no_candidate() {
    let f = family();
    let candidates = vec![Tagged::shared(&f.dog, &f.animal, "dog")];

    assert!(
        InheritanceInjectionResolutionStrategy
            .choose(&f.animal, &f.animal, Capability::Transform, &candidates)
            .is_none()
    );
}

#[test]
fn test_interface_source_outranks_object_root() {
    let f = family();
    let dto = Type::class("AnimalDto").build();
    let candidates = vec![
        Tagged::shared(&f.pet, &dto, "interface-source"),
        Tagged::shared(&Type::object(), &dto, "object-source"),
    ];

    assert_eq!(
        choose_tag(
            &InheritanceInjectionResolutionStrategy,
            &f.dog,
            &dto,
            Capability::Transform,
            &candidates
        )
        .as_deref(),
        Some("interface-source")
    );
}

#[test]
fn test_merge_prefers_interface_target_over_object_root() {
    let f = family();
    let candidates = vec![
        Tagged::shared(&f.dog, &Type::object(), "object-target"),
        Tagged::shared(&f.dog, &f.pet, "interface-target"),
    ];
    let reversed: Vec<InjectionRef> = candidates.iter().rev().cloned().collect();
    let strategy = InheritanceInjectionResolutionStrategy;

    for order in [&candidates, &reversed] {
        assert_eq!(
            choose_tag(&strategy, &f.dog, &f.puppy, Capability::Merge, order).as_deref(),
            Some("interface-target")
        );
    }
}
