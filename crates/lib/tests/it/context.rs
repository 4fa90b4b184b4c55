use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use graft::{
    Capability, CollectionInjectionStore, Culture, DelegateInjection, MergeResult, Type, Value,
    context::{InjectionTrail, InjectionTrailItem, TargetCache},
    value::ObjectRef,
};

use crate::helpers::*;

#[test]
fn test_target_cache_keys_on_identity() {
    let (person_type, dto) = person_types();
    let mut cache = TargetCache::default();
    let ada = person(&person_type, 1, "Ada");
    let ada_twin = person(&person_type, 1, "Ada");
    let mapped = person(&dto, 1, "Ada");

    cache.add(&person_type, &dto, &ada, mapped.clone()).unwrap();

    assert!(cache.get(&person_type, &dto, &ada).unwrap().same_ref(&mapped));
    assert!(cache.get(&person_type, &dto, &ada_twin).is_none());
    assert!(cache.get(&person_type, &person_type, &ada).is_none());
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_target_cache_rejects_duplicates() {
    let (person_type, dto) = person_types();
    let mut cache = TargetCache::default();
    let ada = person(&person_type, 1, "Ada");

    cache
        .add(&person_type, &dto, &ada, person(&dto, 1, "first"))
        .unwrap();
    let err = cache
        .add(&person_type, &dto, &ada, person(&dto, 1, "second"))
        .unwrap_err();

    assert!(err.is_duplicate());
    assert_eq!(err.module(), "context");
}

#[test]
fn test_target_cache_requires_references() {
    let mut cache = TargetCache::default();

    let err = cache
        .add(&Type::int32(), &Type::int32(), &Value::I32(1), Value::I32(2))
        .unwrap_err();

    assert!(err.is_context_error());
    assert!(!err.is_duplicate());
}

#[test]
fn test_trail_reports_visited_targets() {
    let (person_type, dto) = person_types();
    let injection = Tagged::shared(&person_type, &dto, "trail");
    let target = person(&dto, 1, "Ada");
    let mut trail = InjectionTrail::default();

    let item = |target: &Value| InjectionTrailItem {
        injection: injection.clone(),
        source: person(&person_type, 1, "Ada"),
        target: target.clone(),
    };

    assert!(trail.add(item(&target)));
    assert!(!trail.add(item(&target)));
    assert!(trail.contains_target(&target));
    assert!(trail.add(item(&Value::I32(1))));
    assert!(trail.add(item(&Value::I32(1))));
    assert_eq!(trail.len(), 3);
}

#[test]
fn test_resolution_miss_is_no_injection() {
    let f = family();
    let kernel = default_kernel();
    let ctx = kernel.context(Culture::invariant());

    let err = ctx
        .resolve(&f.dog, &Type::int32(), Capability::Transform)
        .unwrap_err();

    assert!(err.is_no_injection());
    assert_eq!(err.module(), "injection");
}

#[test]
fn test_transform_reuses_remembered_target() {
    let (person_type, dto) = person_types();
    let kernel = default_kernel();
    let mut ctx = kernel.context(Culture::invariant());
    let ada = person(&person_type, 1, "Ada");
    let mapped = person(&dto, 1, "Ada");

    ctx.remember(&person_type, &dto, &ada, &mapped).unwrap();
    // No injection is registered for the pair, so only the cache can answer.
    let again = ctx.transform(&person_type, &dto, &ada, None).unwrap();

    assert!(again.same_ref(&mapped));
}

#[test]
fn test_transform_declared_resolves_declared_pair() {
    let (person_type, dto) = person_types();
    let employee_type = Type::class("Employee").base(&person_type).build();
    let kernel = kernel_with(CollectionInjectionStore::new().with(Tagged::new(
        &person_type,
        &dto,
        "declared",
    )));
    let mut ctx = kernel.context(Culture::invariant());
    let grace = person(&employee_type, 7, "Grace");

    let mapped = ctx
        .transform_declared(&person_type, &dto, &grace, None)
        .unwrap();
    assert_eq!(mapped.as_str(), Some("declared"));

    let err = ctx.transform(&person_type, &dto, &grace, None).unwrap_err();
    assert!(err.is_no_injection());
}

#[test]
fn test_transform_declared_reuses_target_remembered_for_runtime_pair() {
    let (person_type, dto) = person_types();
    let employee_type = Type::class("Employee").base(&person_type).build();
    let kernel = default_kernel();
    let mut ctx = kernel.context(Culture::invariant());
    let grace = person(&employee_type, 7, "Grace");
    let mapped = person(&dto, 7, "Grace");

    ctx.remember(&employee_type, &dto, &grace, &mapped).unwrap();
    let again = ctx
        .transform_declared(&person_type, &dto, &grace, None)
        .unwrap();

    assert!(again.same_ref(&mapped));
}

#[test]
fn test_cyclic_graph_maps_to_cyclic_graph() {
    let node = Type::class("Node").build();
    let node_dto = Type::class("NodeDto").build();
    let mapping = {
        let node = node.clone();
        let node_dto = node_dto.clone();
        DelegateInjection::new(&node, &node_dto).with_transform(move |source, ctx, _hint| {
            if source.is_null() {
                return Ok(Value::Null);
            }
            let target = Value::Object(ObjectRef::new(&node_dto));
            ctx.remember(&node, &node_dto, source, &target)?;
            let next = source
                .as_object()
                .and_then(|object| object.get("Next"))
                .unwrap_or_default();
            let mapped_next = ctx.transform(&node, &node_dto, &next, None)?;
            if let Some(object) = target.as_object() {
                object.set("Next", mapped_next);
            }
            Ok(target)
        })
    };
    let kernel = kernel_with(CollectionInjectionStore::new().with(mapping));
    let mut ctx = kernel.context(Culture::invariant());

    let a = ObjectRef::new(&node);
    let b = ObjectRef::new(&node).with("Next", a.clone());
    a.set("Next", b.clone());

    let mapped_a = ctx
        .transform(&node, &node_dto, &Value::Object(a), None)
        .unwrap();
    let mapped_b = mapped_a.as_object().unwrap().get("Next").unwrap();
    let back_to_a = mapped_b.as_object().unwrap().get("Next").unwrap();

    assert!(back_to_a.same_ref(&mapped_a));
    assert!(!mapped_b.same_ref(&mapped_a));
    assert_eq!(ctx.target_cache().len(), 2);
}

#[test]
fn test_merge_visits_each_target_once() {
    let (person_type, dto) = person_types();
    let merges = Arc::new(AtomicUsize::new(0));
    let mapping = {
        let merges = Arc::clone(&merges);
        DelegateInjection::new(&person_type, &dto).with_merge(move |_source, target, _ctx, _hint| {
            merges.fetch_add(1, Ordering::SeqCst);
            Ok(MergeResult::in_place(target.clone()))
        })
    };
    let kernel = kernel_with(CollectionInjectionStore::new().with(mapping));
    let mut ctx = kernel.context(Culture::invariant());
    let source = person(&person_type, 1, "Ada");
    let target = person(&dto, 1, "old");

    let first = ctx.merge(&person_type, &dto, &source, &target, None).unwrap();
    let second = ctx.merge(&person_type, &dto, &source, &target, None).unwrap();

    assert!(first.same_ref(&target));
    assert!(second.same_ref(&target));
    assert_eq!(merges.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.trail().len(), 1);
}

#[test]
fn test_merge_into_null_transforms() {
    let (person_type, dto) = person_types();
    let mapping = DelegateInjection::new(&person_type, &dto)
        .with_transform(|_source, _ctx, _hint| Ok(Value::from("fresh")));
    let kernel = kernel_with(CollectionInjectionStore::new().with(mapping));
    let mut ctx = kernel.context(Culture::invariant());

    let merged = ctx
        .merge(&person_type, &dto, &person(&person_type, 1, "Ada"), &Value::Null, None)
        .unwrap();

    assert_eq!(merged, Value::from("fresh"));
}

#[test]
fn test_merge_without_merge_injection_fails() {
    let (person_type, dto) = person_types();
    let mapping = DelegateInjection::new(&person_type, &dto)
        .with_transform(|_source, _ctx, _hint| Ok(Value::Null));
    let kernel = kernel_with(CollectionInjectionStore::new().with(mapping));
    let mut ctx = kernel.context(Culture::invariant());

    let err = ctx
        .merge(
            &person_type,
            &dto,
            &person(&person_type, 1, "Ada"),
            &person(&dto, 1, "old"),
            None,
        )
        .unwrap_err();

    assert!(err.is_no_injection());
}
