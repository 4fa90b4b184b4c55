use std::sync::{Arc, Mutex};

use graft::{
    CollectionInjectionStore, Culture, DelegateInjection, MergeResult, Type, Value,
    collection::{
        CaseInsensitiveComparer, DefaultKeyComparer, IdenticalKeyTargetFinder, NullTargetFinder,
        TargetFinder, TargetFinderStore, integer_field, string_field,
    },
    types::CollectionShape,
    value::ObjectRef,
};

use crate::helpers::*;

fn doubling() -> DelegateInjection {
    DelegateInjection::new(&Type::int32(), &Type::int32()).with_transform(|source, _ctx, _hint| {
        match source {
            Value::I32(v) => Ok(Value::I32(v * 2)),
            other => Ok(other.clone()),
        }
    })
}

/// Person -> PersonDto mapping that copies `Id` and `Name`; merges update in place.
fn person_mapping(dto: &Type) -> DelegateInjection {
    let (person_type, _) = person_types();
    let dto_type = dto.clone();
    DelegateInjection::new(&person_type, dto)
        .with_transform(move |source, _ctx, _hint| {
            let source = source.as_object().expect("person");
            let target = ObjectRef::new(&dto_type)
                .with("Id", source.get("Id").unwrap_or_default())
                .with("Name", source.get("Name").unwrap_or_default());
            Ok(Value::Object(target))
        })
        .with_merge(|source, target, _ctx, _hint| {
            let source = source.as_object().expect("person");
            let existing = target.as_object().expect("dto");
            existing.set("Name", source.get("Name").unwrap_or_default());
            Ok(MergeResult::in_place(target.clone()))
        })
}

fn person_kernel_finders(finders: TargetFinderStore) -> graft::Kernel {
    let (_, dto) = person_types();
    kernel_with(CollectionInjectionStore::new().with(person_mapping(&dto))).with_target_finders(finders)
}

fn id_finders() -> TargetFinderStore {
    let (person_type, dto) = person_types();
    let mut finders = TargetFinderStore::new();
    finders.register_key(
        &person_type,
        &dto,
        integer_field("Id"),
        integer_field("Id"),
        Arc::new(DefaultKeyComparer::new()),
    );
    finders
}

fn name_of(value: &Value) -> Option<String> {
    value
        .as_object()?
        .get("Name")?
        .as_str()
        .map(str::to_string)
}

#[test]
fn test_value_merge_overwrites_and_truncates() {
    let kernel = kernel_with(CollectionInjectionStore::new().with(doubling()));
    let mut ctx = kernel.context(Culture::invariant());
    let source = ints(&[1, 2, 3]);
    let target = ints(&[12, 59, 99, 21]);

    kernel
        .collection_merger()
        .merge(&source, target.as_collection().unwrap(), &mut ctx)
        .unwrap();

    assert_eq!(int_items(&target), vec![2, 4, 6]);
}

#[test]
fn test_value_merge_extends_short_targets() {
    let kernel = kernel_with(CollectionInjectionStore::new().with(doubling()));
    let mut ctx = kernel.context(Culture::invariant());
    let source = ints(&[5, 6, 7]);
    let target = ints(&[1]);

    kernel
        .collection_merger()
        .merge(&source, target.as_collection().unwrap(), &mut ctx)
        .unwrap();

    assert_eq!(int_items(&target), vec![10, 12, 14]);
}

#[test]
fn test_merge_cardinality_matches_source() {
    let kernel = default_kernel();

    for source_len in 0..5 {
        for target_len in 0..5 {
            let mut ctx = kernel.context(Culture::invariant());
            let source = ints(&(0..source_len).collect::<Vec<_>>());
            let target = ints(&(100..100 + target_len).collect::<Vec<_>>());

            kernel
                .collection_merger()
                .merge(&source, target.as_collection().unwrap(), &mut ctx)
                .unwrap();

            assert_eq!(target.as_collection().unwrap().len(), source_len as usize);
            assert_eq!(int_items(&target), (0..source_len).collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_element_transforms_receive_index_hints() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = {
        let seen = Arc::clone(&seen);
        DelegateInjection::new(&Type::int32(), &Type::int32()).with_transform(
            move |source, _ctx, hint| {
                seen.lock().unwrap().push(hint.and_then(|h| h.as_index()));
                Ok(source.clone())
            },
        )
    };
    let kernel = kernel_with(CollectionInjectionStore::new().with(recorder));
    let mut ctx = kernel.context(Culture::invariant());
    let target = ints(&[]);

    kernel
        .collection_merger()
        .merge(&ints(&[4, 5, 6]), target.as_collection().unwrap(), &mut ctx)
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn test_matched_targets_keep_their_identity() {
    let (person_type, dto) = person_types();
    let kernel = person_kernel_finders(id_finders());
    let mut ctx = kernel.context(Culture::invariant());

    let existing = person(&dto, 2, "old name");
    let stale = person(&dto, 9, "gone");
    let target = Value::collection(&list_of(&dto), vec![existing.clone(), stale.clone()]);
    let source = Value::collection(
        &list_of(&person_type),
        vec![person(&person_type, 1, "Ada"), person(&person_type, 2, "Bob"), Value::Null],
    );

    kernel
        .collection_merger()
        .merge(&source, target.as_collection().unwrap(), &mut ctx)
        .unwrap();

    let items = target.as_collection().unwrap().items();
    assert_eq!(items.len(), 3);
    assert!(!items[0].same_ref(&existing));
    assert_eq!(name_of(&items[0]).as_deref(), Some("Ada"));
    assert!(items[1].same_ref(&existing));
    assert_eq!(name_of(&existing).as_deref(), Some("Bob"));
    assert!(items[2].is_null());
    assert!(!items.iter().any(|item| item.same_ref(&stale)));
}

#[test]
fn test_without_finder_every_item_is_transformed() {
    let (person_type, dto) = person_types();
    let kernel = person_kernel_finders(TargetFinderStore::new());
    let mut ctx = kernel.context(Culture::invariant());

    let existing = person(&dto, 2, "old name");
    let target = Value::collection(&list_of(&dto), vec![existing.clone()]);
    let source = Value::collection(&list_of(&person_type), vec![person(&person_type, 2, "Bob")]);

    kernel
        .collection_merger()
        .merge(&source, target.as_collection().unwrap(), &mut ctx)
        .unwrap();

    let items = target.as_collection().unwrap().items();
    assert!(!items[0].same_ref(&existing));
    assert_eq!(name_of(&items[0]).as_deref(), Some("Bob"));
    assert_eq!(name_of(&existing).as_deref(), Some("old name"));
}

#[test]
fn test_case_insensitive_keys_match() {
    let (person_type, dto) = person_types();
    let mut finders = TargetFinderStore::new();
    finders.register_key(
        &person_type,
        &dto,
        string_field("Name"),
        string_field("Name"),
        Arc::new(CaseInsensitiveComparer),
    );
    let kernel = person_kernel_finders(finders);
    let mut ctx = kernel.context(Culture::invariant());

    let existing = person(&dto, 1, "ada");
    let target = Value::collection(&list_of(&dto), vec![existing.clone()]);
    let source = Value::collection(&list_of(&person_type), vec![person(&person_type, 1, "ADA")]);

    kernel
        .collection_merger()
        .merge(&source, target.as_collection().unwrap(), &mut ctx)
        .unwrap();

    let items = target.as_collection().unwrap().items();
    assert!(items[0].same_ref(&existing));
    assert_eq!(name_of(&existing).as_deref(), Some("ADA"));
}

#[test]
fn test_identical_key_finder_snapshot() {
    let (person_type, dto) = person_types();
    let kernel = default_kernel();
    let ctx = kernel.context(Culture::invariant());
    let first = person(&dto, 3, "first");
    let duplicate = person(&dto, 3, "duplicate");
    let mut finder =
        IdenticalKeyTargetFinder::with_default_comparer(integer_field("Id"), integer_field("Id"));

    finder
        .initialize(&[first.clone(), Value::Null, duplicate], &ctx)
        .unwrap();

    let found = finder.try_find(&person(&person_type, 3, "query")).unwrap().unwrap();
    assert!(found.same_ref(&first));
    assert!(finder.try_find(&person(&person_type, 4, "none")).unwrap().is_none());
    assert!(finder.try_find(&Value::Null).unwrap().is_none());
}

#[test]
fn test_null_finder_never_matches() {
    let kernel = default_kernel();
    let ctx = kernel.context(Culture::invariant());
    let (_, dto) = person_types();
    let mut finder = NullTargetFinder;

    finder.initialize(&[person(&dto, 1, "a")], &ctx).unwrap();

    assert!(finder.try_find(&person(&dto, 1, "a")).unwrap().is_none());
}

#[test]
fn test_fixed_size_array_cannot_change_length() {
    let kernel = default_kernel();
    let mut ctx = kernel.context(Culture::invariant());
    let array = Value::collection(&Type::array(&Type::int32()), vec![Value::I32(0); 2]);

    let err = kernel
        .collection_merger()
        .merge(&ints(&[1, 2, 3]), array.as_collection().unwrap(), &mut ctx)
        .unwrap_err();

    assert!(err.is_fixed_size_error());
    assert!(err.is_invalid_argument());
}

#[test]
fn test_fixed_size_array_of_equal_length_is_overwritten() {
    let kernel = default_kernel();
    let mut ctx = kernel.context(Culture::invariant());
    let array = Value::collection(&Type::array(&Type::int32()), vec![Value::I32(0); 3]);

    kernel
        .collection_merger()
        .merge(&ints(&[1, 2, 3]), array.as_collection().unwrap(), &mut ctx)
        .unwrap();

    assert_eq!(int_items(&array), vec![1, 2, 3]);
}

#[test]
fn test_non_enumerable_source_is_rejected() {
    let kernel = default_kernel();
    let mut ctx = kernel.context(Culture::invariant());
    let target = ints(&[]);

    let err = kernel
        .collection_merger()
        .merge(&Value::I32(1), target.as_collection().unwrap(), &mut ctx)
        .unwrap_err();

    assert!(err.is_type_error());
}

#[test]
fn test_enumerable_to_array_allocates_exact_length() {
    let kernel = default_kernel();
    let mut ctx = kernel.context(Culture::invariant());
    let array_type = Type::array(&Type::int32());

    let mapped = ctx
        .transform(&list_of(&Type::int32()), &array_type, &ints(&[7, 8, 9]), None)
        .unwrap();

    assert_eq!(mapped.runtime_type(), Some(array_type));
    assert_eq!(int_items(&mapped), vec![7, 8, 9]);
}

#[test]
fn test_enumerable_to_array_merge_rebuilds_array() {
    let kernel = default_kernel();
    let mut ctx = kernel.context(Culture::invariant());
    let array_type = Type::array(&Type::int32());
    let existing = Value::collection(&array_type, vec![Value::I32(1)]);

    let merged = ctx
        .merge(&list_of(&Type::int32()), &array_type, &ints(&[4, 5]), &existing, None)
        .unwrap();

    assert!(!merged.same_ref(&existing));
    assert_eq!(int_items(&merged), vec![4, 5]);
}

#[test]
fn test_enumerable_to_enumerable_converts_elements() {
    let kernel = default_kernel();
    let mut ctx = kernel.context(Culture::invariant());
    let longs = Type::collection(CollectionShape::Sequence, &Type::int64());

    let mapped = ctx
        .transform(&list_of(&Type::int32()), &longs, &ints(&[1, 2]), None)
        .unwrap();

    let collection = mapped.as_collection().unwrap();
    assert_eq!(
        collection.ty(),
        Type::collection(CollectionShape::List, &Type::int64())
    );
    assert_eq!(collection.items(), vec![Value::I64(1), Value::I64(2)]);
}

#[test]
fn test_enumerable_merge_updates_live_collection() {
    let kernel = default_kernel();
    let mut ctx = kernel.context(Culture::invariant());
    let list = list_of(&Type::int32());
    let target = ints(&[9, 9, 9, 9]);

    let kept = ctx
        .merge(&list, &list, &ints(&[1, 2]), &target, None)
        .unwrap();

    assert!(kept.same_ref(&target));
    assert_eq!(int_items(&target), vec![1, 2]);
}

#[test]
fn test_null_enumerable_maps_to_null() {
    let kernel = default_kernel();
    let mut ctx = kernel.context(Culture::invariant());
    let list = list_of(&Type::int32());

    let mapped = ctx
        .transform(&list, &Type::array(&Type::int32()), &Value::Null, None)
        .unwrap();

    assert!(mapped.is_null());
}

#[test]
fn test_unmatched_derived_element_uses_declared_element_transform() {
    let (person_type, dto) = person_types();
    let employee_type = Type::class("Employee").base(&person_type).build();
    let kernel = person_kernel_finders(TargetFinderStore::new());
    let mut ctx = kernel.context(Culture::invariant());
    let source = Value::collection(
        &list_of(&person_type),
        vec![person(&employee_type, 7, "Grace")],
    );
    let target = Value::collection(&list_of(&dto), Vec::new());

    kernel
        .collection_merger()
        .merge(&source, target.as_collection().unwrap(), &mut ctx)
        .unwrap();

    let items = target.as_collection().unwrap().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].runtime_type(), Some(dto));
    assert_eq!(name_of(&items[0]).as_deref(), Some("Grace"));
}
