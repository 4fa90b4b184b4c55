use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use graft::{
    Capability, CollectionInjectionStore, Culture, Hint, Injection, InjectionRef, InjectionStore,
    InjectionStoreRef, Kernel, Mapper, MapperConfig, Merge, MergeResult, Result, Transform, Type,
    Value,
    context::MappingContext,
    store::default_pipeline,
    types::CollectionShape,
    value::ObjectRef,
};

// ==========================
// TYPE FIXTURES
// ==========================

/// A small class family: `Animal <- Dog <- Puppy`, all implementing `IPet`.
pub struct Family {
    pub pet: Type,
    pub animal: Type,
    pub dog: Type,
    pub puppy: Type,
}

pub fn family() -> Family {
    let pet = Type::interface("IPet", &[]);
    let animal = Type::class("Animal").implements(&pet).build();
    let dog = Type::class("Dog").base(&animal).build();
    let puppy = Type::class("Puppy").base(&dog).build();
    Family {
        pet,
        animal,
        dog,
        puppy,
    }
}

/// `Person` source and `PersonDto` target classes keyed by an `Id` field.
pub fn person_types() -> (Type, Type) {
    (
        Type::class("Person").build(),
        Type::class("PersonDto").build(),
    )
}

pub fn person(ty: &Type, id: i32, name: &str) -> Value {
    Value::Object(ObjectRef::new(ty).with("Id", id).with("Name", name))
}

pub fn list_of(element: &Type) -> Type {
    Type::collection(CollectionShape::List, element)
}

pub fn ints(values: &[i32]) -> Value {
    Value::collection(
        &list_of(&Type::int32()),
        values.iter().copied().map(Value::from).collect(),
    )
}

pub fn int_items(value: &Value) -> Vec<i32> {
    value
        .as_collection()
        .expect("collection value")
        .items()
        .into_iter()
        .map(|item| match item {
            Value::I32(v) => v,
            other => panic!("expected Int32 item, found {other:?}"),
        })
        .collect()
}

// ==========================
// INJECTION FIXTURES
// ==========================

/// An injection that transforms to a fixed label, used to tell candidates apart.
#[derive(Debug)]
pub struct Tagged {
    source: Type,
    target: Type,
    pub tag: &'static str,
}

impl Tagged {
    pub fn new(source: &Type, target: &Type, tag: &'static str) -> Self {
        Tagged {
            source: source.clone(),
            target: target.clone(),
            tag,
        }
    }

    pub fn shared(source: &Type, target: &Type, tag: &'static str) -> InjectionRef {
        Arc::new(Self::new(source, target, tag))
    }
}

impl Injection for Tagged {
    fn source(&self) -> &Type {
        &self.source
    }

    fn target(&self) -> &Type {
        &self.target
    }

    fn as_transform(&self) -> Option<&dyn Transform> {
        Some(self)
    }

    fn as_merge(&self) -> Option<&dyn Merge> {
        Some(self)
    }
}

impl Transform for Tagged {
    fn transform(
        &self,
        _source: &Value,
        _ctx: &mut MappingContext<'_>,
        _hint: Option<&Hint>,
    ) -> Result<Value> {
        Ok(Value::from(self.tag))
    }
}

impl Merge for Tagged {
    fn merge(
        &self,
        _source: &Value,
        _target: &Value,
        _ctx: &mut MappingContext<'_>,
        _hint: Option<&Hint>,
    ) -> Result<MergeResult> {
        Ok(MergeResult::replace(Value::from(self.tag)))
    }
}

/// The tag of the injection a transform ran through.
pub fn tag_of(injection: &InjectionRef) -> String {
    let kernel = Kernel::new(Arc::new(CollectionInjectionStore::new()));
    let mut ctx = kernel.context(Culture::invariant());
    injection
        .apply_transform(&Value::Null, &mut ctx, None)
        .expect("tagged transform")
        .as_str()
        .expect("tag")
        .to_string()
}

/// A store that counts how often it is asked to resolve.
#[derive(Default)]
pub struct CountingStore {
    inner: CollectionInjectionStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: CollectionInjectionStore) -> Self {
        CountingStore {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InjectionStore for CountingStore {
    fn resolve(
        &self,
        source: &Type,
        target: &Type,
        capability: Capability,
    ) -> Result<Option<InjectionRef>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(source, target, capability)
    }
}

// ==========================
// KERNEL FACTORIES
// ==========================

/// A kernel over the default pipeline with `user` registrations first.
pub fn kernel_with(user: CollectionInjectionStore) -> Kernel {
    let user: InjectionStoreRef = Arc::new(user);
    Kernel::new(default_pipeline(user, false))
}

pub fn default_kernel() -> Kernel {
    kernel_with(CollectionInjectionStore::new())
}

pub fn mapper_with(user: CollectionInjectionStore) -> Mapper {
    Mapper::new(MapperConfig::default(), Arc::new(user))
}
