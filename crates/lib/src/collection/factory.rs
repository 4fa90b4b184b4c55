use std::collections::BTreeMap;

use crate::{
    Result,
    config::default_enumerable_shapes,
    injection::InjectionError,
    types::{CollectionShape, Type},
    value::CollectionRef,
};

/// Creates empty working collections for requested collection types.
pub trait EnumerableFactory: Send + Sync {
    /// Creates an empty collection that can be used where `ty` is expected.
    fn create(&self, ty: &Type) -> Result<CollectionRef>;
}

/// Instantiates each requested shape through an explicit shape table.
///
/// With the default table `Sequence` and `Collection` requests produce a `List`,
/// `List` stays a `List` and `Set` stays a `Set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultEnumerableFactory {
    shapes: BTreeMap<CollectionShape, CollectionShape>,
}

impl DefaultEnumerableFactory {
    pub fn new(shapes: BTreeMap<CollectionShape, CollectionShape>) -> Self {
        DefaultEnumerableFactory { shapes }
    }

    /// The concrete shape created for `requested`.
    pub fn concrete_shape(&self, requested: CollectionShape) -> CollectionShape {
        self.shapes.get(&requested).copied().unwrap_or(requested)
    }
}

impl Default for DefaultEnumerableFactory {
    fn default() -> Self {
        Self::new(default_enumerable_shapes())
    }
}

impl EnumerableFactory for DefaultEnumerableFactory {
    fn create(&self, ty: &Type) -> Result<CollectionRef> {
        let (Some(shape), Some(element)) = (ty.collection_shape(), ty.element_type()) else {
            return Err(InjectionError::InvalidArgument {
                reason: format!("cannot create a working collection for {ty}"),
            }
            .into());
        };
        let concrete = Type::collection(self.concrete_shape(shape), element);
        Ok(CollectionRef::new(&concrete, Vec::new()))
    }
}
