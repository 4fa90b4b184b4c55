use tracing::trace;

use crate::{
    Result,
    context::MappingContext,
    injection::{Hint, InjectionError},
    types::Type,
    value::{CollectionRef, Value},
};

/// Merges the items of an enumerable source into a target collection.
pub trait CollectionMerger: Send + Sync {
    /// Rewrites `target` so it holds one mapped item per source item, in order.
    ///
    /// # Errors
    ///
    /// [`InjectionError::TypeMismatch`] when `source` is not a collection, and
    /// [`InjectionError::FixedSizeCollection`] when `target` is an array whose length
    /// differs from the source's.
    fn merge(
        &self,
        source: &Value,
        target: &CollectionRef,
        ctx: &mut MappingContext<'_>,
    ) -> Result<()>;
}

/// Index-aligned merging for value elements, finder-aligned merging for references.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCollectionMerger;

fn element_type(collection_type: &Type) -> Type {
    collection_type
        .element_type()
        .cloned()
        .unwrap_or_else(Type::object)
}

/// Whether items of this type have an identity worth preserving.
fn has_identity(ty: &Type) -> bool {
    !ty.is_value_type() && !ty.is_string()
}

impl DefaultCollectionMerger {
    fn merge_values(
        items: &[Value],
        source_element: &Type,
        target_element: &Type,
        ctx: &mut MappingContext<'_>,
    ) -> Result<Vec<Value>> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                ctx.transform(source_element, target_element, item, Some(&Hint::index(index)))
            })
            .collect()
    }

    fn merge_references(
        items: &[Value],
        current: &[Value],
        source_element: &Type,
        target_element: &Type,
        ctx: &mut MappingContext<'_>,
    ) -> Result<Vec<Value>> {
        let mut finder = ctx
            .kernel()
            .target_finders()
            .resolve(source_element, target_element);
        finder.initialize(current, ctx)?;

        let mut merged = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if item.is_null() {
                merged.push(Value::Null);
                continue;
            }
            let hint = Hint::index(index);
            let mapped = match finder.try_find(item)? {
                Some(existing) if !existing.is_null() => {
                    trace!(index, "Merging into matched target item");
                    ctx.merge(source_element, target_element, item, &existing, Some(&hint))?
                }
                _ => {
                    trace!(index, "No matching target item, transforming");
                    ctx.transform_declared(source_element, target_element, item, Some(&hint))?
                }
            };
            merged.push(mapped);
        }
        Ok(merged)
    }
}

impl CollectionMerger for DefaultCollectionMerger {
    fn merge(
        &self,
        source: &Value,
        target: &CollectionRef,
        ctx: &mut MappingContext<'_>,
    ) -> Result<()> {
        let Some(source_collection) = source.as_collection() else {
            return Err(InjectionError::TypeMismatch {
                expected: "enumerable value".to_string(),
                actual: source
                    .runtime_type()
                    .map_or_else(|| "Null".to_string(), |t| t.name().to_string()),
            }
            .into());
        };

        let items = source_collection.items();
        let target_type = target.ty();
        if target_type.array_rank().is_some() && target.len() != items.len() {
            return Err(InjectionError::FixedSizeCollection {
                collection_type: target_type.name().to_string(),
                current: target.len(),
                required: items.len(),
            }
            .into());
        }

        let source_element = element_type(&source_collection.ty());
        let target_element = element_type(&target_type);
        trace!(
            source = %source_element,
            target = %target_element,
            count = items.len(),
            "Merging collection"
        );

        let merged = if has_identity(&source_element) {
            let current = target.items();
            Self::merge_references(&items, &current, &source_element, &target_element, ctx)?
        } else {
            Self::merge_values(&items, &source_element, &target_element, ctx)?
        };
        target.replace_items(merged);
        Ok(())
    }
}
