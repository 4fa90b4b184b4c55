//! Adapters from any enumerable source to collection and array targets.
//!
//! Both adapters declare the [`Type::enumerable`] marker as their source and leave
//! the element-level work to the kernel's collection merger.

use crate::{
    Result,
    context::MappingContext,
    injection::{Hint, Injection, InjectionError, Merge, MergeResult, Transform},
    types::{CollectionShape, Type},
    value::{CollectionRef, Value},
};

fn source_collection(source: &Value) -> Result<&CollectionRef> {
    source.as_collection().ok_or_else(|| {
        InjectionError::TypeMismatch {
            expected: "enumerable value".to_string(),
            actual: source
                .runtime_type()
                .map_or_else(|| "Null".to_string(), |t| t.name().to_string()),
        }
        .into()
    })
}

/// Maps an enumerable source onto a generic collection target.
#[derive(Debug, Clone)]
pub struct EnumerableToEnumerableInjection {
    source: Type,
    target: Type,
}

impl EnumerableToEnumerableInjection {
    /// # Errors
    ///
    /// [`InjectionError::InvalidArgument`] when `target` is not a generic collection type.
    pub fn new(target: &Type) -> Result<Self> {
        if target.collection_shape().is_none() {
            return Err(InjectionError::InvalidArgument {
                reason: format!("{target} is not a generic collection type"),
            }
            .into());
        }
        Ok(EnumerableToEnumerableInjection {
            source: Type::enumerable(),
            target: target.clone(),
        })
    }
}

impl Injection for EnumerableToEnumerableInjection {
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

impl Transform for EnumerableToEnumerableInjection {
    fn transform(
        &self,
        source: &Value,
        ctx: &mut MappingContext<'_>,
        _hint: Option<&Hint>,
    ) -> Result<Value> {
        if source.is_null() {
            return Ok(Value::Null);
        }
        source_collection(source)?;

        let kernel = ctx.kernel();
        let working = kernel.enumerable_factory().create(&self.target)?;
        kernel.collection_merger().merge(source, &working, ctx)?;
        Ok(Value::Collection(working))
    }
}

impl Merge for EnumerableToEnumerableInjection {
    fn merge(
        &self,
        source: &Value,
        target: &Value,
        ctx: &mut MappingContext<'_>,
        hint: Option<&Hint>,
    ) -> Result<MergeResult> {
        if source.is_null() {
            return Ok(MergeResult::replace(Value::Null));
        }
        match target {
            // Arrays cannot change length, so they are rebuilt rather than merged.
            Value::Collection(live) if live.ty().array_rank().is_none() => {
                source_collection(source)?;
                ctx.kernel().collection_merger().merge(source, live, ctx)?;
                Ok(MergeResult::replace(target.clone()))
            }
            _ => Ok(MergeResult::replace(self.transform(source, ctx, hint)?)),
        }
    }
}

/// Maps an enumerable source onto a single-dimension array target.
///
/// The source is merged into a working list first, then copied into a freshly
/// allocated array of the final length.
#[derive(Debug, Clone)]
pub struct EnumerableToArrayInjection {
    source: Type,
    target: Type,
    working: Type,
}

impl EnumerableToArrayInjection {
    /// # Errors
    ///
    /// [`InjectionError::InvalidArgument`] when `target` is not a single-dimension array.
    pub fn new(target: &Type) -> Result<Self> {
        let element = match target.element_type() {
            Some(element) if target.is_vector() => element,
            _ => {
                return Err(InjectionError::InvalidArgument {
                    reason: format!("{target} is not a single-dimension array type"),
                }
                .into());
            }
        };
        Ok(EnumerableToArrayInjection {
            source: Type::enumerable(),
            target: target.clone(),
            working: Type::collection(CollectionShape::List, element),
        })
    }
}

impl Injection for EnumerableToArrayInjection {
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

impl Transform for EnumerableToArrayInjection {
    fn transform(
        &self,
        source: &Value,
        ctx: &mut MappingContext<'_>,
        _hint: Option<&Hint>,
    ) -> Result<Value> {
        if source.is_null() {
            return Ok(Value::Null);
        }
        source_collection(source)?;

        let kernel = ctx.kernel();
        let working = kernel.enumerable_factory().create(&self.working)?;
        kernel.collection_merger().merge(source, &working, ctx)?;
        Ok(Value::collection(&self.target, working.items()))
    }
}

impl Merge for EnumerableToArrayInjection {
    fn merge(
        &self,
        source: &Value,
        _target: &Value,
        ctx: &mut MappingContext<'_>,
        hint: Option<&Hint>,
    ) -> Result<MergeResult> {
        Ok(MergeResult::replace(self.transform(source, ctx, hint)?))
    }
}
