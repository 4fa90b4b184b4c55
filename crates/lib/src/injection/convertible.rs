use crate::{
    Result,
    context::MappingContext,
    convert,
    injection::{Hint, Injection, InjectionError, Merge, MergeResult, Transform},
    types::Type,
    value::Value,
};

/// Converts any convertible primitive into `target` using the context culture.
///
/// The declared source is the [`Type::convertible`] marker rather than a concrete
/// type, so one instance serves every convertible source. Conversion failures
/// propagate to the caller.
#[derive(Debug, Clone)]
pub struct ConvertibleInjection {
    source: Type,
    target: Type,
}

impl ConvertibleInjection {
    /// # Errors
    ///
    /// [`InjectionError::InvalidArgument`] when `target` is not a convertible target
    /// (a primitive, optionally nullable).
    pub fn new(target: &Type) -> Result<Self> {
        if !target.is_convertible_target() {
            return Err(InjectionError::InvalidArgument {
                reason: format!("{target} is not a convertible target type"),
            }
            .into());
        }
        Ok(ConvertibleInjection {
            source: Type::convertible(),
            target: target.clone(),
        })
    }
}

impl Injection for ConvertibleInjection {
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

impl Transform for ConvertibleInjection {
    fn transform(
        &self,
        source: &Value,
        ctx: &mut MappingContext<'_>,
        _hint: Option<&Hint>,
    ) -> Result<Value> {
        if source.is_null() {
            return Ok(convert::default_for(&self.target));
        }
        let Some(kind) = self.target.underlying().primitive_kind() else {
            return Err(InjectionError::TypeMismatch {
                expected: "primitive target".to_string(),
                actual: self.target.name().to_string(),
            }
            .into());
        };
        Ok(convert::convert(source, kind, ctx.culture())?)
    }
}

impl Merge for ConvertibleInjection {
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
