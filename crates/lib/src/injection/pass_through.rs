use crate::{
    Result,
    context::MappingContext,
    injection::{Hint, Injection, InjectionError, Merge, MergeResult, Transform},
    types::Type,
    value::Value,
};

/// Returns the source unchanged.
///
/// Used for identical primitives and safe upcasts, so `target` must be assignable
/// from `source`. A merge discards the existing target and replaces it with the
/// source.
#[derive(Debug, Clone)]
pub struct PassThroughInjection {
    source: Type,
    target: Type,
}

impl PassThroughInjection {
    /// # Errors
    ///
    /// [`InjectionError::InvalidArgument`] when `target` is not assignable from `source`.
    pub fn new(source: &Type, target: &Type) -> Result<Self> {
        if !target.is_assignable_from(source) {
            return Err(InjectionError::InvalidArgument {
                reason: format!(
                    "pass-through target {} is not assignable from {}",
                    target, source
                ),
            }
            .into());
        }
        Ok(PassThroughInjection {
            source: source.clone(),
            target: target.clone(),
        })
    }

    /// Pass-through for a type onto itself.
    pub fn identity(ty: &Type) -> Self {
        PassThroughInjection {
            source: ty.clone(),
            target: ty.clone(),
        }
    }
}

impl Injection for PassThroughInjection {
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

impl Transform for PassThroughInjection {
    fn transform(
        &self,
        source: &Value,
        _ctx: &mut MappingContext<'_>,
        _hint: Option<&Hint>,
    ) -> Result<Value> {
        Ok(source.clone())
    }
}

impl Merge for PassThroughInjection {
    fn merge(
        &self,
        source: &Value,
        _target: &Value,
        _ctx: &mut MappingContext<'_>,
        _hint: Option<&Hint>,
    ) -> Result<MergeResult> {
        Ok(MergeResult::replace(source.clone()))
    }
}
