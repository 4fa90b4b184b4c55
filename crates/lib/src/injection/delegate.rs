use std::{fmt, sync::Arc};

use crate::{
    Result,
    context::MappingContext,
    injection::{Capability, Hint, Injection, InjectionError, Merge, MergeResult, Transform},
    types::Type,
    value::Value,
};

/// Closure signature backing [`DelegateInjection`] transforms.
pub type TransformFn =
    dyn Fn(&Value, &mut MappingContext<'_>, Option<&Hint>) -> Result<Value> + Send + Sync;

/// Closure signature backing [`DelegateInjection`] merges.
pub type MergeFn = dyn Fn(&Value, &Value, &mut MappingContext<'_>, Option<&Hint>) -> Result<MergeResult>
    + Send
    + Sync;

/// An injection whose behaviour is supplied as closures.
///
/// This is the seam through which a configuration or code generation layer hands
/// per-pair transforms to the kernel. Closures receive the mapping context, so
/// they can recurse into nested members through
/// [`MappingContext::transform`] and [`MappingContext::merge`].
///
/// # Examples
///
/// ```
/// use graft::{DelegateInjection, Injection, Type, Value};
///
/// let doubling = DelegateInjection::new(&Type::int32(), &Type::int32())
///     .with_transform(|source, _ctx, _hint| match source {
///         Value::I32(v) => Ok(Value::I32(v * 2)),
///         other => Ok(other.clone()),
///     });
/// assert!(doubling.as_transform().is_some());
/// assert!(doubling.as_merge().is_none());
/// ```
#[derive(Clone)]
pub struct DelegateInjection {
    source: Type,
    target: Type,
    transform: Option<Arc<TransformFn>>,
    merge: Option<Arc<MergeFn>>,
}

impl DelegateInjection {
    /// An injection for the pair with no capabilities yet.
    pub fn new(source: &Type, target: &Type) -> Self {
        DelegateInjection {
            source: source.clone(),
            target: target.clone(),
            transform: None,
            merge: None,
        }
    }

    pub fn with_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &mut MappingContext<'_>, Option<&Hint>) -> Result<Value> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(f));
        self
    }

    pub fn with_merge<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value, &mut MappingContext<'_>, Option<&Hint>) -> Result<MergeResult>
            + Send
            + Sync
            + 'static,
    {
        self.merge = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for DelegateInjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateInjection")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("transform", &self.transform.is_some())
            .field("merge", &self.merge.is_some())
            .finish()
    }
}

impl Injection for DelegateInjection {
    fn source(&self) -> &Type {
        &self.source
    }

    fn target(&self) -> &Type {
        &self.target
    }

    fn as_transform(&self) -> Option<&dyn Transform> {
        self.transform.as_ref().map(|_| self as &dyn Transform)
    }

    fn as_merge(&self) -> Option<&dyn Merge> {
        self.merge.as_ref().map(|_| self as &dyn Merge)
    }
}

impl Transform for DelegateInjection {
    fn transform(
        &self,
        source: &Value,
        ctx: &mut MappingContext<'_>,
        hint: Option<&Hint>,
    ) -> Result<Value> {
        match &self.transform {
            Some(f) => f(source, ctx, hint),
            None => Err(InjectionError::UnsupportedCapability {
                source_type: self.source.name().to_string(),
                target_type: self.target.name().to_string(),
                capability: Capability::Transform,
            }
            .into()),
        }
    }
}

impl Merge for DelegateInjection {
    fn merge(
        &self,
        source: &Value,
        target: &Value,
        ctx: &mut MappingContext<'_>,
        hint: Option<&Hint>,
    ) -> Result<MergeResult> {
        match &self.merge {
            Some(f) => f(source, target, ctx, hint),
            None => Err(InjectionError::UnsupportedCapability {
                source_type: self.source.name().to_string(),
                target_type: self.target.name().to_string(),
                capability: Capability::Merge,
            }
            .into()),
        }
    }
}
