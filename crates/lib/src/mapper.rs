//! Top-level entry point tying configuration, store pipeline and kernel together.

use tracing::debug;

use crate::{
    Result,
    collection::{DefaultEnumerableFactory, TargetFinderStore},
    config::MapperConfig,
    context::MappingContext,
    convert::ConversionError,
    kernel::Kernel,
    store::{InjectionStoreRef, default_pipeline},
    types::Type,
    value::Value,
};

/// Maps values through the default store pipeline.
///
/// `user` registrations take priority over every built-in store. The mapper is
/// cheap to share: each call to [`Mapper::map`] or [`Mapper::merge`] runs in its
/// own [`MappingContext`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use graft::{CollectionInjectionStore, Mapper, MapperConfig, Type, Value};
///
/// let mapper = Mapper::new(MapperConfig::default(), Arc::new(CollectionInjectionStore::new()));
///
/// let mapped = mapper.map(&Value::from("42"), &Type::int32()).unwrap();
/// assert_eq!(mapped, Value::I32(42));
/// ```
#[derive(Clone)]
pub struct Mapper {
    config: MapperConfig,
    kernel: Kernel,
}

impl Mapper {
    pub fn new(config: MapperConfig, user: InjectionStoreRef) -> Self {
        debug!(
            culture = %config.culture.name,
            cache = config.cache_resolutions,
            "Building mapper"
        );
        let store = default_pipeline(user, config.cache_resolutions);
        let kernel = Kernel::new(store).with_enumerable_factory(DefaultEnumerableFactory::new(
            config.enumerable_shapes.clone(),
        ));
        Mapper { config, kernel }
    }

    /// Replaces the target finder registrations.
    pub fn with_target_finders(mut self, target_finders: TargetFinderStore) -> Self {
        self.kernel = self.kernel.with_target_finders(target_finders);
        self
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Starts a mapping invocation with the configured culture.
    pub fn context(&self) -> MappingContext<'_> {
        self.kernel.context(self.config.culture.clone())
    }

    /// Maps `source` to a new value of `target_type`.
    ///
    /// The source type is the runtime type of `source`. A `Null` source maps to
    /// `Null` when `target_type` accepts null.
    ///
    /// # Errors
    ///
    /// [`InjectionError::NoInjection`](crate::InjectionError::NoInjection) when nothing
    /// can map the pair, [`ConversionError::NullToNonNullable`] for a `Null` source
    /// and a value-type target, and any error raised by the injection itself.
    pub fn map(&self, source: &Value, target_type: &Type) -> Result<Value> {
        let Some(source_type) = source.runtime_type() else {
            return map_null(target_type);
        };
        self.map_as(&source_type, target_type, source)
    }

    /// Maps `source`, declared as `source_type`, to a new value of `target_type`.
    pub fn map_as(&self, source_type: &Type, target_type: &Type, source: &Value) -> Result<Value> {
        self.context().transform(source_type, target_type, source, None)
    }

    /// Merges `source` into `target` and returns the reference to keep.
    ///
    /// For objects and collections merged in place this is `target` itself;
    /// otherwise it is the replacement produced by the merge. A `Null` source
    /// follows the same rules as [`Mapper::map`] and replaces the target with `Null`.
    pub fn merge(&self, source: &Value, target: &Value, target_type: &Type) -> Result<Value> {
        let Some(source_type) = source.runtime_type() else {
            return map_null(target_type);
        };
        self.context()
            .merge(&source_type, target_type, source, target, None)
    }
}

fn map_null(target_type: &Type) -> Result<Value> {
    if target_type.accepts_null() {
        return Ok(Value::Null);
    }
    Err(ConversionError::NullToNonNullable {
        target_type: target_type.name().to_string(),
    }
    .into())
}
