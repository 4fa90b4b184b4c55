//! Element-level merging of enumerable sources into collection targets.
//!
//! The [`CollectionMerger`] decides, element by element, whether a source item is
//! merged into an existing target item or transformed into a new one:
//!
//! - value-typed elements are transformed independently, index by index
//! - reference-typed elements are matched against the current target items by a
//!   [`TargetFinder`]; matched items are merged in place so their identity
//!   survives, unmatched ones are transformed fresh
//!
//! Either way the target ends up with exactly as many items as the source, in
//! source order. Every element call carries a [`Hint::index`](crate::Hint::index).

mod factory;
mod finder;
mod merger;

pub use factory::{DefaultEnumerableFactory, EnumerableFactory};
pub use finder::{
    CaseInsensitiveComparer, DefaultKeyComparer, IdenticalKeyTargetFinder, KeyComparer,
    KeySelector, NullTargetFinder, TargetFinder, TargetFinderFactory, TargetFinderStore,
    integer_field, string_field,
};
pub use merger::{CollectionMerger, DefaultCollectionMerger};
