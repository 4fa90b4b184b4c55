//! Assignability and inheritance distance over explicit type metadata.
//!
//! These are pure functions over [`Type`] so resolution ranking can be tested in
//! isolation from any registered injection.

use super::{CollectionShape, Marker, Type, TypeKind};

/// How far an ancestor type is from a descendant.
///
/// Ordering puts every class-chain distance before every interface distance, and
/// both before the distance to the `Object` root, then compares steps. Smaller
/// means more specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeDistance {
    /// The ancestor is the `Object` root.
    pub root: bool,
    /// The ancestor is only reachable through an implemented interface or capability.
    pub via_interface: bool,
    /// Number of inheritance hops.
    pub steps: usize,
}

impl TypeDistance {
    pub const IDENTICAL: TypeDistance = TypeDistance {
        root: false,
        via_interface: false,
        steps: 0,
    };

    fn class(steps: usize) -> Self {
        TypeDistance {
            root: false,
            via_interface: false,
            steps,
        }
    }

    fn interface(steps: usize) -> Self {
        TypeDistance {
            root: false,
            via_interface: true,
            steps,
        }
    }

    fn root(steps: usize) -> Self {
        TypeDistance {
            root: true,
            via_interface: false,
            steps,
        }
    }
}

/// The type followed by its base classes, most derived first.
pub fn base_chain(ty: &Type) -> Vec<Type> {
    let mut chain = vec![ty.clone()];
    let mut current = ty.clone();
    while let TypeKind::Class(info) = current.kind() {
        match &info.base {
            Some(base) => {
                chain.push(base.clone());
                current = base.clone();
            }
            None => break,
        }
    }
    chain
}

/// Number of base classes above `ty`.
pub fn depth(ty: &Type) -> usize {
    base_chain(ty).len() - 1
}

fn direct_interfaces(ty: &Type) -> &[Type] {
    match ty.kind() {
        TypeKind::Class(info) => &info.interfaces,
        TypeKind::Interface(info) => &info.extends,
        _ => &[],
    }
}

/// Hops from `ty` to `interface` through implemented or extended interfaces.
fn interface_hops(ty: &Type, interface: &Type) -> Option<usize> {
    if ty == interface {
        return Some(0);
    }
    direct_interfaces(ty)
        .iter()
        .filter_map(|next| interface_hops(next, interface).map(|h| h + 1))
        .min()
}

/// Distance from `from` up to its ancestor `to`, or `None` if `to` is not an ancestor.
///
/// # Examples
///
/// ```
/// use graft::types::{Type, hierarchy};
///
/// let base = Type::class("Base").build();
/// let derived = Type::class("Derived").base(&base).build();
///
/// assert_eq!(hierarchy::distance(&derived, &base).map(|d| d.steps), Some(1));
/// assert!(hierarchy::distance(&base, &derived).is_none());
/// ```
pub fn distance(from: &Type, to: &Type) -> Option<TypeDistance> {
    if from == to {
        return Some(TypeDistance::IDENTICAL);
    }

    let chain = base_chain(from);
    if let Some(k) = chain.iter().position(|t| t == to) {
        return Some(TypeDistance::class(k));
    }

    match to.kind() {
        TypeKind::Object => Some(TypeDistance::root(chain.len())),
        TypeKind::Interface(_) => chain
            .iter()
            .enumerate()
            .filter_map(|(k, t)| interface_hops(t, to).map(|h| k + h))
            .min()
            .map(TypeDistance::interface),
        _ if is_assignable(to, from) => Some(TypeDistance::interface(1)),
        _ => None,
    }
}

fn shape_accepts(dest: CollectionShape, src: &TypeKind) -> bool {
    match (dest, src) {
        (CollectionShape::Sequence, TypeKind::Collection { .. }) => true,
        (CollectionShape::Sequence, TypeKind::Array { rank: 1, .. }) => true,
        (CollectionShape::Collection, TypeKind::Collection { .. }) => true,
        (CollectionShape::Collection, TypeKind::Array { rank: 1, .. }) => true,
        (CollectionShape::List, TypeKind::Collection { shape, .. }) => {
            *shape == CollectionShape::List
        }
        (CollectionShape::List, TypeKind::Array { rank: 1, .. }) => true,
        (CollectionShape::Set, TypeKind::Collection { shape, .. }) => {
            *shape == CollectionShape::Set
        }
        _ => false,
    }
}

/// Element compatibility: identical, or covariant over reference elements.
fn element_accepts(dest: &Type, src: &Type, covariant: bool) -> bool {
    dest == src
        || (covariant && !dest.is_value_type() && !src.is_value_type() && is_assignable(dest, src))
}

/// Whether a value of type `src` can be used where `dest` is expected.
pub fn is_assignable(dest: &Type, src: &Type) -> bool {
    if dest == src {
        return true;
    }
    match dest.kind() {
        TypeKind::Object => true,
        TypeKind::Marker(Marker::Convertible) => src.is_primitive() || src.is_enum(),
        TypeKind::Marker(Marker::Enumerable) => src.is_enumerable(),
        TypeKind::Nullable(inner) => inner == src,
        TypeKind::Interface(_) => base_chain(src)
            .iter()
            .any(|t| interface_hops(t, dest).is_some()),
        TypeKind::Class(_) => base_chain(src).iter().any(|t| t == dest),
        TypeKind::Collection { shape, element } => {
            shape_accepts(*shape, src.kind())
                && src.element_type().is_some_and(|src_element| {
                    element_accepts(element, src_element, *shape == CollectionShape::Sequence)
                })
        }
        TypeKind::Array { element, rank } => match src.kind() {
            TypeKind::Array {
                element: src_element,
                rank: src_rank,
            } => rank == src_rank && element_accepts(element, src_element, true),
            _ => false,
        },
        TypeKind::Primitive(_) | TypeKind::Enum(_) => false,
    }
}
