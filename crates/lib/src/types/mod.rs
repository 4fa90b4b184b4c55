//! Explicit type metadata for the mapping kernel.
//!
//! Every value that flows through the kernel carries a runtime [`Type`], and every
//! injection declares a `(source, target)` pair of them. Types are built once at
//! configuration time and shared read-only afterwards.
//!
//! # Core Types
//!
//! - [`Type`] - A cheap-to-clone handle compared and hashed by its unique name
//! - [`TypeKind`] - The closed set of shapes a type can take
//! - [`CollectionShape`] - The enumerable shapes a collection type can declare
//!
//! Assignability and inheritance distances live in [`hierarchy`].

use std::{fmt, hash, sync::Arc};

use serde::{Deserialize, Serialize};

pub mod hierarchy;

pub use hierarchy::TypeDistance;

/// Primitive value kinds known to the conversion layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
}

impl PrimitiveKind {
    /// Every primitive kind, in declaration order.
    pub const ALL: [PrimitiveKind; 13] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::UInt8,
        PrimitiveKind::UInt16,
        PrimitiveKind::UInt32,
        PrimitiveKind::UInt64,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
        PrimitiveKind::String,
    ];

    /// The canonical type name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "Boolean",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::Int8 => "SByte",
            PrimitiveKind::Int16 => "Int16",
            PrimitiveKind::Int32 => "Int32",
            PrimitiveKind::Int64 => "Int64",
            PrimitiveKind::UInt8 => "Byte",
            PrimitiveKind::UInt16 => "UInt16",
            PrimitiveKind::UInt32 => "UInt32",
            PrimitiveKind::UInt64 => "UInt64",
            PrimitiveKind::Float32 => "Single",
            PrimitiveKind::Float64 => "Double",
            PrimitiveKind::String => "String",
        }
    }

    /// Whether this kind is an integral number.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::UInt8
                | PrimitiveKind::UInt16
                | PrimitiveKind::UInt32
                | PrimitiveKind::UInt64
        )
    }

    /// Whether this kind is a floating point number.
    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float32 | PrimitiveKind::Float64)
    }

    /// Whether this kind is numeric (integral or floating point).
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Inclusive range of an integral kind, `None` for non-integral kinds.
    pub fn integer_range(self) -> Option<(i128, i128)> {
        let range = match self {
            PrimitiveKind::Int8 => (i8::MIN as i128, i8::MAX as i128),
            PrimitiveKind::Int16 => (i16::MIN as i128, i16::MAX as i128),
            PrimitiveKind::Int32 => (i32::MIN as i128, i32::MAX as i128),
            PrimitiveKind::Int64 => (i64::MIN as i128, i64::MAX as i128),
            PrimitiveKind::UInt8 => (0, u8::MAX as i128),
            PrimitiveKind::UInt16 => (0, u16::MAX as i128),
            PrimitiveKind::UInt32 => (0, u32::MAX as i128),
            PrimitiveKind::UInt64 => (0, u64::MAX as i128),
            _ => return None,
        };
        Some(range)
    }
}

/// Enumerable shapes a generic collection type can declare.
///
/// A registration in the enumerable factory maps one of these shapes to the
/// concrete shape that gets instantiated as a working collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollectionShape {
    /// Read-only iteration (`IEnumerable<T>`-like).
    Sequence,
    /// Countable, mutable collection (`ICollection<T>`-like).
    Collection,
    /// Indexed list.
    List,
    /// Set of distinct elements.
    Set,
}

impl CollectionShape {
    fn prefix(self) -> &'static str {
        match self {
            CollectionShape::Sequence => "Sequence",
            CollectionShape::Collection => "Collection",
            CollectionShape::List => "List",
            CollectionShape::Set => "Set",
        }
    }
}

/// Marker types standing in for a capability rather than a concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Any convertible primitive.
    Convertible,
    /// Any enumerable value (collections and arrays).
    Enumerable,
}

/// A named member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// Metadata of an enumeration type.
#[derive(Debug, Clone)]
pub struct EnumInfo {
    pub underlying: PrimitiveKind,
    pub members: Vec<EnumMember>,
}

impl EnumInfo {
    /// Looks up a member by exact name.
    pub fn member_by_name(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Looks up the first member declared with `value`.
    pub fn member_by_value(&self, value: i64) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.value == value)
    }
}

/// Metadata of a class or struct type.
#[derive(Debug, Clone, Default)]
pub struct ClassInfo {
    pub base: Option<Type>,
    pub interfaces: Vec<Type>,
    pub value_type: bool,
}

/// Metadata of an interface type.
#[derive(Debug, Clone, Default)]
pub struct InterfaceInfo {
    pub extends: Vec<Type>,
}

/// The closed set of shapes a [`Type`] can take.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// The root every type is assignable to.
    Object,
    Primitive(PrimitiveKind),
    Enum(EnumInfo),
    /// A nullable wrapper around a value type.
    Nullable(Type),
    Class(ClassInfo),
    Interface(InterfaceInfo),
    Collection {
        shape: CollectionShape,
        element: Type,
    },
    Array {
        element: Type,
        rank: usize,
    },
    Marker(Marker),
}

/// Named type metadata behind a [`Type`] handle.
#[derive(Debug)]
pub struct TypeInfo {
    name: String,
    kind: TypeKind,
}

/// Shared handle to type metadata.
///
/// Two handles are equal when their names are equal, so primitive, collection and
/// array types can be constructed on demand and still compare equal.
#[derive(Clone)]
pub struct Type(Arc<TypeInfo>);

impl Type {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Type(Arc::new(TypeInfo {
            name: name.into(),
            kind,
        }))
    }

    /// The root `Object` type.
    pub fn object() -> Self {
        Self::new("Object", TypeKind::Object)
    }

    /// A primitive type.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(kind.name(), TypeKind::Primitive(kind))
    }

    pub fn bool() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    pub fn char() -> Self {
        Self::primitive(PrimitiveKind::Char)
    }

    pub fn int32() -> Self {
        Self::primitive(PrimitiveKind::Int32)
    }

    pub fn int64() -> Self {
        Self::primitive(PrimitiveKind::Int64)
    }

    pub fn float64() -> Self {
        Self::primitive(PrimitiveKind::Float64)
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    /// The convertible-capability marker type.
    pub fn convertible() -> Self {
        Self::new("IConvertible", TypeKind::Marker(Marker::Convertible))
    }

    /// The non-generic enumerable marker type.
    pub fn enumerable() -> Self {
        Self::new("IEnumerable", TypeKind::Marker(Marker::Enumerable))
    }

    /// Wraps a value type in a nullable type.
    ///
    /// Returns `None` when `inner` is not a non-nullable value type.
    pub fn nullable(inner: &Type) -> Option<Self> {
        if !inner.is_value_type() || inner.is_nullable() {
            return None;
        }
        Some(Self::new(
            format!("{}?", inner.name()),
            TypeKind::Nullable(inner.clone()),
        ))
    }

    /// Starts building an enumeration type.
    pub fn enumeration(name: impl Into<String>) -> EnumBuilder {
        EnumBuilder {
            name: name.into(),
            info: EnumInfo {
                underlying: PrimitiveKind::Int32,
                members: Vec::new(),
            },
        }
    }

    /// Starts building a class type.
    pub fn class(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            info: ClassInfo::default(),
        }
    }

    /// Builds an interface type extending `extends`.
    pub fn interface(name: impl Into<String>, extends: &[Type]) -> Self {
        Self::new(
            name,
            TypeKind::Interface(InterfaceInfo {
                extends: extends.to_vec(),
            }),
        )
    }

    /// A generic collection type of the given shape.
    pub fn collection(shape: CollectionShape, element: &Type) -> Self {
        Self::new(
            format!("{}<{}>", shape.prefix(), element.name()),
            TypeKind::Collection {
                shape,
                element: element.clone(),
            },
        )
    }

    /// A single-dimension array type.
    pub fn array(element: &Type) -> Self {
        Self::array_with_rank(element, 1)
    }

    /// An array type of the given rank (rank > 1 is multi-dimensional).
    pub fn array_with_rank(element: &Type, rank: usize) -> Self {
        let rank = rank.max(1);
        let commas = ",".repeat(rank - 1);
        Self::new(
            format!("{}[{commas}]", element.name()),
            TypeKind::Array {
                element: element.clone(),
                rank,
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0.kind
    }

    /// The primitive kind of this type, if it is primitive.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind() {
            TypeKind::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The enum metadata of this type, looking through a nullable wrapper.
    pub fn enum_info(&self) -> Option<&EnumInfo> {
        match self.kind() {
            TypeKind::Enum(info) => Some(info),
            TypeKind::Nullable(inner) => match inner.kind() {
                TypeKind::Enum(info) => Some(info),
                _ => None,
            },
            _ => None,
        }
    }

    /// The type wrapped by a nullable type.
    pub fn nullable_inner(&self) -> Option<&Type> {
        match self.kind() {
            TypeKind::Nullable(inner) => Some(inner),
            _ => None,
        }
    }

    /// This type with any nullable wrapper removed.
    pub fn underlying(&self) -> &Type {
        self.nullable_inner().unwrap_or(self)
    }

    /// Element type of a collection or array type.
    pub fn element_type(&self) -> Option<&Type> {
        match self.kind() {
            TypeKind::Collection { element, .. } | TypeKind::Array { element, .. } => {
                Some(element)
            }
            _ => None,
        }
    }

    pub fn collection_shape(&self) -> Option<CollectionShape> {
        match self.kind() {
            TypeKind::Collection { shape, .. } => Some(*shape),
            _ => None,
        }
    }

    pub fn array_rank(&self) -> Option<usize> {
        match self.kind() {
            TypeKind::Array { rank, .. } => Some(*rank),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind(), TypeKind::Primitive(_))
    }

    pub fn is_string(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::String)
    }

    /// Whether this type is numeric, looking through a nullable wrapper.
    pub fn is_numeric(&self) -> bool {
        self.underlying()
            .primitive_kind()
            .is_some_and(PrimitiveKind::is_numeric)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind(), TypeKind::Enum(_))
    }

    /// Whether this type is an enum, directly or through a nullable wrapper.
    pub fn is_enum_like(&self) -> bool {
        self.enum_info().is_some()
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self.kind(), TypeKind::Nullable(_))
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind(), TypeKind::Interface(_))
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind(), TypeKind::Class(_))
    }

    /// Whether values of this type have value semantics.
    pub fn is_value_type(&self) -> bool {
        match self.kind() {
            TypeKind::Primitive(kind) => *kind != PrimitiveKind::String,
            TypeKind::Enum(_) | TypeKind::Nullable(_) => true,
            TypeKind::Class(info) => info.value_type,
            _ => false,
        }
    }

    /// Whether `Null` is a legal value of this type.
    pub fn accepts_null(&self) -> bool {
        self.is_nullable() || !self.is_value_type()
    }

    /// Whether values of this type can be enumerated.
    pub fn is_enumerable(&self) -> bool {
        matches!(
            self.kind(),
            TypeKind::Collection { .. }
                | TypeKind::Array { .. }
                | TypeKind::Marker(Marker::Enumerable)
        )
    }

    /// Whether this is a single-dimension array type.
    pub fn is_vector(&self) -> bool {
        self.array_rank() == Some(1)
    }

    /// Whether the convertible injection accepts values of this type as input.
    pub fn is_convertible_source(&self) -> bool {
        self.is_primitive()
    }

    /// Whether the convertible injection can produce values of this type.
    pub fn is_convertible_target(&self) -> bool {
        self.underlying().is_primitive()
    }

    /// Whether `other` can be used where this type is expected.
    pub fn is_assignable_from(&self, other: &Type) -> bool {
        hierarchy::is_assignable(self, other)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for Type {}

impl hash::Hash for Type {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.name())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builder for enumeration types.
pub struct EnumBuilder {
    name: String,
    info: EnumInfo,
}

impl EnumBuilder {
    /// Sets the underlying integral kind. Non-integral kinds are ignored.
    pub fn underlying(mut self, kind: PrimitiveKind) -> Self {
        if kind.is_integer() {
            self.info.underlying = kind;
        }
        self
    }

    pub fn member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.info.members.push(EnumMember {
            name: name.into(),
            value,
        });
        self
    }

    pub fn build(self) -> Type {
        Type::new(self.name, TypeKind::Enum(self.info))
    }
}

/// Builder for class and struct types.
pub struct ClassBuilder {
    name: String,
    info: ClassInfo,
}

impl ClassBuilder {
    pub fn base(mut self, base: &Type) -> Self {
        self.info.base = Some(base.clone());
        self
    }

    pub fn implements(mut self, interface: &Type) -> Self {
        self.info.interfaces.push(interface.clone());
        self
    }

    /// Marks the type as having value semantics (a struct).
    pub fn value_type(mut self) -> Self {
        self.info.value_type = true;
        self
    }

    pub fn build(self) -> Type {
        Type::new(self.name, TypeKind::Class(self.info))
    }
}
