//! Dynamic values flowing through the mapping kernel.
//!
//! Primitives and enums are plain data. Objects and collections are shared,
//! lock-protected references so merges can update a target in place and callers
//! can observe that the same instance survived.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::types::{PrimitiveKind, Type};

// Poisoning is ignored: every write replaces a whole field or item list.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// An enumeration value: the enum type plus its numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub ty: Type,
    pub value: i64,
}

impl EnumValue {
    /// The declared member name for this value, if any.
    pub fn name(&self) -> Option<&str> {
        self.ty
            .enum_info()
            .and_then(|info| info.member_by_value(self.value))
            .map(|m| m.name.as_str())
    }
}

/// An object instance: its runtime type plus named fields.
#[derive(Debug, Clone)]
pub struct Object {
    pub ty: Type,
    pub fields: BTreeMap<String, Value>,
}

/// A collection instance: its runtime collection type plus ordered items.
#[derive(Debug, Clone)]
pub struct Collection {
    pub ty: Type,
    pub items: Vec<Value>,
}

/// Shared reference to an [`Object`].
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<Object>>);

impl ObjectRef {
    pub fn new(ty: &Type) -> Self {
        ObjectRef(Arc::new(RwLock::new(Object {
            ty: ty.clone(),
            fields: BTreeMap::new(),
        })))
    }

    /// Builder-style field initialisation.
    pub fn with(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn ty(&self) -> Type {
        read(&self.0).ty.clone()
    }

    pub fn get(&self, field: &str) -> Option<Value> {
        read(&self.0).fields.get(field).cloned()
    }

    pub fn set(&self, field: impl Into<String>, value: impl Into<Value>) {
        write(&self.0).fields.insert(field.into(), value.into());
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn address(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let object = read(&self.0);
        f.debug_struct(object.ty.name())
            .field("fields", &object.fields)
            .finish()
    }
}

/// Shared reference to a [`Collection`].
#[derive(Clone)]
pub struct CollectionRef(Arc<RwLock<Collection>>);

impl CollectionRef {
    pub fn new(ty: &Type, items: Vec<Value>) -> Self {
        CollectionRef(Arc::new(RwLock::new(Collection {
            ty: ty.clone(),
            items,
        })))
    }

    pub fn ty(&self) -> Type {
        read(&self.0).ty.clone()
    }

    pub fn len(&self) -> usize {
        read(&self.0).items.len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.0).items.is_empty()
    }

    /// A snapshot of the current items.
    pub fn items(&self) -> Vec<Value> {
        read(&self.0).items.clone()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        read(&self.0).items.get(index).cloned()
    }

    pub fn push(&self, value: impl Into<Value>) {
        write(&self.0).items.push(value.into());
    }

    /// Replaces the whole contents.
    pub fn replace_items(&self, items: Vec<Value>) {
        write(&self.0).items = items;
    }

    pub fn ptr_eq(&self, other: &CollectionRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn address(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let collection = read(&self.0);
        write!(f, "{}", collection.ty.name())?;
        f.debug_list().entries(collection.items.iter()).finish()
    }
}

/// A dynamically typed value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Enum(EnumValue),
    Object(ObjectRef),
    Collection(CollectionRef),
}

impl Value {
    /// Creates an enum value of type `ty`.
    pub fn enumeration(ty: &Type, value: i64) -> Self {
        Value::Enum(EnumValue {
            ty: ty.clone(),
            value,
        })
    }

    /// Creates an enum value from a declared member name.
    pub fn enum_member(ty: &Type, name: &str) -> Option<Self> {
        let member = ty.enum_info()?.member_by_name(name)?;
        Some(Self::enumeration(ty, member.value))
    }

    /// Creates a new collection value.
    pub fn collection(ty: &Type, items: Vec<Value>) -> Self {
        Value::Collection(CollectionRef::new(ty, items))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The primitive kind of a primitive value.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        let kind = match self {
            Value::Bool(_) => PrimitiveKind::Bool,
            Value::Char(_) => PrimitiveKind::Char,
            Value::I8(_) => PrimitiveKind::Int8,
            Value::I16(_) => PrimitiveKind::Int16,
            Value::I32(_) => PrimitiveKind::Int32,
            Value::I64(_) => PrimitiveKind::Int64,
            Value::U8(_) => PrimitiveKind::UInt8,
            Value::U16(_) => PrimitiveKind::UInt16,
            Value::U32(_) => PrimitiveKind::UInt32,
            Value::U64(_) => PrimitiveKind::UInt64,
            Value::F32(_) => PrimitiveKind::Float32,
            Value::F64(_) => PrimitiveKind::Float64,
            Value::String(_) => PrimitiveKind::String,
            _ => return None,
        };
        Some(kind)
    }

    /// The runtime type of this value, `None` for `Null`.
    pub fn runtime_type(&self) -> Option<Type> {
        match self {
            Value::Null => None,
            Value::Enum(e) => Some(e.ty.clone()),
            Value::Object(o) => Some(o.ty()),
            Value::Collection(c) => Some(c.ty()),
            primitive => primitive.primitive_kind().map(Type::primitive),
        }
    }

    /// Integral payload widened to `i128`.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::I8(v) => Some(*v as i128),
            Value::I16(v) => Some(*v as i128),
            Value::I32(v) => Some(*v as i128),
            Value::I64(v) => Some(*v as i128),
            Value::U8(v) => Some(*v as i128),
            Value::U16(v) => Some(*v as i128),
            Value::U32(v) => Some(*v as i128),
            Value::U64(v) => Some(*v as i128),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionRef> {
        match self {
            Value::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Reference identity of objects and collections, `None` for plain data.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Object(o) => Some(o.address()),
            Value::Collection(c) => Some(c.address()),
            _ => None,
        }
    }

    /// Whether both values are the same object or collection instance.
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Collection(a), Value::Collection(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    EnumValue => Enum,
    ObjectRef => Object,
    CollectionRef => Collection,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
