use crate::{
    Result,
    context::MappingContext,
    convert::{self, ConversionError},
    injection::{Hint, Injection, InjectionError, Merge, MergeResult, Transform},
    types::{EnumInfo, PrimitiveKind, Type, TypeKind},
    value::{EnumValue, Value},
};

/// Maps enumerations to enumerations, strings and numbers, and back.
///
/// Explicit overrides registered with [`EnumInjection::add`] are consulted first.
/// Otherwise:
///
/// - enum to enum matches by member name
/// - enum to string yields the member name
/// - enum to number yields the numeric value
/// - string to enum parses a member name (or a numeric string)
/// - number to enum looks the value up among declared members
///
/// A null source maps to null when the target accepts null, and is an error
/// otherwise.
#[derive(Debug, Clone)]
pub struct EnumInjection {
    source: Type,
    target: Type,
    overrides: Vec<(Value, Value)>,
}

fn enum_compatible(ty: &Type) -> bool {
    ty.is_enum_like() || ty.is_string() || ty.is_numeric()
}

impl EnumInjection {
    /// # Errors
    ///
    /// [`InjectionError::InvalidArgument`] when neither side is an enumeration, or
    /// when the other side is not an enumeration, string or number.
    pub fn new(source: &Type, target: &Type) -> Result<Self> {
        if !source.is_enum_like() && !target.is_enum_like() {
            return Err(InjectionError::InvalidArgument {
                reason: format!("neither {source} nor {target} is an enumeration"),
            }
            .into());
        }
        if !enum_compatible(source) || !enum_compatible(target) {
            return Err(InjectionError::InvalidArgument {
                reason: format!("cannot map enumerations between {source} and {target}"),
            }
            .into());
        }
        Ok(EnumInjection {
            source: source.clone(),
            target: target.clone(),
            overrides: Vec::new(),
        })
    }

    /// Registers an explicit `source -> target` value mapping.
    ///
    /// A later override for the same source value replaces the earlier one.
    pub fn add(&mut self, source: Value, target: Value) -> Result<()> {
        Self::check_value(&self.source, &source)?;
        Self::check_value(&self.target, &target)?;
        self.overrides.retain(|(s, _)| *s != source);
        self.overrides.push((source, target));
        Ok(())
    }

    /// Builder-style [`EnumInjection::add`].
    pub fn with_override(mut self, source: Value, target: Value) -> Result<Self> {
        self.add(source, target)?;
        Ok(self)
    }

    fn check_value(declared: &Type, value: &Value) -> Result<()> {
        let fits = match value.runtime_type() {
            None => declared.accepts_null(),
            Some(actual) => declared.is_assignable_from(&actual),
        };
        if fits {
            Ok(())
        } else {
            Err(InjectionError::TypeMismatch {
                expected: declared.name().to_string(),
                actual: value
                    .runtime_type()
                    .map_or_else(|| "Null".to_string(), |t| t.name().to_string()),
            }
            .into())
        }
    }

    fn no_member(input: impl ToString, ty: &Type) -> ConversionError {
        ConversionError::NoMatchingMember {
            input: input.to_string(),
            enum_type: ty.name().to_string(),
        }
    }

    fn to_enum(source: &Value, target: &Type, info: &EnumInfo) -> Result<Value> {
        let member = match source {
            Value::Enum(value) => {
                let name = value
                    .name()
                    .ok_or_else(|| Self::no_member(value.value, target))?;
                info.member_by_name(name)
                    .ok_or_else(|| Self::no_member(name, target))?
            }
            Value::String(text) => {
                let text = text.trim();
                match info.member_by_name(text) {
                    Some(member) => member,
                    None => text
                        .parse::<i64>()
                        .ok()
                        .and_then(|v| info.member_by_value(v))
                        .ok_or_else(|| Self::no_member(text, target))?,
                }
            }
            other => {
                let Some(number) = other.as_integer() else {
                    return Err(ConversionError::InvalidCast {
                        source_type: other
                            .runtime_type()
                            .map_or_else(|| "Null".to_string(), |t| t.name().to_string()),
                        target_type: target.name().to_string(),
                    }
                    .into());
                };
                i64::try_from(number)
                    .ok()
                    .and_then(|v| info.member_by_value(v))
                    .ok_or_else(|| Self::no_member(number, target))?
            }
        };
        Ok(Value::enumeration(target, member.value))
    }

    fn from_enum(
        source: &EnumValue,
        kind: PrimitiveKind,
        ctx: &MappingContext<'_>,
    ) -> Result<Value> {
        if kind == PrimitiveKind::String {
            let text = source
                .name()
                .map_or_else(|| source.value.to_string(), str::to_string);
            return Ok(Value::String(text));
        }
        Ok(convert::convert(
            &Value::I64(source.value),
            kind,
            ctx.culture(),
        )?)
    }
}

impl Injection for EnumInjection {
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

impl Transform for EnumInjection {
    fn transform(
        &self,
        source: &Value,
        ctx: &mut MappingContext<'_>,
        _hint: Option<&Hint>,
    ) -> Result<Value> {
        if let Some((_, mapped)) = self.overrides.iter().find(|(s, _)| s == source) {
            return Ok(mapped.clone());
        }

        if source.is_null() {
            if self.target.accepts_null() {
                return Ok(Value::Null);
            }
            return Err(ConversionError::NullToNonNullable {
                target_type: self.target.name().to_string(),
            }
            .into());
        }

        let target = self.target.underlying();
        match target.kind() {
            TypeKind::Enum(info) => Self::to_enum(source, target, info),
            TypeKind::Primitive(kind) => match source {
                Value::Enum(value) => Self::from_enum(value, *kind, ctx),
                other => Err(InjectionError::TypeMismatch {
                    expected: self.source.name().to_string(),
                    actual: other
                        .runtime_type()
                        .map_or_else(|| "Null".to_string(), |t| t.name().to_string()),
                }
                .into()),
            },
            _ => Err(InjectionError::TypeMismatch {
                expected: "enumeration, string or number".to_string(),
                actual: target.name().to_string(),
            }
            .into()),
        }
    }
}

impl Merge for EnumInjection {
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
