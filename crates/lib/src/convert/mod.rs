//! Culture-aware conversion between convertible primitives.
//!
//! The rules mirror strict framework conversions: integers accept only an optional
//! sign and surrounding whitespace, floats honour the culture's separators, and
//! narrowing checks ranges instead of truncating.

mod errors;
pub use errors::ConversionError;

use crate::{
    config::Culture,
    types::{PrimitiveKind, Type},
    value::Value,
};

type ConversionResult<T> = std::result::Result<T, ConversionError>;

/// The default value of a primitive kind (`Null` for strings).
pub fn default_value(kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Bool => Value::Bool(false),
        PrimitiveKind::Char => Value::Char('\0'),
        PrimitiveKind::Int8 => Value::I8(0),
        PrimitiveKind::Int16 => Value::I16(0),
        PrimitiveKind::Int32 => Value::I32(0),
        PrimitiveKind::Int64 => Value::I64(0),
        PrimitiveKind::UInt8 => Value::U8(0),
        PrimitiveKind::UInt16 => Value::U16(0),
        PrimitiveKind::UInt32 => Value::U32(0),
        PrimitiveKind::UInt64 => Value::U64(0),
        PrimitiveKind::Float32 => Value::F32(0.0),
        PrimitiveKind::Float64 => Value::F64(0.0),
        PrimitiveKind::String => Value::Null,
    }
}

/// The default value of a type: `Null` for anything nullable, zero for primitives.
pub fn default_for(ty: &Type) -> Value {
    match ty.primitive_kind() {
        Some(kind) => default_value(kind),
        None => Value::Null,
    }
}

fn type_name_of(value: &Value) -> String {
    value
        .runtime_type()
        .map_or_else(|| "Null".to_string(), |t| t.name().to_string())
}

fn invalid_cast(value: &Value, target: PrimitiveKind) -> ConversionError {
    ConversionError::InvalidCast {
        source_type: type_name_of(value),
        target_type: target.name().to_string(),
    }
}

fn overflow(input: impl ToString, target: PrimitiveKind) -> ConversionError {
    ConversionError::Overflow {
        input: input.to_string(),
        target_type: target.name().to_string(),
    }
}

fn format_error(input: &str, target: PrimitiveKind) -> ConversionError {
    ConversionError::Format {
        input: input.to_string(),
        target_type: target.name().to_string(),
    }
}

/// Builds an integral value of `kind`, checking its range.
pub fn integer_value(value: i128, kind: PrimitiveKind) -> ConversionResult<Value> {
    let Some((min, max)) = kind.integer_range() else {
        return Err(ConversionError::InvalidCast {
            source_type: PrimitiveKind::Int64.name().to_string(),
            target_type: kind.name().to_string(),
        });
    };
    if value < min || value > max {
        return Err(overflow(value, kind));
    }
    // Range checked above, the casts are lossless.
    let converted = match kind {
        PrimitiveKind::Int8 => Value::I8(value as i8),
        PrimitiveKind::Int16 => Value::I16(value as i16),
        PrimitiveKind::Int32 => Value::I32(value as i32),
        PrimitiveKind::Int64 => Value::I64(value as i64),
        PrimitiveKind::UInt8 => Value::U8(value as u8),
        PrimitiveKind::UInt16 => Value::U16(value as u16),
        PrimitiveKind::UInt32 => Value::U32(value as u32),
        _ => Value::U64(value as u64),
    };
    Ok(converted)
}

fn float_value(value: f64, kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Float32 => Value::F32(value as f32),
        _ => Value::F64(value),
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::F32(v) => Some(*v as f64),
        Value::F64(v) => Some(*v),
        _ => None,
    }
}

/// Rounds to the nearest integer, ties to even.
fn round_half_even(value: f64) -> f64 {
    let rounded = value.round();
    if (value - value.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - value.signum()
    } else {
        rounded
    }
}

fn parse_integer(input: &str, kind: PrimitiveKind) -> ConversionResult<i128> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix(['+', '-'])
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_error(input, kind));
    }
    // Only digits and a sign remain, so a parse failure is a range failure.
    trimmed.parse::<i128>().map_err(|_| overflow(input, kind))
}

fn parse_float(input: &str, kind: PrimitiveKind, culture: &Culture) -> ConversionResult<f64> {
    let normalized: String = input
        .trim()
        .chars()
        .filter(|c| *c != culture.group_separator)
        .map(|c| if c == culture.decimal_separator { '.' } else { c })
        .collect();
    let valid = !normalized.is_empty()
        && normalized
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    if !valid {
        return match normalized.as_str() {
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            _ => Err(format_error(input, kind)),
        };
    }
    normalized
        .parse::<f64>()
        .map_err(|_| format_error(input, kind))
}

fn parse_bool(input: &str) -> ConversionResult<bool> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format_error(input, PrimitiveKind::Bool))
    }
}

/// Formats a primitive value as text using `culture`.
pub fn format_value(value: &Value, culture: &Culture) -> Option<String> {
    let localize = |text: String| {
        if culture.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &culture.decimal_separator.to_string())
        }
    };
    let text = match value {
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Char(c) => c.to_string(),
        Value::F32(v) => localize(v.to_string()),
        Value::F64(v) => localize(v.to_string()),
        Value::String(s) => s.clone(),
        other => other.as_integer()?.to_string(),
    };
    Some(text)
}

fn to_integer(value: &Value, kind: PrimitiveKind) -> ConversionResult<Value> {
    if let Some(v) = value.as_integer() {
        return integer_value(v, kind);
    }
    match value {
        Value::Bool(b) => integer_value(i128::from(*b), kind),
        Value::Char(c) => integer_value(u32::from(*c) as i128, kind),
        Value::F32(_) | Value::F64(_) => {
            let f = as_float(value).unwrap_or_default();
            if !f.is_finite() {
                return Err(overflow(f, kind));
            }
            let rounded = round_half_even(f);
            if rounded.abs() > 1e38 {
                return Err(overflow(f, kind));
            }
            integer_value(rounded as i128, kind)
        }
        Value::String(s) => integer_value(parse_integer(s, kind)?, kind),
        other => Err(invalid_cast(other, kind)),
    }
}

fn to_float(value: &Value, kind: PrimitiveKind, culture: &Culture) -> ConversionResult<Value> {
    if let Some(v) = value.as_integer() {
        return Ok(float_value(v as f64, kind));
    }
    match value {
        Value::Bool(b) => Ok(float_value(if *b { 1.0 } else { 0.0 }, kind)),
        Value::F32(_) | Value::F64(_) => Ok(float_value(as_float(value).unwrap_or_default(), kind)),
        Value::String(s) => Ok(float_value(parse_float(s, kind, culture)?, kind)),
        other => Err(invalid_cast(other, kind)),
    }
}

fn to_bool(value: &Value) -> ConversionResult<Value> {
    if let Some(v) = value.as_integer() {
        return Ok(Value::Bool(v != 0));
    }
    match value {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::F32(_) | Value::F64(_) => Ok(Value::Bool(as_float(value).unwrap_or_default() != 0.0)),
        Value::String(s) => Ok(Value::Bool(parse_bool(s)?)),
        other => Err(invalid_cast(other, PrimitiveKind::Bool)),
    }
}

fn to_char(value: &Value) -> ConversionResult<Value> {
    if let Some(v) = value.as_integer() {
        return u32::try_from(v)
            .ok()
            .and_then(char::from_u32)
            .map(Value::Char)
            .ok_or_else(|| overflow(v, PrimitiveKind::Char));
    }
    match value {
        Value::Char(c) => Ok(Value::Char(*c)),
        Value::String(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(format_error(s, PrimitiveKind::Char)),
            }
        }
        other => Err(invalid_cast(other, PrimitiveKind::Char)),
    }
}

/// Converts a primitive `value` to `target` using `culture`.
///
/// `Null` converts to the target's default value.
///
/// # Errors
///
/// - [`ConversionError::Format`] when text cannot be parsed (e.g. `"0xABC"` to an integer)
/// - [`ConversionError::Overflow`] when the value is out of the target's range
/// - [`ConversionError::InvalidCast`] when no conversion exists (e.g. char to bool)
///
/// # Examples
///
/// ```
/// use graft::{Culture, Value, convert, types::PrimitiveKind};
///
/// let culture = Culture::invariant();
/// let value = convert::convert(&Value::from("42"), PrimitiveKind::Int32, &culture).unwrap();
/// assert_eq!(value, Value::I32(42));
/// assert!(convert::convert(&Value::from("0xABC"), PrimitiveKind::Int32, &culture).is_err());
/// ```
pub fn convert(value: &Value, target: PrimitiveKind, culture: &Culture) -> ConversionResult<Value> {
    if value.is_null() {
        return Ok(default_value(target));
    }
    match target {
        PrimitiveKind::String => format_value(value, culture)
            .map(Value::String)
            .ok_or_else(|| invalid_cast(value, target)),
        PrimitiveKind::Bool => to_bool(value),
        PrimitiveKind::Char => to_char(value),
        PrimitiveKind::Float32 | PrimitiveKind::Float64 => to_float(value, target, culture),
        integer => to_integer(value, integer),
    }
}
