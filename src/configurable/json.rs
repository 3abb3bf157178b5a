//! Conversion between [`ConfigValue`] trees and `serde_json` documents.
//!
//! ## Numbers
//!
//! JSON has one number type; properties have two. On the way in, a number
//! becomes [`ConfigValue::Int`] when truncating it to a 32-bit integer and
//! widening that back to a 32-bit float gives the same float as the number
//! itself, and [`ConfigValue::Float`] otherwise:
//!
//! | JSON | Loaded as |
//! |------|-----------|
//! | `4` | `Int(4)` |
//! | `4.0` | `Int(4)` |
//! | `4.5` | `Float(4.5)` |
//! | `1e10` | `Float(1e10)` |
//! | `2147483648` | `Float(2147483648.0)` |
//!
//! The comparison happens at 32-bit float precision, so integers above 2^24
//! that still fit in an `i32` load as `Int` while some near-integral decimals
//! collapse onto their integer part. Files written by older releases depend
//! on this, so it is kept as is.
//!
//! On the way out, non-finite floats have no JSON form and are written as
//! `null`.

use crate::value::{ConfigMap, ConfigValue};
use serde_json::{Map, Number, Value};

/// Convert a parsed JSON value into a property value.
pub fn from_json(value: &Value) -> ConfigValue {
    match value {
        Value::Null => ConfigValue::Null,
        Value::Bool(b) => ConfigValue::Bool(*b),
        Value::Number(n) => from_number(n),
        Value::String(s) => ConfigValue::String(s.clone()),
        Value::Array(items) => ConfigValue::List(items.iter().map(from_json).collect()),
        Value::Object(object) => ConfigValue::Map(from_document(object)),
    }
}

/// Convert a JSON object into an ordered property map.
pub fn from_document(object: &Map<String, Value>) -> ConfigMap {
    object
        .iter()
        .map(|(name, value)| (name.clone(), from_json(value)))
        .collect()
}

/// Apply the integral/float rule described in the module docs.
pub fn from_number(number: &Number) -> ConfigValue {
    let (truncated, single) = if let Some(i) = number.as_i64() {
        (i as i32, i as f32)
    } else if let Some(u) = number.as_u64() {
        (u as i32, u as f32)
    } else {
        // `as i64` truncates toward zero; the second cast keeps the low 32 bits.
        let f = number.as_f64().unwrap_or(f64::NAN);
        (f as i64 as i32, f as f32)
    };

    if truncated as f32 == single {
        ConfigValue::Int(truncated.into())
    } else {
        ConfigValue::Float(number.as_f64().unwrap_or(f64::NAN))
    }
}

/// Name of a JSON value's shape, for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert a property value into a JSON value.
pub fn to_json(value: &ConfigValue) -> Value {
    match value {
        ConfigValue::Null => Value::Null,
        ConfigValue::Bool(b) => Value::Bool(*b),
        ConfigValue::Int(i) => Value::Number((*i).into()),
        ConfigValue::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ConfigValue::String(s) => Value::String(s.clone()),
        ConfigValue::Map(map) => Value::Object(to_document(map)),
        ConfigValue::List(items) => Value::Array(items.iter().map(to_json).collect()),
    }
}

/// Convert an ordered property map into a JSON object.
pub fn to_document(map: &ConfigMap) -> Map<String, Value> {
    map.iter()
        .map(|(name, value)| (name.clone(), to_json(value)))
        .collect()
}
