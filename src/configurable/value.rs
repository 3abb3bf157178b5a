//! Property value types.
//!
//! [`ConfigValue`] is the generic value tree every property holds. It mirrors
//! the shapes a JSON document can take, so the JSON bridge in [`crate::json`]
//! can move between the two without loss (apart from the number rule
//! documented there).

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Insertion-ordered map of property names to values.
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// Runtime representation of a property value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigValue {
    /// No value. Serialized as JSON `null`.
    #[default]
    Null,

    Bool(bool),

    /// Integral number.
    Int(i64),

    /// Non-integral number.
    Float(f64),

    String(String),

    /// Nested object, keys kept in document order.
    Map(ConfigMap),

    List(Vec<ConfigValue>),
}

impl ConfigValue {
    /// Textual fallback for values with no structural representation.
    ///
    /// The value is stored (and written) as a plain string.
    pub fn text(value: impl fmt::Display) -> Self {
        ConfigValue::String(value.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Name of the JSON shape this value serializes to.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Int(_) | ConfigValue::Float(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::Map(_) => "object",
            ConfigValue::List(_) => "array",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value as a float. Accepts `Int` too, since integral floats
    /// load as `Int`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Int(v) => Some(*v as f64),
            ConfigValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::json::to_json(self))
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::json::to_json(self).serialize(serializer)
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Int(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        ConfigValue::Int(v.into())
    }
}

impl From<u16> for ConfigValue {
    fn from(v: u16) -> Self {
        ConfigValue::Int(v.into())
    }
}

impl From<u32> for ConfigValue {
    fn from(v: u32) -> Self {
        ConfigValue::Int(v.into())
    }
}

impl From<u64> for ConfigValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => ConfigValue::Int(i),
            Err(_) => ConfigValue::Float(v as f64),
        }
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(v)
    }
}

impl From<f32> for ConfigValue {
    fn from(v: f32) -> Self {
        ConfigValue::Float(v.into())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::String(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::String(v.to_string())
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(v: ConfigMap) -> Self {
        ConfigValue::Map(v)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(v: Vec<T>) -> Self {
        ConfigValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ConfigValue::Null)
    }
}

/// Typed extraction from a [`ConfigValue`].
///
/// Returns `None` when the value has a different shape or does not fit the
/// target type.
pub trait FromValue: Sized {
    fn from_value(value: &ConfigValue) -> Option<Self>;
}

impl FromValue for ConfigValue {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for i32 {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_i64().and_then(|v| i32::try_from(v).ok())
    }
}

impl FromValue for u16 {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_i64().and_then(|v| u16::try_from(v).ok())
    }
}

impl FromValue for u32 {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_i64().and_then(|v| u32::try_from(v).ok())
    }
}

impl FromValue for u64 {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_i64().and_then(|v| u64::try_from(v).ok())
    }
}

impl FromValue for f64 {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for f32 {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_f64().map(|v| v as f32)
    }
}

impl FromValue for String {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for ConfigMap {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_map().cloned()
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_list()?.iter().map(T::from_value).collect()
    }
}
