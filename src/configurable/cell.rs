use crate::value::ConfigValue;
use std::fmt;

/// A single mutable property slot.
///
/// Cells live inside a [`Configuration`](crate::Configuration)'s property
/// table and are only reachable through it, so all synchronization is the
/// table's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueCell {
    value: ConfigValue,
}

impl ValueCell {
    pub fn new(value: impl Into<ConfigValue>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Current value, or `None` when the cell holds null.
    pub fn get(&self) -> Option<&ConfigValue> {
        if self.value.is_null() {
            None
        } else {
            Some(&self.value)
        }
    }

    /// Current value, or `default` when the cell holds null.
    pub fn get_or_default(&self, default: impl Into<ConfigValue>) -> ConfigValue {
        match self.get() {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Replace the value, returning the previous one.
    pub fn set(&mut self, value: impl Into<ConfigValue>) -> ConfigValue {
        std::mem::replace(&mut self.value, value.into())
    }

    /// Replace the value with `f(current)`.
    pub fn map<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(ConfigValue) -> ConfigValue,
    {
        self.value = f(std::mem::take(&mut self.value));
        self
    }

    /// Clear the value to null unless `predicate(current)` holds.
    pub fn filter<P>(&mut self, predicate: P) -> &mut Self
    where
        P: FnOnce(&ConfigValue) -> bool,
    {
        if !predicate(&self.value) {
            self.value = ConfigValue::Null;
        }
        self
    }

    pub(crate) fn value(&self) -> &ConfigValue {
        &self.value
    }
}

impl fmt::Display for ValueCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
