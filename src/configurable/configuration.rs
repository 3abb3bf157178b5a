//! The configuration object.
//!
//! A [`Configuration`] owns a property table (name → [`ValueCell`]) and the
//! set of names to leave out when writing. Both sit behind one
//! `parking_lot::RwLock`: lookups and snapshots take the read lock, anything
//! that changes the table takes the write lock for the whole change, so a
//! cell is never visible before its value is in place.
//!
//! The table is built from the [`Schema`] the first time anything touches
//! it, and is never rebuilt afterwards.
//!
//! Host types wrap a `Configuration` and expose typed accessors through
//! [`Key`]s:
//!
//! ```
//! use configurable::{Configurable, Configuration, Key};
//! use configurable::schema::{PropertyDescriptor, Schema};
//!
//! struct ServerConfig(Configuration);
//!
//! impl ServerConfig {
//!     const PORT: Key<u16> = Key::new("port");
//!
//!     fn port(&self) -> u16 {
//!         self.0.value_or(&Self::PORT, 8080)
//!     }
//! }
//!
//! impl Configurable for ServerConfig {
//!     fn schema() -> Schema {
//!         Schema::builder("ServerConfig")
//!             .property(PropertyDescriptor::new("port", 8080))
//!             .build()
//!     }
//!
//!     fn from_configuration(configuration: Configuration) -> Self {
//!         ServerConfig(configuration)
//!     }
//!
//!     fn configuration(&self) -> &Configuration {
//!         &self.0
//!     }
//! }
//!
//! let server = ServerConfig::from_configuration(Configuration::with_schema(ServerConfig::schema()));
//! assert_eq!(server.port(), 8080);
//! ```

use crate::cell::ValueCell;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::json;
use crate::schema::{PropertyTable, Schema};
use crate::store::{self, fs_backend::FsBackend};
use crate::value::{ConfigMap, ConfigValue, FromValue};
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

#[derive(Debug, Default)]
struct State {
    properties: PropertyTable,
    built: bool,
    hidden: HashSet<String>,
}

impl State {
    fn table(&mut self, schema: &Schema) -> &mut PropertyTable {
        if !self.built {
            self.properties = schema.build_table();
            self.built = true;
        }
        &mut self.properties
    }
}

#[derive(Debug)]
pub struct Configuration {
    schema: Schema,
    state: RwLock<State>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Configuration {
    /// A configuration with no declared properties.
    pub fn new() -> Self {
        Self::with_schema(Schema::default())
    }

    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            state: RwLock::new(State::default()),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create an empty configuration and load `path` into it.
    pub fn read(path: impl AsRef<Path>, sink: &dyn DiagnosticSink) -> Result<Self> {
        let configuration = Self::new();
        configuration.load(path, sink)?;
        Ok(configuration)
    }

    /// Merge the JSON document at `path` into this configuration.
    ///
    /// A missing or unreadable file counts as an empty document. A file that
    /// does not hold a JSON object is an error.
    pub fn load(&self, path: impl AsRef<Path>, sink: &dyn DiagnosticSink) -> Result<()> {
        store::load_with(&FsBackend, self, path.as_ref(), sink)
    }

    /// Write this configuration to `path`.
    ///
    /// Failures are reported to `sink` and never returned; a partially
    /// written file is removed.
    pub fn write(&self, path: impl AsRef<Path>, sink: &dyn DiagnosticSink) -> &Self {
        store::write_with(&FsBackend, self, path.as_ref(), sink);
        self
    }

    /// Write this configuration to `path`, returning any failure as is.
    pub fn try_write(&self, path: impl AsRef<Path>) -> Result<()> {
        store::try_write_with(&FsBackend, self, path.as_ref())
    }

    /// Current value of `name`, or `None` if it is unset or null.
    pub fn get(&self, name: &str) -> Option<ConfigValue> {
        self.built()
            .properties
            .get(name)
            .and_then(ValueCell::get)
            .cloned()
    }

    /// Set `name` to `value`, returning the previous value.
    ///
    /// Setting [`ConfigValue::Null`] removes the property.
    pub fn set(&self, name: &str, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        let value = value.into();
        let mut state = self.state.write();
        let table = state.table(&self.schema);

        if value.is_null() {
            return table.shift_remove(name).and_then(|cell| cell.get().cloned());
        }

        let previous = table.entry(name.to_string()).or_default().set(value);
        if previous.is_null() {
            None
        } else {
            Some(previous)
        }
    }

    /// Remove `name`, returning its value.
    pub fn remove(&self, name: &str) -> Option<ConfigValue> {
        self.set(name, ConfigValue::Null)
    }

    /// Run `f` on the cell for `name` while holding the write lock. The cell
    /// is created (holding null) if it does not exist.
    pub fn update<R>(&self, name: &str, f: impl FnOnce(&mut ValueCell) -> R) -> R {
        let mut state = self.state.write();
        let cell = state
            .table(&self.schema)
            .entry(name.to_string())
            .or_default();
        f(cell)
    }

    /// Whether the table has a cell for `name`, null or not.
    pub fn contains(&self, name: &str) -> bool {
        self.built().properties.contains_key(name)
    }

    /// Property names in table order.
    pub fn names(&self) -> Vec<String> {
        self.built().properties.keys().cloned().collect()
    }

    /// Every property and its value (nulls included), hidden ones too.
    pub fn snapshot(&self) -> ConfigMap {
        self.built()
            .properties
            .iter()
            .map(|(name, cell)| (name.clone(), cell.value().clone()))
            .collect()
    }

    /// Whether `name` will be left out of written files.
    pub fn is_hidden(&self, name: &str) -> bool {
        self.state.read().hidden.contains(name)
    }

    /// The document [`write`](Self::write) produces, as a string.
    pub fn to_json_string(&self) -> Result<String> {
        let document = json::to_document(&self.visible());
        Ok(serde_json::to_string_pretty(&serde_json::Value::Object(
            document,
        ))?)
    }

    pub fn value<T: FromValue>(&self, key: &Key<T>) -> Option<T> {
        self.get(key.name).as_ref().and_then(T::from_value)
    }

    pub fn value_or<T: FromValue>(&self, key: &Key<T>, default: T) -> T {
        self.value(key).unwrap_or(default)
    }

    /// Set a typed property, returning the previous value if it had the
    /// same type.
    pub fn set_value<T>(&self, key: &Key<T>, value: T) -> Option<T>
    where
        T: FromValue + Into<ConfigValue>,
    {
        self.set(key.name, value).as_ref().and_then(T::from_value)
    }

    /// Snapshot with hidden names removed.
    pub(crate) fn visible(&self) -> ConfigMap {
        let state = self.built();
        state
            .properties
            .iter()
            .filter(|(name, _)| !state.hidden.contains(name.as_str()))
            .map(|(name, cell)| (name.clone(), cell.value().clone()))
            .collect()
    }

    /// Mark `hidden` names and merge `values` in a single write.
    pub(crate) fn merge(&self, hidden: Vec<String>, values: ConfigMap) {
        let mut state = self.state.write();
        state.hidden.extend(hidden);
        let table = state.table(&self.schema);
        for (name, value) in values {
            table.entry(name).or_default().set(value);
        }
    }

    /// Read access to a state whose table has been built.
    fn built(&self) -> RwLockReadGuard<'_, State> {
        {
            let state = self.state.read();
            if state.built {
                return state;
            }
        }
        self.state.write().table(&self.schema);
        self.state.read()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        write!(f, "{}{{", self.schema.kind())?;
        if state.built {
            for (i, (name, cell)) in state.properties.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", name, cell)?;
            }
        }
        write!(f, "}}")
    }
}

/// Typed handle to a property.
pub struct Key<T> {
    name: &'static str,
    _type: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _type: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.name).finish()
    }
}

/// A host type backed by a [`Configuration`].
pub trait Configurable: Sized {
    /// Property declarations, most specific first.
    fn schema() -> Schema;

    fn from_configuration(configuration: Configuration) -> Self;

    fn configuration(&self) -> &Configuration;

    /// Load `path` into a fresh instance.
    fn read(path: impl AsRef<Path>, sink: &dyn DiagnosticSink) -> Result<Self> {
        store::read(path, sink)
    }

    fn write(&self, path: impl AsRef<Path>, sink: &dyn DiagnosticSink) {
        self.configuration().write(path, sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PropertyDescriptor;

    fn server_schema() -> Schema {
        Schema::builder("ServerConfig")
            .property(PropertyDescriptor::new("host", "localhost"))
            .property(PropertyDescriptor::new("port", 8080))
            .property(PropertyDescriptor::new("token", ConfigValue::Null).hidden())
            .build()
    }

    #[test]
    fn defaults_are_visible_through_get() {
        let config = Configuration::with_schema(server_schema());
        assert_eq!(config.get("host"), Some(ConfigValue::from("localhost")));
        assert_eq!(config.get("port"), Some(ConfigValue::Int(8080)));
        assert_eq!(config.get("token"), None);
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn set_returns_previous_value() {
        let config = Configuration::with_schema(server_schema());
        assert_eq!(config.set("port", 9090), Some(ConfigValue::Int(8080)));
        assert_eq!(config.get("port"), Some(ConfigValue::Int(9090)));
    }

    #[test]
    fn set_creates_runtime_properties() {
        let config = Configuration::new();
        assert_eq!(config.set("extra", true), None);
        assert_eq!(config.get("extra"), Some(ConfigValue::Bool(true)));
        assert_eq!(config.names(), ["extra"]);
    }

    #[test]
    fn set_null_deletes() {
        let config = Configuration::new();
        config.set("x", 5);
        assert_eq!(config.set("x", ConfigValue::Null), Some(ConfigValue::Int(5)));
        assert_eq!(config.get("x"), None);
        assert!(!config.contains("x"));
        assert_eq!(config.remove("x"), None);
    }

    #[test]
    fn update_exposes_cell_operations() {
        let config = Configuration::with_schema(server_schema());
        config.update("port", |cell| {
            cell.filter(|v| v.as_i64().is_some_and(|p| p > 10_000));
        });
        assert_eq!(config.get("port"), None);
        assert!(config.contains("port"));

        let doubled = config.update("workers", |cell| {
            cell.set(4);
            cell.map(|v| ConfigValue::Int(v.as_i64().unwrap_or(1) * 2))
                .get()
                .cloned()
        });
        assert_eq!(doubled, Some(ConfigValue::Int(8)));
    }

    #[test]
    fn typed_keys_convert() {
        const PORT: Key<u16> = Key::new("port");
        const HOST: Key<String> = Key::new("host");

        let config = Configuration::with_schema(server_schema());
        assert_eq!(config.value(&PORT), Some(8080));
        assert_eq!(config.value_or(&HOST, String::new()), "localhost");

        assert_eq!(config.set_value(&PORT, 443), Some(8080));
        assert_eq!(config.get("port"), Some(ConfigValue::Int(443)));
    }

    #[test]
    fn typed_key_with_wrong_shape_is_none() {
        const HOST: Key<i64> = Key::new("host");
        let config = Configuration::with_schema(server_schema());
        assert_eq!(config.value(&HOST), None);
        assert_eq!(config.value_or(&HOST, 7), 7);
    }

    #[test]
    fn merge_marks_hidden_and_overwrites() {
        let config = Configuration::with_schema(server_schema());
        let mut values = ConfigMap::new();
        values.insert("port".into(), ConfigValue::Int(1));
        values.insert("new".into(), ConfigValue::Null);

        config.merge(vec!["token".into()], values);

        assert!(config.is_hidden("token"));
        assert_eq!(config.get("port"), Some(ConfigValue::Int(1)));
        assert!(config.contains("new"));
        assert_eq!(config.get("host"), Some(ConfigValue::from("localhost")));
        assert!(!config.visible().contains_key("token"));
    }

    #[test]
    fn snapshot_keeps_nulls_and_order() {
        let config = Configuration::with_schema(server_schema());
        let snapshot = config.snapshot();
        assert_eq!(
            snapshot.keys().collect::<Vec<_>>(),
            ["host", "port", "token"]
        );
        assert_eq!(snapshot["token"], ConfigValue::Null);
    }

    #[test]
    fn display_before_and_after_build() {
        let config = Configuration::with_schema(server_schema());
        assert_eq!(config.to_string(), "ServerConfig{}");

        config.get("host");
        assert_eq!(
            config.to_string(),
            "ServerConfig{host=\"localhost\", port=8080, token=null}"
        );
    }

    #[test]
    fn to_json_string_is_pretty_and_keeps_nulls() {
        let config = Configuration::new();
        config.set("a", 1);
        config.update("b", |_| ());
        assert_eq!(config.to_json_string().unwrap(), "{\n  \"a\": 1,\n  \"b\": null\n}");
    }
}
