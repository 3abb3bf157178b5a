//! Property declarations and the table built from them.
//!
//! A configuration type declares its properties up front as an ordered list
//! of [`PropertyDescriptor`]s. A type that builds on another one lists its own
//! descriptors first and then [`extends`](SchemaBuilder::extends) the base
//! schema, so the most specific declaration of a name is the one that binds.
//!
//! ```
//! use configurable::schema::{PropertyDescriptor, Schema};
//!
//! let base = Schema::builder("BaseConfig")
//!     .property(PropertyDescriptor::new("log_level", "info"))
//!     .build();
//!
//! let schema = Schema::builder("ServerConfig")
//!     .property(PropertyDescriptor::new("port", 8080))
//!     .property(PropertyDescriptor::new("token", "").hidden())
//!     .extends(base)
//!     .build();
//!
//! assert_eq!(schema.bindable().count(), 3);
//! ```

use crate::cell::ValueCell;
use crate::value::ConfigValue;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Name → cell mapping owned by a configuration. Iterates in insertion order.
pub type PropertyTable = IndexMap<String, ValueCell>;

/// Declaration of a single property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// Property name, also the key in the JSON document.
    pub name: String,

    /// Value the property holds until something else is loaded or set.
    pub default: ConfigValue,

    /// Whether the property is kept out of written files when the loaded
    /// document did not mention it.
    pub hidden: bool,

    /// Name of the type that declared this property, for diagnostics.
    pub declared_in: &'static str,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, default: impl Into<ConfigValue>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            hidden: false,
            declared_in: "",
        }
    }

    /// Mark the property hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn declared_in(mut self, owner: &'static str) -> Self {
        self.declared_in = owner;
        self
    }
}

/// Outcome of checking a descriptor against the rest of its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    /// Bound normally.
    Valid,

    /// Bound, and subject to hiding on write.
    Hidden,

    /// An earlier descriptor already bound this name; ignored.
    Shadowed,

    /// Empty property name; ignored.
    Unnamed,
}

impl FieldStatus {
    /// Only `Valid` and `Hidden` descriptors take part in binding.
    pub fn is_bindable(self) -> bool {
        matches!(self, FieldStatus::Valid | FieldStatus::Hidden)
    }

    /// Human-readable explanation for diagnostic tooling.
    pub fn message(self, descriptor: &PropertyDescriptor) -> String {
        let owner = if descriptor.declared_in.is_empty() {
            "<unknown>"
        } else {
            descriptor.declared_in
        };
        match self {
            FieldStatus::Valid => "Valid".to_string(),
            FieldStatus::Hidden => {
                format!("Hidden property '{}' declared in {}", descriptor.name, owner)
            }
            FieldStatus::Shadowed => format!(
                "Property '{}' declared in {} is shadowed by an earlier declaration",
                descriptor.name, owner
            ),
            FieldStatus::Unnamed => format!("Property declared in {} has an empty name", owner),
        }
    }
}

/// Ordered property declarations of one configuration type.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    kind: &'static str,
    descriptors: Vec<PropertyDescriptor>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::empty("Configuration")
    }
}

impl Schema {
    /// A schema with no declared properties. Everything is created at runtime.
    pub fn empty(kind: &'static str) -> Self {
        Self {
            kind,
            descriptors: Vec::new(),
        }
    }

    pub fn builder(kind: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            schema: Self::empty(kind),
        }
    }

    /// Type name shown when a configuration is displayed.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn descriptors(&self) -> &[PropertyDescriptor] {
        &self.descriptors
    }

    /// Every descriptor paired with its status, in declaration order.
    pub fn classify(&self) -> Vec<(&PropertyDescriptor, FieldStatus)> {
        let mut seen = HashSet::new();
        self.descriptors
            .iter()
            .map(|descriptor| {
                let status = if descriptor.name.is_empty() {
                    FieldStatus::Unnamed
                } else if !seen.insert(descriptor.name.as_str()) {
                    FieldStatus::Shadowed
                } else if descriptor.hidden {
                    FieldStatus::Hidden
                } else {
                    FieldStatus::Valid
                };
                (descriptor, status)
            })
            .collect()
    }

    /// Descriptors that take part in binding.
    pub fn bindable(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.classify()
            .into_iter()
            .filter(|(_, status)| status.is_bindable())
            .map(|(descriptor, _)| descriptor)
    }

    /// Build a fresh property table holding every bindable default.
    pub fn build_table(&self) -> PropertyTable {
        let mut table = PropertyTable::with_capacity(self.descriptors.len());
        for descriptor in self.bindable() {
            table
                .entry(descriptor.name.clone())
                .or_insert_with(|| ValueCell::new(descriptor.default.clone()));
        }
        table
    }
}

pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Declare a property. Descriptors without an owner are attributed to
    /// this schema's kind.
    pub fn property(mut self, descriptor: PropertyDescriptor) -> Self {
        let descriptor = if descriptor.declared_in.is_empty() {
            descriptor.declared_in(self.schema.kind)
        } else {
            descriptor
        };
        self.schema.descriptors.push(descriptor);
        self
    }

    /// Append the base type's declarations after the ones made so far.
    pub fn extends(mut self, base: Schema) -> Self {
        for descriptor in base.descriptors {
            let descriptor = if descriptor.declared_in.is_empty() {
                descriptor.declared_in(base.kind)
            } else {
                descriptor
            };
            self.schema.descriptors.push(descriptor);
        }
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}
