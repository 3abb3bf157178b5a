//! # Configurable Architecture
//!
//! Configurable binds a JSON file to a table of named properties. A host type
//! declares its properties (name, default, whether hidden), loads a file over
//! those defaults, reads and changes values by name or through typed keys,
//! and writes the table back out.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - show / get / set / unset against a single file           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Configuration (configuration.rs)                           │
//! │  - Property table + hidden set behind one RwLock            │
//! │  - get / set / update, typed Keys, Configurable trait       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/)                                             │
//! │  - Load: read → parse → mark hidden → merge                 │
//! │  - Write: snapshot → drop hidden → pretty JSON → write      │
//! │  - Backend trait: FsBackend (production), MemBackend (tests)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Beneath these sit the value tree ([`value`]), the JSON bridge ([`json`]),
//! the single-slot [`cell`] and the property declarations ([`schema`]).
//!
//! ## Hidden Properties
//!
//! A property declared hidden is left out of written files whenever the
//! document it was loaded from did not mention it. Defaults for secrets and
//! machine-specific values therefore never leak into a file the user did not
//! put them in. Once marked, a name stays hidden for the life of the
//! configuration, even if it is later set explicitly.
//!
//! ## Diagnostics
//!
//! Nothing in the library logs through global state. Loading and writing
//! take a [`DiagnosticSink`]; [`TracingSink`] forwards to `tracing`.
//!
//! ## Module Overview
//!
//! - [`configuration`]: The configuration object and typed access
//! - [`store`]: Loading, writing and storage backends
//! - [`schema`]: Property declarations and classification
//! - [`value`]: The property value tree
//! - [`cell`]: The mutable slot holding one value
//! - [`json`]: Conversion to and from `serde_json`
//! - [`diagnostics`]: Diagnostic sinks
//! - [`error`]: Error types

pub mod cell;
pub mod configuration;
pub mod diagnostics;
pub mod error;
pub mod json;
pub mod schema;
pub mod store;
pub mod value;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use cell::ValueCell;
pub use configuration::{Configurable, Configuration, Key};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Severity, TracingSink};
pub use error::{ConfigError, Result};
pub use schema::{FieldStatus, PropertyDescriptor, Schema};
pub use value::{ConfigMap, ConfigValue, FromValue};
