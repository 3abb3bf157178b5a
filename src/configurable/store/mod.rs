//! # Loading and Writing
//!
//! This module moves configurations in and out of JSON files. File access
//! goes through the [`Backend`](backend::Backend) trait so the same logic
//! runs against the filesystem ([`fs_backend::FsBackend`]) and against
//! memory in tests ([`mem_backend::MemBackend`]).
//!
//! ## Loading
//!
//! 1. Read the file. A missing file is an empty document (reported at info
//!    level); a file that exists but cannot be read is also an empty document
//!    (reported as an error).
//! 2. Parse it. Invalid JSON, or JSON whose top level is not an object, is
//!    returned as an error. This is the only load failure callers see.
//! 3. Every hidden property the document does not mention is marked hidden
//!    on the configuration, so later writes leave it out.
//! 4. Every key in the document is merged into the property table,
//!    overwriting existing values and creating new cells as needed. Keys the
//!    document lacks keep their current values.
//!
//! ## Writing
//!
//! The table is snapshotted (nulls included), hidden names are dropped, and
//! the rest is written as pretty-printed JSON in table order. A failed write
//! is reported and the partial file removed; nothing is returned to the
//! caller. Callers must not assume the previous file survives a failed
//! write.

use crate::configuration::{Configurable, Configuration};
use crate::diagnostics::DiagnosticSink;
use crate::error::{ConfigError, Result};
use crate::json;
use crate::schema::FieldStatus;
use serde_json::{Map, Value};
use std::io;
use std::path::Path;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

use backend::Backend;
use fs_backend::FsBackend;

/// Build a `T` and load `path` into it.
pub fn read<T: Configurable>(path: impl AsRef<Path>, sink: &dyn DiagnosticSink) -> Result<T> {
    let configuration = Configuration::with_schema(T::schema());
    load_with(&FsBackend, &configuration, path.as_ref(), sink)?;
    Ok(T::from_configuration(configuration))
}

/// Merge the document at `path` into `configuration`.
pub fn load_with(
    backend: &dyn Backend,
    configuration: &Configuration,
    path: &Path,
    sink: &dyn DiagnosticSink,
) -> Result<()> {
    let document = read_document(backend, path, sink)?;

    // Shadowing only decides which default binds; a hidden declaration
    // anywhere in the chain still hides its name.
    let mut hidden = Vec::new();
    for (descriptor, status) in configuration.schema().classify() {
        if matches!(status, FieldStatus::Shadowed | FieldStatus::Unnamed) {
            sink.debug(status.message(descriptor));
        }
        if status != FieldStatus::Unnamed
            && descriptor.hidden
            && !document.contains_key(&descriptor.name)
        {
            hidden.push(descriptor.name.clone());
        }
    }

    configuration.merge(hidden, json::from_document(&document));
    Ok(())
}

/// Write `configuration` to `path`, reporting failures to `sink`.
pub fn write_with(
    backend: &dyn Backend,
    configuration: &Configuration,
    path: &Path,
    sink: &dyn DiagnosticSink,
) {
    let text = match configuration.to_json_string() {
        Ok(text) => text,
        Err(e) => {
            sink.error(format!(
                "Unable to serialize configuration for {}: {}",
                path.display(),
                e
            ));
            return;
        }
    };

    if let Err(e) = backend.write_text(path, &text) {
        sink.error(format!(
            "Unable to write configuration file to {}: {}",
            path.display(),
            e
        ));
        match backend.remove(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => sink.error(format!(
                "Unable to delete configuration file at {}: {}",
                path.display(),
                e
            )),
        }
    }
}

/// Write `configuration` to `path`, returning the first failure.
pub fn try_write_with(
    backend: &dyn Backend,
    configuration: &Configuration,
    path: &Path,
) -> Result<()> {
    let text = configuration.to_json_string()?;
    backend.write_text(path, &text)?;
    Ok(())
}

fn read_document(
    backend: &dyn Backend,
    path: &Path,
    sink: &dyn DiagnosticSink,
) -> Result<Map<String, Value>> {
    let text = match backend.read_text(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            sink.info(format!(
                "Unable to parse {}: file does not exist",
                path.display()
            ));
            return Ok(Map::new());
        }
        Err(e) => {
            sink.error(format!("Unable to parse {}: {}", path.display(), e));
            return Ok(Map::new());
        }
    };
    parse_document(&text, path)
}

/// Parse `text` as a configuration document. `path` is only used in errors.
pub fn parse_document(text: &str, path: &Path) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(object) => Ok(object),
        other => Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
            found: json::kind_name(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::mem_backend::MemBackend;
    use super::*;
    use crate::diagnostics::{CollectingSink, Severity};
    use crate::schema::{PropertyDescriptor, Schema};
    use crate::value::ConfigValue;

    fn schema() -> Schema {
        Schema::builder("AppConfig")
            .property(PropertyDescriptor::new("name", "app"))
            .property(PropertyDescriptor::new("secret", "s3cr3t").hidden())
            .build()
    }

    fn load(backend: &MemBackend, text: Option<&str>) -> (Configuration, CollectingSink) {
        if let Some(text) = text {
            backend.insert("app.json", text);
        }
        let config = Configuration::with_schema(schema());
        let sink = CollectingSink::new();
        load_with(backend, &config, Path::new("app.json"), &sink).unwrap();
        (config, sink)
    }

    #[test]
    fn missing_file_loads_defaults_with_info() {
        let backend = MemBackend::new();
        let (config, sink) = load(&backend, None);

        assert_eq!(config.get("name"), Some(ConfigValue::from("app")));
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Info);
        assert!(diagnostics[0].message.contains("does not exist"));
    }

    #[test]
    fn unreadable_file_loads_defaults_with_error() {
        let backend = MemBackend::new();
        backend.set_simulate_read_error(true);
        let (config, sink) = load(&backend, Some("{\"name\": \"other\"}"));

        assert_eq!(config.get("name"), Some(ConfigValue::from("app")));
        assert_eq!(sink.at_least(Severity::Error).len(), 1);
    }

    #[test]
    fn top_level_array_is_fatal() {
        let backend = MemBackend::new();
        backend.insert("app.json", "[1, 2]");
        let config = Configuration::new();

        let err = load_with(&backend, &config, Path::new("app.json"), &CollectingSink::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { found: "array", .. }));
        assert!(err.is_parse_error());
    }

    #[test]
    fn invalid_json_is_fatal() {
        let err = parse_document("{\"a\": ", Path::new("x.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_merges_without_dropping_existing() {
        let backend = MemBackend::new();
        let (config, _) = load(&backend, Some("{\"extra\": [1, 2.5]}"));

        assert_eq!(config.get("name"), Some(ConfigValue::from("app")));
        assert_eq!(
            config.get("extra"),
            Some(ConfigValue::List(vec![
                ConfigValue::Int(1),
                ConfigValue::Float(2.5)
            ]))
        );
    }

    #[test]
    fn hidden_absent_from_document_is_marked() {
        let backend = MemBackend::new();
        let (config, _) = load(&backend, Some("{\"name\": \"x\"}"));
        assert!(config.is_hidden("secret"));
        // Still readable, just not written.
        assert_eq!(config.get("secret"), Some(ConfigValue::from("s3cr3t")));
    }

    #[test]
    fn hidden_present_in_document_is_written() {
        let backend = MemBackend::new();
        let (config, _) = load(&backend, Some("{\"secret\": \"given\"}"));
        assert!(!config.is_hidden("secret"));

        write_with(&backend, &config, Path::new("out.json"), &CollectingSink::new());
        let out = backend.contents(Path::new("out.json")).unwrap();
        assert!(out.contains("\"secret\": \"given\""));
    }

    #[test]
    fn hidden_base_declaration_hides_shadowing_name() {
        let base = Schema::builder("Base")
            .property(PropertyDescriptor::new("token", "base").hidden())
            .build();
        let schema = Schema::builder("Derived")
            .property(PropertyDescriptor::new("token", "derived"))
            .extends(base)
            .build();
        let config = Configuration::with_schema(schema);
        let backend = MemBackend::new();
        backend.insert("app.json", "{}");

        load_with(&backend, &config, Path::new("app.json"), &CollectingSink::new()).unwrap();

        assert!(config.is_hidden("token"));
        assert_eq!(config.get("token"), Some(ConfigValue::from("derived")));
    }

    #[test]
    fn shadowed_descriptors_are_reported_at_debug() {
        let schema = Schema::builder("Dup")
            .property(PropertyDescriptor::new("a", 1))
            .property(PropertyDescriptor::new("a", 2))
            .build();
        let config = Configuration::with_schema(schema);
        let backend = MemBackend::new();
        backend.insert("dup.json", "{}");
        let sink = CollectingSink::new();

        load_with(&backend, &config, Path::new("dup.json"), &sink).unwrap();

        let debug: Vec<_> = sink
            .diagnostics()
            .into_iter()
            .filter(|d| d.severity == Severity::Debug)
            .collect();
        assert_eq!(debug.len(), 1);
        assert!(debug[0].message.contains("shadowed"));
        assert_eq!(config.get("a"), Some(ConfigValue::Int(1)));
    }

    #[test]
    fn failed_write_removes_partial_file() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let config = Configuration::new();
        config.set("a", 1);
        let sink = CollectingSink::new();

        write_with(&backend, &config, Path::new("out.json"), &sink);

        assert!(!backend.exists(Path::new("out.json")));
        let errors = sink.at_least(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Unable to write"));
    }

    #[test]
    fn failed_cleanup_is_reported_too() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        backend.set_simulate_remove_error(true);
        let config = Configuration::new();
        let sink = CollectingSink::new();

        write_with(&backend, &config, Path::new("out.json"), &sink);

        let errors = sink.at_least(Severity::Error);
        assert_eq!(errors.len(), 2);
        assert!(errors[1].message.contains("Unable to delete"));
    }

    #[test]
    fn try_write_propagates_failure() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let config = Configuration::new();

        let err = try_write_with(&backend, &config, Path::new("out.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
