use super::backend::Backend;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// In-memory backend for testing.
///
/// Uses `RefCell` since a backend is only ever driven from one thread at a
/// time; the configuration's own lock covers the shared state.
#[derive(Debug, Default)]
pub struct MemBackend {
    files: RefCell<HashMap<PathBuf, String>>,
    simulate_read_error: RefCell<bool>,
    simulate_write_error: RefCell<bool>,
    simulate_remove_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), text.into());
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    /// Make reads of existing files fail with `PermissionDenied`.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        *self.simulate_read_error.borrow_mut() = simulate;
    }

    /// Make writes store the first half of the text, then fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    pub fn set_simulate_remove_error(&self, simulate: bool) {
        *self.simulate_remove_error.borrow_mut() = simulate;
    }
}

impl Backend for MemBackend {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        let files = self.files.borrow();
        let text = files.get(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{}", path.display()))
        })?;
        if *self.simulate_read_error.borrow() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Simulated read error",
            ));
        }
        Ok(text.clone())
    }

    fn write_text(&self, path: &Path, text: &str) -> io::Result<()> {
        if *self.simulate_write_error.borrow() {
            let partial: String = text.chars().take(text.chars().count() / 2).collect();
            self.insert(path, partial);
            return Err(io::Error::other("Simulated write error"));
        }
        self.insert(path, text);
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if *self.simulate_remove_error.borrow() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Simulated remove error",
            ));
        }
        match self.files.borrow_mut().remove(path) {
            Some(_) => Ok(()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}", path.display()),
            )),
        }
    }
}
