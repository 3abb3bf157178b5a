use std::io;
use std::path::Path;

/// Raw text I/O for configuration files.
///
/// The loader and writer decide what a failure means; backends only report
/// it. A missing file must come back as [`io::ErrorKind::NotFound`].
pub trait Backend {
    /// Read the whole file.
    fn read_text(&self, path: &Path) -> io::Result<String>;

    /// Replace the file's contents. May leave a partial file behind on error.
    fn write_text(&self, path: &Path, text: &str) -> io::Result<()>;

    /// Delete the file.
    fn remove(&self, path: &Path) -> io::Result<()>;
}
