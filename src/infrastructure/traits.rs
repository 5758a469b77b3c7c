//! I/O boundary traits for testability
//!
//! These traits abstract filesystem operations, allowing services
//! to be tested with mock or instrumented implementations.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file, truncating any previous content.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Append string content to an existing file.
    fn append(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Create a file that must not exist yet (fails with `AlreadyExists` otherwise).
    fn create_new(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn append(&self, path: &Path, content: &str) -> io::Result<()> {
        // no `create`: appending to a missing manifest is a caller bug
        let mut file = OpenOptions::new().append(true).open(path)?;
        file.write_all(content.as_bytes())?;
        file.flush()
    }

    fn create_new(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(content.as_bytes())?;
        file.flush()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}
