//! Filesystem gateway: the idempotent create primitives every service builds on
//!
//! All existence checks happen here, so "create-if-absent" means the same thing
//! at every call site.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

/// Whether an existing file may be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Write only when the target is absent; existing content is never touched.
    CreateIfAbsent,
    /// Always write, replacing existing content.
    AlwaysOverwrite,
}

/// Result of a single create/write primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExisted,
    Overwritten,
}

impl Outcome {
    /// Whether the call touched the disk.
    pub fn wrote(&self) -> bool {
        !matches!(self, Outcome::AlreadyExisted)
    }
}

/// Directory and file creation over a [`FileSystem`].
pub struct FileSystemGateway {
    fs: Arc<dyn FileSystem>,
}

impl FileSystemGateway {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Create `path` and any missing parents. No-op if it is already a directory.
    pub fn ensure_dir(&self, path: &Path) -> ApplicationResult<Outcome> {
        if self.fs.is_dir(path) {
            trace!("ensure_dir: exists {}", path.display());
            return Ok(Outcome::AlreadyExisted);
        }
        if self.fs.exists(path) {
            return Err(ApplicationError::NotADirectory(path.to_path_buf()));
        }
        self.fs
            .create_dir_all(path)
            .with_path_context("create directory", path)?;
        debug!("ensure_dir: created {}", path.display());
        Ok(Outcome::Created)
    }

    /// Write `content` to `path` according to `policy`.
    ///
    /// The parent directory must already exist.
    pub fn write_file(
        &self,
        path: &Path,
        content: &str,
        policy: WritePolicy,
    ) -> ApplicationResult<Outcome> {
        if self.fs.is_dir(path) {
            return Err(ApplicationError::NotAFile(path.to_path_buf()));
        }
        let outcome = match (self.fs.exists(path), policy) {
            (true, WritePolicy::CreateIfAbsent) => {
                trace!("write_file: exists {}", path.display());
                return Ok(Outcome::AlreadyExisted);
            }
            (true, WritePolicy::AlwaysOverwrite) => Outcome::Overwritten,
            (false, _) => Outcome::Created,
        };
        self.fs
            .write(path, content)
            .with_path_context("write file", path)?;
        debug!("write_file: {:?} {}", outcome, path.display());
        Ok(outcome)
    }

    /// Create an empty file at `path` unless something is already there.
    pub fn ensure_file(&self, path: &Path) -> ApplicationResult<Outcome> {
        self.write_file(path, "", WritePolicy::CreateIfAbsent)
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }

    pub fn read_to_string(&self, path: &Path) -> ApplicationResult<String> {
        self.fs
            .read_to_string(path)
            .with_path_context("read file", path)
    }

    /// Append `content` to an existing file.
    pub fn append(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .append(path, content)
            .with_path_context("append to file", path)
    }
}
