//! Per-project-root mutual exclusion
//!
//! Existence checks and creations are not atomic as a pair, so two invocations
//! against the same root could both see "absent" and race. The lock file is
//! created with create-new semantics; whoever creates it owns the root until drop.
//!
//! A killed run cannot release its lock. A lock whose holder ran on this host
//! under a pid that no longer exists is stale and gets taken over, so the
//! interrupted command can simply be re-run.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::FileSystem;

/// Lock file name inside the project root.
pub const LOCK_FILE_NAME: &str = ".msakit.lock";

/// Held lock on a project root. Released when dropped.
pub struct ProjectLock {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl ProjectLock {
    /// Acquire the lock for `root`, creating the root directory if needed.
    ///
    /// Fails with [`InfraError::Locked`] if a live invocation holds it.
    pub fn acquire(fs: Arc<dyn FileSystem>, root: &Path) -> InfraResult<Self> {
        fs.create_dir_all(root)
            .map_err(|e| InfraError::io(format!("create project root: {}", root.display()), e))?;

        let path = root.join(LOCK_FILE_NAME);
        match try_create(fs.as_ref(), &path)? {
            None => Ok(Self { fs, path }),
            Some(holder) if is_stale(&holder) => {
                warn!(
                    "acquire: taking over stale lock {} ({})",
                    path.display(),
                    holder
                );
                match fs.remove_file(&path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => {
                        return Err(InfraError::io(
                            format!("remove stale lock file: {}", path.display()),
                            e,
                        ))
                    }
                }
                // another invocation may have won the takeover
                match try_create(fs.as_ref(), &path)? {
                    None => Ok(Self { fs, path }),
                    Some(holder) => Err(InfraError::Locked { path, holder }),
                }
            }
            Some(holder) => Err(InfraError::Locked { path, holder }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        match self.fs.remove_file(&self.path) {
            Ok(()) => debug!("release: unlocked {}", self.path.display()),
            Err(e) => warn!("release: cannot remove {}: {}", self.path.display(), e),
        }
    }
}

/// Create the lock file; `Some(holder)` if it already exists.
fn try_create(fs: &dyn FileSystem, path: &Path) -> InfraResult<Option<String>> {
    match fs.create_new(path, &holder_description()) {
        Ok(()) => {
            debug!("acquire: locked {}", path.display());
            Ok(None)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(Some(
            fs.read_to_string(path)
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|_| "unknown holder".to_string()),
        )),
        Err(e) => Err(InfraError::io(
            format!("create lock file: {}", path.display()),
            e,
        )),
    }
}

fn current_host() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown-host".to_string())
}

/// `pid <pid> on <host> since <timestamp>`
fn holder_description() -> String {
    format!(
        "pid {} on {} since {}",
        std::process::id(),
        current_host(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// Inverse of [`holder_description`]: `(pid, host)`.
fn parse_holder(holder: &str) -> Option<(u32, &str)> {
    let rest = holder.strip_prefix("pid ")?;
    let (pid, rest) = rest.split_once(" on ")?;
    let (host, _) = rest.split_once(" since ")?;
    Some((pid.parse().ok()?, host))
}

/// Only holders from this host can be checked; anything unparsable counts as live.
fn is_stale(holder: &str) -> bool {
    match parse_holder(holder) {
        Some((pid, host)) => host == current_host() && !process_alive(pid),
        None => false,
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return true;
    };
    // signal 0 checks existence without delivering anything
    if unsafe { libc::kill(pid, 0) } == 0 {
        return true;
    }
    io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}
