//! Tests for ProjectLock

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use msakit::infrastructure::lock::LOCK_FILE_NAME;
use msakit::infrastructure::traits::RealFileSystem;
use msakit::infrastructure::{InfraError, ProjectLock};

#[test]
fn given_unlocked_root_when_acquire_then_lock_file_written_with_holder() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("shop");

    // Act
    let lock = ProjectLock::acquire(Arc::new(RealFileSystem), &root).unwrap();

    // Assert
    assert_eq!(lock.path(), root.join(LOCK_FILE_NAME));
    let holder = fs::read_to_string(lock.path()).unwrap();
    assert!(holder.starts_with(&format!("pid {}", std::process::id())));
}

#[test]
fn given_held_lock_when_acquire_again_then_locked_error_names_holder() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let _held = ProjectLock::acquire(Arc::new(RealFileSystem), temp.path()).unwrap();

    // Act
    let result = ProjectLock::acquire(Arc::new(RealFileSystem), temp.path());

    // Assert
    match result {
        Err(InfraError::Locked { path, holder }) => {
            assert_eq!(path, temp.path().join(LOCK_FILE_NAME));
            assert!(holder.contains("pid"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("second acquire must fail"),
    }
}

#[test]
fn given_dropped_lock_when_acquire_again_then_succeeds() {
    let temp = TempDir::new().unwrap();
    let lock = ProjectLock::acquire(Arc::new(RealFileSystem), temp.path()).unwrap();
    drop(lock);

    assert!(!temp.path().join(LOCK_FILE_NAME).exists());
    assert!(ProjectLock::acquire(Arc::new(RealFileSystem), temp.path()).is_ok());
}

/// Holder line of a process that has already exited on this host.
#[cfg(unix)]
fn dead_holder() -> String {
    let mut child = std::process::Command::new("true").spawn().unwrap();
    let pid = child.id();
    child.wait().unwrap();
    let host = hostname::get().unwrap().to_string_lossy().to_string();
    format!("pid {pid} on {host} since 2026-01-01 00:00:00")
}

#[cfg(unix)]
#[test]
fn given_leaked_lock_of_exited_process_when_acquire_then_takes_over() {
    // Arrange: a run that never released its lock, then died
    let temp = TempDir::new().unwrap();
    let lock = ProjectLock::acquire(Arc::new(RealFileSystem), temp.path()).unwrap();
    let path = lock.path().to_path_buf();
    std::mem::forget(lock);
    fs::write(&path, dead_holder()).unwrap();

    // Act
    let relock = ProjectLock::acquire(Arc::new(RealFileSystem), temp.path()).unwrap();

    // Assert
    let holder = fs::read_to_string(relock.path()).unwrap();
    assert!(holder.starts_with(&format!("pid {} ", std::process::id())));
}

#[test]
fn given_leaked_lock_of_live_process_when_acquire_then_still_locked() {
    let temp = TempDir::new().unwrap();
    let lock = ProjectLock::acquire(Arc::new(RealFileSystem), temp.path()).unwrap();
    std::mem::forget(lock);

    let result = ProjectLock::acquire(Arc::new(RealFileSystem), temp.path());

    assert!(matches!(result, Err(InfraError::Locked { .. })));
}

#[test]
fn given_lock_from_other_host_when_acquire_then_locked() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(LOCK_FILE_NAME),
        "pid 1 on some-other-build-host since 2026-01-01 00:00:00",
    )
    .unwrap();

    let result = ProjectLock::acquire(Arc::new(RealFileSystem), temp.path());

    assert!(matches!(result, Err(InfraError::Locked { holder, .. }) if holder.contains("some-other-build-host")));
}
