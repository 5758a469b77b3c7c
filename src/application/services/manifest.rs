//! Manifest registration: one append-only module registry per project root
//!
//! The manifest is a set of lines stored in insertion order. Registration reads
//! the current lines and appends only when the exact line is missing, so any
//! sequence of repeated or interrupted runs converges to one line per entry.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::gateway::{FileSystemGateway, Outcome, WritePolicy};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::ManifestEntry;

/// How to treat registration into a manifest that does not exist yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManifestPolicy {
    /// Skip silently; structure creation still proceeds.
    #[default]
    Lenient,
    /// Fail with [`ApplicationError::ManifestAbsent`].
    Strict,
}

impl ManifestPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ManifestPolicy::Strict
        } else {
            ManifestPolicy::Lenient
        }
    }
}

/// Result of [`ManifestRegistrar::ensure_manifest_exists`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestInit {
    Created,
    AlreadyExisted,
}

/// Result of [`ManifestRegistrar::ensure_line_present`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Appended,
    AlreadyPresent,
    /// Lenient mode only: the manifest was missing, nothing was written
    ManifestAbsent,
}

/// Maintains the root manifest.
pub struct ManifestRegistrar {
    gateway: Arc<FileSystemGateway>,
    policy: ManifestPolicy,
}

impl ManifestRegistrar {
    pub fn new(gateway: Arc<FileSystemGateway>, policy: ManifestPolicy) -> Self {
        Self { gateway, policy }
    }

    pub fn policy(&self) -> ManifestPolicy {
        self.policy
    }

    /// Create the manifest with `initial_content` unless it exists.
    ///
    /// An existing manifest is left byte-for-byte untouched.
    pub fn ensure_manifest_exists(
        &self,
        path: &Path,
        initial_content: &str,
    ) -> ApplicationResult<ManifestInit> {
        match self
            .gateway
            .write_file(path, initial_content, WritePolicy::CreateIfAbsent)?
        {
            Outcome::AlreadyExisted => {
                info!("manifest already exists: {}", path.display());
                Ok(ManifestInit::AlreadyExisted)
            }
            _ => {
                info!("manifest created: {}", path.display());
                Ok(ManifestInit::Created)
            }
        }
    }

    /// Append `entry` (after a blank separator line) unless it is already a line.
    pub fn ensure_line_present(
        &self,
        path: &Path,
        entry: &ManifestEntry,
    ) -> ApplicationResult<Registration> {
        if !self.gateway.exists(path) {
            return match self.policy {
                ManifestPolicy::Lenient => {
                    debug!(
                        "ensure_line_present: no manifest at {}, skipping '{}'",
                        path.display(),
                        entry
                    );
                    Ok(Registration::ManifestAbsent)
                }
                ManifestPolicy::Strict => Err(ApplicationError::ManifestAbsent(path.to_path_buf())),
            };
        }

        let content = self.gateway.read_to_string(path)?;
        if entry.is_member_of(&content) {
            info!("already registered: {}", entry);
            return Ok(Registration::AlreadyPresent);
        }

        self.gateway.append(path, &entry.append_block())?;
        info!("registered: {}", entry);
        Ok(Registration::Appended)
    }
}
