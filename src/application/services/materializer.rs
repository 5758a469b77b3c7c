//! Structure materialization: spec trees to directories and files
//!
//! The resulting tree is always a superset of what was there before: nothing is
//! deleted and existing files are never rewritten. Re-running an unchanged spec
//! against a tree it produced performs no writes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::gateway::{FileSystemGateway, Outcome};
use crate::application::ApplicationResult;
use crate::domain::{resolve, DomainError, FileListItem, Separator, SpecNode};

/// What a materialization created and what it found already present.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    pub created_dirs: Vec<PathBuf>,
    pub created_files: Vec<PathBuf>,
    /// Targets (directories or files) that already existed
    pub already_existed: usize,
}

impl MaterializeReport {
    pub fn record_dir(&mut self, path: &Path, outcome: Outcome) {
        match outcome {
            Outcome::AlreadyExisted => self.already_existed += 1,
            _ => self.created_dirs.push(path.to_path_buf()),
        }
    }

    pub fn record_file(&mut self, path: &Path, outcome: Outcome) {
        match outcome {
            Outcome::AlreadyExisted => self.already_existed += 1,
            _ => self.created_files.push(path.to_path_buf()),
        }
    }

    pub fn merge(&mut self, other: MaterializeReport) {
        self.created_dirs.extend(other.created_dirs);
        self.created_files.extend(other.created_files);
        self.already_existed += other.already_existed;
    }

    pub fn created(&self) -> usize {
        self.created_dirs.len() + self.created_files.len()
    }

    /// True when nothing was created.
    pub fn is_noop(&self) -> bool {
        self.created() == 0
    }
}

/// Interprets [`SpecNode`] trees against the filesystem.
pub struct StructureMaterializer {
    gateway: Arc<FileSystemGateway>,
}

impl StructureMaterializer {
    pub fn new(gateway: Arc<FileSystemGateway>) -> Self {
        Self { gateway }
    }

    /// Reproduce `node` below `base`, creating `base` itself if needed.
    ///
    /// A spec shape error aborts the walk; whatever was created before it stays.
    pub fn materialize(&self, base: &Path, node: &SpecNode) -> ApplicationResult<MaterializeReport> {
        debug!("materialize: base={}", base.display());
        let mut report = MaterializeReport::default();
        let outcome = self.gateway.ensure_dir(base)?;
        report.record_dir(base, outcome);
        self.descend(base, node, &mut report)?;
        debug!(
            "materialize: created={}, already_existed={}",
            report.created(),
            report.already_existed
        );
        Ok(report)
    }

    fn descend(
        &self,
        base: &Path,
        node: &SpecNode,
        report: &mut MaterializeReport,
    ) -> ApplicationResult<()> {
        match node {
            SpecNode::Directory(entries) => {
                for (name, child) in entries {
                    match child {
                        SpecNode::FileLeaf => self.file(base, name, report)?,
                        other => {
                            let dir = self.dir(base, name, report)?;
                            self.descend(&dir, other, report)?;
                        }
                    }
                }
            }
            SpecNode::FileList(items) => {
                for item in items {
                    match item {
                        FileListItem::File(name) => self.file(base, name, report)?,
                        FileListItem::Dir(name, child) => {
                            let dir = self.dir(base, name, report)?;
                            self.descend(&dir, child, report)?;
                        }
                    }
                }
            }
            SpecNode::FileLeaf => {
                return Err(DomainError::spec_shape(
                    base.display().to_string(),
                    "a file marker cannot hold directory content",
                )
                .into())
            }
        }
        Ok(())
    }

    /// Create the (possibly multi-segment) directory `name` below `base`.
    fn dir(&self, base: &Path, name: &str, report: &mut MaterializeReport) -> ApplicationResult<PathBuf> {
        let dir = join_segments(base, &resolve(name, Separator::Slash)?);
        let outcome = self.gateway.ensure_dir(&dir)?;
        report.record_dir(&dir, outcome);
        Ok(dir)
    }

    /// Create empty file `name` below `base`; leading segments become directories.
    fn file(&self, base: &Path, name: &str, report: &mut MaterializeReport) -> ApplicationResult<()> {
        let segments = resolve(name, Separator::Slash)?;
        let (file_name, parents) = segments
            .split_last()
            .ok_or(DomainError::EmptyIdentifier)?;
        let parent = if parents.is_empty() {
            base.to_path_buf()
        } else {
            let parent = join_segments(base, parents);
            let outcome = self.gateway.ensure_dir(&parent)?;
            report.record_dir(&parent, outcome);
            parent
        };
        let path = parent.join(file_name);
        let outcome = self.gateway.ensure_file(&path)?;
        report.record_file(&path, outcome);
        Ok(())
    }
}

fn join_segments(base: &Path, segments: &[String]) -> PathBuf {
    segments
        .iter()
        .fold(base.to_path_buf(), |acc, segment| acc.join(segment))
}
