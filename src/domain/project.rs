//! Project context: immutable naming and version information

use std::path::PathBuf;

use crate::domain::error::DomainResult;
use crate::domain::path::{ModulePath, Separator};

/// Toolchain versions written into generated build descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versions {
    pub kotlin: String,
    pub spring_boot: String,
    pub java: String,
    pub dependency_management: String,
}

/// Everything the orchestrator needs to know about the project being scaffolded.
///
/// Built once from settings and passed in at construction; nothing reads ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    /// Project root directory (output_dir/project_name)
    pub root: PathBuf,
    pub project_name: String,
    /// Dotted group id, e.g. `com.example.shop`
    pub group_id: String,
    pub project_version: String,
    pub versions: Versions,
    /// Group id split into package segments
    group_path: ModulePath,
}

impl ProjectContext {
    pub fn new(
        root: PathBuf,
        project_name: impl Into<String>,
        group_id: impl Into<String>,
        project_version: impl Into<String>,
        versions: Versions,
    ) -> DomainResult<Self> {
        let group_id = group_id.into();
        let group_path = ModulePath::parse(&group_id, Separator::Dot)?;
        Ok(Self {
            root,
            project_name: project_name.into(),
            group_id,
            project_version: project_version.into(),
            versions,
            group_path,
        })
    }

    /// Group id as package segments (`com.example` -> `com`, `example`).
    pub fn group_path(&self) -> &ModulePath {
        &self.group_path
    }

    /// Group id as a slash path, the value of the `{base_package}` placeholder.
    pub fn base_package(&self) -> String {
        self.group_path.qualified("/")
    }
}
