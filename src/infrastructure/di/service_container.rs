//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::services::{ManifestPolicy, ProjectOrchestrator, StructureMaterializer};
use crate::application::{ContentProducer, FileSystemGateway, GradleKotlinDsl, Outcome, WritePolicy};
use crate::config::Settings;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::lock::ProjectLock;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Build-tool file content
    pub content: Arc<dyn ContentProducer>,

    /// Directory relative paths are resolved against
    workdir: PathBuf,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings, workdir: PathBuf) -> Self {
        Self::with_deps(
            settings,
            workdir,
            Arc::new(RealFileSystem),
            Arc::new(GradleKotlinDsl),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        workdir: PathBuf,
        fs: Arc<dyn FileSystem>,
        content: Arc<dyn ContentProducer>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            content,
            workdir,
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Root of the configured project.
    pub fn project_root(&self) -> PathBuf {
        self.settings.project_root(&self.workdir)
    }

    /// Orchestrator for the configured project.
    pub fn orchestrator(&self) -> InfraResult<ProjectOrchestrator> {
        let ctx = self.settings.project_context(&self.workdir)?;
        Ok(ProjectOrchestrator::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.content),
            ctx,
            ManifestPolicy::from_strict(self.settings.strict_manifest),
        ))
    }

    pub fn gateway(&self) -> Arc<FileSystemGateway> {
        Arc::new(FileSystemGateway::new(Arc::clone(&self.fs)))
    }

    pub fn materializer(&self) -> StructureMaterializer {
        StructureMaterializer::new(self.gateway())
    }

    /// Write the settings template to `path` unless a file is already there.
    pub fn write_config_template(&self, path: &Path) -> InfraResult<Outcome> {
        let gateway = self.gateway();
        if let Some(parent) = path.parent() {
            gateway.ensure_dir(parent)?;
        }
        Ok(gateway.write_file(path, &Settings::template(), WritePolicy::CreateIfAbsent)?)
    }

    /// Exclusive lock on the configured project root.
    pub fn lock_project(&self) -> InfraResult<ProjectLock> {
        ProjectLock::acquire(Arc::clone(&self.fs), &self.project_root())
    }
}
