//! Project orchestration: `init`, `add_domain`, `add_library`
//!
//! The three operations share no mutable state. Each one re-derives every
//! decision from existence checks, so any of them can be re-run after a crash.
//! Structure creation and manifest registration are not transactional: adding a
//! module before `init` creates an unregistered module tree (lenient policy).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::application::content::ContentProducer;
use crate::application::gateway::{FileSystemGateway, Outcome, WritePolicy};
use crate::application::services::manifest::{ManifestInit, ManifestPolicy, ManifestRegistrar};
use crate::application::services::module::{ModuleInstaller, ModuleReport};
use crate::application::ApplicationResult;
use crate::domain::{ModuleDescriptor, ProjectContext};
use crate::infrastructure::traits::FileSystem;

/// Result of [`ProjectOrchestrator::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub root: PathBuf,
    pub root_dir: Outcome,
    pub manifest: ManifestInit,
    pub root_build: Outcome,
    pub modules: Vec<ModuleReport>,
}

impl InitReport {
    /// True when the project was already fully initialized.
    pub fn is_noop(&self) -> bool {
        !self.root_dir.wrote()
            && self.manifest == ManifestInit::AlreadyExisted
            && !self.root_build.wrote()
            && self.modules.iter().all(ModuleReport::is_noop)
    }
}

/// Result of adding a domain or library module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReport {
    pub name: String,
    pub modules: Vec<ModuleReport>,
}

impl AddReport {
    pub fn is_noop(&self) -> bool {
        self.modules.iter().all(ModuleReport::is_noop)
    }
}

/// Entry point of the scaffolding core.
pub struct ProjectOrchestrator {
    ctx: Arc<ProjectContext>,
    gateway: Arc<FileSystemGateway>,
    registrar: Arc<ManifestRegistrar>,
    installer: ModuleInstaller,
    content: Arc<dyn ContentProducer>,
}

impl ProjectOrchestrator {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        content: Arc<dyn ContentProducer>,
        ctx: ProjectContext,
        policy: ManifestPolicy,
    ) -> Self {
        let ctx = Arc::new(ctx);
        let gateway = Arc::new(FileSystemGateway::new(fs));
        let registrar = Arc::new(ManifestRegistrar::new(Arc::clone(&gateway), policy));
        let installer = ModuleInstaller::new(
            Arc::clone(&gateway),
            Arc::clone(&registrar),
            Arc::clone(&content),
            Arc::clone(&ctx),
        );
        Self {
            ctx,
            gateway,
            registrar,
            installer,
            content,
        }
    }

    pub fn context(&self) -> &ProjectContext {
        &self.ctx
    }

    pub fn root(&self) -> &Path {
        &self.ctx.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.installer.manifest_path()
    }

    /// Root directory, manifest, root build descriptor, shared modules.
    pub fn init(&self) -> ApplicationResult<InitReport> {
        info!(
            "init: project={}, group={}, root={}",
            self.ctx.project_name,
            self.ctx.group_id,
            self.ctx.root.display()
        );
        let root_dir = self.gateway.ensure_dir(&self.ctx.root)?;

        let shared = ModuleDescriptor::shared_modules(&self.ctx)?;
        let manifest = self.registrar.ensure_manifest_exists(
            &self.manifest_path(),
            &self.content.manifest_content(&self.ctx, &shared),
        )?;
        let root_build = self.gateway.write_file(
            &self.ctx.root.join(self.content.build_file_name()),
            &self.content.root_build_content(&self.ctx),
            WritePolicy::CreateIfAbsent,
        )?;

        let modules = shared
            .iter()
            .map(|module| self.installer.install(module))
            .collect::<ApplicationResult<Vec<_>>>()?;

        info!("init: done");
        Ok(InitReport {
            root: self.ctx.root.clone(),
            root_dir,
            manifest,
            root_build,
            modules,
        })
    }

    /// All four layers of domain module `name`, each installed and registered.
    pub fn add_domain(&self, name: &str) -> ApplicationResult<AddReport> {
        info!("add_domain: {}", name);
        let layers = ModuleDescriptor::domain_layers(name, &self.ctx)?;
        self.install_all(name, &layers)
    }

    /// Standalone library module `name`.
    pub fn add_library(&self, name: &str) -> ApplicationResult<AddReport> {
        info!("add_library: {}", name);
        let library = ModuleDescriptor::library(name, &self.ctx)?;
        self.install_all(name, std::slice::from_ref(&library))
    }

    fn install_all(&self, name: &str, modules: &[ModuleDescriptor]) -> ApplicationResult<AddReport> {
        let mut reports = Vec::with_capacity(modules.len());
        for module in modules {
            reports.push(self.installer.install(module)?);
        }
        Ok(AddReport {
            name: name.to_string(),
            modules: reports,
        })
    }
}
