//! Module installation: executes one [`ModuleDescriptor`]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::content::ContentProducer;
use crate::application::gateway::{FileSystemGateway, Outcome, WritePolicy};
use crate::application::services::manifest::{ManifestRegistrar, Registration};
use crate::application::services::materializer::{MaterializeReport, StructureMaterializer};
use crate::application::ApplicationResult;
use crate::domain::{ModuleDescriptor, ProjectContext};

/// What installing one module did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReport {
    /// Module location relative to the project root (`domains/order/domain`)
    pub module: String,
    pub module_dir: PathBuf,
    pub build_file: Outcome,
    pub tree: MaterializeReport,
    /// `None` for modules that are not registered (shared modules)
    pub registration: Option<Registration>,
}

impl ModuleReport {
    /// True when the module was already fully in place.
    pub fn is_noop(&self) -> bool {
        self.tree.is_noop()
            && !self.build_file.wrote()
            && !matches!(self.registration, Some(Registration::Appended))
    }
}

/// Runs module descriptors: directory, build file, source tree, registration.
///
/// Every step is independently idempotent, so an interrupted install
/// completes on the next run.
pub struct ModuleInstaller {
    gateway: Arc<FileSystemGateway>,
    materializer: StructureMaterializer,
    registrar: Arc<ManifestRegistrar>,
    content: Arc<dyn ContentProducer>,
    ctx: Arc<ProjectContext>,
}

impl ModuleInstaller {
    pub fn new(
        gateway: Arc<FileSystemGateway>,
        registrar: Arc<ManifestRegistrar>,
        content: Arc<dyn ContentProducer>,
        ctx: Arc<ProjectContext>,
    ) -> Self {
        Self {
            materializer: StructureMaterializer::new(Arc::clone(&gateway)),
            gateway,
            registrar,
            content,
            ctx,
        }
    }

    /// Root manifest path of the project.
    pub fn manifest_path(&self) -> PathBuf {
        self.ctx.root.join(self.content.manifest_file_name())
    }

    pub fn install(&self, module: &ModuleDescriptor) -> ApplicationResult<ModuleReport> {
        let root: &Path = &self.ctx.root;
        debug!("install: module={}, root={}", module, root.display());

        let module_dir = module.module_dir(root);
        let mut tree = MaterializeReport::default();
        let outcome = self.gateway.ensure_dir(&module_dir)?;
        tree.record_dir(&module_dir, outcome);

        // never regenerated: hand edits to the build file survive re-runs
        let build_path = module_dir.join(self.content.build_file_name());
        let build_file = self.gateway.write_file(
            &build_path,
            &self.content.module_build_content(module, &self.ctx),
            WritePolicy::CreateIfAbsent,
        )?;

        tree.merge(
            self.materializer
                .materialize(&module.source_dir(root), module.tree())?,
        );

        let registration = if module.registers() {
            let entry = self.content.registration(module);
            Some(
                self.registrar
                    .ensure_line_present(&self.manifest_path(), &entry)?,
            )
        } else {
            None
        };

        let report = ModuleReport {
            module: module.location().to_string(),
            module_dir,
            build_file,
            tree,
            registration,
        };
        if report.is_noop() {
            info!("module {} already in place", module);
        } else {
            info!(
                "module {} installed: created={}, build_file={:?}, registration={:?}",
                module,
                report.tree.created(),
                report.build_file,
                report.registration
            );
        }
        Ok(report)
    }
}
