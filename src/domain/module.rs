//! Module descriptors: the fixed set of operations that make up "adding one module"
//!
//! A descriptor is pure data. The module installer turns it into:
//! 1. one directory for the module root,
//! 2. one build descriptor file (create-if-absent),
//! 3. the internal source tree (materialized below the source root),
//! 4. optionally, one manifest registration of the module's qualified path.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainResult;
use crate::domain::path::ModulePath;
use crate::domain::project::ProjectContext;
use crate::domain::spec::SpecNode;

/// Root directory of shared modules.
pub const SHARED_DIR: &str = "shared";
/// Root directory of domain modules.
pub const DOMAINS_DIR: &str = "domains";
/// Root directory of standalone library modules.
pub const LIBRARIES_DIR: &str = "libraries";

const SOURCE_ROOT: [&str; 3] = ["src", "main", "kotlin"];

/// Shared modules created by `init`: (module name, packages below the group path).
pub const SHARED_MODULES: [(&str, &[&str]); 3] = [
    ("shared-common", &["common/exception", "common/util"]),
    ("shared-events", &["events"]),
    ("shared-utils", &["utils/extensions", "utils/coroutine"]),
];

const LIBRARY_PACKAGES: &[&str] = &["config", "domain", "scheduler", "repository"];

/// Architectural layer of a domain module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Presentation,
    Application,
    Domain,
    Infrastructure,
}

impl Layer {
    /// All layers in creation order.
    pub const ALL: [Layer; 4] = [
        Layer::Presentation,
        Layer::Application,
        Layer::Domain,
        Layer::Infrastructure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Presentation => "presentation",
            Layer::Application => "application",
            Layer::Domain => "domain",
            Layer::Infrastructure => "infrastructure",
        }
    }

    /// Package directories created below the layer's source root.
    fn packages(&self) -> &'static [&'static str] {
        match self {
            Layer::Presentation => &[
                "controller/command",
                "controller/query",
                "dto/request",
                "dto/response",
                "config",
            ],
            Layer::Application => &[
                "command/handler",
                "command/service",
                "command/dto",
                "query/handler",
                "query/service",
                "query/dto",
                "port",
            ],
            Layer::Domain => &["model", "vo", "event", "exception"],
            Layer::Infrastructure => &[
                "adapter/persistence/entity",
                "adapter/messaging",
                "config",
                "repository",
            ],
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of module a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// `shared/<name>`, included by the initial manifest content
    Shared,
    /// `domains/<name>/<layer>`
    DomainLayer(Layer),
    /// `libraries/<name>`
    Library,
}

/// One module: where it lives, what it contains, and whether it gets registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    kind: ModuleKind,
    /// Location relative to the project root; also the registration path
    location: ModulePath,
    /// Source root relative to the module directory
    source_root: ModulePath,
    /// Package tree below the source root
    tree: SpecNode,
    register: bool,
}

impl ModuleDescriptor {
    pub fn new(
        kind: ModuleKind,
        location: ModulePath,
        source_root: ModulePath,
        tree: SpecNode,
        register: bool,
    ) -> Self {
        Self {
            kind,
            location,
            source_root,
            tree,
            register,
        }
    }

    /// The shared modules every project starts with.
    ///
    /// Shared modules are listed in the initial manifest content, so they are not
    /// registered line by line.
    pub fn shared_modules(ctx: &ProjectContext) -> DomainResult<Vec<Self>> {
        SHARED_MODULES
            .iter()
            .map(|(name, packages)| {
                Ok(Self::new(
                    ModuleKind::Shared,
                    ModulePath::from_segments([SHARED_DIR, *name])?,
                    source_root(ctx, &[])?,
                    SpecNode::dirs(packages)?,
                    false,
                ))
            })
            .collect()
    }

    /// One descriptor per layer of domain module `name`, in creation order.
    pub fn domain_layers(name: &str, ctx: &ProjectContext) -> DomainResult<Vec<Self>> {
        Layer::ALL
            .iter()
            .map(|layer| Self::domain_layer(name, *layer, ctx))
            .collect()
    }

    /// Descriptor for a single layer of domain module `name`.
    pub fn domain_layer(name: &str, layer: Layer, ctx: &ProjectContext) -> DomainResult<Self> {
        Ok(Self::new(
            ModuleKind::DomainLayer(layer),
            ModulePath::from_segments([DOMAINS_DIR, name, layer.as_str()])?,
            source_root(ctx, &[name, layer.as_str()])?,
            SpecNode::dirs(layer.packages())?,
            true,
        ))
    }

    /// Descriptor for standalone library module `name`.
    pub fn library(name: &str, ctx: &ProjectContext) -> DomainResult<Self> {
        Ok(Self::new(
            ModuleKind::Library,
            ModulePath::from_segments([LIBRARIES_DIR, name])?,
            source_root(ctx, &[name])?,
            SpecNode::dirs(LIBRARY_PACKAGES)?,
            true,
        ))
    }

    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    pub fn location(&self) -> &ModulePath {
        &self.location
    }

    pub fn source_root(&self) -> &ModulePath {
        &self.source_root
    }

    pub fn tree(&self) -> &SpecNode {
        &self.tree
    }

    /// Whether the module is registered into the root manifest.
    pub fn registers(&self) -> bool {
        self.register
    }

    /// Module directory below `project_root`.
    pub fn module_dir(&self, project_root: &Path) -> PathBuf {
        self.location.to_path(project_root)
    }

    /// Source root directory below `project_root`.
    pub fn source_dir(&self, project_root: &Path) -> PathBuf {
        self.source_root.to_path(&self.module_dir(project_root))
    }
}

impl fmt::Display for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location)
    }
}

/// `src/main/kotlin/<group segments>/<extra...>`
fn source_root(ctx: &ProjectContext, extra: &[&str]) -> DomainResult<ModulePath> {
    let base = ModulePath::from_segments(SOURCE_ROOT)?.join(ctx.group_path());
    extra
        .iter()
        .try_fold(base, |path, segment| path.child(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::Versions;

    fn ctx() -> ProjectContext {
        ProjectContext::new(
            PathBuf::from("shop"),
            "shop",
            "com.example",
            "1.0.0",
            Versions {
                kotlin: "2.1.0".into(),
                spring_boot: "3.4.1".into(),
                java: "21".into(),
                dependency_management: "1.0.15.RELEASE".into(),
            },
        )
        .unwrap()
    }

    #[test]
    fn given_domain_name_when_building_layers_then_one_per_layer_in_order() {
        let layers = ModuleDescriptor::domain_layers("order", &ctx()).unwrap();
        let names: Vec<_> = layers.iter().map(|d| d.location().name().to_string()).collect();
        assert_eq!(
            names,
            vec!["presentation", "application", "domain", "infrastructure"]
        );
        assert!(layers.iter().all(ModuleDescriptor::registers));
    }

    #[test]
    fn given_domain_layer_when_resolving_source_dir_then_includes_group_and_layer() {
        let desc = ModuleDescriptor::domain_layer("order", Layer::Domain, &ctx()).unwrap();
        let expected = Path::new("shop")
            .join("domains/order/domain/src/main/kotlin/com/example/order/domain");
        assert_eq!(desc.source_dir(Path::new("shop")), expected);
        assert_eq!(desc.location().qualified(":"), "domains:order:domain");
    }

    #[test]
    fn given_context_when_building_shared_modules_then_unregistered() {
        let shared = ModuleDescriptor::shared_modules(&ctx()).unwrap();
        assert_eq!(shared.len(), 3);
        assert!(shared.iter().all(|d| !d.registers()));
        assert_eq!(shared[0].location().to_string(), "shared/shared-common");
    }

    #[test]
    fn given_library_name_when_building_then_lives_under_libraries() {
        let lib = ModuleDescriptor::library("outbox", &ctx()).unwrap();
        assert_eq!(lib.location().qualified(":"), "libraries:outbox");
        assert_eq!(lib.tree().directory_count(), 4);
    }

    #[test]
    fn given_name_with_separator_when_building_library_then_rejected() {
        assert!(ModuleDescriptor::library("a/b", &ctx()).is_err());
    }
}
