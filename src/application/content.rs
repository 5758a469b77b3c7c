//! Content producers: the literal text written into generated files
//!
//! The scaffolding core only decides whether and where to write; what gets
//! written comes from a [`ContentProducer`]. [`GradleKotlinDsl`] is the default.

use crate::domain::module::{SHARED_DIR, SHARED_MODULES};
use crate::domain::{ManifestEntry, ModuleDescriptor, ModuleKind, ProjectContext};

/// Supplies file names and file contents for a build tool.
pub trait ContentProducer: Send + Sync {
    /// File name of the root manifest (module registry).
    fn manifest_file_name(&self) -> &str;

    /// File name of a build descriptor, both at the root and per module.
    fn build_file_name(&self) -> &str;

    /// Initial manifest content, listing the shared modules.
    fn manifest_content(&self, ctx: &ProjectContext, shared: &[ModuleDescriptor]) -> String;

    /// Root build descriptor content.
    fn root_build_content(&self, ctx: &ProjectContext) -> String;

    /// Build descriptor of one module.
    fn module_build_content(&self, module: &ModuleDescriptor, ctx: &ProjectContext) -> String;

    /// Manifest line registering `module`.
    fn registration(&self, module: &ModuleDescriptor) -> ManifestEntry;
}

/// Gradle multi-project build with Kotlin DSL scripts.
#[derive(Debug, Default, Clone, Copy)]
pub struct GradleKotlinDsl;

impl GradleKotlinDsl {
    fn shared_dependencies() -> String {
        SHARED_MODULES
            .iter()
            .map(|(name, _)| format!("    implementation(project(\":{SHARED_DIR}:{name}\"))\n"))
            .collect()
    }
}

impl ContentProducer for GradleKotlinDsl {
    fn manifest_file_name(&self) -> &str {
        "settings.gradle.kts"
    }

    fn build_file_name(&self) -> &str {
        "build.gradle.kts"
    }

    fn manifest_content(&self, ctx: &ProjectContext, shared: &[ModuleDescriptor]) -> String {
        let includes: String = shared
            .iter()
            .map(|module| format!("{}\n", self.registration(module)))
            .collect();
        format!(
            "rootProject.name = \"{}\"\n\n{}\n// domains and libraries are appended below as they are added\n",
            ctx.project_name, includes
        )
    }

    fn root_build_content(&self, ctx: &ProjectContext) -> String {
        let v = &ctx.versions;
        format!(
            r#"plugins {{
    id("org.jetbrains.kotlin.jvm") version "{kotlin}" apply false
    id("org.springframework.boot") version "{spring_boot}" apply false
    id("io.spring.dependency-management") version "{dependency_management}" apply false
}}

allprojects {{
    group = "{group}"
    version = "{version}"

    repositories {{
        mavenCentral()
    }}
}}

subprojects {{
    apply(plugin = "org.jetbrains.kotlin.jvm")

    java.sourceCompatibility = JavaVersion.VERSION_{java}

    dependencies {{
        implementation(kotlin("stdlib"))
    }}
}}
"#,
            kotlin = v.kotlin,
            spring_boot = v.spring_boot,
            dependency_management = v.dependency_management,
            group = ctx.group_id,
            version = ctx.project_version,
            java = v.java,
        )
    }

    fn module_build_content(&self, module: &ModuleDescriptor, _ctx: &ProjectContext) -> String {
        match module.kind() {
            ModuleKind::Shared => r#"plugins {
    id("org.jetbrains.kotlin.jvm")
}

dependencies {
}
"#
            .to_string(),
            // boot plugin left for the user to enable on the layer that runs the app
            ModuleKind::DomainLayer(_) => format!(
                "plugins {{\n    id(\"org.jetbrains.kotlin.jvm\")\n    // id(\"org.springframework.boot\")\n}}\n\ndependencies {{\n{}}}\n",
                Self::shared_dependencies()
            ),
            ModuleKind::Library => format!(
                "plugins {{\n    id(\"org.jetbrains.kotlin.jvm\")\n}}\n\ndependencies {{\n{}}}\n",
                Self::shared_dependencies()
            ),
        }
    }

    fn registration(&self, module: &ModuleDescriptor) -> ManifestEntry {
        ManifestEntry::new(format!("include(\"{}\")", module.location().qualified(":")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Layer, Versions};
    use std::path::PathBuf;

    fn ctx() -> ProjectContext {
        ProjectContext::new(
            PathBuf::from("restaurant"),
            "restaurant",
            "com.fredko.restaurant",
            "1.0.0-SNAPSHOT",
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
    fn given_shared_modules_when_rendering_manifest_then_includes_each() {
        let ctx = ctx();
        let shared = ModuleDescriptor::shared_modules(&ctx).unwrap();
        let content = GradleKotlinDsl.manifest_content(&ctx, &shared);
        assert!(content.starts_with("rootProject.name = \"restaurant\"\n"));
        assert!(content.contains("include(\"shared:shared-common\")\n"));
        assert!(content.contains("include(\"shared:shared-events\")\n"));
        assert!(content.contains("include(\"shared:shared-utils\")\n"));
    }

    #[test]
    fn given_domain_layer_when_registering_then_colon_qualified() {
        let module = ModuleDescriptor::domain_layer("order", Layer::Domain, &ctx()).unwrap();
        assert_eq!(
            GradleKotlinDsl.registration(&module).as_str(),
            "include(\"domains:order:domain\")"
        );
    }

    #[test]
    fn given_library_when_rendering_build_then_depends_on_shared_modules() {
        let ctx = ctx();
        let module = ModuleDescriptor::library("outbox", &ctx).unwrap();
        let content = GradleKotlinDsl.module_build_content(&module, &ctx);
        assert!(content.contains("implementation(project(\":shared:shared-utils\"))"));
    }

    #[test]
    fn given_any_domain_layer_when_rendering_build_then_boot_plugin_commented_out() {
        let ctx = ctx();
        for layer in Layer::ALL {
            let module = ModuleDescriptor::domain_layer("order", layer, &ctx).unwrap();
            let content = GradleKotlinDsl.module_build_content(&module, &ctx);
            assert!(content.contains("    // id(\"org.springframework.boot\")\n"));
            assert_eq!(
                content
                    .lines()
                    .filter(|l| l.trim() == "id(\"org.springframework.boot\")")
                    .count(),
                0
            );
        }
    }

    #[test]
    fn given_context_when_rendering_root_build_then_uses_versions() {
        let content = GradleKotlinDsl.root_build_content(&ctx());
        assert!(content.contains("version \"2.1.0\" apply false"));
        assert!(content.contains("JavaVersion.VERSION_21"));
        assert!(content.contains("group = \"com.fredko.restaurant\""));
    }
}
