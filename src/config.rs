//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/msakit/msakit.toml`
//! 3. Local config: `<workdir>/msakit.toml`
//! 4. Environment variables: `MSAKIT_*` prefix (`__` nests: `MSAKIT_VERSIONS__KOTLIN`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{ModulePath, ProjectContext, Versions};

/// Local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "msakit.toml";

/// Toolchain versions written into generated build files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VersionsConfig {
    pub kotlin: String,
    pub spring_boot: String,
    pub java: String,
    pub dependency_management: String,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            kotlin: "2.1.0".into(),
            spring_boot: "3.4.1".into(),
            java: "21".into(),
            dependency_management: "1.0.15.RELEASE".into(),
        }
    }
}

/// Raw versions for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawVersionsConfig {
    pub kotlin: Option<String>,
    pub spring_boot: Option<String>,
    pub java: Option<String>,
    pub dependency_management: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub project_name: Option<String>,
    pub group_id: Option<String>,
    pub project_version: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub strict_manifest: Option<bool>,
    #[serde(default)]
    pub versions: RawVersionsConfig,
}

impl VersionsConfig {
    /// Overlay wins where it specifies a value.
    pub fn merge(&self, overlay: &RawVersionsConfig) -> Self {
        Self {
            kotlin: overlay.kotlin.clone().unwrap_or_else(|| self.kotlin.clone()),
            spring_boot: overlay
                .spring_boot
                .clone()
                .unwrap_or_else(|| self.spring_boot.clone()),
            java: overlay.java.clone().unwrap_or_else(|| self.java.clone()),
            dependency_management: overlay
                .dependency_management
                .clone()
                .unwrap_or_else(|| self.dependency_management.clone()),
        }
    }
}

/// Unified configuration for msakit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Project root directory name (and `rootProject.name`)
    pub project_name: String,
    /// Dotted group id; becomes the package path
    pub group_id: String,
    pub project_version: String,
    /// Parent directory of the project root (relative to the working directory)
    pub output_dir: PathBuf,
    /// Fail instead of skipping when registering into a missing manifest
    pub strict_manifest: bool,
    pub versions: VersionsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: "msa-project".into(),
            group_id: "com.example".into(),
            project_version: "1.0.0-SNAPSHOT".into(),
            output_dir: PathBuf::from("."),
            strict_manifest: false,
            versions: VersionsConfig::default(),
        }
    }
}

/// Get the XDG config directory for msakit.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "msakit").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("msakit.toml"))
}

/// Get the path to the local config file in a working directory.
pub fn local_config_path(workdir: &Path) -> PathBuf {
    workdir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input unchanged on failure.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.output_dir.to_string_lossy().as_ref());
        self.output_dir = PathBuf::from(expanded);
    }

    /// Merge overlay config onto self (base); overlay scalars win.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            project_name: overlay
                .project_name
                .clone()
                .unwrap_or_else(|| self.project_name.clone()),
            group_id: overlay
                .group_id
                .clone()
                .unwrap_or_else(|| self.group_id.clone()),
            project_version: overlay
                .project_version
                .clone()
                .unwrap_or_else(|| self.project_version.clone()),
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            strict_manifest: overlay.strict_manifest.unwrap_or(self.strict_manifest),
            versions: self.versions.merge(&overlay.versions),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `workdir` - Optional working directory holding a local `msakit.toml`
    pub fn load(workdir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = workdir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Load defaults plus a single config file, ignoring global config and env vars.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        let mut settings = Self::default().merge_with(&raw);
        settings.expand_paths();
        Ok(settings)
    }

    /// Apply MSAKIT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("MSAKIT")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("project_name") {
            settings.project_name = val;
        }
        if let Ok(val) = config.get_string("group_id") {
            settings.group_id = val;
        }
        if let Ok(val) = config.get_string("project_version") {
            settings.project_version = val;
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_bool("strict_manifest") {
            settings.strict_manifest = val;
        }
        if let Ok(val) = config.get_string("versions.kotlin") {
            settings.versions.kotlin = val;
        }
        if let Ok(val) = config.get_string("versions.spring_boot") {
            settings.versions.spring_boot = val;
        }
        if let Ok(val) = config.get_string("versions.java") {
            settings.versions.java = val;
        }
        if let Ok(val) = config.get_string("versions.dependency_management") {
            settings.versions.dependency_management = val;
        }

        Ok(settings)
    }

    /// Project root: `output_dir/project_name`, relative output dirs resolved against `workdir`.
    pub fn project_root(&self, workdir: &Path) -> PathBuf {
        let output = if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            workdir.join(&self.output_dir)
        };
        output.join(&self.project_name)
    }

    /// Immutable project context handed to the orchestrator.
    pub fn project_context(&self, workdir: &Path) -> Result<ProjectContext, ApplicationError> {
        // project name must be a single path segment
        ModulePath::from_segments([self.project_name.as_str()])?;
        let versions = Versions {
            kotlin: self.versions.kotlin.clone(),
            spring_boot: self.versions.spring_boot.clone(),
            java: self.versions.java.clone(),
            dependency_management: self.versions.dependency_management.clone(),
        };
        Ok(ProjectContext::new(
            self.project_root(workdir),
            self.project_name.clone(),
            self.group_id.clone(),
            self.project_version.clone(),
            versions,
        )?)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# msakit configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/msakit/msakit.toml  (your defaults)
#   Local:  <workdir>/msakit.toml         (per-project values)
#   Env:    MSAKIT_* environment variables (explicit overrides,
#           nested keys use __, e.g. MSAKIT_VERSIONS__KOTLIN)

# Project root directory name and rootProject.name
# project_name = "msa-project"

# Group id; also the package path below src/main/kotlin
# group_id = "com.example"

# project_version = "1.0.0-SNAPSHOT"

# Parent directory of the project root (relative to the working directory)
# output_dir = "."

# Fail instead of skipping when a module is added before `init`
# strict_manifest = false

[versions]
# kotlin = "2.1.0"
# spring_boot = "3.4.1"
# java = "21"
# dependency_management = "1.0.15.RELEASE"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
