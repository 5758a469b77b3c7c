//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) through the gateway
//! but are themselves concrete structs, not traits.

mod manifest;
mod materializer;
mod module;
mod project;

pub use manifest::{ManifestInit, ManifestPolicy, ManifestRegistrar, Registration};
pub use materializer::{MaterializeReport, StructureMaterializer};
pub use module::{ModuleInstaller, ModuleReport};
pub use project::{AddReport, InitReport, ProjectOrchestrator};
