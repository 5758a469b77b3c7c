//! Domain layer: specification nodes, module descriptors and naming
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod manifest;
pub mod module;
pub mod path;
pub mod project;
pub mod spec;

pub use error::{DomainError, DomainResult};
pub use manifest::ManifestEntry;
pub use module::{Layer, ModuleDescriptor, ModuleKind};
pub use path::{resolve, ModulePath, Separator};
pub use project::{ProjectContext, Versions};
pub use spec::{FileListItem, Placeholders, SpecNode};
