//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod content;
pub mod error;
pub mod error_ext;
pub mod gateway;
pub mod services;

pub use content::{ContentProducer, GradleKotlinDsl};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use gateway::{FileSystemGateway, Outcome, WritePolicy};
