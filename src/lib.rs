//! msakit: multi-module project scaffolder
//!
//! Materializes declarative directory trees and registers modules in a root
//! manifest. Every operation can be re-run: existing files and directories are
//! left alone and manifest lines are appended at most once.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
