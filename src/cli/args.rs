//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Multi-module project scaffolder: declarative directory trees and idempotent module registration
#[derive(Parser, Debug)]
#[command(name = "msakit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Working directory (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Use only this config file (skips global, local and env settings)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Fail when registering a module before the project is initialized
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create project root, manifest, root build file and shared modules
    Init {
        /// Project name (overrides config)
        #[arg(short, long)]
        name: Option<String>,
        /// Group id, e.g. com.example.shop (overrides config)
        #[arg(short, long)]
        group: Option<String>,
        /// Parent directory of the project root (overrides config)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output: Option<PathBuf>,
    },

    /// Add a domain module with all four layers
    #[command(visible_alias = "domain")]
    AddDomain {
        /// Domain name, e.g. order
        name: String,
    },

    /// Add a standalone library module
    #[command(visible_alias = "library")]
    AddLibrary {
        /// Library name, e.g. common-auth
        name: String,
    },

    /// Create a directory tree from a YAML structure spec
    Materialize {
        /// YAML spec file
        #[arg(value_hint = ValueHint::FilePath)]
        spec: PathBuf,
        /// Target directory (default: working directory)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output: Option<PathBuf>,
        /// Print the tree without touching the filesystem
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Write a template config file
    Init {
        /// Write the global config instead of the local one
        #[arg(short, long)]
        global: bool,
    },
}
