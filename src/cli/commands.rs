//! Command dispatch: settings, locking, and user-facing output

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use regex::Regex;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::{
    AddReport, InitReport, ManifestInit, MaterializeReport, ModuleReport, Registration,
};
use crate::application::Outcome;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{FileListItem, Placeholders, SpecNode};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::spec_loader::load_spec;
use crate::infrastructure::InfraError;

/// Allowed domain and library names.
const MODULE_NAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_-]*$";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let workdir = resolve_workdir(cli.project_dir.as_deref())?;
    debug!("execute_command: workdir={}", workdir.display());

    match &cli.command {
        Some(Commands::Init {
            name,
            group,
            output,
        }) => cmd_init(
            cli,
            &workdir,
            name.as_deref(),
            group.as_deref(),
            output.as_deref(),
        ),
        Some(Commands::AddDomain { name }) => cmd_add_domain(cli, &workdir, name),
        Some(Commands::AddLibrary { name }) => cmd_add_library(cli, &workdir, name),
        Some(Commands::Materialize {
            spec,
            output,
            dry_run,
        }) => cmd_materialize(cli, &workdir, spec, output.as_deref(), *dry_run),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cmd_config_show(cli, &workdir),
            ConfigCommands::Path => cmd_config_path(&workdir),
            ConfigCommands::Init { global } => cmd_config_init(&workdir, *global),
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "msakit", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `msakit --help`".to_string(),
        )),
    }
}

fn resolve_workdir(project_dir: Option<&Path>) -> CliResult<PathBuf> {
    let cwd = std::env::current_dir()
        .map_err(|e| InfraError::io("determine current directory", e))?;
    Ok(match project_dir {
        Some(dir) => absolutize(&cwd, dir),
        None => cwd,
    })
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_settings(cli: &Cli, workdir: &Path) -> CliResult<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_file(&absolutize(workdir, path))?,
        None => Settings::load(Some(workdir))?,
    };
    if cli.strict {
        settings.strict_manifest = true;
    }
    Ok(settings)
}

fn validate_module_name(name: &str) -> CliResult<()> {
    let re = Regex::new(MODULE_NAME_PATTERN)
        .map_err(|e| CliError::InvalidArgs(format!("module name pattern: {e}")))?;
    if re.is_match(name) {
        Ok(())
    } else {
        Err(CliError::InvalidArgs(format!(
            "'{name}' is not a valid module name (letters, digits, '-' and '_', not starting with a separator)"
        )))
    }
}

/// Path shown relative to `base` when possible.
fn display_path(path: &Path, base: &Path) -> String {
    pathdiff::diff_paths(path, base)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

#[instrument(skip(cli))]
fn cmd_init(
    cli: &Cli,
    workdir: &Path,
    name: Option<&str>,
    group: Option<&str>,
    output_dir: Option<&Path>,
) -> CliResult<()> {
    let mut settings = load_settings(cli, workdir)?;
    if let Some(name) = name {
        validate_module_name(name)?;
        settings.project_name = name.to_string();
    }
    if let Some(group) = group {
        settings.group_id = group.to_string();
    }
    if let Some(dir) = output_dir {
        settings.output_dir = dir.to_path_buf();
    }

    let container = ServiceContainer::new(settings, workdir.to_path_buf());
    let orchestrator = container.orchestrator()?;
    let _lock = container.lock_project()?;
    let report = orchestrator.init()?;

    print_init(&report, workdir);
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_add_domain(cli: &Cli, workdir: &Path, name: &str) -> CliResult<()> {
    validate_module_name(name)?;
    let container = ServiceContainer::new(load_settings(cli, workdir)?, workdir.to_path_buf());
    let orchestrator = container.orchestrator()?;
    let _lock = container.lock_project()?;
    let report = orchestrator.add_domain(name)?;

    print_add("domain", &report);
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_add_library(cli: &Cli, workdir: &Path, name: &str) -> CliResult<()> {
    validate_module_name(name)?;
    let container = ServiceContainer::new(load_settings(cli, workdir)?, workdir.to_path_buf());
    let orchestrator = container.orchestrator()?;
    let _lock = container.lock_project()?;
    let report = orchestrator.add_library(name)?;

    print_add("library", &report);
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_materialize(
    cli: &Cli,
    workdir: &Path,
    spec: &Path,
    output_dir: Option<&Path>,
    dry_run: bool,
) -> CliResult<()> {
    let settings = load_settings(cli, workdir)?;
    let ctx = settings.project_context(workdir)?;
    let vars = Placeholders::new()
        .with("base_package", ctx.base_package())
        .with("group_id", ctx.group_id.clone())
        .with("project_name", ctx.project_name.clone());

    let container = ServiceContainer::new(settings, workdir.to_path_buf());
    let spec_path = absolutize(workdir, spec);
    let node = load_spec(container.fs.as_ref(), &spec_path, &vars)?;
    let base = output_dir
        .map(|dir| absolutize(workdir, dir))
        .unwrap_or_else(|| workdir.to_path_buf());

    if dry_run {
        output::header(&format!(
            "Would materialize {} directories and {} files:",
            node.directory_count(),
            node.file_count()
        ));
        output::info(&render_tree(display_path(&base, workdir), &node));
        return Ok(());
    }

    let report = container.materializer().materialize(&base, &node)?;
    print_materialize(&report, &base);
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_config_show(cli: &Cli, workdir: &Path) -> CliResult<()> {
    let settings = load_settings(cli, workdir)?;
    output::info(&settings.to_toml()?);
    Ok(())
}

fn cmd_config_path(workdir: &Path) -> CliResult<()> {
    match global_config_path() {
        Some(path) => print_config_location("global", &path),
        None => output::action("global", &"unavailable (no home directory)"),
    }
    print_config_location("local", &local_config_path(workdir));
    Ok(())
}

fn print_config_location(label: &str, path: &Path) {
    let state = if path.exists() { "" } else { " (not present)" };
    output::action(label, &format!("{}{}", path.display(), state));
}

#[instrument]
fn cmd_config_init(workdir: &Path, global: bool) -> CliResult<()> {
    let path = if global {
        global_config_path().ok_or_else(|| {
            CliError::Usage("cannot determine global config directory".to_string())
        })?
    } else {
        local_config_path(workdir)
    };
    let container = ServiceContainer::new(Settings::default(), workdir.to_path_buf());
    match container.write_config_template(&path)? {
        Outcome::AlreadyExisted => Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        ))),
        _ => {
            output::action("Created", &path.display());
            Ok(())
        }
    }
}

fn print_init(report: &InitReport, workdir: &Path) {
    let root = display_path(&report.root, workdir);
    if report.is_noop() {
        output::success(&format!("project already initialized: {root}"));
        return;
    }
    output::header(&format!("Initialized project {root}"));
    match report.manifest {
        ManifestInit::Created => output::created(&"manifest"),
        ManifestInit::AlreadyExisted => output::unchanged(&"manifest"),
    }
    match report.root_build {
        Outcome::AlreadyExisted => output::unchanged(&"root build file"),
        _ => output::created(&"root build file"),
    }
    for module in &report.modules {
        print_module(module);
    }
}

fn print_add(kind: &str, report: &AddReport) {
    if report.is_noop() {
        output::success(&format!("{kind} '{}' already in place", report.name));
        return;
    }
    output::header(&format!("Added {kind} '{}'", report.name));
    for module in &report.modules {
        print_module(module);
    }
}

fn print_module(report: &ModuleReport) {
    if report.is_noop() {
        output::unchanged(&report.module);
    } else {
        let created = report.tree.created() + usize::from(report.build_file.wrote());
        output::created(&format!("{} ({} created)", report.module, created));
    }
    match report.registration {
        Some(Registration::Appended) => output::detail(&"registered in manifest"),
        Some(Registration::ManifestAbsent) => output::warning(&format!(
            "{} not registered: manifest missing (run `msakit init` first)",
            report.module
        )),
        Some(Registration::AlreadyPresent) | None => {}
    }
}

fn print_materialize(report: &MaterializeReport, base: &Path) {
    for dir in &report.created_dirs {
        output::created(&format!("{}/", display_path(dir, base)));
    }
    for file in &report.created_files {
        output::created(&display_path(file, base));
    }
    output::success(&format!(
        "{} created, {} already existed",
        report.created(),
        report.already_existed
    ));
}

/// Dry-run rendering; directories carry a trailing slash.
fn render_tree(label: String, node: &SpecNode) -> Tree<String> {
    match node {
        SpecNode::FileLeaf => Tree::new(label),
        SpecNode::Directory(entries) => Tree::new(format!("{label}/")).with_leaves(
            entries
                .iter()
                .map(|(name, child)| render_tree(name.clone(), child)),
        ),
        SpecNode::FileList(items) => {
            Tree::new(format!("{label}/")).with_leaves(items.iter().map(|item| match item {
                FileListItem::File(name) => Tree::new(name.clone()),
                FileListItem::Dir(name, child) => render_tree(name.clone(), child),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    #[rstest]
    #[case("order", true)]
    #[case("common-auth", true)]
    #[case("user_profile2", true)]
    #[case("-order", false)]
    #[case("order/items", false)]
    #[case("", false)]
    #[case("..", false)]
    fn given_name_when_validating_then_matches_pattern(#[case] name: &str, #[case] ok: bool) {
        assert_eq!(validate_module_name(name).is_ok(), ok);
    }

    #[test]
    fn given_nested_spec_when_rendering_tree_then_dirs_have_trailing_slash() {
        let node = SpecNode::directory([
            ("src", SpecNode::dirs(&["main"]).unwrap()),
            ("README.md", SpecNode::FileLeaf),
        ])
        .unwrap();
        let rendered = render_tree("out".to_string(), &node).to_string();
        assert!(rendered.starts_with("out/"));
        assert!(rendered.contains("src/"));
        assert!(rendered.contains("main/"));
        assert!(rendered.contains("README.md"));
        assert!(!rendered.contains("README.md/"));
    }

    #[test]
    fn given_config_flag_when_loading_settings_then_file_is_relative_to_workdir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("alt.toml"), "project_name = \"billing\"\n").unwrap();
        let cli = Cli::try_parse_from(["msakit", "--config", "alt.toml", "--strict", "config", "show"])
            .unwrap();

        let settings = load_settings(&cli, dir.path()).unwrap();

        assert_eq!(settings.project_name, "billing");
        assert!(settings.strict_manifest);
    }

    #[test]
    fn given_path_below_base_when_displaying_then_relative() {
        assert_eq!(
            display_path(Path::new("/w/p/a"), Path::new("/w")),
            "p/a".to_string()
        );
        assert_eq!(display_path(Path::new("/w"), Path::new("/w")), "/w");
    }
}
