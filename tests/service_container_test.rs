//! Tests for ServiceContainer wiring

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use msakit::application::services::{ManifestPolicy, Registration};
use msakit::application::{GradleKotlinDsl, Outcome};
use msakit::config::Settings;
use msakit::infrastructure::di::ServiceContainer;
use msakit::infrastructure::{InfraError, ProjectLock};
use msakit::util::testing::CountingFileSystem;

fn settings(strict: bool) -> Settings {
    Settings {
        project_name: "shop".into(),
        group_id: "com.example.shop".into(),
        output_dir: PathBuf::from("out"),
        strict_manifest: strict,
        ..Default::default()
    }
}

#[test]
fn given_settings_when_building_orchestrator_then_root_below_workdir() {
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(settings(false), temp.path().to_path_buf());

    let orchestrator = container.orchestrator().unwrap();

    assert_eq!(orchestrator.root(), temp.path().join("out/shop"));
    assert_eq!(container.project_root(), temp.path().join("out/shop"));
}

#[test]
fn given_injected_fs_when_running_init_then_writes_go_through_it() {
    let temp = TempDir::new().unwrap();
    let counting = CountingFileSystem::new();
    let container = ServiceContainer::with_deps(
        settings(false),
        temp.path().to_path_buf(),
        counting.clone(),
        Arc::new(GradleKotlinDsl),
    );

    container.orchestrator().unwrap().init().unwrap();

    assert!(counting.writes() > 0);
    assert!(temp.path().join("out/shop/settings.gradle.kts").is_file());
}

#[test]
fn given_strict_settings_when_adding_before_init_then_manifest_absent_error() {
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(settings(true), temp.path().to_path_buf());

    let result = container.orchestrator().unwrap().add_library("auth");

    assert!(result.is_err());
}

#[test]
fn given_lenient_settings_when_adding_before_init_then_registration_skipped() {
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(settings(false), temp.path().to_path_buf());
    assert_eq!(
        ManifestPolicy::from_strict(container.settings.strict_manifest),
        ManifestPolicy::Lenient
    );

    let report = container.orchestrator().unwrap().add_library("auth").unwrap();

    assert_eq!(report.modules[0].registration, Some(Registration::ManifestAbsent));
}

#[test]
fn given_held_project_lock_when_locking_through_container_then_locked() {
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(settings(false), temp.path().to_path_buf());
    let _held: ProjectLock = container.lock_project().unwrap();

    let result = container.lock_project();

    assert!(matches!(result, Err(InfraError::Locked { .. })));
}

#[test]
fn given_invalid_project_name_when_building_orchestrator_then_errors() {
    let temp = TempDir::new().unwrap();
    let mut bad = settings(false);
    bad.project_name = "..".into();
    let container = ServiceContainer::new(bad, temp.path().to_path_buf());

    assert!(container.orchestrator().is_err());
}

#[test]
fn given_missing_config_dir_when_writing_template_then_created_through_injected_fs() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let counting = CountingFileSystem::new();
    let container = ServiceContainer::with_deps(
        Settings::default(),
        temp.path().to_path_buf(),
        counting.clone(),
        Arc::new(GradleKotlinDsl),
    );
    let path = temp.path().join("xdg/msakit/msakit.toml");

    // Act
    let outcome = container.write_config_template(&path).unwrap();

    // Assert
    assert_eq!(outcome, Outcome::Created);
    assert_eq!(counting.writes(), 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), Settings::template());
}

#[test]
fn given_existing_config_when_writing_template_then_left_untouched() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("msakit.toml");
    fs::write(&path, "project_name = \"mine\"\n").unwrap();
    let container = ServiceContainer::new(Settings::default(), temp.path().to_path_buf());

    // Act
    let outcome = container.write_config_template(&path).unwrap();

    // Assert
    assert_eq!(outcome, Outcome::AlreadyExisted);
    assert_eq!(fs::read_to_string(&path).unwrap(), "project_name = \"mine\"\n");
}
