//! Tests for StructureMaterializer
//!
//! Covers both spec shapes, re-run idempotence (zero writes on the second run),
//! preservation of existing content, and path-separator handling.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;
use walkdir::WalkDir;

use msakit::application::services::StructureMaterializer;
use msakit::application::{ApplicationError, FileSystemGateway};
use msakit::domain::{DomainError, FileListItem, Placeholders, SpecNode};
use msakit::infrastructure::spec_loader::parse_spec;
use msakit::infrastructure::traits::{FileSystem, RealFileSystem};
use msakit::util::testing::{init_test_setup, CountingFileSystem};

fn materializer(fs: Arc<dyn FileSystem>) -> StructureMaterializer {
    StructureMaterializer::new(Arc::new(FileSystemGateway::new(fs)))
}

/// Sorted relative paths below `root`; directories carry a trailing slash.
fn snapshot(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| {
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            if entry.file_type().is_dir() {
                format!("{rel}/")
            } else {
                rel
            }
        })
        .collect()
}

fn spec(yaml: &str) -> SpecNode {
    parse_spec(yaml, &Placeholders::new()).unwrap()
}

// ============================================================
// Shapes
// ============================================================

#[test]
fn given_mapping_spec_when_materializing_then_creates_dir_and_empty_file() {
    // Arrange
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let node = spec("a:\n  b.txt: true\n");

    // Act
    let report = materializer(Arc::new(RealFileSystem))
        .materialize(&out, &node)
        .unwrap();

    // Assert
    assert_eq!(snapshot(&out), vec!["a/", "a/b.txt"]);
    assert_eq!(fs::read_to_string(out.join("a/b.txt")).unwrap(), "");
    assert_eq!(report.created_files.len(), 1);
}

#[test]
fn given_list_spec_when_materializing_then_creates_files_and_nested_dir() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let node = spec("- x.txt\n- y:\n    - z.txt\n");

    // Act
    materializer(Arc::new(RealFileSystem))
        .materialize(&out, &node)
        .unwrap();

    // Assert
    assert_eq!(snapshot(&out), vec!["x.txt", "y/", "y/z.txt"]);
    assert!(out.join("x.txt").is_file());
    assert!(out.join("y").is_dir());
}

#[test]
fn given_null_entry_when_materializing_then_creates_empty_directory() {
    let temp = TempDir::new().unwrap();
    let node = spec("logs:\nsrc/main/kotlin:\n");

    materializer(Arc::new(RealFileSystem))
        .materialize(temp.path(), &node)
        .unwrap();

    assert_eq!(
        snapshot(temp.path()),
        vec!["logs/", "src/", "src/main/", "src/main/kotlin/"]
    );
}

#[test]
fn given_empty_list_when_materializing_then_only_base_exists() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    let report = materializer(Arc::new(RealFileSystem))
        .materialize(&out, &SpecNode::FileList(vec![]))
        .unwrap();

    assert!(out.is_dir());
    assert!(snapshot(&out).is_empty());
    assert_eq!(report.created(), 1);
}

#[test]
fn given_slashed_file_name_in_list_when_materializing_then_parents_created() {
    let temp = TempDir::new().unwrap();
    let node = SpecNode::file_list([FileListItem::File("docs/adr/0001.md".into())]).unwrap();

    materializer(Arc::new(RealFileSystem))
        .materialize(temp.path(), &node)
        .unwrap();

    assert_eq!(
        snapshot(temp.path()),
        vec!["docs/", "docs/adr/", "docs/adr/0001.md"]
    );
}

// ============================================================
// Idempotence and non-destructiveness
// ============================================================

#[test]
fn given_materialized_tree_when_rerun_then_performs_no_writes() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let node = spec("a:\n  b.txt: true\n  c:\n    - d.txt\n");
    let counting = CountingFileSystem::new();
    let service = materializer(counting.clone());
    service.materialize(&out, &node).unwrap();
    let before = snapshot(&out);
    counting.reset();

    // Act
    let report = service.materialize(&out, &node).unwrap();

    // Assert
    assert_eq!(counting.writes(), 0);
    assert!(report.is_noop());
    assert_eq!(snapshot(&out), before);
}

#[test]
fn given_existing_file_with_content_when_materializing_then_content_untouched() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("a")).unwrap();
    fs::write(temp.path().join("a/b.txt"), "hand written\n").unwrap();

    // Act
    let report = materializer(Arc::new(RealFileSystem))
        .materialize(temp.path(), &spec("a:\n  b.txt: true\n  new.txt: true\n"))
        .unwrap();

    // Assert
    assert_eq!(
        fs::read_to_string(temp.path().join("a/b.txt")).unwrap(),
        "hand written\n"
    );
    assert_eq!(report.created_files, vec![temp.path().join("a/new.txt")]);
}

#[test]
fn given_file_where_directory_expected_when_materializing_then_errors() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a"), "").unwrap();

    let result = materializer(Arc::new(RealFileSystem)).materialize(temp.path(), &spec("a:\n  b.txt: true\n"));

    assert!(matches!(result, Err(ApplicationError::NotADirectory(_))));
}

// ============================================================
// Separators
// ============================================================

#[rstest]
#[case("a/b/c")]
#[case("a\\b\\c")]
#[case("a//b/c/")]
fn given_multi_segment_name_when_materializing_then_nested_dirs(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let node = SpecNode::directory([(name, SpecNode::empty_dir())]).unwrap();

    materializer(Arc::new(RealFileSystem))
        .materialize(temp.path(), &node)
        .unwrap();

    assert_eq!(snapshot(temp.path()), vec!["a/", "a/b/", "a/b/c/"]);
}

#[test]
fn given_name_with_surrounding_spaces_when_materializing_then_created_verbatim() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let node = SpecNode::directory([(" notes.txt", SpecNode::FileLeaf)]).unwrap();

    // Act
    materializer(Arc::new(RealFileSystem))
        .materialize(temp.path(), &node)
        .unwrap();

    // Assert
    assert!(temp.path().join(" notes.txt").is_file());
    assert!(!temp.path().join("notes.txt").exists());
}

#[rstest]
#[case("a/../b")]
#[case("./a")]
#[case("/")]
fn given_invalid_segment_when_building_spec_then_errors(#[case] name: &str) {
    let result = SpecNode::directory([(name, SpecNode::empty_dir())]);
    assert!(result.is_err());
}

// ============================================================
// Shape errors
// ============================================================

#[test]
fn given_file_leaf_as_root_when_materializing_then_spec_shape_error() {
    let temp = TempDir::new().unwrap();

    let result = materializer(Arc::new(RealFileSystem)).materialize(temp.path(), &SpecNode::FileLeaf);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::SpecShape { .. }))
    ));
}
