//! YAML structure spec loading
//!
//! Accepted shapes:
//! - mapping: `name: true` is an empty file, `name: null` an empty directory,
//!   `name: <mapping|sequence>` a directory with content; names may contain `/`
//! - sequence: bare names are files, single-entry mappings are directories
//!
//! Names go through placeholder substitution (`{base_package}` etc.) before
//! they are split into path segments.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{DomainError, DomainResult, FileListItem, Placeholders, SpecNode};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::FileSystem;

const ROOT_LOCATION: &str = "<root>";

/// Read and convert a YAML spec file.
pub fn load_spec(fs: &dyn FileSystem, path: &Path, vars: &Placeholders) -> InfraResult<SpecNode> {
    debug!("load_spec: path={}", path.display());
    let content = fs
        .read_to_string(path)
        .map_err(|e| InfraError::io(format!("read structure spec: {}", path.display()), e))?;
    parse_spec_at(&content, path, vars)
}

/// Convert YAML text that did not come from a file.
pub fn parse_spec(content: &str, vars: &Placeholders) -> InfraResult<SpecNode> {
    parse_spec_at(content, Path::new("<inline>"), vars)
}

fn parse_spec_at(content: &str, origin: &Path, vars: &Placeholders) -> InfraResult<SpecNode> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| InfraError::SpecParse {
        path: PathBuf::from(origin),
        message: e.to_string(),
    })?;
    let node = from_yaml(&value, vars).map_err(ApplicationError::from)?;
    Ok(node)
}

/// Convert an already-parsed YAML document into a spec tree.
pub fn from_yaml(value: &Value, vars: &Placeholders) -> DomainResult<SpecNode> {
    match value {
        Value::Null => Ok(SpecNode::empty_dir()),
        other => convert(other, ROOT_LOCATION, vars),
    }
}

fn convert(value: &Value, location: &str, vars: &Placeholders) -> DomainResult<SpecNode> {
    match value {
        Value::Mapping(mapping) => {
            let mut entries = Vec::with_capacity(mapping.len());
            for (key, child) in mapping {
                let name = vars.apply(key_name(key, location)?);
                let child_location = child_location(location, &name);
                let node = match child {
                    Value::Bool(true) => SpecNode::FileLeaf,
                    other => directory_content(other, &child_location, vars)?,
                };
                entries.push((name, node));
            }
            SpecNode::directory(entries)
        }
        Value::Sequence(items) => {
            let mut converted = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let item_location = format!("{location}[{index}]");
                converted.push(list_item(item, &item_location, vars)?);
            }
            SpecNode::file_list(converted)
        }
        Value::Tagged(tagged) => convert(&tagged.value, location, vars),
        other => Err(DomainError::spec_shape(
            location,
            format!("expected a mapping or sequence, found {}", describe(other)),
        )),
    }
}

/// Content of a directory entry: null is empty, mappings and sequences recurse.
fn directory_content(value: &Value, location: &str, vars: &Placeholders) -> DomainResult<SpecNode> {
    match value {
        Value::Null => Ok(SpecNode::empty_dir()),
        Value::Mapping(_) | Value::Sequence(_) => convert(value, location, vars),
        Value::Tagged(tagged) => directory_content(&tagged.value, location, vars),
        other => Err(DomainError::spec_shape(
            location,
            format!(
                "directory content must be a mapping, sequence, null or `true`, found {}",
                describe(other)
            ),
        )),
    }
}

fn list_item(item: &Value, location: &str, vars: &Placeholders) -> DomainResult<FileListItem> {
    match item {
        Value::String(name) => Ok(FileListItem::File(vars.apply(name))),
        Value::Mapping(mapping) => {
            let mut entries = mapping.iter();
            match (entries.next(), entries.next()) {
                (Some((key, child)), None) => {
                    let name = vars.apply(key_name(key, location)?);
                    let node = directory_content(child, &child_location(location, &name), vars)?;
                    Ok(FileListItem::Dir(name, node))
                }
                _ => Err(DomainError::spec_shape(
                    location,
                    format!(
                        "list item mapping must have exactly one entry, found {}",
                        mapping.len()
                    ),
                )),
            }
        }
        Value::Tagged(tagged) => list_item(&tagged.value, location, vars),
        other => Err(DomainError::spec_shape(
            location,
            format!(
                "list item must be a file name or a single-entry mapping, found {}",
                describe(other)
            ),
        )),
    }
}

fn key_name<'a>(key: &'a Value, location: &str) -> DomainResult<&'a str> {
    match key {
        Value::String(name) => Ok(name.as_str()),
        other => Err(DomainError::spec_shape(
            location,
            format!("mapping keys must be strings, found {}", describe(other)),
        )),
    }
}

fn child_location(parent: &str, name: &str) -> String {
    if parent == ROOT_LOCATION {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean `{b}`"),
        Value::Number(n) => format!("number `{n}`"),
        Value::String(s) => format!("string `{s}`"),
        Value::Sequence(_) => "sequence".to_string(),
        Value::Mapping(m) => format!("mapping with {} entries", m.len()),
        Value::Tagged(t) => format!("tagged value `{}`", t.tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_true_marker_when_parsing_then_file_leaf() {
        let node = parse_spec("a:\n  b.txt: true\n", &Placeholders::new()).unwrap();
        assert_eq!(
            node,
            SpecNode::Directory(vec![(
                "a".into(),
                SpecNode::Directory(vec![("b.txt".into(), SpecNode::FileLeaf)])
            )])
        );
    }

    #[test]
    fn given_false_value_when_parsing_then_spec_shape_error() {
        let err = parse_spec("a: false\n", &Placeholders::new()).unwrap_err();
        assert!(err.to_string().contains("'a'"), "{err}");
    }

    #[test]
    fn given_scalar_root_when_parsing_then_spec_shape_error() {
        let err = from_yaml(&Value::Bool(false), &Placeholders::new()).unwrap_err();
        assert!(matches!(err, DomainError::SpecShape { .. }));
    }

    #[test]
    fn given_invalid_yaml_when_parsing_then_spec_parse_error() {
        let err = parse_spec("a: [unclosed\n", &Placeholders::new()).unwrap_err();
        assert!(matches!(err, InfraError::SpecParse { .. }));
    }
}
