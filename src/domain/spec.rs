//! Specification nodes: the declarative description of a directory tree

use std::collections::BTreeMap;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::path::{resolve, Separator};

/// One node of a structure specification.
///
/// Names stored in a normalized tree are single path segments; the constructors
/// expand multi-segment names (`a/b/c`) into nested directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecNode {
    /// Ordered `name -> node` mapping; iteration order is creation order.
    Directory(Vec<(String, SpecNode)>),
    /// An empty file (the `true` marker in a mapping).
    FileLeaf,
    /// Terse sequence form: bare file names and single-entry directory mappings.
    FileList(Vec<FileListItem>),
}

/// Item of a [`SpecNode::FileList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileListItem {
    /// Bare name: an empty file.
    File(String),
    /// Single-entry mapping: a directory containing a nested node.
    Dir(String, SpecNode),
}

impl SpecNode {
    /// An empty directory.
    pub fn empty_dir() -> Self {
        SpecNode::Directory(Vec::new())
    }

    /// Build a directory node, expanding multi-segment names into nested directories.
    pub fn directory<I, S>(entries: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (S, SpecNode)>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for (name, node) in entries {
            normalized.push(expand_entry(name.as_ref(), node)?);
        }
        Ok(SpecNode::Directory(normalized))
    }

    /// Build a file list, expanding multi-segment names.
    ///
    /// `a/b.txt` as a bare item becomes directory `a` holding file `b.txt`.
    pub fn file_list<I>(items: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = FileListItem>,
    {
        let mut normalized = Vec::new();
        for item in items {
            normalized.push(match item {
                FileListItem::File(name) => {
                    let mut segments = resolve(&name, Separator::Slash)?;
                    let file = segments.pop().ok_or(DomainError::EmptyIdentifier)?;
                    match segments.split_first() {
                        None => FileListItem::File(file),
                        Some((first, rest)) => FileListItem::Dir(
                            first.clone(),
                            nest(rest, SpecNode::FileList(vec![FileListItem::File(file)])),
                        ),
                    }
                }
                FileListItem::Dir(name, node) => {
                    let (first, node) = expand_entry(&name, node)?;
                    FileListItem::Dir(first, node)
                }
            });
        }
        Ok(SpecNode::FileList(normalized))
    }

    /// Directory holding one empty sub-directory per (possibly multi-segment) path.
    ///
    /// ```
    /// use msakit::domain::SpecNode;
    ///
    /// let node = SpecNode::dirs(&["command/handler", "port"]).unwrap();
    /// assert_eq!(node.directory_count(), 3);
    /// ```
    pub fn dirs(paths: &[&str]) -> DomainResult<Self> {
        SpecNode::directory(paths.iter().map(|p| (*p, SpecNode::empty_dir())))
    }

    /// Number of directories this node would create below its base.
    pub fn directory_count(&self) -> usize {
        match self {
            SpecNode::FileLeaf => 0,
            SpecNode::Directory(entries) => entries
                .iter()
                .map(|(_, node)| match node {
                    SpecNode::FileLeaf => 0,
                    other => 1 + other.directory_count(),
                })
                .sum(),
            SpecNode::FileList(items) => items
                .iter()
                .map(|item| match item {
                    FileListItem::File(_) => 0,
                    FileListItem::Dir(_, node) => 1 + node.directory_count(),
                })
                .sum(),
        }
    }

    /// Number of files this node would create below its base.
    pub fn file_count(&self) -> usize {
        match self {
            SpecNode::FileLeaf => 1,
            SpecNode::Directory(entries) => entries.iter().map(|(_, n)| n.file_count()).sum(),
            SpecNode::FileList(items) => items
                .iter()
                .map(|item| match item {
                    FileListItem::File(_) => 1,
                    FileListItem::Dir(_, node) => node.file_count(),
                })
                .sum(),
        }
    }
}

fn expand_entry(name: &str, node: SpecNode) -> DomainResult<(String, SpecNode)> {
    let segments = resolve(name, Separator::Slash)?;
    match segments.split_first() {
        Some((first, rest)) => Ok((first.clone(), nest(rest, node))),
        None => Err(DomainError::EmptyIdentifier),
    }
}

/// Wrap `leaf` in one directory per segment, innermost last.
fn nest(segments: &[String], leaf: SpecNode) -> SpecNode {
    segments
        .iter()
        .rev()
        .fold(leaf, |inner, segment| {
            SpecNode::Directory(vec![(segment.clone(), inner)])
        })
}

/// `{name}` placeholders substituted into spec names before splitting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    values: BTreeMap<String, String>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Replace every known `{name}` occurrence; unknown placeholders are kept verbatim.
    pub fn apply(&self, input: &str) -> String {
        if !input.contains('{') {
            return input.to_string();
        }
        self.values
            .iter()
            .fold(input.to_string(), |acc, (name, value)| {
                acc.replace(&format!("{{{name}}}"), value)
            })
    }
}
