//! Manifest entries and line-set semantics

use std::fmt;

/// One registration line of the build manifest.
///
/// Identity is the exact line text: `include("a")` and `include( "a" )` are
/// different entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestEntry(String);

impl ManifestEntry {
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `content` already holds this entry as a whole line.
    pub fn is_member_of(&self, content: &str) -> bool {
        content.lines().any(|line| line == self.0)
    }

    /// Bytes appended to the manifest for this entry: a blank separator, then the line.
    pub fn append_block(&self) -> String {
        format!("\n{}\n", self.0)
    }
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ManifestEntry {
    fn from(line: &str) -> Self {
        Self::new(line)
    }
}
