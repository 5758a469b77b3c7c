//! Path resolution: identifiers to segment sequences
//!
//! Pure functions, no I/O. Group ids are dotted (`com.example.shop`), spec keys
//! and module locations are slashed (`controller/command`).

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::error::{DomainError, DomainResult};

/// Separator used when splitting an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `com.example` style group identifiers
    Dot,
    /// `a/b/c` style path keys
    Slash,
}

impl Separator {
    fn as_char(self) -> char {
        match self {
            Separator::Dot => '.',
            Separator::Slash => '/',
        }
    }
}

/// Split an identifier into validated segments.
///
/// Empty segments (leading, trailing or doubled separators) are dropped.
/// Other segments are kept exactly as written, whitespace included.
/// `.` and `..` segments are rejected so nothing can escape its base directory.
/// Backslashes are treated as slashes when splitting paths.
pub fn resolve(identifier: &str, sep: Separator) -> DomainResult<Vec<String>> {
    let normalized = match sep {
        Separator::Slash => identifier.replace('\\', "/"),
        Separator::Dot => identifier.to_string(),
    };

    let segments: Vec<String> = normalized
        .split(sep.as_char())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if segments.is_empty() {
        return Err(DomainError::EmptyIdentifier);
    }
    for segment in &segments {
        validate_segment(segment)?;
    }
    Ok(segments)
}

fn validate_segment(segment: &str) -> DomainResult<()> {
    if segment == "." || segment == ".." {
        return Err(DomainError::InvalidSegment {
            value: segment.to_string(),
            reason: "relative segments are not allowed".to_string(),
        });
    }
    if segment.contains('/') || segment.contains('\\') {
        return Err(DomainError::InvalidSegment {
            value: segment.to_string(),
            reason: "segment contains a path separator".to_string(),
        });
    }
    if segment.contains('\0') {
        return Err(DomainError::InvalidSegment {
            value: segment.escape_debug().to_string(),
            reason: "segment contains a NUL byte".to_string(),
        });
    }
    Ok(())
}

/// Ordered, immutable sequence of path segments.
///
/// Used both for filesystem locations (joined onto a base directory) and for
/// qualified module names (joined with a build-tool separator by the content producer).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModulePath {
    segments: Vec<String>,
}

impl ModulePath {
    /// Build from already-known segments; each one is validated.
    pub fn from_segments<I, S>(segments: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(DomainError::EmptyIdentifier);
        }
        for segment in &segments {
            if segment.is_empty() {
                return Err(DomainError::EmptyIdentifier);
            }
            validate_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// Parse a dotted or slashed identifier.
    pub fn parse(identifier: &str, sep: Separator) -> DomainResult<Self> {
        Ok(Self {
            segments: resolve(identifier, sep)?,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment (the module or layer name).
    pub fn name(&self) -> &str {
        // non-empty by construction
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// New path with `other`'s segments appended.
    pub fn join(&self, other: &ModulePath) -> ModulePath {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        ModulePath { segments }
    }

    /// New path with one more segment.
    pub fn child(&self, segment: &str) -> DomainResult<ModulePath> {
        let mut segments = self.segments.clone();
        segments.extend(resolve(segment, Separator::Slash)?);
        Ok(ModulePath { segments })
    }

    /// Segments joined with an arbitrary separator (e.g. `:` for Gradle project paths).
    pub fn qualified(&self, sep: &str) -> String {
        self.segments.join(sep)
    }

    /// Location of this path below `base`.
    pub fn to_path(&self, base: &Path) -> PathBuf {
        self.segments
            .iter()
            .fold(base.to_path_buf(), |acc, segment| acc.join(segment))
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
