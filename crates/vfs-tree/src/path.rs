//! Canonical folder path handling
//!
//! Folder paths are always absolute inside a hierarchy: they start with `/`,
//! never end with `/` (except the root itself) and contain no empty segments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FolderId;

/// Segment rendered in place of ancestors that could not be resolved.
pub const UNRESOLVED_SEGMENT: &str = "<unresolved>";

/// Strip leading and trailing `/` runs.
pub fn trim(path: &str) -> &str {
    path.trim_matches('/')
}

/// Iterate over the non-empty segments of a path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Convert any path string into its canonical absolute form.
///
/// `"a/b/"`, `"//a//b"` and `"/a/b"` all become `"/a/b"`; the empty string
/// becomes `"/"`.
pub fn canonicalize(path: &str) -> String {
    let mut canonical = String::with_capacity(path.len() + 1);
    for segment in segments(path) {
        canonical.push('/');
        canonical.push_str(segment);
    }
    if canonical.is_empty() {
        canonical.push('/');
    }
    canonical
}

/// Whether the path designates the root folder.
pub fn is_root(path: &str) -> bool {
    trim(path).is_empty()
}

/// Append a folder name to an already canonical path.
fn join(base: &str, name: &str) -> String {
    if base == "/" {
        format!("/{name}")
    } else {
        format!("{base}/{name}")
    }
}

/// The derived path of a folder record.
///
/// A `Resolved` path was computed all the way up to the root. A `Partial`
/// path hit a missing ancestor: it remembers which id was missing and the
/// part of the path below it. Partial paths are rendered with an
/// [`UNRESOLVED_SEGMENT`] prefix and never match a resolved path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderPath {
    Resolved(String),
    Partial {
        /// The ancestor id that could not be found
        missing: FolderId,
        /// Canonical path below the missing ancestor, empty if none
        tail: String,
    },
}

impl FolderPath {
    /// The path of the root folder.
    pub fn root() -> Self {
        Self::Resolved("/".to_string())
    }

    /// Create a resolved path, canonicalizing the input.
    pub fn resolved(path: &str) -> Self {
        Self::Resolved(canonicalize(path))
    }

    /// A partial path for a chain broken at `missing`.
    pub fn unresolved(missing: FolderId) -> Self {
        Self::Partial {
            missing,
            tail: String::new(),
        }
    }

    /// Extend this path with a child folder name.
    pub fn child(&self, name: &str) -> Self {
        match self {
            Self::Resolved(path) => Self::Resolved(join(path, name)),
            Self::Partial { missing, tail } => Self::Partial {
                missing: *missing,
                tail: format!("{tail}/{name}"),
            },
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }

    /// The canonical path string, if fully resolved.
    pub fn as_resolved(&self) -> Option<&str> {
        match self {
            Self::Resolved(path) => Some(path),
            Self::Partial { .. } => None,
        }
    }

    /// Whether this is the resolved path equal to an already canonical path.
    pub fn matches(&self, canonical: &str) -> bool {
        self.as_resolved() == Some(canonical)
    }

    /// Number of segments in a resolved path.
    pub fn depth(&self) -> usize {
        match self {
            Self::Resolved(path) => segments(path).count(),
            Self::Partial { tail, .. } => segments(tail).count() + 1,
        }
    }

    /// Rewrite this path relative to a canonical ancestor path.
    ///
    /// Returns `None` unless this path is a strict descendant of `ancestor`.
    pub fn relative_to(&self, ancestor: &str) -> Option<Self> {
        let path = self.as_resolved()?;
        let rest = path.strip_prefix(ancestor)?.strip_prefix('/')?;
        if rest.is_empty() {
            return None;
        }
        Some(Self::resolved(rest))
    }
}

impl Default for FolderPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(path) => f.write_str(path),
            Self::Partial { tail, .. } => write!(f, "/{UNRESOLVED_SEGMENT}{tail}"),
        }
    }
}
