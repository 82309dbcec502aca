//! Path keys and root path normalization

use crate::error::HashTreeError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Separator used inside every [`PathKey`], whatever the host platform.
pub const KEY_SEPARATOR: char = '/';

/// A node's path relative to the parent of the traversal root.
///
/// For root `/data/R`, the root itself is `R` and a file beneath it is
/// `R/sub/a.txt`. Keys order as plain strings, byte by byte.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathKey(String);

impl PathKey {
    /// Key of the traversal root: its final path segment.
    pub fn root(root: &Path) -> Result<Self, HashTreeError> {
        let name = root.file_name().ok_or_else(|| {
            HashTreeError::InvalidPath(format!("{:?} has no final path segment", root))
        })?;
        let name = name
            .to_str()
            .ok_or_else(|| HashTreeError::NonUtf8Path(root.to_path_buf()))?;
        Ok(PathKey(name.to_string()))
    }

    /// Key of `path` relative to `base`, built from path components rather
    /// than string replacement.
    pub fn relative_to(base: &Path, path: &Path) -> Result<Self, HashTreeError> {
        let relative = path.strip_prefix(base).map_err(|_| {
            HashTreeError::InvalidPath(format!("{:?} is not below {:?}", path, base))
        })?;

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => segments.push(
                    name.to_str()
                        .ok_or_else(|| HashTreeError::NonUtf8Path(path.to_path_buf()))?,
                ),
                other => {
                    return Err(HashTreeError::InvalidPath(format!(
                        "unexpected component {:?} in {:?}",
                        other, path
                    )))
                }
            }
        }

        if segments.is_empty() {
            return Err(HashTreeError::InvalidPath(format!(
                "{:?} has no segments below {:?}",
                path, base
            )));
        }

        Ok(PathKey(segments.join("/")))
    }

    /// Parse a `/`-separated key such as `R/sub/a.txt`.
    pub fn parse(key: &str) -> Result<Self, HashTreeError> {
        if key.split(KEY_SEPARATOR).any(|segment| segment.is_empty()) {
            return Err(HashTreeError::InvalidPath(format!(
                "{:?} is not a valid path key",
                key
            )));
        }
        Ok(PathKey(key.to_string()))
    }

    /// Key of a direct child of this node.
    pub fn child(&self, name: &str) -> Self {
        PathKey(format!("{}{}{}", self.0, KEY_SEPARATOR, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(KEY_SEPARATOR)
    }

    /// Final path segment.
    pub fn name(&self) -> &str {
        self.0.rsplit(KEY_SEPARATOR).next().unwrap_or(&self.0)
    }

    /// Number of path segments; the root key has depth 1.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Make `path` absolute and collapse `.` and `..` lexically.
///
/// Symlinks are left untouched; the walker decides what to do with them.
pub fn normalize_root(path: &Path) -> Result<PathBuf, HashTreeError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| HashTreeError::io(path, e))?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    Ok(normalized)
}

/// Canonicalize a path (resolving symlinks) for loop detection.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, HashTreeError> {
    dunce::canonicalize(path).map_err(|e| HashTreeError::io(path, e))
}
