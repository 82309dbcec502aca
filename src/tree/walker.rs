//! Filesystem walker for traversing directory structures

use crate::error::HashTreeError;
use serde::Deserialize;
use std::fmt;
use std::fs::{self, FileType};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::trace;
use walkdir::WalkDir;

/// What to do with entries that are neither regular files nor directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPolicy {
    /// Abort the run on the first symlink or special file.
    #[default]
    Fail,
    /// Leave such entries out of both traversal and directory digests.
    Skip,
    /// Resolve symlinks and hash their targets in place of the link.
    /// Special files still fail.
    Follow,
}

impl fmt::Display for LinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkPolicy::Fail => "fail",
            LinkPolicy::Skip => "skip",
            LinkPolicy::Follow => "follow",
        };
        f.write_str(name)
    }
}

impl FromStr for LinkPolicy {
    type Err = HashTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(LinkPolicy::Fail),
            "skip" => Ok(LinkPolicy::Skip),
            "follow" => Ok(LinkPolicy::Follow),
            other => Err(HashTreeError::Config(format!(
                "Invalid link policy: {} (must be 'fail', 'skip' or 'follow')",
                other
            ))),
        }
    }
}

/// Filesystem walker configuration
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    pub links: LinkPolicy,
}

/// Kinds of entries that take part in hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Filesystem entries in post-order
#[derive(Debug, Clone)]
pub enum Entry {
    File { path: PathBuf },
    Directory { path: PathBuf },
}

/// A direct child of a directory
#[derive(Debug, Clone)]
pub struct ChildEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Decide whether an entry is hashed as a file, as a directory, or left out.
///
/// `file_type` must not have followed symlinks yet; with
/// [`LinkPolicy::Follow`] the link target is inspected here.
pub fn classify(
    path: &Path,
    file_type: FileType,
    policy: LinkPolicy,
) -> Result<Option<EntryKind>, HashTreeError> {
    if file_type.is_file() {
        return Ok(Some(EntryKind::File));
    }
    if file_type.is_dir() {
        return Ok(Some(EntryKind::Directory));
    }

    match policy {
        LinkPolicy::Skip => {
            trace!(path = %path.display(), kind = describe(&file_type), "Skipping entry");
            Ok(None)
        }
        LinkPolicy::Follow if file_type.is_symlink() => {
            let target = fs::metadata(path).map_err(|e| HashTreeError::io(path, e))?;
            let target_type = target.file_type();
            if target_type.is_file() {
                Ok(Some(EntryKind::File))
            } else if target_type.is_dir() {
                Ok(Some(EntryKind::Directory))
            } else {
                Err(HashTreeError::UnsupportedEntryType {
                    path: path.to_path_buf(),
                    kind: describe(&target_type),
                })
            }
        }
        _ => Err(HashTreeError::UnsupportedEntryType {
            path: path.to_path_buf(),
            kind: describe(&file_type),
        }),
    }
}

/// Kind of the traversal root. The root itself is always resolved through
/// symlinks.
pub fn root_kind(root: &Path) -> Result<EntryKind, HashTreeError> {
    let metadata = fs::metadata(root).map_err(|e| HashTreeError::io(root, e))?;
    let file_type = metadata.file_type();
    if file_type.is_dir() {
        Ok(EntryKind::Directory)
    } else if file_type.is_file() {
        Ok(EntryKind::File)
    } else {
        Err(HashTreeError::UnsupportedEntryType {
            path: root.to_path_buf(),
            kind: describe(&file_type),
        })
    }
}

/// List a directory's direct children, sorted by name.
///
/// Names compare by byte, which for UTF-8 is code point order and does not
/// depend on locale or on the order the filesystem returns entries in.
pub fn list_children(dir: &Path, config: &WalkerConfig) -> Result<Vec<ChildEntry>, HashTreeError> {
    let read_dir = fs::read_dir(dir).map_err(|e| HashTreeError::io(dir, e))?;

    let mut children = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| HashTreeError::io(dir, e))?;
        let path = entry.path();
        let name = entry
            .file_name()
            .into_string()
            .map_err(|_| HashTreeError::NonUtf8Path(path.clone()))?;
        let file_type = entry.file_type().map_err(|e| HashTreeError::io(&path, e))?;

        if let Some(kind) = classify(&path, file_type, config.links)? {
            children.push(ChildEntry { name, path, kind });
        }
    }

    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(children)
}

#[cfg(unix)]
fn describe(file_type: &FileType) -> &'static str {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_symlink() {
        "symlink"
    } else if file_type.is_socket() {
        "socket"
    } else if file_type.is_fifo() {
        "fifo"
    } else if file_type.is_block_device() {
        "block device"
    } else if file_type.is_char_device() {
        "character device"
    } else {
        "special file"
    }
}

#[cfg(not(unix))]
fn describe(file_type: &FileType) -> &'static str {
    if file_type.is_symlink() {
        "symlink"
    } else {
        "special file"
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the tree in post-order: every directory comes after all of its
    /// descendants, siblings in name order. The root is the last entry.
    pub fn walk(&self) -> Result<Vec<Entry>, HashTreeError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.links == LinkPolicy::Follow)
            .contents_first(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(walk_error)?;
            let path = entry.path().to_path_buf();

            match classify(&path, entry.file_type(), self.config.links)? {
                Some(EntryKind::File) => entries.push(Entry::File { path }),
                Some(EntryKind::Directory) => entries.push(Entry::Directory { path }),
                None => {}
            }
        }

        Ok(entries)
    }
}

fn walk_error(err: walkdir::Error) -> HashTreeError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    if err.loop_ancestor().is_some() {
        return HashTreeError::SymlinkLoop(path);
    }
    match err.into_io_error() {
        Some(io) => HashTreeError::io(path, io),
        None => HashTreeError::InvalidPath(format!("Failed to walk {:?}", path)),
    }
}
