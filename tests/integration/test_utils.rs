//! Shared fixtures for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build the sample tree used throughout the tests:
///
/// ```text
/// R/
///   a.txt   "hi"
///   sub/
///     b.txt ""
/// ```
///
/// Returns the temp dir guard and the path of `R`.
pub fn sample_tree() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("R");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), "hi").unwrap();
    fs::write(root.join("sub").join("b.txt"), "").unwrap();
    (temp_dir, root)
}

/// Write `content` at `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
