//! Results file rendering
//!
//! One line per entry in key order: `<indent><name> <hex digest>`. Direct
//! children of the root sit flush left with the root itself; each deeper
//! level adds four spaces.

use crate::error::HashTreeError;
use crate::tree::path::PathKey;
use crate::types::Digest;
use std::collections::BTreeMap;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::Builder;
use tracing::{debug, instrument};

/// Default output file name, relative to the working directory.
pub const DEFAULT_OUTPUT_FILE: &str = "results";

const INDENT_WIDTH: usize = 4;

/// Render a single results line, newline included.
pub fn render_line(key: &PathKey, digest: &Digest) -> String {
    let depth = key.depth().saturating_sub(2);
    format!(
        "{:indent$}{} {}\n",
        "",
        key.name(),
        digest,
        indent = depth * INDENT_WIDTH
    )
}

/// Write every entry to `writer` in key order.
pub fn write_results<W: Write>(
    mut writer: W,
    entries: &BTreeMap<PathKey, Digest>,
) -> io::Result<()> {
    for (key, digest) in entries {
        writer.write_all(render_line(key, digest).as_bytes())?;
    }
    writer.flush()
}

/// Write the results file atomically.
///
/// Content goes to a temporary file next to `path` which is then renamed
/// over it, so readers see either the previous file or the complete new one.
/// The file is created with mode 0o666 less the process umask, the same as a
/// plainly created file.
#[instrument(skip(entries), fields(path = %path.display(), entry_count = entries.len()))]
pub fn write_results_file(
    path: &Path,
    entries: &BTreeMap<PathKey, Digest>,
) -> Result<(), HashTreeError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut temp = builder
        .tempfile_in(dir)
        .map_err(|e| HashTreeError::io(dir, e))?;
    write_results(BufWriter::new(temp.as_file_mut()), entries)
        .map_err(|e| HashTreeError::io(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| HashTreeError::io(path, e.error))?;

    debug!("Results written");
    Ok(())
}
