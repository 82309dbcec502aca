//! Tree builder: drives a post-order traversal and collects per-node digests

use crate::error::HashTreeError;
use crate::tree::hasher::Hasher;
use crate::tree::parallel::ParallelTraversal;
use crate::tree::path::{self, PathKey};
use crate::tree::result_map::ResultMap;
use crate::tree::walker::{Entry, Walker, WalkerConfig};
use crate::types::Digest;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// A way of walking a tree and filling a [`ResultMap`].
///
/// `root` is absolute and normalized. Implementations must insert every
/// file before its directory and aggregate a directory only once all of its
/// children are present.
pub trait Traverse {
    fn traverse(&self, root: &Path) -> Result<ResultMap, HashTreeError>;
}

/// How the builder schedules hashing work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Single-threaded depth-first walk.
    Sequential,
    /// Sibling files and subtrees on a worker pool; 0 threads means one per
    /// available core.
    Parallel { threads: usize },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Parallel { threads: 0 }
    }
}

/// Result of hashing a tree.
#[derive(Debug, Clone)]
pub struct HashedTree {
    /// Absolute, normalized root path that was hashed
    pub root_path: PathBuf,
    pub root_key: PathKey,
    pub root_digest: Digest,
    /// One digest per file and directory, root included, in key order
    pub entries: BTreeMap<PathKey, Digest>,
}

impl HashedTree {
    /// Look up a digest by its `/`-separated key, e.g. `R/sub/a.txt`.
    pub fn get(&self, key: &str) -> Option<Digest> {
        let key = PathKey::parse(key).ok()?;
        self.entries.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tree builder for computing per-node digests of a filesystem tree
pub struct TreeBuilder {
    root: PathBuf,
    hasher: Hasher,
    walker_config: WalkerConfig,
    strategy: Strategy,
}

impl TreeBuilder {
    /// Create a new tree builder for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            hasher: Hasher::default(),
            walker_config: WalkerConfig::default(),
            strategy: Strategy::default(),
        }
    }

    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Set walker config (link policy).
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Hash the whole tree from scratch.
    ///
    /// Any failure aborts the run and no digests are returned.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn build(&self) -> Result<HashedTree, HashTreeError> {
        let start = Instant::now();
        info!(strategy = ?self.strategy, algorithm = %self.hasher.algorithm(), "Starting tree hash");

        let root = path::normalize_root(&self.root)?;
        let root_key = PathKey::root(&root)?;

        let traversal = match self.strategy {
            Strategy::Sequential => {
                SequentialTraversal::new(self.hasher, self.walker_config.clone()).traverse(&root)
            }
            Strategy::Parallel { threads } => {
                ParallelTraversal::new(self.hasher, self.walker_config.clone(), threads)
                    .traverse(&root)
            }
        };
        let results = match traversal {
            Ok(results) => results,
            Err(e) => {
                error!("Tree hash failed: {}", e);
                return Err(e);
            }
        };

        let entries = results.into_inner();
        let root_digest = entries.get(&root_key).copied().ok_or_else(|| {
            error!("Root not found in result map: {}", root_key);
            HashTreeError::InvalidPath(format!("Root not found in result map: {}", root_key))
        })?;

        let duration = start.elapsed();
        info!(
            entry_count = entries.len(),
            root_digest = %root_digest,
            duration_ms = duration.as_millis(),
            "Tree hash completed"
        );

        Ok(HashedTree {
            root_path: root,
            root_key,
            root_digest,
            entries,
        })
    }

    /// Convenience: build the tree and return only the root digest.
    pub fn compute_root(&self) -> Result<Digest, HashTreeError> {
        Ok(self.build()?.root_digest)
    }
}

/// Single-threaded post-order walk.
pub struct SequentialTraversal {
    hasher: Hasher,
    config: WalkerConfig,
}

impl SequentialTraversal {
    pub fn new(hasher: Hasher, config: WalkerConfig) -> Self {
        Self { hasher, config }
    }
}

impl Traverse for SequentialTraversal {
    fn traverse(&self, root: &Path) -> Result<ResultMap, HashTreeError> {
        let base = root_parent(root)?;
        let results = ResultMap::new();

        let entries = Walker::with_config(root.to_path_buf(), self.config.clone()).walk()?;
        debug!(entry_count = entries.len(), "Walked filesystem");

        for entry in entries {
            match entry {
                Entry::File { path } => {
                    let key = PathKey::relative_to(base, &path)?;
                    let digest = self.hasher.hash_file(&path)?;
                    trace!(key = %key, digest = %digest, "Hashed file");
                    results.insert(key, digest)?;
                }
                Entry::Directory { path } => {
                    let key = PathKey::relative_to(base, &path)?;
                    let digest = close_directory(&path, &key, &self.hasher, &self.config, &results)?;
                    results.insert(key, digest)?;
                }
            }
        }

        Ok(results)
    }
}

/// Parent of the root; every key is relative to it.
pub(crate) fn root_parent(root: &Path) -> Result<&Path, HashTreeError> {
    root.parent()
        .ok_or_else(|| HashTreeError::InvalidPath(format!("{:?} has no parent directory", root)))
}

/// Aggregate a directory whose children have all been recorded.
///
/// Re-lists the directory and sorts by name independently of the order the
/// walk descended in, then hashes the children's recorded digests in that
/// order.
pub(crate) fn close_directory(
    dir: &Path,
    key: &PathKey,
    hasher: &Hasher,
    config: &WalkerConfig,
    results: &ResultMap,
) -> Result<Digest, HashTreeError> {
    let children = crate::tree::walker::list_children(dir, config)?;

    let mut digests = Vec::with_capacity(children.len());
    for child in &children {
        let child_key = key.child(&child.name);
        let digest = results
            .get(&child_key)
            .ok_or_else(|| HashTreeError::MissingChildDigest {
                parent: key.to_string(),
                child: child_key.to_string(),
            })?;
        digests.push(digest);
    }

    let digest = hasher.hash_children(&digests);
    trace!(key = %key, child_count = digests.len(), digest = %digest, "Aggregated directory");
    Ok(digest)
}
