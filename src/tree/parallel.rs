//! Parallel traversal on a rayon worker pool
//!
//! Each directory fans its children out to the pool and joins them before it
//! aggregates, so a directory's digest is only computed once every child has
//! been recorded. Independent subtrees finish in any order.

use crate::error::HashTreeError;
use crate::tree::builder::{close_directory, root_parent, Traverse};
use crate::tree::hasher::Hasher;
use crate::tree::path::{canonicalize_path, PathKey};
use crate::tree::result_map::ResultMap;
use crate::tree::walker::{list_children, root_kind, EntryKind, LinkPolicy, WalkerConfig};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

pub struct ParallelTraversal {
    hasher: Hasher,
    config: WalkerConfig,
    threads: usize,
}

impl ParallelTraversal {
    /// `threads == 0` sizes the pool to the available parallelism.
    pub fn new(hasher: Hasher, config: WalkerConfig, threads: usize) -> Self {
        Self {
            hasher,
            config,
            threads,
        }
    }

    fn visit(
        &self,
        path: &Path,
        key: &PathKey,
        kind: EntryKind,
        ancestors: &[PathBuf],
        results: &ResultMap,
    ) -> Result<(), HashTreeError> {
        match kind {
            EntryKind::File => {
                let digest = self.hasher.hash_file(path)?;
                trace!(key = %key, digest = %digest, "Hashed file");
                results.insert(key.clone(), digest)
            }
            EntryKind::Directory => {
                let ancestors = self.enter(path, ancestors)?;
                let children = list_children(path, &self.config)?;

                children.par_iter().try_for_each(|child| {
                    self.visit(
                        &child.path,
                        &key.child(&child.name),
                        child.kind,
                        &ancestors,
                        results,
                    )
                })?;

                let digest = close_directory(path, key, &self.hasher, &self.config, results)?;
                results.insert(key.clone(), digest)
            }
        }
    }

    /// Track the resolved directory chain when following links so that a
    /// link back to an ancestor is reported instead of recursing forever.
    fn enter(&self, dir: &Path, ancestors: &[PathBuf]) -> Result<Vec<PathBuf>, HashTreeError> {
        if self.config.links != LinkPolicy::Follow {
            return Ok(Vec::new());
        }

        let canonical = canonicalize_path(dir)?;
        if ancestors.contains(&canonical) {
            return Err(HashTreeError::SymlinkLoop(dir.to_path_buf()));
        }

        let mut chain = ancestors.to_vec();
        chain.push(canonical);
        Ok(chain)
    }
}

impl Traverse for ParallelTraversal {
    fn traverse(&self, root: &Path) -> Result<ResultMap, HashTreeError> {
        root_parent(root)?;
        let root_key = PathKey::root(root)?;
        let kind = root_kind(root)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|index| format!("dirhash-worker-{}", index))
            .build()
            .map_err(|e| HashTreeError::Config(format!("Failed to start worker pool: {}", e)))?;
        debug!(threads = pool.current_num_threads(), "Worker pool started");

        let results = ResultMap::new();
        pool.install(|| self.visit(root, &root_key, kind, &[], &results))?;
        Ok(results)
    }
}
