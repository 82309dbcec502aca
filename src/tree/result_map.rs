//! Shared path key to digest map filled during a traversal

use crate::error::HashTreeError;
use crate::tree::path::PathKey;
use crate::types::Digest;
use parking_lot::RwLock;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Append-only map from [`PathKey`] to [`Digest`].
///
/// Safe to share between worker threads by reference. An insert under an
/// existing key is rejected instead of overwriting.
#[derive(Debug, Default)]
pub struct ResultMap {
    entries: RwLock<BTreeMap<PathKey, Digest>>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node's digest.
    pub fn insert(&self, key: PathKey, digest: Digest) -> Result<(), HashTreeError> {
        match self.entries.write().entry(key) {
            Entry::Occupied(occupied) => {
                Err(HashTreeError::DuplicateKey(occupied.key().to_string()))
            }
            Entry::Vacant(vacant) => {
                vacant.insert(digest);
                Ok(())
            }
        }
    }

    pub fn get(&self, key: &PathKey) -> Option<Digest> {
        self.entries.read().get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// All entries in key order.
    pub fn entries(&self) -> Vec<(PathKey, Digest)> {
        self.entries
            .read()
            .iter()
            .map(|(key, digest)| (key.clone(), *digest))
            .collect()
    }

    /// Hand the finished map off to the output stage.
    pub fn into_inner(self) -> BTreeMap<PathKey, Digest> {
        self.entries.into_inner()
    }
}
