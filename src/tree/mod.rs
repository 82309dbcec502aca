//! Filesystem Merkle Tree
//!
//! Every file and directory under a root gets a deterministic digest: files
//! from their content, directories from their children's digests in name
//! order.

pub mod builder;
pub mod hasher;
pub mod parallel;
pub mod path;
pub mod result_map;
pub mod walker;
