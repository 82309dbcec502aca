//! dirhash: deterministic Merkle-style fingerprints for a directory tree.
//!
//! Every regular file is hashed with SHA-512. Every directory is hashed over
//! the digests of its children in name order, so the root digest changes
//! whenever any file content or name below it changes.
//!
//! ```no_run
//! use dirhash::tree::builder::TreeBuilder;
//!
//! let tree = TreeBuilder::new("some/dir".into()).build()?;
//! println!("{} {}", tree.root_key, tree.root_digest);
//! # Ok::<(), dirhash::error::HashTreeError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod tree;
pub mod types;
