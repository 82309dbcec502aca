//! Hash computation for file content and directory aggregation
//!
//! Files are hashed by streaming their bytes through SHA-512 in fixed-size
//! chunks. Directories are hashed by feeding the raw bytes of their direct
//! children's digests, in name order, into a single SHA-512 instance.

use crate::error::HashTreeError;
use crate::types::{Digest, DIGEST_LEN};
use sha2::{Digest as _, Sha512};
use std::fmt;
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

/// Read chunk size used when streaming file content.
pub const DEFAULT_BUFFER_SIZE: usize = 16 * 1024;

/// Hash algorithm used for a whole run. Mixing algorithms within one tree is
/// not possible: the choice is made once, on the [`Hasher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Sha512,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    fn state(&self) -> Sha512 {
        match self {
            HashAlgorithm::Sha512 => Sha512::new(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha512" | "sha-512" => Ok(HashAlgorithm::Sha512),
            _ => Err(HashTreeError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Stateless hashing front end bound to one algorithm and read chunk size.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::default(), DEFAULT_BUFFER_SIZE)
    }
}

impl Hasher {
    /// Create a hasher. A zero `buffer_size` is bumped to one byte.
    pub fn new(algorithm: HashAlgorithm, buffer_size: usize) -> Self {
        Self {
            algorithm,
            buffer_size: buffer_size.max(1),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Hash a byte stream to its end without holding more than one chunk in
    /// memory.
    ///
    /// A failed read discards the partial state; no digest is returned.
    pub fn hash_bytes<R: Read>(&self, mut reader: R) -> io::Result<Digest> {
        let mut state = self.algorithm.state();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => state.update(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(finish(state))
    }

    /// Open and stream a file through [`Hasher::hash_bytes`].
    pub fn hash_file(&self, path: &Path) -> Result<Digest, HashTreeError> {
        let file = File::open(path).map_err(|e| HashTreeError::io(path, e))?;
        self.hash_bytes(file).map_err(|e| HashTreeError::io(path, e))
    }

    /// Aggregate a directory's child digests, supplied in name order.
    ///
    /// Only the raw digest bytes are hashed, so a directory's digest depends on
    /// its direct children alone. No children hashes the empty input.
    pub fn hash_children<'a, I>(&self, children: I) -> Digest
    where
        I: IntoIterator<Item = &'a Digest>,
    {
        let mut state = self.algorithm.state();
        for child in children {
            state.update(child.as_bytes());
        }
        finish(state)
    }
}

fn finish(state: Sha512) -> Digest {
    let mut bytes = [0u8; DIGEST_LEN];
    bytes.copy_from_slice(&state.finalize());
    Digest::from_bytes(bytes)
}

/// Compute the content hash of an in-memory buffer.
///
/// Gives the same digest as streaming the same bytes from a file.
pub fn compute_content_hash(content: &[u8]) -> Digest {
    let mut state = HashAlgorithm::Sha512.state();
    state.update(content);
    finish(state)
}
