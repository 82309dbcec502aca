//! Core value types shared across the crate.

use crate::error::HashTreeError;
use std::fmt;
use std::str::FromStr;

/// Digest length in bytes (SHA-512).
pub const DIGEST_LEN: usize = 64;

/// Digest length when rendered as hex.
pub const DIGEST_HEX_LEN: usize = DIGEST_LEN * 2;

/// A SHA-512 digest of a file's content or of a directory's child digests.
///
/// Always rendered as exactly [`DIGEST_HEX_LEN`] lowercase hex characters,
/// leading zero bytes included.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = HashTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(HashTreeError::InvalidDigest(format!(
                "digest must be {} hex characters, got {}",
                DIGEST_HEX_LEN,
                s.len()
            )));
        }
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| HashTreeError::InvalidDigest(e.to_string()))?;
        Ok(Digest(bytes))
    }
}
