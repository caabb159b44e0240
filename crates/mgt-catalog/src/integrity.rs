//! Content digests for toolchain archives.
//!
//! Every catalog entry pins its archive by SHA-256. The acquisition step
//! verifies downloads against that digest before extraction.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CatalogError, Result};

/// A content hash (lowercase SHA-256 hex digest).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Compute the SHA-256 hash of the given data.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex_encode(&hasher.finalize()))
    }

    /// Hash a file's contents without reading it into memory at once.
    pub fn compute_file(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher)?;
        Ok(ContentHash(hex_encode(&hasher.finalize())))
    }

    /// Parse a hex digest as written in a catalog. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(ContentHash(s.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Get the hex string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that the given data matches this hash.
    pub fn verify(&self, data: &[u8]) -> bool {
        ContentHash::compute(data) == *self
    }

    /// Verify a file on disk against this hash.
    pub fn verify_file(&self, path: &Path) -> Result<()> {
        let actual = ContentHash::compute_file(path)?;
        if actual == *self {
            Ok(())
        } else {
            Err(CatalogError::IntegrityFailure {
                path: path.to_path_buf(),
                expected: self.0.clone(),
                actual: actual.0,
            })
        }
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encode bytes as lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn hash_of_empty_input() {
        assert_eq!(ContentHash::compute(b"").as_str(), EMPTY_SHA256);
    }

    #[test]
    fn hash_verify() {
        let data = b"arm-gnu-toolchain archive bytes";
        let hash = ContentHash::compute(data);
        assert!(hash.verify(data));
        assert!(!hash.verify(b"tampered data"));
    }

    #[test]
    fn parse_normalizes_case() {
        let upper = EMPTY_SHA256.to_ascii_uppercase();
        let parsed = ContentHash::parse(&upper).unwrap();
        assert_eq!(parsed.as_str(), EMPTY_SHA256);
    }

    #[test]
    fn parse_rejects_bad_digests() {
        assert!(ContentHash::parse("abc").is_none());
        assert!(ContentHash::parse(&"g".repeat(64)).is_none());
    }

    #[test]
    fn verify_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toolchain.tar.xz");
        std::fs::write(&path, b"payload").unwrap();

        let good = ContentHash::compute(b"payload");
        assert!(good.verify_file(&path).is_ok());

        let bad = ContentHash::compute(b"other");
        let err = bad.verify_file(&path).unwrap_err();
        assert!(matches!(err, CatalogError::IntegrityFailure { .. }));
    }
}
