//! Catalog error types.

use std::path::PathBuf;

/// Errors that can occur while loading or querying the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file not found.
    #[error("catalog file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A digest that is not 64 lowercase or uppercase hex characters.
    #[error("invalid sha256 digest '{digest}' for {location}")]
    InvalidDigest { location: String, digest: String },

    /// A build-host OS key that can never host a toolchain.
    #[error("catalog entry {location} names '{os}', which cannot be a build host")]
    UnsupportedHostOs { location: String, os: String },

    /// The catalog declares a version with no variants.
    #[error("version {version} declares no variants")]
    EmptyVersion { version: String },

    /// Digest mismatch while verifying a downloaded archive.
    #[error("integrity check failed for {}: expected {expected}, got {actual}", path.display())]
    IntegrityFailure {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Unknown variant or OS key.
    #[error("catalog entry {location}: {source}")]
    Key {
        location: String,
        source: mgt_targets::TargetError,
    },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
