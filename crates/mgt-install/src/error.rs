//! Installation error types.

use std::path::PathBuf;

use mgt_catalog::CatalogError;
use mgt_core::ResolveError;
use mgt_targets::{OsKind, Variant};

/// Failure to reshape an extracted archive into the canonical layout.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// Reading the installation root or the versioned folder failed.
    #[error("cannot read {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Moving an entry out of the versioned folder failed.
    #[error("cannot move {} to {}: {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing the emptied versioned folder failed.
    #[error("cannot remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to fetch, verify, or extract one archive.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("archive not found at {}", path.display())]
    MissingArchive { path: PathBuf },

    /// The archive does not match its catalog digest.
    #[error(transparent)]
    Integrity(#[from] CatalogError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure of a full install.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Validation passed but the catalog has no archive for this host.
    #[error("no archive for {version} '{variant}' on {os}/{arch}")]
    NoArchive {
        version: String,
        variant: Variant,
        os: OsKind,
        arch: String,
    },

    /// The acquisition service failed to fetch, verify, or extract.
    #[error("cannot acquire {url}: {source}")]
    Acquisition {
        url: String,
        #[source]
        source: AcquireError,
    },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("cannot record local toolchain path in {}: {source}", path.display())]
    LocalPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for install operations.
pub type Result<T> = std::result::Result<T, InstallError>;
