//! Install orchestration.
//!
//! Resolution and validation run first, so a rejected request never
//! touches the filesystem. A valid request then either records a local
//! toolchain or acquires the catalog archive and normalizes its layout.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mgt_catalog::{Catalog, Source};
use mgt_core::{resolve, ResolveRequest, ResolvedConfiguration};
use tracing::{debug, info};

use crate::error::{AcquireError, InstallError, Result};
use crate::local::record_local_path;
use crate::normalize::{normalize_install, NormalizeOutcome};

/// Fetches, verifies, and extracts one catalog archive.
///
/// Implementations must check the archive against `source.sha256` and
/// extract it with its top-level directory stripped.
pub trait Acquire {
    fn acquire(
        &self,
        source: &Source,
        destination: &Path,
    ) -> std::result::Result<(), AcquireError>;
}

/// An offline mirror of downloaded archives and their extracted trees.
///
/// Layout:
/// ```text
/// <root>/
///   <sha256 of the archive>/
///     <archive file name from the url>
///     tree/
///       bin/ lib/ ...
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryMirror {
    root: PathBuf,
}

impl DirectoryMirror {
    pub fn new(root: PathBuf) -> Self {
        DirectoryMirror { root }
    }

    fn entry_for(&self, source: &Source) -> PathBuf {
        self.root.join(source.sha256.as_str())
    }

    /// The archive as downloaded, named after the last segment of its url.
    pub fn archive_for(&self, source: &Source) -> PathBuf {
        let name = source
            .url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("archive");
        self.entry_for(source).join(name)
    }

    /// Directory holding the extracted tree for `source`.
    pub fn tree_for(&self, source: &Source) -> PathBuf {
        self.entry_for(source).join("tree")
    }
}

impl Acquire for DirectoryMirror {
    fn acquire(
        &self,
        source: &Source,
        destination: &Path,
    ) -> std::result::Result<(), AcquireError> {
        let archive = self.archive_for(source);
        if !archive.is_file() {
            return Err(AcquireError::MissingArchive { path: archive });
        }
        source.sha256.verify_file(&archive)?;
        debug!(archive = %archive.display(), "archive digest verified");

        let tree = self.tree_for(source);
        if !tree.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no extracted tree at {}", tree.display()),
            )
            .into());
        }
        copy_tree(&tree, destination)?;
        Ok(())
    }
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            copy_link(&entry.path(), &target)?;
        } else if file_type.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Recreate the link at `from` as `to`, keeping its target as written.
#[cfg(unix)]
fn copy_link(from: &Path, to: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(from)?, to)
}

#[cfg(windows)]
fn copy_link(from: &Path, to: &Path) -> io::Result<()> {
    let target = fs::read_link(from)?;
    if fs::metadata(from)?.is_dir() {
        std::os::windows::fs::symlink_dir(target, to)
    } else {
        std::os::windows::fs::symlink_file(target, to)
    }
}

#[cfg(not(any(unix, windows)))]
fn copy_link(from: &Path, _to: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot copy symbolic link {}", from.display()),
    ))
}

/// What an install did.
#[derive(Debug)]
pub struct InstallReport {
    pub resolved: ResolvedConfiguration,
    /// Absent for local-path installs.
    pub normalized: Option<NormalizeOutcome>,
}

/// Drives resolution, acquisition, and normalization.
pub struct Installer<'a, A> {
    catalog: &'a Catalog,
    acquirer: A,
}

impl<'a, A: Acquire> Installer<'a, A> {
    pub fn new(catalog: &'a Catalog, acquirer: A) -> Self {
        Installer { catalog, acquirer }
    }

    /// Install the toolchain `request` resolves to into `request.install_root`.
    pub fn install(&self, request: &ResolveRequest) -> Result<InstallReport> {
        let resolved = resolve(self.catalog, request)?;

        if let Some(local) = &request.options.local_path {
            record_local_path(&request.install_root, local)?;
            return Ok(InstallReport {
                resolved,
                normalized: None,
            });
        }

        let source = resolved
            .source
            .as_ref()
            .ok_or_else(|| InstallError::NoArchive {
                version: request.version.clone(),
                variant: resolved.variant,
                os: request.build_host.os,
                arch: request.build_host.arch.clone(),
            })?;

        info!(url = %source.url, root = %request.install_root.display(), "acquiring toolchain");
        self.acquirer
            .acquire(source, &request.install_root)
            .map_err(|e| InstallError::Acquisition {
                url: source.url.clone(),
                source: e,
            })?;

        let outcome = normalize_install(
            &request.install_root,
            &request.version,
            request.build_host.os,
        )?;
        Ok(InstallReport {
            resolved,
            normalized: Some(outcome),
        })
    }
}
