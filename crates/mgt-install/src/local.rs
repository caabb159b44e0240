//! Installs that point at a toolchain already on disk.
//!
//! Nothing is downloaded. The install root holds a single marker file
//! naming the local toolchain, and the binary directory resolves through it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{InstallError, Result};

/// Marker file recording the local toolchain path.
pub const LOCAL_PATH_FILE: &str = "local_path.txt";

/// Record `local_path` as the toolchain for `install_root`.
pub fn record_local_path(install_root: &Path, local_path: &Path) -> Result<PathBuf> {
    let marker = install_root.join(LOCAL_PATH_FILE);
    let write = || -> io::Result<()> {
        fs::create_dir_all(install_root)?;
        fs::write(&marker, local_path.to_string_lossy().as_bytes())
    };
    write().map_err(|source| InstallError::LocalPath {
        path: marker.clone(),
        source,
    })?;
    info!(local_path = %local_path.display(), "using local toolchain");
    Ok(marker)
}

/// The local toolchain recorded under `install_root`, if any.
pub fn recorded_local_path(install_root: &Path) -> Option<PathBuf> {
    let text = fs::read_to_string(install_root.join(LOCAL_PATH_FILE)).ok()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

/// Binary directory of the toolchain installed at `install_root`.
///
/// Follows the local-path marker when present, else `<install_root>/bin`.
pub fn installed_bin_dir(install_root: &Path) -> PathBuf {
    match recorded_local_path(install_root) {
        Some(local) => {
            debug!(local_path = %local.display(), "binaries from local path");
            local.join("bin")
        }
        None => install_root.join("bin"),
    }
}
