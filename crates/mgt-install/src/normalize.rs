//! Installation layout normalization.
//!
//! macOS archives unpack into a version-named folder instead of the flat
//! `bin/`, `lib/`, ... layout of the other hosts, and ship their tools with
//! a `-<major>` suffix only. Normalization flattens the folder and adds
//! unsuffixed aliases.
//!
//! ```text
//! <root>/14.3.0/bin/gcc-14   =>   <root>/bin/gcc-14
//!                                 <root>/bin/gcc -> gcc-14
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mgt_catalog::version;
use mgt_targets::OsKind;
use tracing::{debug, info, warn};

use crate::error::NormalizeError;

/// An alias that could not be created.
#[derive(Debug)]
pub struct AliasFailure {
    /// Name the alias would have had, e.g. `gcc`.
    pub name: String,
    pub error: io::Error,
}

/// Result of a normalization that did not fail structurally.
#[derive(Debug)]
pub struct NormalizeOutcome {
    /// The canonical binary directory, `<root>/bin`.
    pub bin_dir: PathBuf,
    /// The versioned folder that was flattened, if any.
    pub flattened: Option<PathBuf>,
    /// Aliases created, as `(alias, target)` file names.
    pub aliases_created: Vec<(String, String)>,
    pub alias_failures: Vec<AliasFailure>,
}

impl NormalizeOutcome {
    fn unchanged(bin_dir: PathBuf) -> Self {
        Self {
            bin_dir,
            flattened: None,
            aliases_created: Vec::new(),
            alias_failures: Vec::new(),
        }
    }

    /// True when every alias was created (or none were needed).
    pub fn is_complete(&self) -> bool {
        self.alias_failures.is_empty()
    }
}

/// Bring an extracted toolchain at `root` into the canonical layout.
///
/// Only macOS installs without a top-level `bin/` are touched. Move and
/// remove failures abort with an error; alias failures are recorded in the
/// outcome and logged.
pub fn normalize_install(
    root: &Path,
    toolchain_version: &str,
    host_os: OsKind,
) -> Result<NormalizeOutcome, NormalizeError> {
    let bin_dir = root.join("bin");
    if host_os != OsKind::Macos || bin_dir.exists() {
        debug!(root = %root.display(), os = %host_os, "layout already canonical");
        return Ok(NormalizeOutcome::unchanged(bin_dir));
    }

    let mut outcome = NormalizeOutcome::unchanged(bin_dir);
    if let Some(versioned) = find_versioned_folder(root, toolchain_version)? {
        flatten(root, &versioned)?;
        outcome.flattened = Some(versioned);
    }

    if outcome.bin_dir.is_dir() {
        create_aliases(&mut outcome, version::major(toolchain_version))?;
    }
    Ok(outcome)
}

/// First directory under `root` whose name starts with `toolchain_version`.
fn find_versioned_folder(
    root: &Path,
    toolchain_version: &str,
) -> Result<Option<PathBuf>, NormalizeError> {
    let read_err = |source| NormalizeError::ReadDir {
        path: root.to_path_buf(),
        source,
    };
    let mut candidates = Vec::new();
    for entry in fs::read_dir(root).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(toolchain_version));
        if matches && path.is_dir() {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}

fn flatten(root: &Path, versioned: &Path) -> Result<(), NormalizeError> {
    info!(from = %versioned.display(), to = %root.display(), "moving versioned folder contents to root");
    let read_err = |source| NormalizeError::ReadDir {
        path: versioned.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(versioned).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let from = entry.path();
        let to = root.join(entry.file_name());
        fs::rename(&from, &to).map_err(|source| NormalizeError::Move {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        info!(from = %from.display(), to = %to.display(), "moved");
    }
    fs::remove_dir_all(versioned).map_err(|source| NormalizeError::Remove {
        path: versioned.to_path_buf(),
        source,
    })
}

fn create_aliases(outcome: &mut NormalizeOutcome, major: &str) -> Result<(), NormalizeError> {
    let suffix = format!("-{major}");
    let bin_dir = outcome.bin_dir.clone();
    let read_err = |source| NormalizeError::ReadDir {
        path: bin_dir.clone(),
        source,
    };

    let mut targets = Vec::new();
    for entry in fs::read_dir(&bin_dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if let Some(alias) = name.strip_suffix(&suffix) {
                if !alias.is_empty() {
                    targets.push((alias.to_string(), name.to_string()));
                }
            }
        }
    }
    targets.sort();

    for (alias, target) in targets {
        let link = bin_dir.join(&alias);
        if fs::symlink_metadata(&link).is_ok() {
            debug!(alias = %alias, "alias target name already exists");
            continue;
        }
        match symlink_file(Path::new(&target), &link) {
            Ok(()) => {
                info!(alias = %alias, target = %target, "created alias");
                outcome.aliases_created.push((alias, target));
            }
            Err(error) => {
                warn!(alias = %alias, target = %target, %error, "failed to create alias");
                outcome.alias_failures.push(AliasFailure { name: alias, error });
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink_file(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}
