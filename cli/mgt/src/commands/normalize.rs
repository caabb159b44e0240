//! `mgt normalize`: reshape an extracted toolchain in place.

use std::path::Path;

use anyhow::{Context, Result};
use mgt_install::{normalize_install, NormalizeOutcome};
use mgt_targets::{OsKind, PlatformDescriptor};

/// Normalize `root` for `version`, as if extracted on `host_os` (default: this machine).
pub fn run(root: &Path, version: &str, host_os: Option<OsKind>) -> Result<()> {
    let host_os = match host_os {
        Some(os) => os,
        None => PlatformDescriptor::detect_host()?.os,
    };
    let outcome = normalize_install(root, version, host_os)
        .with_context(|| format!("normalizing {}", root.display()))?;
    print!("{}", render(&outcome));
    Ok(())
}

fn render(outcome: &NormalizeOutcome) -> String {
    let mut out = String::new();
    match &outcome.flattened {
        Some(folder) => out.push_str(&format!("Flattened {}\n", folder.display())),
        None => out.push_str("Layout unchanged\n"),
    }
    out.push_str(&format!("bin: {}\n", outcome.bin_dir.display()));
    for (alias, target) in &outcome.aliases_created {
        out.push_str(&format!("  {alias} -> {target}\n"));
    }
    for failure in &outcome.alias_failures {
        out.push_str(&format!("  {} not created: {}\n", failure.name, failure.error));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_layout_is_reported_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        let outcome = normalize_install(dir.path(), "14.2.1", OsKind::Linux).unwrap();
        let out = render(&outcome);
        assert!(out.starts_with("Layout unchanged\n"));
        assert!(run(dir.path(), "14.2.1", Some(OsKind::Linux)).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn macos_flattening_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("14.2.1/bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("gcc-14"), b"").unwrap();

        let outcome = normalize_install(dir.path(), "14.2.1", OsKind::Macos).unwrap();
        let out = render(&outcome);
        assert!(out.starts_with("Flattened "));
        assert!(out.contains("  gcc -> gcc-14\n"));
    }
}
