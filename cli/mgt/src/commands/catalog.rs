//! `mgt catalog`: listing catalog contents.

use anyhow::{bail, Result};
use mgt_catalog::Catalog;

/// List every version with its variants.
pub fn list(catalog: &Catalog) -> Result<()> {
    print!("{}", render_list(catalog));
    Ok(())
}

/// Show every archive published for `version`.
pub fn show(catalog: &Catalog, version: &str) -> Result<()> {
    match render_version(catalog, version) {
        Some(out) => {
            print!("{out}");
            Ok(())
        }
        None => bail!(
            "version {version} is not in the catalog. Use 'mgt catalog list' to see available versions."
        ),
    }
}

fn render_list(catalog: &Catalog) -> String {
    if catalog.is_empty() {
        return "Catalog is empty.\n".to_string();
    }
    let mut out = String::from("Toolchain versions:\n\n");
    for version in catalog.versions() {
        let variants = catalog
            .variants(version)
            .unwrap_or_default()
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("  {version:<12} {variants}\n"));
    }
    out.push_str("\nUse 'mgt catalog show <version>' for details.\n");
    out
}

fn render_version(catalog: &Catalog, version: &str) -> Option<String> {
    let variants = catalog.variants(version)?;
    let mut out = format!("=== GCC {version} ===\n");
    for variant in variants {
        out.push_str(&format!("\n--- {variant} ---\n"));
        let Some(hosts) = catalog.hosts(version, variant) else {
            continue;
        };
        if hosts.is_empty() {
            out.push_str("  (no pre-compiled hosts)\n");
        }
        for (os, arches) in hosts {
            for (arch, source) in arches {
                out.push_str(&format!("  {:<18} {}\n", format!("{os}/{arch}"), source.url));
                out.push_str(&format!("  {:<18} sha256 {}\n", "", source.sha256));
            }
        }
    }
    Some(out)
}
