//! `mgt resolve`, `mgt validate`, `mgt env`, `mgt package-id`, and `mgt install`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use mgt_core::resolution::package_id;
use mgt_core::{render_shell, resolve, ResolveError, ResolvedConfiguration};
use mgt_install::{installed_bin_dir, DirectoryMirror, Installer};

use crate::request::Prepared;

/// Output format of `mgt resolve`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Toml,
}

/// Resolve and print the full configuration.
pub fn run(prepared: &Prepared, format: OutputFormat) -> Result<()> {
    let catalog = prepared.load_catalog()?;
    let resolved = resolve(&catalog, &prepared.request)?;
    print!("{}", render(&resolved, format)?);
    Ok(())
}

/// Print every violation; fail when there is at least one.
pub fn validate(prepared: &Prepared) -> Result<()> {
    let catalog = prepared.load_catalog()?;
    match resolve(&catalog, &prepared.request) {
        Ok(resolved) => {
            println!(
                "ok: {} '{}' for {}",
                resolved.version,
                resolved.variant,
                target_label(prepared)
            );
            Ok(())
        }
        Err(ResolveError::Invalid(errors)) => {
            for error in &errors {
                println!("  - {error}");
            }
            bail!("{} problem(s) found", errors.len())
        }
    }
}

/// Print shell exports for the resolved toolchain.
pub fn env(prepared: &Prepared) -> Result<()> {
    let catalog = prepared.load_catalog()?;
    let resolved = resolve(&catalog, &prepared.request)?;
    print!("{}", render_shell(&resolved.environment_bindings));
    Ok(())
}

/// Print the package identity key and its digest. Needs no catalog.
pub fn print_package_id(prepared: &Prepared) -> Result<()> {
    let id = package_id(&prepared.request)?;
    println!("{id}");
    println!("digest: {}", id.digest());
    Ok(())
}

/// Install from an offline mirror of archives and their extracted trees.
pub fn install(prepared: &Prepared, mirror: &Path) -> Result<()> {
    let catalog = prepared.load_catalog()?;
    let installer = Installer::new(&catalog, DirectoryMirror::new(mirror.to_path_buf()));
    let report = installer
        .install(&prepared.request)
        .with_context(|| format!("installing into {}", prepared.request.install_root.display()))?;

    println!(
        "Installed {} '{}' at {}",
        report.resolved.version,
        report.resolved.variant,
        prepared.request.install_root.display()
    );
    println!(
        "bin: {}",
        installed_bin_dir(&prepared.request.install_root).display()
    );
    if let Some(outcome) = &report.normalized {
        if let Some(folder) = &outcome.flattened {
            println!("flattened: {}", folder.display());
        }
        for (alias, target) in &outcome.aliases_created {
            println!("alias: {alias} -> {target}");
        }
        for failure in &outcome.alias_failures {
            println!("alias failed: {} ({})", failure.name, failure.error);
        }
    }
    Ok(())
}

/// Render a resolved configuration in `format`.
pub fn render(resolved: &ResolvedConfiguration, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(resolved)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Toml => Ok(toml::to_string_pretty(resolved)?),
        OutputFormat::Human => Ok(render_human(resolved)),
    }
}

fn render_human(r: &ResolvedConfiguration) -> String {
    let yes_no = |b: bool| if b { "yes" } else { "no" };

    let mut out = format!("=== Toolchain: GCC {} ({}) ===\n", r.version, r.variant);
    if let Some(bt) = r.build_type {
        out.push_str(&format!("Build type: {bt}\n"));
    }
    out.push_str(&format!("Binaries:   {}\n", r.binary_directory.display()));
    out.push_str(&format!("Can run:    {}\n", yes_no(r.can_run)));
    out.push_str(&format!("Package id: {}\n", r.package_id));
    if let Some(source) = &r.source {
        out.push_str(&format!("Archive:    {}\n", source.url));
        out.push_str(&format!("SHA-256:    {}\n", source.sha256));
    }

    out.push_str("\n--- Compile flags ---\n");
    for flag in &r.compile_flags {
        out.push_str(&format!("  {flag}\n"));
    }
    out.push_str("--- Link flags ---\n");
    for flag in &r.link_flags {
        out.push_str(&format!("  {flag}\n"));
    }

    out.push_str("\n--- Compilers ---\n");
    out.push_str(&format!("  C:   {}\n", r.compiler_executables.c));
    out.push_str(&format!("  C++: {}\n", r.compiler_executables.cpp));
    out.push_str(&format!("  ASM: {}\n", r.compiler_executables.asm));
    out.push_str("--- Build variables ---\n");
    for (name, value) in &r.build_variable_overrides {
        out.push_str(&format!("  {name:<32} {value:?}\n"));
    }
    out.push_str("--- Environment ---\n");
    for (name, value) in &r.environment_bindings {
        out.push_str(&format!("  {name}={value}\n"));
    }
    out
}

fn target_label(prepared: &Prepared) -> String {
    match &prepared.request.target {
        Some(target) => format!("target {target}"),
        None => format!("host {}", prepared.request.build_host),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use mgt_catalog::{Catalog, ContentHash, Source};
    use mgt_core::{OptionSet, ResolveRequest};
    use mgt_targets::{BuildType, OsKind, PlatformDescriptor, Variant};

    use super::*;

    fn resolved() -> ResolvedConfiguration {
        let mut catalog = Catalog::new();
        catalog.insert(
            "14.2.1",
            Variant::ArmNoneEabi,
            OsKind::Linux,
            "x86_64",
            Source {
                url: "https://example.invalid/arm.tar.xz".into(),
                sha256: ContentHash::compute(b"arm"),
            },
        );
        let request = ResolveRequest {
            version: "14.2.1".into(),
            build_host: PlatformDescriptor::new(OsKind::Linux, "x86_64"),
            target: Some("baremetal/cortex-m7f".parse().unwrap()),
            build_type: Some(BuildType::Release),
            options: OptionSet::default(),
            install_root: PathBuf::from("/tc"),
        };
        resolve(&catalog, &request).unwrap()
    }

    #[test]
    fn human_output_lists_flags_and_env() {
        let out = render(&resolved(), OutputFormat::Human).unwrap();
        assert!(out.contains("=== Toolchain: GCC 14.2.1 (arm-none-eabi) ==="));
        assert!(out.contains("  -O3\n"));
        assert!(out.contains("  --specs=nosys.specs\n"));
        assert!(out.contains("CC=arm-none-eabi-gcc"));
        assert!(out.contains("Can run:    no"));
    }

    #[test]
    fn toml_output_parses_back() {
        let r = resolved();
        let out = render(&r, OutputFormat::Toml).unwrap();
        let back: ResolvedConfiguration = toml::from_str(&out).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn json_output_has_variant() {
        let out = render(&resolved(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["variant"], "arm-none-eabi");
        assert_eq!(value["build_type"], "Release");
    }
}
