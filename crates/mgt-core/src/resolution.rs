//! End-to-end resolution of a toolchain request.
//!
//! Combines variant resolution, validation, flag synthesis, and
//! environment export into one [`ResolvedConfiguration`]. Every check runs
//! before anything is produced, so a failed request yields only errors.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use mgt_catalog::{Catalog, ContentHash, Source};
use mgt_targets::{BuildType, PlatformDescriptor, Variant};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::env::export_bindings;
use crate::error::ResolveError;
use crate::flags::synthesize;
use crate::options::OptionSet;
use crate::overrides::CompilerExecutables;
use crate::resolver::resolve_variant;
use crate::validate::{check_build_host, check_options, validate};

/// Everything needed to resolve one toolchain configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub version: String,
    pub build_host: PlatformDescriptor,
    /// `None` when the consumer builds for the host itself.
    pub target: Option<PlatformDescriptor>,
    pub build_type: Option<BuildType>,
    pub options: OptionSet,
    /// Where an acquired toolchain is (or will be) installed.
    pub install_root: PathBuf,
}

/// Identity of a binary-compatible toolchain install.
///
/// Only the variant participates; options change flags, never the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId {
    pub variant: Variant,
}

impl PackageId {
    /// Stable digest of the key, suitable for naming cache directories.
    pub fn digest(&self) -> ContentHash {
        ContentHash::compute(self.to_string().as_bytes())
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "variant={}", self.variant)
    }
}

/// Fully resolved toolchain configuration.
///
/// Scalar fields precede tables so the value serializes to TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfiguration {
    pub version: String,
    pub variant: Variant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_type: Option<BuildType>,
    pub binary_directory: PathBuf,
    pub can_run: bool,
    pub compile_flags: Vec<String>,
    pub link_flags: Vec<String>,
    pub package_id: PackageId,
    /// Archive to acquire; absent when a local toolchain is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    pub compiler_executables: CompilerExecutables,
    pub build_variable_overrides: BTreeMap<String, String>,
    pub environment_bindings: BTreeMap<String, String>,
}

/// Resolve `request` against `catalog`.
///
/// Fails with every violation found when the request cannot be served.
pub fn resolve(
    catalog: &Catalog,
    request: &ResolveRequest,
) -> Result<ResolvedConfiguration, ResolveError> {
    let variant = match resolve_variant(request.target.as_ref()) {
        Ok(variant) => variant,
        Err(target_err) => {
            // Still report host and option problems alongside the target.
            let mut errors = vec![target_err];
            check_build_host(&request.build_host, &mut errors);
            check_options(&request.options, &mut errors);
            return Err(ResolveError::Invalid(errors));
        }
    };

    validate(
        catalog,
        &request.build_host,
        &request.version,
        variant,
        &request.options,
    )
    .map_err(ResolveError::Invalid)?;

    let target = request
        .target
        .clone()
        .unwrap_or_else(|| request.build_host.clone());
    let synthesis = synthesize(variant, &target, request.build_type, &request.options);

    let toolchain_root = toolchain_root(request);
    let source = match request.options.local_path {
        Some(_) => None,
        None => catalog
            .lookup(
                &request.version,
                variant,
                request.build_host.os,
                &request.build_host.arch,
            )
            .cloned(),
    };
    debug!(root = %toolchain_root.display(), has_source = source.is_some(), "toolchain location");

    let resolved = ResolvedConfiguration {
        version: request.version.clone(),
        variant,
        build_type: request.build_type,
        binary_directory: toolchain_root.join("bin"),
        can_run: synthesis.overrides.can_run,
        compile_flags: synthesis.flags.compile_flags,
        link_flags: synthesis.flags.link_flags,
        package_id: PackageId { variant },
        source,
        compiler_executables: synthesis.overrides.compiler_executables,
        build_variable_overrides: synthesis.overrides.variables,
        environment_bindings: export_bindings(variant, toolchain_root),
    };
    info!(version = %resolved.version, variant = %variant, "resolved toolchain configuration");
    Ok(resolved)
}

/// Package identity for `request`, without validating it.
pub fn package_id(request: &ResolveRequest) -> Result<PackageId, ResolveError> {
    let variant = resolve_variant(request.target.as_ref())?;
    Ok(PackageId { variant })
}

fn toolchain_root(request: &ResolveRequest) -> &Path {
    request
        .options
        .local_path
        .as_deref()
        .unwrap_or(&request.install_root)
}
