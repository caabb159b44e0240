//! Pre-flight validation of a requested configuration.
//!
//! Every check runs independently so that all violations are reported at
//! once. Validation never touches the filesystem or the network.

use mgt_catalog::Catalog;
use mgt_targets::platform::{supported_build_arches, supported_build_oses};
use mgt_targets::{PlatformDescriptor, Variant};

use crate::error::ConfigError;
use crate::options::OptionSet;

/// Validate a request against the host tables and the catalog.
///
/// Returns `Ok(())` if valid, or `Err(errors)` with every violation found.
pub fn validate(
    catalog: &Catalog,
    build_host: &PlatformDescriptor,
    version: &str,
    variant: Variant,
    options: &OptionSet,
) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host_ok = check_build_host(build_host, &mut errors);
    check_options(options, &mut errors);
    let pair_ok = check_version_variant(catalog, version, variant, &mut errors);

    // A local toolchain is never downloaded, so no archive is needed for this host.
    if host_ok && pair_ok && options.local_path.is_none() {
        check_host_binary(catalog, build_host, version, variant, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks 1 and 2: the build host OS and architecture have pre-compiled binaries.
pub fn check_build_host(build_host: &PlatformDescriptor, errors: &mut Vec<ConfigError>) -> bool {
    if !build_host.os.is_hosted() {
        errors.push(ConfigError::UnsupportedBuildHost {
            os: build_host.os,
            supported: supported_build_oses(),
        });
        return false;
    }

    let arches = supported_build_arches(build_host.os);
    if !arches.contains(&build_host.arch.as_str()) {
        errors.push(ConfigError::UnsupportedBuildArch {
            os: build_host.os,
            arch: build_host.arch.clone(),
            supported: arches.iter().map(|a| a.to_string()).collect(),
        });
        return false;
    }
    true
}

/// Check 3: numeric option ranges, regardless of whether LTO is enabled.
pub fn check_options(options: &OptionSet, errors: &mut Vec<ConfigError>) -> bool {
    match options.check_lto_compression_level() {
        Ok(_) => true,
        Err(e) => {
            errors.push(e);
            false
        }
    }
}

/// Check 4: the catalog publishes `variant` for `version`.
pub fn check_version_variant(
    catalog: &Catalog,
    version: &str,
    variant: Variant,
    errors: &mut Vec<ConfigError>,
) -> bool {
    let Some(available) = catalog.variants(version) else {
        errors.push(ConfigError::UnknownVersion {
            version: version.into(),
            known: catalog.versions().into_iter().map(str::to_string).collect(),
        });
        return false;
    };
    if !available.contains(&variant) {
        errors.push(ConfigError::UnsupportedVersionVariant {
            version: version.into(),
            variant,
            available,
        });
        return false;
    }
    true
}

/// Check 5: an archive exists for this exact build host.
pub fn check_host_binary(
    catalog: &Catalog,
    build_host: &PlatformDescriptor,
    version: &str,
    variant: Variant,
    errors: &mut Vec<ConfigError>,
) -> bool {
    if catalog
        .lookup(version, variant, build_host.os, &build_host.arch)
        .is_some()
    {
        return true;
    }
    let available = catalog
        .hosts(version, variant)
        .map(|hosts| {
            hosts
                .iter()
                .flat_map(|(os, arches)| {
                    arches
                        .keys()
                        .map(move |arch| PlatformDescriptor::new(*os, arch.clone()))
                })
                .collect()
        })
        .unwrap_or_default();
    errors.push(ConfigError::MissingHostBinary {
        version: version.into(),
        variant,
        host: build_host.clone(),
        available,
    });
    false
}
