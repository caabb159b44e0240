//! Variant resolution.
//!
//! The variant is a pure function of the target platform. Unrecognized
//! targets are rejected rather than mapped to the native compiler, since a
//! native GCC cannot produce code for them.

use mgt_targets::{CortexM, OsKind, PlatformDescriptor, Variant};
use tracing::debug;

use crate::error::ConfigError;

/// Select the toolchain variant for `target`, or `native` when there is none.
pub fn resolve_variant(target: Option<&PlatformDescriptor>) -> Result<Variant, ConfigError> {
    let Some(target) = target else {
        debug!("no target platform; using native GCC");
        return Ok(Variant::Native);
    };

    let variant = match target.os {
        OsKind::Baremetal if CortexM::from_arch(&target.arch).is_some() => Variant::ArmNoneEabi,
        OsKind::Linux | OsKind::Macos | OsKind::Windows => Variant::Native,
        OsKind::Baremetal => {
            return Err(ConfigError::UnsupportedTarget {
                target: target.clone(),
            })
        }
    };
    debug!(target = %target, variant = %variant, "resolved toolchain variant");
    Ok(variant)
}
