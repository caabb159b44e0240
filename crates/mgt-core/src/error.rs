//! Configuration error types.
//!
//! Every variant carries enough context for the caller to correct the
//! request: the rejected value plus what would have been accepted.

use std::fmt::Display;

use mgt_targets::{OsKind, PlatformDescriptor, Variant};

/// A single reason a requested configuration cannot be served.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The build host OS has no pre-compiled toolchains.
    #[error("the build os '{os}' is not supported; pre-compiled binaries are only available for [{}]", join(.supported))]
    UnsupportedBuildHost { os: OsKind, supported: Vec<OsKind> },

    /// The build host architecture has no pre-compiled toolchains for its OS.
    #[error("the build architecture '{arch}' is not supported for {os}; pre-compiled binaries are only available for [{}]", join(.supported))]
    UnsupportedBuildArch {
        os: OsKind,
        arch: String,
        supported: Vec<String>,
    },

    /// An option value is malformed or out of range.
    #[error("option '{option}' has invalid value '{value}': expected {expected}")]
    InvalidOptionValue {
        option: String,
        value: String,
        expected: String,
    },

    /// An option name that does not exist.
    #[error("unknown option '{name}'; known options are [{}]", join(.known))]
    UnknownOption { name: String, known: Vec<String> },

    /// The catalog does not define the requested version.
    #[error("version {version} is not defined in the catalog; known versions are [{}]", join(.known))]
    UnknownVersion { version: String, known: Vec<String> },

    /// The catalog defines the version but not the variant the target needs.
    #[error("version {version} does not support the '{variant}' variant; available variants for {version}: [{}]", join(.available))]
    UnsupportedVersionVariant {
        version: String,
        variant: Variant,
        available: Vec<Variant>,
    },

    /// No archive exists for this build host under an otherwise valid (version, variant).
    #[error("version {version} '{variant}' has no pre-compiled binary for build host {host}; available hosts: [{}]", join(.available))]
    MissingHostBinary {
        version: String,
        variant: Variant,
        host: PlatformDescriptor,
        available: Vec<PlatformDescriptor>,
    },

    /// The target platform maps to no known variant.
    #[error("target {target} is not supported: expected a Linux, Macos, or Windows target, or baremetal with a Cortex-M architecture")]
    UnsupportedTarget { target: PlatformDescriptor },
}

/// Failure of a full resolution request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// One or more validation checks failed; all of them are listed.
    #[error("invalid configuration:\n{}", bullets(.0))]
    Invalid(Vec<ConfigError>),
}

impl ResolveError {
    /// The individual violations.
    pub fn errors(&self) -> &[ConfigError] {
        match self {
            ResolveError::Invalid(errors) => errors,
        }
    }
}

impl From<ConfigError> for ResolveError {
    fn from(err: ConfigError) -> Self {
        ResolveError::Invalid(vec![err])
    }
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn bullets(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_variant_message_lists_available() {
        let err = ConfigError::UnsupportedVersionVariant {
            version: "13.2.0".into(),
            variant: Variant::ArmNoneEabi,
            available: vec![Variant::Native],
        };
        let msg = err.to_string();
        assert!(msg.contains("'arm-none-eabi'"));
        assert!(msg.contains("[native]"));
    }

    #[test]
    fn invalid_lists_every_error() {
        let err = ResolveError::Invalid(vec![
            ConfigError::UnsupportedBuildHost {
                os: OsKind::Baremetal,
                supported: vec![OsKind::Linux],
            },
            ConfigError::InvalidOptionValue {
                option: "lto_compression_level".into(),
                value: "20".into(),
                expected: "an integer in 0..=19".into(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("'baremetal'"));
        assert!(msg.contains("'20'"));
        assert_eq!(err.errors().len(), 2);
    }
}
