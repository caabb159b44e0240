//! Error types for platform descriptor operations.

use std::path::PathBuf;

/// Errors that can occur while parsing or loading platform descriptors.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading profile files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile file not found.
    #[error("profile file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// An operating system name that is not one of the known kinds.
    #[error("unknown operating system '{name}' (expected Linux, Macos, Windows, or baremetal)")]
    UnknownOs {
        /// The rejected name.
        name: String,
    },

    /// A build type name that is not one of the known kinds.
    #[error("unknown build type '{name}' (expected Debug, Release, MinSizeRel, or RelWithDebInfo)")]
    UnknownBuildType {
        /// The rejected name.
        name: String,
    },

    /// A variant name that is not one of the known variants.
    #[error("unknown toolchain variant '{name}' (expected native or arm-none-eabi)")]
    UnknownVariant {
        /// The rejected name.
        name: String,
    },

    /// An architecture string that is not a known Cortex-M core.
    #[error("'{name}' is not a known Cortex-M architecture")]
    UnknownCortexM {
        /// The rejected name.
        name: String,
    },

    /// A platform written as `os/arch` was malformed.
    #[error("invalid platform '{input}': expected <os>/<arch>")]
    MalformedPlatform {
        /// The rejected input.
        input: String,
    },
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
