//! Platform descriptors and variant tables for the multiarch GNU toolchain.
//!
//! - **Platform descriptors:** OS kind + architecture of a build host or target
//! - **Variants:** the closed set of toolchain flavors (native, `arm-none-eabi`)
//! - **Cortex-M table:** per-core `-mcpu`/`-mfloat-abi` flag tuples
//! - **Profiles:** `.profile.toml` files describing a platform

pub mod cortex_m;
pub mod error;
pub mod parse;
pub mod platform;
pub mod variant;

pub use cortex_m::CortexM;
pub use error::{Result, TargetError};
pub use parse::PlatformProfile;
pub use platform::{BuildType, OsKind, PlatformDescriptor};
pub use variant::Variant;
