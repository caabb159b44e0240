//! Toolchain variants.
//!
//! A variant is a distinct toolchain flavor with its own executable naming
//! scheme and default flag behavior. Variants are a closed set; every
//! component that behaves differently per variant matches on [`Variant`]
//! exhaustively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// Toolchain flavor selected for a target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// GCC producing code for the build host's own OS.
    #[serde(rename = "native")]
    Native,
    /// Bare-metal ARM Cortex-M cross compiler (`arm-none-eabi`).
    #[serde(rename = "arm-none-eabi", alias = "arm-embedded-cross")]
    ArmNoneEabi,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Native, Variant::ArmNoneEabi];

    /// Identifier used in catalogs and package ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Native => "native",
            Variant::ArmNoneEabi => "arm-none-eabi",
        }
    }

    /// Prefix prepended to every executable of this variant.
    pub fn tool_prefix(&self) -> &'static str {
        match self {
            Variant::Native => "",
            Variant::ArmNoneEabi => "arm-none-eabi-",
        }
    }

    /// Prefixed executable name for a bare tool name (`gcc` → `arm-none-eabi-gcc`).
    pub fn tool(&self, name: &str) -> String {
        format!("{}{name}", self.tool_prefix())
    }

    /// Whether binaries produced by this variant can run on the build host.
    pub fn can_run_on_host(&self) -> bool {
        match self {
            Variant::Native => true,
            Variant::ArmNoneEabi => false,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "native" => Ok(Variant::Native),
            "arm-none-eabi" | "arm-embedded-cross" => Ok(Variant::ArmNoneEabi),
            _ => Err(TargetError::UnknownVariant { name: s.into() }),
        }
    }
}
