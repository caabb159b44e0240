//! Platform descriptors.
//!
//! A [`PlatformDescriptor`] names an operating system kind and an
//! architecture string. Two of them exist per resolution: the *build*
//! platform where the compiler runs and the *target* platform the compiler
//! produces code for. Architecture strings follow package-manager settings
//! spelling (`x86_64`, `armv8`, `cortex-m4f`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// Operating system kind of a build host or target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OsKind {
    #[serde(alias = "linux")]
    Linux,
    #[serde(alias = "macos", alias = "MacOS")]
    Macos,
    #[serde(alias = "windows")]
    Windows,
    /// No operating system; code runs directly on hardware.
    #[serde(rename = "baremetal", alias = "Baremetal", alias = "bare-metal")]
    Baremetal,
}

impl OsKind {
    /// All operating system kinds.
    pub const ALL: [OsKind; 4] = [
        OsKind::Linux,
        OsKind::Macos,
        OsKind::Windows,
        OsKind::Baremetal,
    ];

    /// Settings spelling of the OS.
    pub fn as_str(&self) -> &'static str {
        match self {
            OsKind::Linux => "Linux",
            OsKind::Macos => "Macos",
            OsKind::Windows => "Windows",
            OsKind::Baremetal => "baremetal",
        }
    }

    /// Whether this OS hosts a native GCC (Linux, Macos, Windows).
    pub fn is_hosted(&self) -> bool {
        !matches!(self, OsKind::Baremetal)
    }

    /// CMake `CMAKE_SYSTEM_NAME` for a hosted OS.
    pub fn cmake_system_name(&self) -> Option<&'static str> {
        match self {
            OsKind::Linux => Some("Linux"),
            OsKind::Macos => Some("Darwin"),
            OsKind::Windows => Some("Windows"),
            OsKind::Baremetal => None,
        }
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsKind {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(OsKind::Linux),
            "macos" | "darwin" => Ok(OsKind::Macos),
            "windows" => Ok(OsKind::Windows),
            "baremetal" | "bare-metal" => Ok(OsKind::Baremetal),
            _ => Err(TargetError::UnknownOs { name: s.into() }),
        }
    }
}

/// CMake-style build type of the consuming project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    Release,
    MinSizeRel,
    RelWithDebInfo,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::MinSizeRel => "MinSizeRel",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            _ => Err(TargetError::UnknownBuildType { name: s.into() }),
        }
    }
}

/// Operating system and architecture of a build host or target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformDescriptor {
    /// Operating system kind.
    pub os: OsKind,
    /// Architecture string (e.g., "x86_64", "armv8", "cortex-m4f").
    pub arch: String,
}

impl PlatformDescriptor {
    pub fn new(os: OsKind, arch: impl Into<String>) -> Self {
        Self {
            os,
            arch: arch.into(),
        }
    }

    /// Describe the machine this process is running on.
    ///
    /// Rust's `aarch64` is reported as `armv8` to match settings spelling.
    /// Unrecognized architectures are passed through unchanged so the
    /// validator can reject them with context.
    pub fn detect_host() -> Result<Self> {
        let os = match std::env::consts::OS {
            "linux" => OsKind::Linux,
            "macos" => OsKind::Macos,
            "windows" => OsKind::Windows,
            other => {
                return Err(TargetError::UnknownOs { name: other.into() });
            }
        };
        let arch = match std::env::consts::ARCH {
            "aarch64" => "armv8",
            other => other,
        };
        Ok(Self::new(os, arch))
    }
}

impl fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

impl FromStr for PlatformDescriptor {
    type Err = TargetError;

    /// Parse `<os>/<arch>`, e.g. `baremetal/cortex-m4f` or `Linux/x86_64`.
    fn from_str(s: &str) -> Result<Self> {
        let (os, arch) = s
            .split_once('/')
            .filter(|(os, arch)| !os.is_empty() && !arch.is_empty())
            .ok_or_else(|| TargetError::MalformedPlatform { input: s.into() })?;
        Ok(Self::new(os.parse()?, arch))
    }
}

/// Build-host architectures that pre-compiled toolchains exist for, per OS.
///
/// Empty for [`OsKind::Baremetal`], which can never be a build host.
pub fn supported_build_arches(os: OsKind) -> &'static [&'static str] {
    match os {
        OsKind::Linux | OsKind::Macos | OsKind::Windows => &["armv8", "x86_64"],
        OsKind::Baremetal => &[],
    }
}

/// Operating systems that can act as a build host.
pub fn supported_build_oses() -> Vec<OsKind> {
    OsKind::ALL.into_iter().filter(OsKind::is_hosted).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_os_names() {
        assert_eq!("Linux".parse::<OsKind>().unwrap(), OsKind::Linux);
        assert_eq!("macos".parse::<OsKind>().unwrap(), OsKind::Macos);
        assert_eq!("Darwin".parse::<OsKind>().unwrap(), OsKind::Macos);
        assert_eq!("baremetal".parse::<OsKind>().unwrap(), OsKind::Baremetal);
        assert!("FreeBSD".parse::<OsKind>().is_err());
    }

    #[test]
    fn parse_build_types() {
        assert_eq!("Debug".parse::<BuildType>().unwrap(), BuildType::Debug);
        assert_eq!(
            "minsizerel".parse::<BuildType>().unwrap(),
            BuildType::MinSizeRel
        );
        assert!("Fast".parse::<BuildType>().is_err());
    }

    #[test]
    fn parse_platform_pair() {
        let p: PlatformDescriptor = "baremetal/cortex-m4f".parse().unwrap();
        assert_eq!(p.os, OsKind::Baremetal);
        assert_eq!(p.arch, "cortex-m4f");
        assert_eq!(p.to_string(), "baremetal/cortex-m4f");
    }

    #[test]
    fn parse_platform_rejects_missing_arch() {
        assert!("Linux".parse::<PlatformDescriptor>().is_err());
        assert!("Linux/".parse::<PlatformDescriptor>().is_err());
    }

    #[test]
    fn cmake_names() {
        assert_eq!(OsKind::Macos.cmake_system_name(), Some("Darwin"));
        assert_eq!(OsKind::Linux.cmake_system_name(), Some("Linux"));
        assert_eq!(OsKind::Baremetal.cmake_system_name(), None);
    }

    #[test]
    fn build_arch_tables() {
        assert!(supported_build_arches(OsKind::Macos).contains(&"armv8"));
        assert!(supported_build_arches(OsKind::Baremetal).is_empty());
        assert_eq!(supported_build_oses().len(), 3);
    }

    #[test]
    fn detect_host_is_hosted() {
        if let Ok(host) = PlatformDescriptor::detect_host() {
            assert!(host.os.is_hosted());
            assert_ne!(host.arch, "aarch64");
        }
    }
}
