//! TOML parsing and discovery for platform profiles.
//!
//! A profile is a small `.profile.toml` file describing one platform
//! (build host or target) the way a package manager profile would:
//!
//! ```toml
//! os = "baremetal"
//! arch = "cortex-m4f"
//! build_type = "MinSizeRel"
//! compiler_version = "13.2"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};
use crate::platform::{BuildType, OsKind, PlatformDescriptor};

/// Platform settings as written in a profile file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub os: OsKind,
    pub arch: String,
    /// Build type of the consuming project (target profiles only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_type: Option<BuildType>,
    /// Version of the compiler the consuming project declares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_version: Option<String>,
}

impl PlatformProfile {
    /// The OS/arch pair of this profile.
    pub fn descriptor(&self) -> PlatformDescriptor {
        PlatformDescriptor::new(self.os, self.arch.clone())
    }
}

impl From<PlatformDescriptor> for PlatformProfile {
    fn from(p: PlatformDescriptor) -> Self {
        Self {
            os: p.os,
            arch: p.arch,
            build_type: None,
            compiler_version: None,
        }
    }
}

/// Load a profile from a `.profile.toml` file.
pub fn load_profile(path: &Path) -> Result<PlatformProfile> {
    if !path.exists() {
        return Err(TargetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_profile(&content)
}

/// Parse a profile from a TOML string.
pub fn parse_profile(toml_str: &str) -> Result<PlatformProfile> {
    let profile: PlatformProfile = toml::from_str(toml_str)?;
    Ok(profile)
}

/// Discover all `.profile.toml` files in a project's `profiles/` directory.
///
/// Returns a list of (profile_name, file_path) pairs sorted by name.
pub fn discover_profiles(project_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let profiles_dir = project_dir.join("profiles");
    if !profiles_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut profiles = Vec::new();
    for entry in std::fs::read_dir(&profiles_dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(".profile.toml"))
            .map(str::to_string);
        if let Some(name) = name {
            profiles.push((name, path));
        }
    }
    profiles.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_profile() {
        let profile = parse_profile(
            r#"
os = "baremetal"
arch = "cortex-m4f"
build_type = "MinSizeRel"
compiler_version = "14.2"
"#,
        )
        .unwrap();
        assert_eq!(profile.os, OsKind::Baremetal);
        assert_eq!(profile.arch, "cortex-m4f");
        assert_eq!(profile.build_type, Some(BuildType::MinSizeRel));
        assert_eq!(profile.compiler_version.as_deref(), Some("14.2"));
    }

    #[test]
    fn parse_minimal_host_profile() {
        let profile = parse_profile("os = \"Macos\"\narch = \"armv8\"\n").unwrap();
        assert_eq!(profile.descriptor(), PlatformDescriptor::new(OsKind::Macos, "armv8"));
        assert!(profile.build_type.is_none());
    }

    #[test]
    fn parse_unknown_os_is_error() {
        assert!(parse_profile("os = \"Plan9\"\narch = \"x86_64\"\n").is_err());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_profile(&dir.path().join("nope.profile.toml")).unwrap_err();
        assert!(matches!(err, TargetError::NotFound { .. }));
    }

    #[test]
    fn discover_profiles_finds_files() {
        let dir = tempfile::tempdir().unwrap();
        let profiles_dir = dir.path().join("profiles");
        std::fs::create_dir_all(&profiles_dir).unwrap();

        let body = "os = \"baremetal\"\narch = \"cortex-m0\"\n";
        std::fs::write(profiles_dir.join("stm32g0.profile.toml"), body).unwrap();
        std::fs::write(profiles_dir.join("lpc4078.profile.toml"), body).unwrap();
        std::fs::write(profiles_dir.join("notes.txt"), "ignore me").unwrap();

        let found = discover_profiles(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "lpc4078");
        assert_eq!(found[1].0, "stm32g0");
        assert!(load_profile(&found[0].1).is_ok());
    }

    #[test]
    fn discover_without_profiles_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_profiles(dir.path()).unwrap().is_empty());
    }
}
