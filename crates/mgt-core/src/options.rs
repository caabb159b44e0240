//! Toolchain options.
//!
//! A flat set of independent toggles that shape the synthesized flags.
//! None of them affect which toolchain archive is fetched.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use mgt_targets::PlatformDescriptor;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Accepted range for `lto_compression_level` (zstd levels).
pub const LTO_COMPRESSION_LEVELS: RangeInclusive<i64> = 0..=19;

/// Option names in declaration order.
pub const OPTION_NAMES: [&str; 9] = [
    "local_path",
    "default_arch",
    "lto",
    "fat_lto",
    "function_sections",
    "data_sections",
    "gc_sections",
    "default_libc",
    "lto_compression_level",
];

/// Independent toggles and values controlling flag synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionSet {
    /// Use a toolchain already installed here instead of downloading one.
    pub local_path: Option<PathBuf>,
    /// Inject `-mcpu`/`-mfloat-abi` for Cortex-M targets.
    pub default_arch: bool,
    pub lto: bool,
    /// Embed both LTO bytecode and machine code in objects. Ignored without `lto`.
    pub fat_lto: bool,
    pub function_sections: bool,
    pub data_sections: bool,
    /// Garbage-collect unused sections at link time.
    pub gc_sections: bool,
    /// Link the `nosys` stubs on bare-metal targets.
    pub default_libc: bool,
    /// Only meaningful with `lto`, but always range-checked.
    pub lto_compression_level: i64,
}

impl Default for OptionSet {
    fn default() -> Self {
        Self {
            local_path: None,
            default_arch: true,
            lto: false,
            fat_lto: true,
            function_sections: true,
            data_sections: true,
            gc_sections: true,
            default_libc: true,
            lto_compression_level: 0,
        }
    }
}

/// Name, default, and help text of one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionInfo {
    pub name: &'static str,
    pub default: String,
    pub description: &'static str,
}

impl OptionSet {
    /// Defaults for a consumer building for `target` with `compiler_version`.
    ///
    /// LTO is off for GCC 14: its zstd-compressed LTO bytecode is not
    /// portable between the Linux, macOS and Windows builds of the compiler.
    /// Without a target the default is left off.
    pub fn defaults_for(
        target: Option<&PlatformDescriptor>,
        compiler_version: Option<&str>,
    ) -> Self {
        Self {
            lto: lto_default(target, compiler_version),
            ..Self::default()
        }
    }

    /// Set one option from its string spelling, e.g. `("lto", "True")`.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match name {
            "local_path" => {
                self.local_path = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "default_arch" => self.default_arch = parse_bool(name, value)?,
            "lto" => self.lto = parse_bool(name, value)?,
            "fat_lto" => self.fat_lto = parse_bool(name, value)?,
            "function_sections" => self.function_sections = parse_bool(name, value)?,
            "data_sections" => self.data_sections = parse_bool(name, value)?,
            "gc_sections" => self.gc_sections = parse_bool(name, value)?,
            "default_libc" => self.default_libc = parse_bool(name, value)?,
            "lto_compression_level" => {
                self.lto_compression_level =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidOptionValue {
                            option: name.into(),
                            value: value.into(),
                            expected: compression_expectation(),
                        })?;
            }
            _ => {
                return Err(ConfigError::UnknownOption {
                    name: name.into(),
                    known: OPTION_NAMES.iter().map(|n| n.to_string()).collect(),
                })
            }
        }
        Ok(())
    }

    /// Apply `name=value` assignments in order.
    pub fn apply_assignments<'a>(
        &mut self,
        assignments: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ConfigError> {
        for assignment in assignments {
            let (name, value) =
                assignment
                    .split_once('=')
                    .ok_or_else(|| ConfigError::InvalidOptionValue {
                        option: assignment.into(),
                        value: String::new(),
                        expected: "an assignment of the form name=value".into(),
                    })?;
            self.set(name.trim(), value.trim())?;
        }
        Ok(())
    }

    /// Range check of `lto_compression_level`, independent of `lto`.
    pub fn check_lto_compression_level(&self) -> Result<u8, ConfigError> {
        if LTO_COMPRESSION_LEVELS.contains(&self.lto_compression_level) {
            Ok(self.lto_compression_level as u8)
        } else {
            Err(ConfigError::InvalidOptionValue {
                option: "lto_compression_level".into(),
                value: self.lto_compression_level.to_string(),
                expected: compression_expectation(),
            })
        }
    }

    /// Every option with its default (as in [`OptionSet::defaults_for`]) and help text.
    pub fn describe(
        target: Option<&PlatformDescriptor>,
        compiler_version: Option<&str>,
    ) -> Vec<OptionInfo> {
        let d = Self::defaults_for(target, compiler_version);
        let info = |name, default: String, description| OptionInfo {
            name,
            default,
            description,
        };
        vec![
            info(
                "local_path",
                String::new(),
                "Path to a locally installed GCC toolchain. If not set, the official toolchain is downloaded.",
            ),
            info(
                "default_arch",
                d.default_arch.to_string(),
                "Inject -mcpu and -mfloat-abi for ARM Cortex-M targets.",
            ),
            info(
                "lto",
                d.lto.to_string(),
                "Enable LTO in binaries and intermediate files (.o and .a). Defaults off for GCC 14.",
            ),
            info(
                "fat_lto",
                d.fat_lto.to_string(),
                "Emit both LTO bytecode and machine code so linkers without LTO support still work. Ignored without lto.",
            ),
            info(
                "function_sections",
                d.function_sections.to_string(),
                "Place each function in its own section (-ffunction-sections).",
            ),
            info(
                "data_sections",
                d.data_sections.to_string(),
                "Place each static data object in its own section (-fdata-sections).",
            ),
            info(
                "gc_sections",
                d.gc_sections.to_string(),
                "Garbage-collect unused sections at link time. Useful with function_sections and data_sections.",
            ),
            info(
                "default_libc",
                d.default_libc.to_string(),
                "ARM targets: link against nosys.specs, the weak newlib syscall stubs.",
            ),
            info(
                "lto_compression_level",
                d.lto_compression_level.to_string(),
                "LTO bytecode compression level (0-19). Only meaningful with lto.",
            ),
        ]
    }
}

/// LTO default for a target and the compiler version declared for it.
///
/// An undeclared version counts as not GCC 14.
pub fn lto_default(target: Option<&PlatformDescriptor>, compiler_version: Option<&str>) -> bool {
    match target {
        Some(_) => !compiler_version.unwrap_or("").trim().starts_with("14"),
        None => false,
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "True" | "true" | "1" => Ok(true),
        "False" | "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidOptionValue {
            option: name.into(),
            value: value.into(),
            expected: "True or False".into(),
        }),
    }
}

fn compression_expectation() -> String {
    format!(
        "an integer in {}..={}",
        LTO_COMPRESSION_LEVELS.start(),
        LTO_COMPRESSION_LEVELS.end()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = OptionSet::default();
        assert!(o.local_path.is_none());
        assert!(o.default_arch);
        assert!(!o.lto);
        assert!(o.fat_lto && o.function_sections && o.data_sections);
        assert!(o.gc_sections && o.default_libc);
        assert_eq!(o.lto_compression_level, 0);
    }

    fn cortex_m4f() -> PlatformDescriptor {
        "baremetal/cortex-m4f".parse().unwrap()
    }

    #[test]
    fn lto_default_depends_on_compiler_version() {
        let target = cortex_m4f();
        assert!(!OptionSet::defaults_for(Some(&target), Some("14")).lto);
        assert!(!OptionSet::defaults_for(Some(&target), Some("14.2.1")).lto);
        assert!(OptionSet::defaults_for(Some(&target), Some("13.3")).lto);
        assert!(OptionSet::defaults_for(Some(&target), Some("15.1.0")).lto);
    }

    #[test]
    fn lto_default_without_compiler_version() {
        let target = cortex_m4f();
        assert!(OptionSet::defaults_for(Some(&target), None).lto);
        assert!(OptionSet::defaults_for(Some(&target), Some("")).lto);
    }

    #[test]
    fn lto_default_is_off_without_target() {
        assert!(!OptionSet::defaults_for(None, None).lto);
        assert!(!OptionSet::defaults_for(None, Some("13.3")).lto);
    }

    #[test]
    fn set_by_string() {
        let mut o = OptionSet::default();
        o.set("lto", "True").unwrap();
        o.set("gc_sections", "false").unwrap();
        o.set("lto_compression_level", "7").unwrap();
        o.set("local_path", "/opt/gcc").unwrap();
        assert!(o.lto);
        assert!(!o.gc_sections);
        assert_eq!(o.lto_compression_level, 7);
        assert_eq!(o.local_path, Some(PathBuf::from("/opt/gcc")));

        o.set("local_path", "").unwrap();
        assert!(o.local_path.is_none());
    }

    #[test]
    fn non_integer_compression_level() {
        let mut o = OptionSet::default();
        let err = o.set("lto_compression_level", "fast").unwrap_err();
        match err {
            ConfigError::InvalidOptionValue {
                value, expected, ..
            } => {
                assert_eq!(value, "fast");
                assert!(expected.contains("0..=19"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_bool_and_unknown_name() {
        let mut o = OptionSet::default();
        assert!(matches!(
            o.set("lto", "yes"),
            Err(ConfigError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            o.set("shared", "True"),
            Err(ConfigError::UnknownOption { .. })
        ));
    }

    #[test]
    fn compression_range_is_checked_without_lto() {
        let mut o = OptionSet::default();
        assert!(!o.lto);
        for level in LTO_COMPRESSION_LEVELS {
            o.lto_compression_level = level;
            assert_eq!(o.check_lto_compression_level().unwrap() as i64, level);
        }
        for level in [-1, 20] {
            o.lto_compression_level = level;
            assert!(o.check_lto_compression_level().is_err());
        }
    }

    #[test]
    fn assignments() {
        let mut o = OptionSet::default();
        o.apply_assignments(["lto=True", "fat_lto = False"]).unwrap();
        assert!(o.lto);
        assert!(!o.fat_lto);
        assert!(o.apply_assignments(["lto"]).is_err());
    }

    #[test]
    fn describe_covers_every_option() {
        let described = OptionSet::describe(Some(&cortex_m4f()), Some("13.2"));
        let names: Vec<_> = described.iter().map(|i| i.name).collect();
        assert_eq!(names, OPTION_NAMES);
        let lto = described.iter().find(|i| i.name == "lto").unwrap();
        assert_eq!(lto.default, "true");
    }

    #[test]
    fn deserialize_partial() {
        let o: OptionSet = serde_json::from_str(r#"{"lto": true, "lto_compression_level": 3}"#).unwrap();
        assert!(o.lto);
        assert_eq!(o.lto_compression_level, 3);
        assert!(o.gc_sections);
    }
}
