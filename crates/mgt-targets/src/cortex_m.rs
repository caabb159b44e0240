//! ARM Cortex-M architecture table.
//!
//! Maps each supported Cortex-M core spelling to the fixed GCC
//! `-mcpu`/`-mfloat-abi`/`-mfpu` tuple that selects it. The `f` and `d`
//! suffixes denote single- and double-precision hardware FPUs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// A Cortex-M core known to the `arm-none-eabi` toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CortexM {
    #[serde(rename = "cortex-m0")]
    M0,
    #[serde(rename = "cortex-m0plus")]
    M0Plus,
    #[serde(rename = "cortex-m1")]
    M1,
    #[serde(rename = "cortex-m3")]
    M3,
    #[serde(rename = "cortex-m4")]
    M4,
    #[serde(rename = "cortex-m4f")]
    M4F,
    #[serde(rename = "cortex-m7")]
    M7,
    #[serde(rename = "cortex-m7f")]
    M7F,
    #[serde(rename = "cortex-m7d")]
    M7D,
    #[serde(rename = "cortex-m23")]
    M23,
    #[serde(rename = "cortex-m33")]
    M33,
    #[serde(rename = "cortex-m33f")]
    M33F,
    #[serde(rename = "cortex-m35p")]
    M35P,
    #[serde(rename = "cortex-m35pf")]
    M35PF,
    #[serde(rename = "cortex-m55")]
    M55,
    #[serde(rename = "cortex-m85")]
    M85,
}

impl CortexM {
    /// Every core in table order.
    pub const ALL: [CortexM; 16] = [
        CortexM::M0,
        CortexM::M0Plus,
        CortexM::M1,
        CortexM::M3,
        CortexM::M4,
        CortexM::M4F,
        CortexM::M7,
        CortexM::M7F,
        CortexM::M7D,
        CortexM::M23,
        CortexM::M33,
        CortexM::M33F,
        CortexM::M35P,
        CortexM::M35PF,
        CortexM::M55,
        CortexM::M85,
    ];

    /// Settings spelling of the architecture, e.g. `cortex-m4f`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CortexM::M0 => "cortex-m0",
            CortexM::M0Plus => "cortex-m0plus",
            CortexM::M1 => "cortex-m1",
            CortexM::M3 => "cortex-m3",
            CortexM::M4 => "cortex-m4",
            CortexM::M4F => "cortex-m4f",
            CortexM::M7 => "cortex-m7",
            CortexM::M7F => "cortex-m7f",
            CortexM::M7D => "cortex-m7d",
            CortexM::M23 => "cortex-m23",
            CortexM::M33 => "cortex-m33",
            CortexM::M33F => "cortex-m33f",
            CortexM::M35P => "cortex-m35p",
            CortexM::M35PF => "cortex-m35pf",
            CortexM::M55 => "cortex-m55",
            CortexM::M85 => "cortex-m85",
        }
    }

    /// Look up an architecture string; `None` when it is not a Cortex-M core.
    pub fn from_arch(arch: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|core| core.as_str() == arch)
    }

    /// GCC flags selecting this core and its float ABI.
    ///
    /// The same tuple is passed to the compiler and the linker so that
    /// multilib selection at link time matches the objects.
    pub fn flags(&self) -> &'static [&'static str] {
        match self {
            CortexM::M0 => &["-mcpu=cortex-m0", "-mfloat-abi=soft"],
            CortexM::M0Plus => &["-mcpu=cortex-m0plus", "-mfloat-abi=soft"],
            CortexM::M1 => &["-mcpu=cortex-m1", "-mfloat-abi=soft"],
            CortexM::M3 => &["-mcpu=cortex-m3", "-mfloat-abi=soft"],
            CortexM::M4 => &["-mcpu=cortex-m4", "-mfloat-abi=soft"],
            CortexM::M4F => &["-mcpu=cortex-m4", "-mfloat-abi=hard"],
            CortexM::M7 => &["-mcpu=cortex-m7", "-mfloat-abi=soft"],
            CortexM::M7F => &["-mcpu=cortex-m7", "-mfloat-abi=hard", "-mfpu=fpv5-sp-d16"],
            CortexM::M7D => &["-mcpu=cortex-m7", "-mfloat-abi=hard", "-mfpu=fpv5-d16"],
            CortexM::M23 => &["-mcpu=cortex-m23", "-mfloat-abi=soft"],
            CortexM::M33 => &["-mcpu=cortex-m33", "-mfloat-abi=soft"],
            CortexM::M33F => &["-mcpu=cortex-m33", "-mfloat-abi=hard"],
            CortexM::M35P => &["-mcpu=cortex-m35p", "-mfloat-abi=soft"],
            CortexM::M35PF => &["-mcpu=cortex-m35p", "-mfloat-abi=hard"],
            CortexM::M55 => &["-mcpu=cortex-m55", "-mfloat-abi=soft"],
            CortexM::M85 => &["-mcpu=cortex-m85", "-mfloat-abi=soft"],
        }
    }
}

impl fmt::Display for CortexM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CortexM {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_arch(s).ok_or_else(|| TargetError::UnknownCortexM { name: s.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_sixteen_cores() {
        assert_eq!(CortexM::ALL.len(), 16);
        for core in CortexM::ALL {
            assert_eq!(CortexM::from_arch(core.as_str()), Some(core));
            assert!(core.flags()[0].starts_with("-mcpu=cortex-m"));
        }
    }

    #[test]
    fn m4f_is_hard_float_m4() {
        assert_eq!(
            CortexM::M4F.flags(),
            &["-mcpu=cortex-m4", "-mfloat-abi=hard"]
        );
        assert_eq!(CortexM::M4.flags(), &["-mcpu=cortex-m4", "-mfloat-abi=soft"]);
    }

    #[test]
    fn m7_double_precision_fpu() {
        assert!(CortexM::M7D.flags().contains(&"-mfpu=fpv5-d16"));
        assert!(CortexM::M7F.flags().contains(&"-mfpu=fpv5-sp-d16"));
    }

    #[test]
    fn rejects_non_cortex_m() {
        assert!(CortexM::from_arch("x86_64").is_none());
        assert!(CortexM::from_arch("cortex-a53").is_none());
        assert!("m4".parse::<CortexM>().is_err());
    }

    #[test]
    fn serde_spelling() {
        #[derive(Deserialize)]
        struct Wrap {
            arch: CortexM,
        }
        let w: Wrap = toml::from_str("arch = \"cortex-m35pf\"").unwrap();
        assert_eq!(w.arch, CortexM::M35PF);
    }
}
