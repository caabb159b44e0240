//! Compiler and linker flag synthesis.
//!
//! Produces the ordered compile and link flag lists for a resolved variant.
//! Output is a pure function of the inputs; identical requests yield
//! identical sequences.

use std::collections::BTreeMap;

use mgt_targets::{BuildType, CortexM, OsKind, PlatformDescriptor, Variant};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::options::OptionSet;
use crate::overrides::{build_overrides, BuildOverrides};

/// Link flag selecting newlib's `nosys` syscall stubs.
pub const NOSYS_SPECS: &str = "--specs=nosys.specs";

/// Ordered compile and link flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSet {
    /// Applied to both C and C++ compilation.
    pub compile_flags: Vec<String>,
    /// Applied when linking executables.
    pub link_flags: Vec<String>,
}

impl FlagSet {
    fn compile(&mut self, flag: impl Into<String>) {
        self.compile_flags.push(flag.into());
    }

    fn link(&mut self, flag: impl Into<String>) {
        self.link_flags.push(flag.into());
    }
}

/// Result of flag synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synthesis {
    pub flags: FlagSet,
    pub overrides: BuildOverrides,
}

impl Synthesis {
    /// CMake variables to set in the generated toolchain file.
    pub fn build_variable_overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides.variables
    }
}

/// Synthesize flags and build-system overrides.
///
/// `options.lto_compression_level` is expected to have passed validation.
pub fn synthesize(
    variant: Variant,
    target: &PlatformDescriptor,
    build_type: Option<BuildType>,
    options: &OptionSet,
) -> Synthesis {
    let mut flags = FlagSet::default();

    match variant {
        Variant::Native => {}
        Variant::ArmNoneEabi => {
            if let Some(opt) = build_type.and_then(cross_optimization_flag) {
                flags.compile(opt);
            }
        }
    }

    push_shared_flags(&mut flags, target.os, options);

    match variant {
        Variant::Native => {}
        Variant::ArmNoneEabi => push_cross_flags(&mut flags, target, options),
    }

    info!(variant = %variant, compile = ?flags.compile_flags, link = ?flags.link_flags, "synthesized flags");

    Synthesis {
        flags,
        overrides: build_overrides(variant, target.os),
    }
}

/// Optimization level the cross toolchain uses per build type.
///
/// `-Og` keeps Debug builds debuggable while remaining LTO-compatible.
pub fn cross_optimization_flag(build_type: BuildType) -> Option<&'static str> {
    match build_type {
        BuildType::Debug => Some("-Og"),
        BuildType::MinSizeRel => Some("-Os"),
        BuildType::Release | BuildType::RelWithDebInfo => Some("-O3"),
    }
}

/// Link-time section garbage collection flag for a target OS.
///
/// The Windows linker collects sections on its own.
pub fn gc_sections_flag(target_os: OsKind) -> Option<&'static str> {
    match target_os {
        OsKind::Macos => Some("-Wl,-dead_strip"),
        OsKind::Linux | OsKind::Baremetal => Some("-Wl,--gc-sections"),
        OsKind::Windows => None,
    }
}

fn push_shared_flags(flags: &mut FlagSet, target_os: OsKind, options: &OptionSet) {
    if options.lto {
        flags.compile("-flto");
        flags.link("-flto");
        flags.compile(format!(
            "-flto-compression-level={}",
            options.lto_compression_level
        ));
        if options.fat_lto {
            flags.compile("-ffat-lto-objects");
        }
    }

    if options.function_sections {
        flags.compile("-ffunction-sections");
    }
    if options.data_sections {
        flags.compile("-fdata-sections");
    }

    if options.gc_sections {
        if let Some(gc) = gc_sections_flag(target_os) {
            flags.link(gc);
        }
    }
}

fn push_cross_flags(flags: &mut FlagSet, target: &PlatformDescriptor, options: &OptionSet) {
    if options.default_libc {
        flags.link(NOSYS_SPECS);
    }

    // Cores missing from the table build with user-supplied -mcpu flags.
    if options.default_arch {
        if let Some(core) = CortexM::from_arch(&target.arch) {
            for flag in core.flags() {
                flags.compile(*flag);
                flags.link(*flag);
            }
        }
    }
}
