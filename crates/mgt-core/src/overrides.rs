//! Build-system overrides.
//!
//! CMake cache variables and capability switches a consuming build needs
//! so that its generated toolchain file drives the selected variant.

use std::collections::BTreeMap;

use mgt_targets::{OsKind, Variant};
use serde::{Deserialize, Serialize};

/// Per-build-type flag variables that must be blanked for the cross variant.
const BLANKED_FLAG_VARIABLES: [&str; 8] = [
    "CMAKE_CXX_FLAGS_DEBUG",
    "CMAKE_CXX_FLAGS_RELEASE",
    "CMAKE_CXX_FLAGS_MINSIZEREL",
    "CMAKE_CXX_FLAGS_RELWITHDEBINFO",
    "CMAKE_C_FLAGS_DEBUG",
    "CMAKE_C_FLAGS_RELEASE",
    "CMAKE_C_FLAGS_MINSIZEREL",
    "CMAKE_C_FLAGS_RELWITHDEBINFO",
];

/// Compiler drivers for each language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerExecutables {
    pub c: String,
    pub cpp: String,
    pub asm: String,
}

impl CompilerExecutables {
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            c: variant.tool("gcc"),
            cpp: variant.tool("g++"),
            // GCC drives the assembler so preprocessed `.S` files work.
            asm: variant.tool("gcc"),
        }
    }
}

/// Everything a build system must be told beyond compile and link flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOverrides {
    /// Whether binaries produced by the toolchain can run on the build host.
    pub can_run: bool,
    pub compiler_executables: CompilerExecutables,
    /// CMake cache variables, e.g. `CMAKE_SYSTEM_NAME`.
    pub variables: BTreeMap<String, String>,
}

/// Overrides for `variant` building for a `target_os` target.
pub fn build_overrides(variant: Variant, target_os: OsKind) -> BuildOverrides {
    let variables = match variant {
        Variant::Native => native_variables(target_os),
        Variant::ArmNoneEabi => cross_variables(variant),
    };
    BuildOverrides {
        can_run: variant.can_run_on_host(),
        compiler_executables: CompilerExecutables::for_variant(variant),
        variables,
    }
}

fn native_variables(target_os: OsKind) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    if let Some(system_name) = target_os.cmake_system_name() {
        vars.insert("CMAKE_SYSTEM_NAME".into(), system_name.into());
    }
    let compilers = CompilerExecutables::for_variant(Variant::Native);
    vars.insert("CMAKE_C_COMPILER".into(), compilers.c);
    vars.insert("CMAKE_CXX_COMPILER".into(), compilers.cpp);
    vars.insert("CMAKE_ASM_COMPILER".into(), compilers.asm);
    insert_binutils(&mut vars, Variant::Native);
    vars
}

fn cross_variables(variant: Variant) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    vars.insert("CMAKE_SYSTEM_NAME".into(), "Generic".into());
    vars.insert("CMAKE_SYSTEM_PROCESSOR".into(), "ARM".into());

    // CMake's per-build-type defaults (-O3 -DNDEBUG, ...) conflict with the
    // optimization flag chosen for the target, so only ours apply.
    for name in BLANKED_FLAG_VARIABLES {
        vars.insert(name.into(), String::new());
    }

    // The compiler check links an executable, which needs a board's startup
    // code and linker script.
    vars.insert("CMAKE_C_COMPILER_WORKS".into(), "TRUE".into());
    vars.insert("CMAKE_CXX_COMPILER_WORKS".into(), "TRUE".into());
    vars.insert(
        "CMAKE_TRY_COMPILE_TARGET_TYPE".into(),
        "STATIC_LIBRARY".into(),
    );

    insert_binutils(&mut vars, variant);
    vars.insert("CMAKE_SIZE_UTIL".into(), variant.tool("size"));
    vars
}

fn insert_binutils(vars: &mut BTreeMap<String, String>, variant: Variant) {
    for (var, tool) in [
        ("CMAKE_AR", "ar"),
        ("CMAKE_RANLIB", "ranlib"),
        ("CMAKE_STRIP", "strip"),
        ("CMAKE_OBJCOPY", "objcopy"),
        ("CMAKE_OBJDUMP", "objdump"),
        ("CMAKE_NM", "nm"),
    ] {
        vars.insert(var.into(), variant.tool(tool));
    }
}
