//! `mgt arch` and `mgt options`: static tables.

use anyhow::Result;
use mgt_core::OptionSet;
use mgt_targets::{CortexM, PlatformDescriptor};

/// List every Cortex-M architecture with the flags it injects.
pub fn arch() -> Result<()> {
    print!("{}", render_arch_table());
    Ok(())
}

/// List every option with its default and description.
pub fn options(target: Option<&PlatformDescriptor>, compiler_version: Option<&str>) -> Result<()> {
    print!("{}", render_options(target, compiler_version));
    Ok(())
}

fn render_arch_table() -> String {
    let mut out = String::from("Cortex-M architectures (target os: baremetal):\n\n");
    for core in CortexM::ALL {
        out.push_str(&format!("  {:<14} {}\n", core.as_str(), core.flags().join(" ")));
    }
    out
}

fn render_options(target: Option<&PlatformDescriptor>, compiler_version: Option<&str>) -> String {
    let mut out = match (target, compiler_version) {
        (Some(t), Some(v)) => format!("Options (defaults for {t}, compiler version {v}):\n\n"),
        (Some(t), None) => format!("Options (defaults for {t}):\n\n"),
        (None, _) => String::from("Options (defaults without a target):\n\n"),
    };
    for info in OptionSet::describe(target, compiler_version) {
        let default = if info.default.is_empty() {
            "\"\"".to_string()
        } else {
            info.default
        };
        out.push_str(&format!("  {:<22} {:<6} {}\n", info.name, default, info.description));
    }
    out
}
