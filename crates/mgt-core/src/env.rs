//! Environment bindings for consuming builds.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use mgt_targets::Variant;

/// Variable naming the toolchain installation root.
pub const INSTALL_DIR_VAR: &str = "GCC_INSTALL_DIR";

/// Logical tool roles exported to the build environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToolRole {
    CCompiler,
    CxxCompiler,
    Assembler,
    Archiver,
    Linker,
    SymbolLister,
    ObjectCopy,
    ObjectDump,
    Ranlib,
    Size,
    Strip,
    Debugger,
}

impl ToolRole {
    pub const ALL: [ToolRole; 12] = [
        ToolRole::CCompiler,
        ToolRole::CxxCompiler,
        ToolRole::Assembler,
        ToolRole::Archiver,
        ToolRole::Linker,
        ToolRole::SymbolLister,
        ToolRole::ObjectCopy,
        ToolRole::ObjectDump,
        ToolRole::Ranlib,
        ToolRole::Size,
        ToolRole::Strip,
        ToolRole::Debugger,
    ];

    /// Conventional environment variable for this role.
    pub fn env_var(&self) -> &'static str {
        match self {
            ToolRole::CCompiler => "CC",
            ToolRole::CxxCompiler => "CXX",
            ToolRole::Assembler => "AS",
            ToolRole::Archiver => "AR",
            ToolRole::Linker => "LD",
            ToolRole::SymbolLister => "NM",
            ToolRole::ObjectCopy => "OBJCOPY",
            ToolRole::ObjectDump => "OBJDUMP",
            ToolRole::Ranlib => "RANLIB",
            ToolRole::Size => "SIZE",
            ToolRole::Strip => "STRIP",
            ToolRole::Debugger => "GDB",
        }
    }

    /// Unprefixed executable name. The assembler role is the C driver.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolRole::CCompiler | ToolRole::Assembler => "gcc",
            ToolRole::CxxCompiler => "g++",
            ToolRole::Archiver => "ar",
            ToolRole::Linker => "ld",
            ToolRole::SymbolLister => "nm",
            ToolRole::ObjectCopy => "objcopy",
            ToolRole::ObjectDump => "objdump",
            ToolRole::Ranlib => "ranlib",
            ToolRole::Size => "size",
            ToolRole::Strip => "strip",
            ToolRole::Debugger => "gdb",
        }
    }

    /// Executable for this role under `variant`.
    pub fn executable(&self, variant: Variant) -> String {
        variant.tool(self.tool_name())
    }
}

impl fmt::Display for ToolRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

/// Environment variables a build needs to drive `variant` installed at `install_root`.
pub fn export_bindings(variant: Variant, install_root: &Path) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert(
        INSTALL_DIR_VAR.to_string(),
        install_root.display().to_string(),
    );
    for role in ToolRole::ALL {
        env.insert(role.env_var().to_string(), role.executable(variant));
    }
    env
}

/// Render bindings as POSIX shell `export` lines.
pub fn render_shell(bindings: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (name, value) in bindings {
        out.push_str("export ");
        out.push_str(name);
        out.push('=');
        out.push_str(&shell_quote(value));
        out.push('\n');
    }
    out
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_bindings_are_unprefixed() {
        let env = export_bindings(Variant::Native, Path::new("/opt/gcc"));
        assert_eq!(env.len(), 13);
        assert_eq!(env[INSTALL_DIR_VAR], "/opt/gcc");
        assert_eq!(env["CC"], "gcc");
        assert_eq!(env["CXX"], "g++");
        assert_eq!(env["AS"], "gcc");
        assert_eq!(env["GDB"], "gdb");
    }

    #[test]
    fn cross_bindings_are_prefixed() {
        let env = export_bindings(Variant::ArmNoneEabi, Path::new("/opt/arm"));
        assert_eq!(env["CC"], "arm-none-eabi-gcc");
        assert_eq!(env["AS"], "arm-none-eabi-gcc");
        assert_eq!(env["LD"], "arm-none-eabi-ld");
        assert_eq!(env["SIZE"], "arm-none-eabi-size");
        for role in ToolRole::ALL {
            assert!(env[role.env_var()].starts_with("arm-none-eabi-"), "{role}");
        }
    }

    #[test]
    fn shell_rendering_quotes_values() {
        let mut env = BTreeMap::new();
        env.insert("CC".to_string(), "gcc".to_string());
        env.insert(INSTALL_DIR_VAR.to_string(), "/home/o'neil/gcc".to_string());
        assert_eq!(
            render_shell(&env),
            "export CC='gcc'\nexport GCC_INSTALL_DIR='/home/o'\\''neil/gcc'\n"
        );
    }
}
