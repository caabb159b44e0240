//! `mgt.toml` project configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use mgt_core::OptionSet;
use mgt_targets::PlatformProfile;
use serde::{Deserialize, Serialize};

/// Name of the configuration file searched for from the working directory upward.
pub const CONFIG_FILE: &str = "mgt.toml";

/// The top-level configuration of a project consuming the toolchain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MgtConfig {
    /// Catalog TOML, relative to the configuration file.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Default toolchain version.
    #[serde(default)]
    pub version: Option<String>,
    /// Where toolchains are installed, relative to the configuration file.
    #[serde(default)]
    pub install_root: Option<PathBuf>,
    /// Build host; the running machine when absent.
    #[serde(default)]
    pub host: Option<PlatformProfile>,
    /// Target platform; the build host when absent.
    #[serde(default)]
    pub target: Option<PlatformProfile>,
    /// Option overrides using each option's own spelling.
    #[serde(default)]
    pub options: toml::Table,
}

impl MgtConfig {
    /// Search upward from `start_dir` for `mgt.toml`, parse it and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config = Self::parse(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Apply the `[options]` table onto `options`, in key order.
    pub fn apply_options(&self, options: &mut OptionSet) -> Result<()> {
        for (name, value) in &self.options {
            let spelled = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Integer(i) => i.to_string(),
                other => bail!(
                    "option '{name}' must be a string, boolean, or integer, found {}",
                    other.type_str()
                ),
            };
            options
                .set(name, &spelled)
                .with_context(|| format!("[options] in {CONFIG_FILE}"))?;
        }
        Ok(())
    }
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn relative_to(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
