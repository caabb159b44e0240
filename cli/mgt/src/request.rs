//! Turning command-line arguments and `mgt.toml` into a resolution request.
//!
//! Precedence, highest first: explicit flags, profile files, `mgt.toml`,
//! then the running machine.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use mgt_catalog::Catalog;
use mgt_core::{OptionSet, ResolveRequest};
use mgt_targets::parse::{discover_profiles, load_profile};
use mgt_targets::{BuildType, PlatformDescriptor, PlatformProfile};
use tracing::debug;

use crate::config::{relative_to, MgtConfig, CONFIG_FILE};

/// Arguments shared by every command that resolves a toolchain.
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Catalog TOML (default: `catalog` in mgt.toml)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Toolchain version, e.g. 14.2.1 (default: `version` in mgt.toml)
    #[arg(long, value_name = "VERSION")]
    pub toolchain_version: Option<String>,
    /// Build host as <os>/<arch> (default: this machine)
    #[arg(long)]
    pub host: Option<PlatformDescriptor>,
    /// Target platform as <os>/<arch>, e.g. baremetal/cortex-m4f
    #[arg(long)]
    pub target: Option<PlatformDescriptor>,
    /// Build type of the consuming project (Debug, Release, MinSizeRel, RelWithDebInfo)
    #[arg(long)]
    pub build_type: Option<BuildType>,
    /// Compiler version the consuming project declares; drives the `lto` default
    #[arg(long)]
    pub compiler_version: Option<String>,
    /// Build host profile: a .profile.toml path or a name under profiles/
    #[arg(long)]
    pub host_profile: Option<String>,
    /// Target profile: a .profile.toml path or a name under profiles/
    #[arg(long)]
    pub target_profile: Option<String>,
    /// Override an option, e.g. -o lto=True (repeatable)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,
    /// Installation root (default: `install_root` in mgt.toml, else .mgt/toolchains/<version>)
    #[arg(long)]
    pub install_root: Option<PathBuf>,
}

/// A request together with where its catalog lives.
#[derive(Debug)]
pub struct Prepared {
    pub request: ResolveRequest,
    pub catalog_path: Option<PathBuf>,
}

impl Prepared {
    pub fn load_catalog(&self) -> Result<Catalog> {
        open_catalog(self.catalog_path.as_deref())
    }
}

/// Load the catalog named by `arg`, else by `mgt.toml` above `cwd`.
pub fn load_catalog(arg: Option<&Path>, cwd: &Path) -> Result<Catalog> {
    let catalog_path = match arg {
        Some(path) => Some(relative_to(cwd, path)),
        None => MgtConfig::find_and_load(cwd)?
            .and_then(|(config, dir)| config.catalog.map(|path| relative_to(&dir, &path))),
    };
    open_catalog(catalog_path.as_deref())
}

fn open_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        bail!("no catalog configured; pass --catalog or set `catalog` in {CONFIG_FILE}");
    };
    Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))
}

/// Build a request from `args`, consulting `mgt.toml` above `cwd`.
pub fn prepare(args: &RequestArgs, cwd: &Path) -> Result<Prepared> {
    let (config, base) = match MgtConfig::find_and_load(cwd)? {
        Some((config, dir)) => {
            debug!(dir = %dir.display(), "using {CONFIG_FILE}");
            (config, dir)
        }
        None => (MgtConfig::default(), cwd.to_path_buf()),
    };
    prepare_with(args, &config, &base, cwd)
}

/// Build a request from `args` and an already-loaded configuration rooted at `base`.
pub fn prepare_with(
    args: &RequestArgs,
    config: &MgtConfig,
    base: &Path,
    cwd: &Path,
) -> Result<Prepared> {
    let version = args
        .toolchain_version
        .clone()
        .or_else(|| config.version.clone())
        .with_context(|| {
            format!("no toolchain version; pass --toolchain-version or set `version` in {CONFIG_FILE}")
        })?;

    let host_profile = match &args.host_profile {
        Some(spec) => Some(find_profile(spec, base, cwd)?),
        None => config.host.clone(),
    };
    let build_host = match (&args.host, &host_profile) {
        (Some(host), _) => host.clone(),
        (None, Some(profile)) => profile.descriptor(),
        (None, None) => PlatformDescriptor::detect_host().context("detecting the build host")?,
    };

    let target_profile = match &args.target_profile {
        Some(spec) => Some(find_profile(spec, base, cwd)?),
        None => config.target.clone(),
    };
    let target = args
        .target
        .clone()
        .or_else(|| target_profile.as_ref().map(PlatformProfile::descriptor));
    let build_type = args
        .build_type
        .or_else(|| target_profile.as_ref().and_then(|p| p.build_type));
    let compiler_version = args.compiler_version.clone().or_else(|| {
        target_profile
            .as_ref()
            .or(host_profile.as_ref())
            .and_then(|p| p.compiler_version.clone())
    });

    let mut options = OptionSet::defaults_for(target.as_ref(), compiler_version.as_deref());
    config.apply_options(&mut options)?;
    options
        .apply_assignments(args.options.iter().map(String::as_str))
        .context("in -o")?;

    let install_root = match (&args.install_root, &config.install_root) {
        (Some(root), _) => relative_to(cwd, root),
        (None, Some(root)) => relative_to(base, root),
        (None, None) => base.join(".mgt").join("toolchains").join(&version),
    };

    let catalog_path = match (&args.catalog, &config.catalog) {
        (Some(path), _) => Some(relative_to(cwd, path)),
        (None, Some(path)) => Some(relative_to(base, path)),
        (None, None) => None,
    };

    Ok(Prepared {
        request: ResolveRequest {
            version,
            build_host,
            target,
            build_type,
            options,
            install_root,
        },
        catalog_path,
    })
}

/// A profile given as a path, or as a name under `<base>/profiles/`.
fn find_profile(spec: &str, base: &Path, cwd: &Path) -> Result<PlatformProfile> {
    let as_path = relative_to(cwd, Path::new(spec));
    if as_path.is_file() {
        return load_profile(&as_path).with_context(|| format!("loading {}", as_path.display()));
    }
    let discovered = discover_profiles(base)?;
    match discovered.iter().find(|(name, _)| name == spec) {
        Some((_, path)) => {
            load_profile(path).with_context(|| format!("loading {}", path.display()))
        }
        None => {
            let names: Vec<_> = discovered.iter().map(|(n, _)| n.as_str()).collect();
            bail!(
                "profile '{spec}' is neither a file nor one of [{}] in {}",
                names.join(", "),
                base.join("profiles").display()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use mgt_targets::{OsKind, Variant};

    use super::*;

    fn linux_host() -> Option<PlatformDescriptor> {
        Some(PlatformDescriptor::new(OsKind::Linux, "x86_64"))
    }

    #[test]
    fn flags_only_request() {
        let args = RequestArgs {
            toolchain_version: Some("14.2.1".into()),
            host: linux_host(),
            target: Some("baremetal/cortex-m4f".parse().unwrap()),
            build_type: Some(BuildType::Debug),
            compiler_version: Some("13.2".into()),
            options: vec!["gc_sections=False".into()],
            ..RequestArgs::default()
        };
        let cwd = Path::new("/work");
        let prepared = prepare_with(&args, &MgtConfig::default(), cwd, cwd).unwrap();
        let req = prepared.request;
        assert_eq!(req.version, "14.2.1");
        assert_eq!(req.build_type, Some(BuildType::Debug));
        assert!(req.options.lto);
        assert!(!req.options.gc_sections);
        assert_eq!(req.install_root, PathBuf::from("/work/.mgt/toolchains/14.2.1"));
        assert!(prepared.catalog_path.is_none());
        assert_eq!(
            mgt_core::resolve_variant(req.target.as_ref()).unwrap(),
            Variant::ArmNoneEabi
        );
    }

    #[test]
    fn missing_version_is_an_error() {
        let cwd = Path::new("/work");
        let err = prepare_with(&RequestArgs::default(), &MgtConfig::default(), cwd, cwd)
            .unwrap_err();
        assert!(err.to_string().contains("--toolchain-version"));
    }

    #[test]
    fn flags_override_config() {
        let config = MgtConfig::parse(
            r#"
catalog = "catalog.toml"
version = "13.2.0"
install_root = "tc"

[host]
os = "Macos"
arch = "armv8"

[target]
os = "baremetal"
arch = "cortex-m0"
build_type = "Release"

[options]
lto = true
"#,
        )
        .unwrap();
        let base = Path::new("/proj");
        let cwd = Path::new("/proj/sub");

        let from_config = prepare_with(&RequestArgs::default(), &config, base, cwd).unwrap();
        assert_eq!(from_config.request.version, "13.2.0");
        assert_eq!(from_config.request.build_host.os, OsKind::Macos);
        assert_eq!(from_config.request.build_type, Some(BuildType::Release));
        assert!(from_config.request.options.lto);
        assert_eq!(from_config.request.install_root, PathBuf::from("/proj/tc"));
        assert_eq!(
            from_config.catalog_path,
            Some(PathBuf::from("/proj/catalog.toml"))
        );

        let args = RequestArgs {
            toolchain_version: Some("14.2.1".into()),
            host: linux_host(),
            options: vec!["lto=False".into()],
            install_root: Some(PathBuf::from("out")),
            ..RequestArgs::default()
        };
        let overridden = prepare_with(&args, &config, base, cwd).unwrap();
        assert_eq!(overridden.request.version, "14.2.1");
        assert_eq!(overridden.request.build_host.os, OsKind::Linux);
        assert!(!overridden.request.options.lto);
        assert_eq!(overridden.request.install_root, PathBuf::from("/proj/sub/out"));
    }

    #[test]
    fn named_profile_from_profiles_dir() {
        let dir = tempfile::tempdir().unwrap();
        let profiles = dir.path().join("profiles");
        std::fs::create_dir_all(&profiles).unwrap();
        std::fs::write(
            profiles.join("stm32f4.profile.toml"),
            "os = \"baremetal\"\narch = \"cortex-m4f\"\nbuild_type = \"MinSizeRel\"\ncompiler_version = \"14\"\n",
        )
        .unwrap();

        let args = RequestArgs {
            toolchain_version: Some("14.2.1".into()),
            host: linux_host(),
            target_profile: Some("stm32f4".into()),
            ..RequestArgs::default()
        };
        let prepared = prepare_with(&args, &MgtConfig::default(), dir.path(), dir.path()).unwrap();
        let req = prepared.request;
        assert_eq!(req.target.unwrap().arch, "cortex-m4f");
        assert_eq!(req.build_type, Some(BuildType::MinSizeRel));
        assert!(!req.options.lto);

        let missing = RequestArgs {
            target_profile: Some("nrf52".into()),
            ..args
        };
        let err = prepare_with(&missing, &MgtConfig::default(), dir.path(), dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("stm32f4"));
    }

    #[test]
    fn lto_default_follows_target() {
        let cwd = Path::new("/work");
        let cross = RequestArgs {
            toolchain_version: Some("14.2.1".into()),
            host: linux_host(),
            target: Some("baremetal/cortex-m4f".parse().unwrap()),
            ..RequestArgs::default()
        };
        let prepared = prepare_with(&cross, &MgtConfig::default(), cwd, cwd).unwrap();
        assert!(prepared.request.options.lto);

        let hosted = RequestArgs {
            target: None,
            compiler_version: Some("13.2".into()),
            ..cross
        };
        let prepared = prepare_with(&hosted, &MgtConfig::default(), cwd, cwd).unwrap();
        assert!(!prepared.request.options.lto);
    }

    #[test]
    fn bad_option_assignment_is_reported() {
        let args = RequestArgs {
            toolchain_version: Some("14.2.1".into()),
            host: linux_host(),
            options: vec!["lto_compression_level=fast".into()],
            ..RequestArgs::default()
        };
        let cwd = Path::new("/work");
        let err = prepare_with(&args, &MgtConfig::default(), cwd, cwd).unwrap_err();
        assert!(format!("{err:#}").contains("'fast'"));
    }
}
