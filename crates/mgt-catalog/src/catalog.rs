//! The variant catalog.
//!
//! Static, read-only registry mapping a toolchain version to the variants
//! published for it, and each variant to the per-host archive that provides
//! it. Loaded once from TOML:
//!
//! ```toml
//! [versions."14.2.1".arm-none-eabi.Linux.x86_64]
//! url = "https://example.invalid/arm-gnu-toolchain-14.2.rel1-x86_64-arm-none-eabi.tar.xz"
//! sha256 = "…64 hex digits…"
//! ```
//!
//! Every lookup miss is reported to the caller; nothing here falls back to a
//! default entry.

use std::collections::BTreeMap;
use std::path::Path;

use mgt_targets::{OsKind, Variant};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::integrity::ContentHash;
use crate::version;

/// Where to fetch one toolchain archive and how to check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Download locator.
    pub url: String,
    /// SHA-256 of the archive.
    pub sha256: ContentHash,
}

/// Archives for one variant, keyed by host OS then host architecture.
pub type HostTable = BTreeMap<OsKind, BTreeMap<String, Source>>;

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    versions: BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<String, RawSource>>>>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    url: String,
    sha256: String,
}

/// The full catalog of known-good (version, variant, host) combinations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    versions: BTreeMap<String, BTreeMap<Variant, HostTable>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CatalogError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::parse(&content)?;
        debug!(path = %path.display(), versions = catalog.versions.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Parse and validate a catalog from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self> {
        let raw: RawCatalog = toml::from_str(toml_str)?;
        let mut catalog = Catalog::new();

        for (ver, variants) in raw.versions {
            if variants.is_empty() {
                return Err(CatalogError::EmptyVersion { version: ver });
            }
            for (variant_key, hosts) in variants {
                let location = format!("{ver}/{variant_key}");
                let variant: Variant = variant_key
                    .parse()
                    .map_err(|source| CatalogError::Key {
                        location: location.clone(),
                        source,
                    })?;
                // A declared variant stays visible even before any host is filled in.
                catalog
                    .versions
                    .entry(ver.clone())
                    .or_default()
                    .entry(variant)
                    .or_default();

                for (os_key, arches) in hosts {
                    let location = format!("{location}/{os_key}");
                    let os: OsKind = os_key.parse().map_err(|source| CatalogError::Key {
                        location: location.clone(),
                        source,
                    })?;
                    if !os.is_hosted() {
                        return Err(CatalogError::UnsupportedHostOs {
                            location,
                            os: os_key,
                        });
                    }
                    for (arch, raw_source) in arches {
                        let location = format!("{location}/{arch}");
                        let sha256 = ContentHash::parse(&raw_source.sha256).ok_or_else(|| {
                            CatalogError::InvalidDigest {
                                location: location.clone(),
                                digest: raw_source.sha256.clone(),
                            }
                        })?;
                        catalog.insert(
                            &ver,
                            variant,
                            os,
                            &arch,
                            Source {
                                url: raw_source.url,
                                sha256,
                            },
                        );
                    }
                }
            }
        }
        Ok(catalog)
    }

    /// Add or replace one archive entry.
    pub fn insert(&mut self, version: &str, variant: Variant, os: OsKind, arch: &str, source: Source) {
        self.versions
            .entry(version.to_string())
            .or_default()
            .entry(variant)
            .or_default()
            .entry(os)
            .or_default()
            .insert(arch.to_string(), source);
    }

    /// All known versions, oldest first.
    pub fn versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.versions.keys().map(String::as_str).collect();
        versions.sort_by(|a, b| version::compare(a, b));
        versions
    }

    /// Variants published for a version, or `None` if the version is unknown.
    pub fn variants(&self, version: &str) -> Option<Vec<Variant>> {
        self.versions
            .get(version)
            .map(|variants| variants.keys().copied().collect())
    }

    /// Per-host archives of one (version, variant) pair.
    pub fn hosts(&self, version: &str, variant: Variant) -> Option<&HostTable> {
        self.versions.get(version)?.get(&variant)
    }

    /// The archive for a (version, variant, host OS, host arch) combination.
    pub fn lookup(&self, version: &str, variant: Variant, os: OsKind, arch: &str) -> Option<&Source> {
        self.hosts(version, variant)?.get(&os)?.get(arch)
    }

    /// Number of versions.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(seed: &str) -> String {
        ContentHash::compute(seed.as_bytes()).to_string()
    }

    fn sample_toml() -> String {
        format!(
            r#"
[versions."14.2.1".native.Linux.x86_64]
url = "https://example.invalid/gcc-14.2.1-linux-x64.tar.xz"
sha256 = "{a}"

[versions."14.2.1".native.Macos.armv8]
url = "https://example.invalid/gcc-14.2.1-darwin-arm64.tar.xz"
sha256 = "{b}"

[versions."14.2.1".arm-none-eabi.Linux.x86_64]
url = "https://example.invalid/arm-gnu-toolchain-14.2-x86_64-arm-none-eabi.tar.xz"
sha256 = "{c}"

[versions."13.3.1".arm-none-eabi.Windows.x86_64]
url = "https://example.invalid/arm-gnu-toolchain-13.3-mingw-w64-i686-arm-none-eabi.zip"
sha256 = "{d}"
"#,
            a = digest("a"),
            b = digest("b"),
            c = digest("c"),
            d = digest("d"),
        )
    }

    #[test]
    fn parse_and_lookup() {
        let catalog = Catalog::parse(&sample_toml()).unwrap();
        assert_eq!(catalog.len(), 2);

        let source = catalog
            .lookup("14.2.1", Variant::ArmNoneEabi, OsKind::Linux, "x86_64")
            .unwrap();
        assert!(source.url.contains("arm-none-eabi"));
        assert_eq!(source.sha256, ContentHash::compute(b"c"));
    }

    #[test]
    fn lookup_misses() {
        let catalog = Catalog::parse(&sample_toml()).unwrap();
        assert!(catalog
            .lookup("12.0.0", Variant::Native, OsKind::Linux, "x86_64")
            .is_none());
        assert!(catalog
            .lookup("13.3.1", Variant::Native, OsKind::Windows, "x86_64")
            .is_none());
        assert!(catalog
            .lookup("14.2.1", Variant::Native, OsKind::Linux, "armv8")
            .is_none());
    }

    #[test]
    fn variants_per_version() {
        let catalog = Catalog::parse(&sample_toml()).unwrap();
        assert_eq!(
            catalog.variants("14.2.1").unwrap(),
            vec![Variant::Native, Variant::ArmNoneEabi]
        );
        assert_eq!(catalog.variants("13.3.1").unwrap(), vec![Variant::ArmNoneEabi]);
        assert!(catalog.variants("1.0.0").is_none());
    }

    #[test]
    fn versions_sorted_semantically() {
        let catalog = Catalog::parse(&sample_toml()).unwrap();
        assert_eq!(catalog.versions(), vec!["13.3.1", "14.2.1"]);
    }

    #[test]
    fn reject_bad_digest() {
        let toml_str = r#"
[versions."14.2.1".native.Linux.x86_64]
url = "https://example.invalid/gcc.tar.xz"
sha256 = "not-a-digest"
"#;
        let err = Catalog::parse(toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDigest { .. }));
        assert!(err.to_string().contains("14.2.1/native/Linux/x86_64"));
    }

    #[test]
    fn reject_baremetal_host() {
        let toml_str = format!(
            r#"
[versions."14.2.1".native.baremetal.x86_64]
url = "https://example.invalid/gcc.tar.xz"
sha256 = "{}"
"#,
            digest("x")
        );
        let err = Catalog::parse(&toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedHostOs { .. }));
    }

    #[test]
    fn reject_unknown_variant() {
        let toml_str = format!(
            r#"
[versions."14.2.1".riscv64-unknown-elf.Linux.x86_64]
url = "https://example.invalid/gcc.tar.xz"
sha256 = "{}"
"#,
            digest("x")
        );
        assert!(matches!(
            Catalog::parse(&toml_str).unwrap_err(),
            CatalogError::Key { .. }
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, sample_toml()).unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.versions(), vec!["13.3.1", "14.2.1"]);

        let missing = Catalog::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, CatalogError::NotFound { .. }));
    }

    #[test]
    fn empty_catalog() {
        let catalog = Catalog::parse("").unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.versions().is_empty());
    }
}
