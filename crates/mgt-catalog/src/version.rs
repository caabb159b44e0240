//! Toolchain version strings.
//!
//! GCC releases are mostly semantic (`14.2.0`), but catalogs and compiler
//! settings also carry shortened forms (`14.2`, `14`). Ordering uses
//! `semver` after padding missing components and falls back to plain
//! string comparison for anything else.

use std::cmp::Ordering;

/// A parsed semantic version.
pub type Version = semver::Version;

/// The portion of `version` before the first `.`, or the whole string.
pub fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

/// Parse a possibly shortened version, padding to three components.
pub fn parse_lenient(version: &str) -> Option<Version> {
    let parts = version.split('.').count();
    let padded = match parts {
        1 => format!("{version}.0.0"),
        2 => format!("{version}.0"),
        _ => version.to_string(),
    };
    Version::parse(&padded).ok()
}

/// Total order over version strings: semantic where both parse, else lexicographic.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (parse_lenient(a), parse_lenient(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_component() {
        assert_eq!(major("14.3.0"), "14");
        assert_eq!(major("13"), "13");
        assert_eq!(major(""), "");
    }

    #[test]
    fn lenient_parsing() {
        assert_eq!(parse_lenient("14").unwrap(), Version::new(14, 0, 0));
        assert_eq!(parse_lenient("14.2").unwrap(), Version::new(14, 2, 0));
        assert_eq!(parse_lenient("13.3.1").unwrap(), Version::new(13, 3, 1));
        assert!(parse_lenient("14.2.rel1").is_none());
    }

    #[test]
    fn semantic_ordering() {
        let mut versions = vec!["14.2.1", "9.4.0", "13.3.1", "14.2"];
        versions.sort_by(|a, b| compare(a, b));
        assert_eq!(versions, vec!["9.4.0", "13.3.1", "14.2", "14.2.1"]);
    }

    #[test]
    fn unparseable_sort_last() {
        let mut versions = vec!["nightly", "12.3.0"];
        versions.sort_by(|a, b| compare(a, b));
        assert_eq!(versions, vec!["12.3.0", "nightly"]);
    }
}
