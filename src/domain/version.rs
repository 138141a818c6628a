//! Semantic version numbers written with a leading 'v'.

use crate::domain::ident::{IdKind, ID_SEPARATOR};
use crate::error::ParseError;
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;
use std::str::FromStr;

/// Every semantic version string starts with this.
pub const VERSION_PREFIX: char = 'v';

/// Semantic version number, written as `vMAJOR.MINOR.PATCH[-PRE][+BUILD]`
///
/// The value is stored as a [`semver::Version`] so ordering follows semver
/// precedence rules. A `SemVer` is only ever replaced whole.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemVer(Version);

impl SemVer {
    /// Create a version from its parts, checking every identifier
    pub fn new<S: AsRef<str>>(
        major: u64,
        minor: u64,
        patch: u64,
        pre_rel_ids: &[S],
        build_ids: &[S],
    ) -> Result<Self, ParseError> {
        IdKind::PreRelease.check_all(pre_rel_ids)?;
        IdKind::Build.check_all(build_ids)?;

        let mut version = Version::new(major, minor, patch);
        version.pre = to_prerelease(&join_ids(pre_rel_ids))?;
        version.build = to_build(&join_ids(build_ids))?;
        Ok(SemVer(version))
    }

    /// Parse a version string (e.g., "v1.2.3-rc.1+b.7")
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let rest = s
            .strip_prefix(VERSION_PREFIX)
            .ok_or_else(|| ParseError::MissingPrefix {
                input: s.to_string(),
            })?;

        let (rest, build) = match rest.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (rest, None),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(ParseError::bad_version(
                s,
                "it must have three dot-separated numbers (major.minor.patch)",
            ));
        }
        let major = parse_number(s, "major", parts[0])?;
        let minor = parse_number(s, "minor", parts[1])?;
        let patch = parse_number(s, "patch", parts[2])?;

        let pre_rel_ids = split_ids(pre);
        let build_ids = split_ids(build);
        SemVer::new(major, minor, patch, &pre_rel_ids[..], &build_ids[..])
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    pub fn pre_rel_ids(&self) -> Vec<String> {
        split_ids(Some(self.0.pre.as_str()).filter(|p| !p.is_empty()))
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn build_ids(&self) -> Vec<String> {
        split_ids(Some(self.0.build.as_str()).filter(|b| !b.is_empty()))
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn has_pre_rel_ids(&self) -> bool {
        !self.0.pre.is_empty()
    }

    pub fn has_build_ids(&self) -> bool {
        !self.0.build.is_empty()
    }

    pub fn as_version(&self) -> &Version {
        &self.0
    }
}

fn parse_number(input: &str, part: &str, digits: &str) -> Result<u64, ParseError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::bad_version(
            input,
            format!(
                "the {} version ('{}') must be a non-negative integer",
                part, digits
            ),
        ));
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(ParseError::bad_version(
            input,
            format!(
                "the {} version ('{}') must not have a leading zero",
                part, digits
            ),
        ));
    }
    digits.parse::<u64>().map_err(|e| {
        ParseError::bad_version(input, format!("the {} version ('{}'): {}", part, digits, e))
    })
}

/// An absent section has no identifiers; a present but empty one has a single empty identifier
fn split_ids(section: Option<&str>) -> Vec<&str> {
    match section {
        Some(section) => section.split(ID_SEPARATOR).collect(),
        None => Vec::new(),
    }
}

fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&ID_SEPARATOR.to_string())
}

fn to_prerelease(text: &str) -> Result<Prerelease, ParseError> {
    if text.is_empty() {
        return Ok(Prerelease::EMPTY);
    }
    Prerelease::new(text).map_err(|e| ParseError::bad_version(text, e.to_string()))
}

fn to_build(text: &str) -> Result<BuildMetadata, ParseError> {
    if text.is_empty() {
        return Ok(BuildMetadata::EMPTY);
    }
    BuildMetadata::new(text).map_err(|e| ParseError::bad_version(text, e.to_string()))
}

impl FromStr for SemVer {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        SemVer::parse(s)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", VERSION_PREFIX, self.0)
    }
}

impl From<SemVer> for Version {
    fn from(sv: SemVer) -> Self {
        sv.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = SemVer::parse("v1.2.3").unwrap();
        assert_eq!(v.major(), 1);
        assert_eq!(v.minor(), 2);
        assert_eq!(v.patch(), 3);
        assert!(v.pre_rel_ids().is_empty());
        assert!(v.build_ids().is_empty());
    }

    #[test]
    fn test_version_parse_with_ids() {
        let v = SemVer::parse("v1.2.3-rc.1.x+b-7.01").unwrap();
        assert_eq!(v.pre_rel_ids(), vec!["rc", "1", "x"]);
        assert_eq!(v.build_ids(), vec!["b-7", "01"]);
    }

    #[test]
    fn test_hyphens_belong_to_the_pre_release_section() {
        let v = SemVer::parse("v1.2.3-rc-1+x-y").unwrap();
        assert_eq!(v.pre_rel_ids(), vec!["rc-1"]);
        assert_eq!(v.build_ids(), vec!["x-y"]);
    }

    #[test]
    fn test_version_parse_without_v() {
        let err = SemVer::parse("1.2.3").unwrap_err();
        assert!(matches!(err, ParseError::MissingPrefix { .. }));
        assert!(err.to_string().contains("must start with a 'v'"));

        let err = SemVer::parse("x1.2.3").unwrap_err();
        assert!(err.to_string().contains("must start with a 'v'"));
    }

    #[test]
    fn test_version_parse_uppercase_v() {
        assert!(SemVer::parse("V1.2.3").is_err());
    }

    #[test]
    fn test_version_parse_wrong_part_count() {
        assert!(SemVer::parse("v1.2").is_err());
        assert!(SemVer::parse("v1.2.3.4").is_err());
        assert!(SemVer::parse("v").is_err());
    }

    #[test]
    fn test_version_parse_bad_numbers() {
        let err = SemVer::parse("v1.x.3").unwrap_err();
        assert!(err.to_string().contains("the minor version ('x')"));
        assert!(SemVer::parse("v1.-2.3").is_err());
        assert!(SemVer::parse("v1..3").is_err());
        assert!(SemVer::parse("v01.2.3").is_err());
        assert!(SemVer::parse("v1.2.99999999999999999999999").is_err());
    }

    #[test]
    fn test_version_parse_bad_ids() {
        let err = SemVer::parse("v1.2.3-rc.01").unwrap_err();
        assert!(matches!(
            err,
            ParseError::BadId {
                kind: IdKind::PreRelease,
                position: 1,
                ..
            }
        ));
        assert!(SemVer::parse("v1.2.3-").is_err());
        assert!(SemVer::parse("v1.2.3+").is_err());
        assert!(SemVer::parse("v1.2.3-a..b").is_err());
        assert!(SemVer::parse("v1.2.3+a+b").is_err());
        assert!(SemVer::parse("v1.2.3-a_b").is_err());
    }

    #[test]
    fn test_build_ids_allow_leading_zero() {
        let v = SemVer::parse("v1.2.3+007").unwrap();
        assert_eq!(v.build_ids(), vec!["007"]);
    }

    #[test]
    fn test_round_trip() {
        for s in [
            "v0.0.0",
            "v1.2.3",
            "v1.2.3-rc.1",
            "v1.2.3+build.5",
            "v10.20.30-alpha.beta-1.0+exp.sha.5114f85",
            "v1.2.3-rc.1.x",
        ] {
            assert_eq!(SemVer::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_new() {
        let v = SemVer::new(1, 2, 3, &["rc", "1"], &[]).unwrap();
        assert_eq!(v.to_string(), "v1.2.3-rc.1");
        assert!(SemVer::new(1, 2, 3, &["01"], &[]).is_err());
    }

    #[test]
    fn test_ordering_follows_precedence() {
        let rc = SemVer::parse("v1.2.3-rc.1").unwrap();
        let release = SemVer::parse("v1.2.3").unwrap();
        assert!(rc < release);
    }
}
