//! Semantic version value type.
//!
//! Unlike a strict SemVer 2.0 parser, minor and patch components are optional
//! so that the same type can represent both published versions (`1.2.3`) and
//! the partial bounds used in requirements (`1.2`, `0`). Absent components are
//! unconstrained when matching but count as `0` when ordering.

use crate::error::{Error, Result};
use semver::Prerelease;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed `major[.minor[.patch]][-prerelease][+build]` version.
///
/// Build metadata is accepted and discarded. Two versions that differ only in
/// absent-vs-zero components compare equal (`1.2 == 1.2.0`), but `Display`
/// reproduces exactly the components that were parsed.
///
/// # Examples
///
/// ```
/// use vendorpin_core::SemanticVersion;
///
/// let rc: SemanticVersion = "1.2.3-rc.1+build.5".parse().unwrap();
/// let release: SemanticVersion = "1.2.3".parse().unwrap();
///
/// assert!(rc < release);
/// assert_eq!(rc.to_string(), "1.2.3-rc.1");
/// assert_eq!(rc.pre(), Some("rc.1"));
/// ```
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    major: u64,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Option<Prerelease>,
}

impl SemanticVersion {
    /// Creates a release version with all three components present.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor: Some(minor),
            patch: Some(patch),
            pre: None,
        }
    }

    /// Parses a version string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] when the major component is missing or
    /// not a non-negative integer, when a minor/patch component is malformed,
    /// when more than three numeric components are given, or when the
    /// pre-release suffix is empty or contains invalid identifiers.
    pub fn parse(version: &str) -> Result<Self> {
        let input = version.trim();
        let without_build = input.split_once('+').map_or(input, |(v, _)| v);
        let (numeric, pre) = match without_build.split_once('-') {
            Some((numeric, pre)) => (numeric, Some(pre)),
            None => (without_build, None),
        };

        let mut parts = numeric.split('.');
        let major = parse_component(version, parts.next().unwrap_or_default(), "major")?;
        let minor = parts
            .next()
            .map(|part| parse_component(version, part, "minor"))
            .transpose()?;
        let patch = parts
            .next()
            .map(|part| parse_component(version, part, "patch"))
            .transpose()?;

        if parts.next().is_some() {
            return Err(Error::invalid_version(
                version,
                "more than three numeric components",
            ));
        }

        let pre = match pre {
            None => None,
            Some("") => return Err(Error::invalid_version(version, "empty pre-release")),
            Some(text) => Some(
                Prerelease::new(text)
                    .map_err(|e| Error::invalid_version(version, format!("pre-release: {}", e)))?,
            ),
        };

        Ok(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> Option<u64> {
        self.minor
    }

    pub fn patch(&self) -> Option<u64> {
        self.patch
    }

    /// The pre-release suffix without the leading `-`.
    pub fn pre(&self) -> Option<&str> {
        self.pre.as_ref().map(Prerelease::as_str)
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    /// Returns a copy with the pre-release suffix removed.
    pub fn without_prerelease(&self) -> Self {
        Self {
            pre: None,
            ..self.clone()
        }
    }

    /// Checks that `other` agrees with every numeric component present in
    /// `self`. Components absent from `self` are unconstrained.
    pub(crate) fn leading_components_match(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor.is_none_or(|minor| other.minor.unwrap_or(0) == minor)
            && self.patch.is_none_or(|patch| other.patch.unwrap_or(0) == patch)
    }
}

fn parse_component(version: &str, text: &str, name: &str) -> Result<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_version(
            version,
            format!("{} component '{}' is not a non-negative integer", name, text),
        ));
    }
    text.parse::<u64>().map_err(|e| {
        Error::invalid_version(version, format!("{} component '{}': {}", name, text, e))
    })
}

impl FromStr for SemanticVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{}", minor)?;
        }
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.unwrap_or(0).cmp(&other.minor.unwrap_or(0)))
            .then_with(|| self.patch.unwrap_or(0).cmp(&other.patch.unwrap_or(0)))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}
