//! Version requirements.
//!
//! A requirement string is parsed once into a [`VersionRequirement`], a closed
//! set of matching strategies modelled after Cargo's requirement syntax:
//!
//! | syntax                   | variant      |
//! |--------------------------|--------------|
//! | `=1.3`, `>0.4`, `<=2`    | `Comparison` |
//! | `1.2.3`, `^1.2.3`        | `Default`    |
//! | `~1.2.3`                 | `Tilde`      |
//! | `1.2.*`, `1.x`           | `Wildcard`   |
//! | `> 0.4, <= 0.6`          | `Multiple`   |
//! | `2` (epoch mode only)    | `Epoch`      |

use crate::error::{Error, Result};
use crate::version::SemanticVersion;
use std::fmt;

/// Operator of a [`VersionRequirement::Comparison`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Exact,
    Greater,
    GreaterEq,
    Less,
    LessEq,
}

impl ComparisonOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::Less => "<",
            Self::LessEq => "<=",
        }
    }
}

/// How bare numeric requirements such as `2` or `0.2` are interpreted.
///
/// In `Standard` mode they are caret requirements. In `Epoch` mode they match
/// exactly at the given precision and ignore pre-release status, which is how
/// edition-style version epochs are pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequirementMode {
    #[default]
    Standard,
    Epoch,
}

/// A parsed version requirement.
///
/// # Examples
///
/// ```
/// use vendorpin_core::VersionRequirement;
///
/// let req = VersionRequirement::parse("> 0.4, <= 0.6").unwrap();
/// assert!(req.fulfills("0.5").unwrap());
/// assert!(!req.fulfills("0.4").unwrap());
///
/// let caret = VersionRequirement::parse("0.2.3").unwrap();
/// assert!(caret.fulfills("0.2.5").unwrap());
/// assert!(!caret.fulfills("0.3.0").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum VersionRequirement {
    Comparison {
        op: ComparisonOp,
        version: SemanticVersion,
    },
    /// Caret requirement, written with or without the leading `^`.
    Default { version: SemanticVersion },
    Tilde { version: SemanticVersion },
    /// `major.*` when `minor` is `None`, `major.minor.*` otherwise.
    Wildcard { major: u64, minor: Option<u64> },
    /// Every clause must hold.
    Multiple { clauses: Vec<VersionRequirement> },
    Epoch { version: SemanticVersion },
}

/// A matcher inspects a single clause and either claims it (returning the
/// parse result) or passes it on to the next matcher.
type Matcher = fn(&str, RequirementMode) -> Option<Result<VersionRequirement>>;

const MATCHERS: &[Matcher] = &[
    match_comparison,
    match_tilde,
    match_wildcard,
    match_epoch,
    match_default,
];

const COMPARISON_PREFIXES: &[(&str, ComparisonOp)] = &[
    (">=", ComparisonOp::GreaterEq),
    ("<=", ComparisonOp::LessEq),
    (">", ComparisonOp::Greater),
    ("<", ComparisonOp::Less),
    ("=", ComparisonOp::Exact),
];

impl VersionRequirement {
    /// Parses a requirement in [`RequirementMode::Standard`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersionRequirement`] naming the requirement when
    /// it is empty, uses unsupported syntax, or has a malformed bound.
    pub fn parse(requirement: &str) -> Result<Self> {
        Self::parse_with_mode(requirement, RequirementMode::Standard)
    }

    /// Parses a requirement in the given mode.
    pub fn parse_with_mode(requirement: &str, mode: RequirementMode) -> Result<Self> {
        let trimmed = requirement.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_requirement(requirement, "requirement is empty"));
        }

        if !trimmed.contains(',') {
            return parse_clause(trimmed, mode);
        }

        let clauses = trimmed
            .split(',')
            .map(str::trim)
            .map(|clause| {
                if clause.is_empty() {
                    return Err(Error::invalid_requirement(requirement, "empty clause"));
                }
                parse_clause(clause, mode).map_err(|e| match e {
                    Error::InvalidVersionRequirement { reason, .. } => Error::invalid_requirement(
                        requirement,
                        format!("clause '{}': {}", clause, reason),
                    ),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::Multiple { clauses })
    }

    /// Returns `true` if `candidate` satisfies this requirement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] if `candidate` is not a valid version.
    pub fn fulfills(&self, candidate: &str) -> Result<bool> {
        let version = SemanticVersion::parse(candidate)?;
        Ok(self.matches(&version))
    }

    /// Returns `true` if an already-parsed version satisfies this requirement.
    pub fn matches(&self, candidate: &SemanticVersion) -> bool {
        match self {
            Self::Comparison { op, version } => match op {
                ComparisonOp::Exact => {
                    version.leading_components_match(candidate) && version.pre() == candidate.pre()
                }
                ComparisonOp::Greater => candidate > version,
                ComparisonOp::GreaterEq => candidate >= version,
                ComparisonOp::Less => candidate < version,
                ComparisonOp::LessEq => candidate <= version,
            },
            Self::Default { version } => {
                candidate >= version && candidate.without_prerelease() < caret_upper_bound(version)
            }
            Self::Tilde { version } => {
                candidate >= version && candidate.without_prerelease() < tilde_upper_bound(version)
            }
            Self::Wildcard { major, minor } => {
                candidate.major() == *major
                    && minor.is_none_or(|minor| candidate.minor().unwrap_or(0) == minor)
            }
            Self::Multiple { clauses } => clauses.iter().all(|clause| clause.matches(candidate)),
            // Pre-releases are compatible within an epoch even though they
            // are not semver-compatible.
            Self::Epoch { version } => version.leading_components_match(candidate),
        }
    }

    /// Returns `true` if any bound of this requirement names a pre-release.
    pub fn has_prerelease(&self) -> bool {
        match self {
            Self::Comparison { version, .. }
            | Self::Default { version }
            | Self::Tilde { version }
            | Self::Epoch { version } => version.is_prerelease(),
            Self::Wildcard { .. } => false,
            Self::Multiple { clauses } => clauses.iter().any(Self::has_prerelease),
        }
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comparison { op, version } => write!(f, "{}{}", op.as_str(), version),
            Self::Default { version } => write!(f, "^{}", version),
            Self::Tilde { version } => write!(f, "~{}", version),
            Self::Wildcard { major, minor: None } => write!(f, "{}.*", major),
            Self::Wildcard {
                major,
                minor: Some(minor),
            } => write!(f, "{}.{}.*", major, minor),
            Self::Multiple { clauses } => {
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", clause)?;
                }
                Ok(())
            }
            Self::Epoch { version } => write!(f, "{}", version),
        }
    }
}

fn parse_clause(clause: &str, mode: RequirementMode) -> Result<VersionRequirement> {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(clause, mode))
        .unwrap_or_else(|| {
            Err(Error::invalid_requirement(
                clause,
                "unsupported requirement syntax",
            ))
        })
}

/// Parses the version bound that follows an operator.
fn parse_bound(clause: &str, text: &str) -> Result<SemanticVersion> {
    SemanticVersion::parse(text.trim()).map_err(|e| match e {
        Error::InvalidVersion { reason, .. } => Error::invalid_requirement(clause, reason),
        other => other,
    })
}

fn match_comparison(clause: &str, _mode: RequirementMode) -> Option<Result<VersionRequirement>> {
    let (rest, op) = COMPARISON_PREFIXES
        .iter()
        .find_map(|(prefix, op)| clause.strip_prefix(*prefix).map(|rest| (rest, *op)))?;

    Some(parse_bound(clause, rest).map(|version| VersionRequirement::Comparison { op, version }))
}

fn match_tilde(clause: &str, _mode: RequirementMode) -> Option<Result<VersionRequirement>> {
    let rest = clause.strip_prefix('~')?;
    Some(parse_bound(clause, rest).map(|version| VersionRequirement::Tilde { version }))
}

fn match_wildcard(clause: &str, _mode: RequirementMode) -> Option<Result<VersionRequirement>> {
    let (leading, last) = match clause.rsplit_once('.') {
        Some((leading, last)) => (Some(leading), last),
        None => (None, clause),
    };
    if !matches!(last, "*" | "x" | "X") || leading.is_some_and(|l| l.contains(['-', '+'])) {
        return None;
    }

    let Some(leading) = leading else {
        return Some(Err(Error::invalid_requirement(
            clause,
            "a bare wildcard is not a valid requirement",
        )));
    };

    let components = leading
        .split('.')
        .map(|part| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_requirement(
                    clause,
                    format!("'{}' is not a numeric component", part),
                ));
            }
            part.parse::<u64>()
                .map_err(|e| Error::invalid_requirement(clause, e.to_string()))
        })
        .collect::<Result<Vec<_>>>();

    Some(components.and_then(|components| match components.as_slice() {
        [major] => Ok(VersionRequirement::Wildcard {
            major: *major,
            minor: None,
        }),
        [major, minor] => Ok(VersionRequirement::Wildcard {
            major: *major,
            minor: Some(*minor),
        }),
        _ => Err(Error::invalid_requirement(
            clause,
            "a wildcard may follow at most two numeric components",
        )),
    }))
}

fn match_epoch(clause: &str, mode: RequirementMode) -> Option<Result<VersionRequirement>> {
    if mode != RequirementMode::Epoch || !clause.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    Some(parse_bound(clause, clause).map(|version| VersionRequirement::Epoch { version }))
}

fn match_default(clause: &str, _mode: RequirementMode) -> Option<Result<VersionRequirement>> {
    let rest = clause.strip_prefix('^').unwrap_or(clause).trim_start();
    if !rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some(parse_bound(clause, rest).map(|version| VersionRequirement::Default { version }))
}

/// The earliest version that is no longer compatible with `version` under
/// caret rules: the leftmost non-zero component that was actually written is
/// incremented and everything to its right is zeroed.
fn caret_upper_bound(version: &SemanticVersion) -> SemanticVersion {
    let major = version.major();
    match (version.minor(), version.patch()) {
        (None, _) => SemanticVersion::new(major.saturating_add(1), 0, 0),
        _ if major > 0 => SemanticVersion::new(major.saturating_add(1), 0, 0),
        (Some(minor), None) => SemanticVersion::new(0, minor.saturating_add(1), 0),
        (Some(minor), Some(_)) if minor > 0 => SemanticVersion::new(0, minor.saturating_add(1), 0),
        (Some(_), Some(patch)) => SemanticVersion::new(0, 0, patch.saturating_add(1)),
    }
}

/// Tilde bounds move one level above the most specific component given:
/// `~1.2.3` stops at `1.3.0`, while `~1.2` and `~1` stop at `2.0.0`.
fn tilde_upper_bound(version: &SemanticVersion) -> SemanticVersion {
    match (version.minor(), version.patch()) {
        (Some(minor), Some(_)) => {
            SemanticVersion::new(version.major(), minor.saturating_add(1), 0)
        }
        _ => SemanticVersion::new(version.major().saturating_add(1), 0, 0),
    }
}
