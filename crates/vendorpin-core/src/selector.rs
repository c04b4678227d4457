//! Version selection.
//!
//! A [`VersionSelector`] narrows a [`VersionList`] down to the single version
//! that should be imported. Finding nothing is not an error here: selectors
//! return `Ok(None)` and the caller decides whether that is fatal.

use crate::error::{Error, Result};
use crate::requirement::{RequirementMode, VersionRequirement};
use crate::version::SemanticVersion;
use crate::version_list::VersionList;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::fmt;

/// Picks one version out of a catalog.
#[async_trait]
pub trait VersionSelector: Send + Sync {
    /// Selects a version from `list`.
    ///
    /// `requested_ref` is the ref the user asked for explicitly, if any.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(version))` - the chosen version string, as listed
    /// - `Ok(None)` - no candidate qualifies
    /// - `Err(_)` - the catalog could not be fetched
    async fn select(
        &self,
        list: &dyn VersionList,
        requested_ref: Option<&str>,
    ) -> Result<Option<String>>;

    /// What the selector looks for, as written by the user. Used in messages.
    fn criterion(&self) -> &str;
}

/// Selects the greatest catalog version that fulfills a requirement.
///
/// Pre-release candidates only participate when `include_prereleases` is set
/// or when the requirement itself names a pre-release (`=1.2.3-alpha.1`).
///
/// # Examples
///
/// ```
/// use vendorpin_core::{RequirementSelector, StaticVersionList, VersionSelector};
///
/// # tokio_test::block_on(async {
/// let selector = RequirementSelector::new("1.2").unwrap();
/// let list = StaticVersionList::new(
///     "demo",
///     ["0.2.3", "1.2.3-alpha.1", "1.2.3", "1.2.4", "2.0.0"],
/// );
///
/// let selected = selector.select(&list, None).await.unwrap();
/// assert_eq!(selected.as_deref(), Some("1.2.4"));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct RequirementSelector {
    requirement: VersionRequirement,
    raw: String,
    include_prereleases: bool,
    use_requested_ref: bool,
}

impl RequirementSelector {
    /// Creates a selector for a requirement in standard mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersionRequirement`] if the requirement does
    /// not parse.
    pub fn new(requirement: &str) -> Result<Self> {
        Self::with_mode(requirement, RequirementMode::Standard)
    }

    pub fn with_mode(requirement: &str, mode: RequirementMode) -> Result<Self> {
        Ok(Self {
            requirement: VersionRequirement::parse_with_mode(requirement, mode)?,
            raw: requirement.to_string(),
            include_prereleases: false,
            use_requested_ref: false,
        })
    }

    /// Lets pre-release versions compete with releases.
    pub fn include_prereleases(mut self, include: bool) -> Self {
        self.include_prereleases = include;
        self
    }

    /// Returns a non-empty requested ref verbatim instead of consulting the
    /// catalog, so callers can pin a version the registry does not list.
    pub fn use_requested_ref(mut self, enabled: bool) -> Self {
        self.use_requested_ref = enabled;
        self
    }

    pub fn requirement(&self) -> &VersionRequirement {
        &self.requirement
    }

    /// The requirement exactly as it was written.
    pub fn requirement_str(&self) -> &str {
        &self.raw
    }

    fn admits_prereleases(&self) -> bool {
        self.include_prereleases || self.requirement.has_prerelease()
    }
}

/// Parses a catalog entry, tolerating the `v` prefix used by Go and git tags.
fn parse_candidate(candidate: &str) -> Option<SemanticVersion> {
    let text = candidate.strip_prefix('v').unwrap_or(candidate);
    match SemanticVersion::parse(text) {
        Ok(version) => Some(version),
        Err(e) => {
            tracing::debug!("skipping unparseable candidate {}: {}", candidate, e);
            None
        }
    }
}

#[async_trait]
impl VersionSelector for RequirementSelector {
    fn criterion(&self) -> &str {
        &self.raw
    }

    async fn select(
        &self,
        list: &dyn VersionList,
        requested_ref: Option<&str>,
    ) -> Result<Option<String>> {
        if self.use_requested_ref
            && let Some(reference) = requested_ref.filter(|r| !r.is_empty())
        {
            tracing::info!("using requested ref {} for {}", reference, list.name());
            return Ok(Some(reference.to_string()));
        }

        let candidates = list.list().await?;
        let admits_prereleases = self.admits_prereleases();

        let mut best: Option<(SemanticVersion, &String)> = None;
        // a tie only matters while nothing ranks above it
        let mut tied: Option<&String> = None;
        for candidate in &candidates {
            let Some(version) = parse_candidate(candidate) else {
                continue;
            };
            if version.is_prerelease() && !admits_prereleases {
                continue;
            }
            if !self.requirement.matches(&version) {
                continue;
            }

            match &best {
                Some((current, _)) => match version.cmp(current) {
                    Ordering::Greater => {
                        best = Some((version, candidate));
                        tied = None;
                    }
                    Ordering::Equal => tied = Some(candidate),
                    Ordering::Less => {}
                },
                None => best = Some((version, candidate)),
            }
        }

        if let (Some(tied), Some((_, selected))) = (tied, &best) {
            return Err(Error::InvalidVersion {
                version: tied.clone(),
                reason: format!(
                    "has the same precedence as '{}' in the catalog of {}",
                    selected,
                    list.name()
                ),
            });
        }

        match best {
            Some((_, selected)) => {
                tracing::info!(
                    "selected {} for {} under requirement '{}'",
                    selected,
                    list.name(),
                    self.raw
                );
                Ok(Some(selected.clone()))
            }
            None => {
                tracing::warn!(
                    "requirement '{}' matched none of {} versions of {}",
                    self.raw,
                    candidates.len(),
                    list.name()
                );
                Ok(None)
            }
        }
    }
}

impl fmt::Display for RequirementSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "requirement_selector(requirement = \"{}\")", self.raw)
    }
}
