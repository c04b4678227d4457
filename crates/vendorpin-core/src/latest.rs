//! Format-driven selection of the latest ref.
//!
//! [`LatestVersionSelector`] matches refs against a format such as
//! `v${n0}.${n1}.${n2}` and keeps the one whose groups rank highest. Groups
//! named `n<i>` compare numerically and groups named `s<i>` compare as text;
//! the index gives the comparison priority (lowest index first).

use crate::error::{Error, Result};
use crate::selector::VersionSelector;
use crate::version_list::VersionList;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

static FORMAT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").expect("valid format token regex"));

const DEFAULT_NUMERIC_PATTERN: &str = "[0-9]+";
const DEFAULT_ALPHABETIC_PATTERN: &str = "[A-Za-z0-9_-]+";

/// How a format group is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionElementType {
    /// `n<i>` groups, compared as integers
    Numeric,
    /// `s<i>` groups, compared lexically
    Alphabetic,
}

impl VersionElementType {
    pub fn var_name(self, index: usize) -> String {
        match self {
            Self::Numeric => format!("n{}", index),
            Self::Alphabetic => format!("s{}", index),
        }
    }

    fn default_pattern(self) -> &'static str {
        match self {
            Self::Numeric => DEFAULT_NUMERIC_PATTERN,
            Self::Alphabetic => DEFAULT_ALPHABETIC_PATTERN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Element {
    Numeric(u64),
    Alphabetic(String),
}

/// Selects the latest ref matching a group format.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use vendorpin_core::{LatestVersionSelector, StaticVersionList, VersionSelector};
///
/// # tokio_test::block_on(async {
/// let selector = LatestVersionSelector::new("v${n0}.${n1}", &BTreeMap::new()).unwrap();
/// let list = StaticVersionList::new("demo", ["v1.9", "v1.10", "release-2.0"]);
///
/// let selected = selector.select(&list, None).await.unwrap();
/// assert_eq!(selected.as_deref(), Some("v1.10"));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct LatestVersionSelector {
    format: String,
    pattern: Regex,
    /// Group names with their types, in priority order.
    groups: Vec<(String, VersionElementType)>,
    use_requested_ref: bool,
}

impl LatestVersionSelector {
    /// Compiles `format` into an anchored pattern.
    ///
    /// `regex_groups` overrides the pattern of individual groups; groups not
    /// listed default to `[0-9]+` (`n<i>`) or `[A-Za-z0-9_-]+` (`s<i>`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the format has no groups, names a group
    /// other than `n<i>`/`s<i>`, repeats a group or an index, when
    /// `regex_groups` names a group the format does not use, or when a group
    /// pattern is not a valid regex.
    pub fn new(format: &str, regex_groups: &BTreeMap<String, String>) -> Result<Self> {
        let invalid = |reason: String| {
            Error::Config(format!("invalid version format '{}': {}", format, reason))
        };

        let mut pattern = String::from("^");
        let mut by_index: BTreeMap<usize, (String, VersionElementType)> = BTreeMap::new();
        let mut last = 0;

        for caps in FORMAT_TOKEN.captures_iter(format) {
            let token = caps.get(0).map_or(0..0, |m| m.range());
            pattern.push_str(&regex::escape(&format[last..token.start]));
            last = token.end;

            let name = &caps[1];
            let (kind, index) = parse_group_name(name)
                .ok_or_else(|| invalid(format!("unsupported group '${{{}}}'", name)))?;
            if by_index.contains_key(&index) {
                return Err(invalid(format!("group index {} is used more than once", index)));
            }

            let group_pattern = regex_groups
                .get(name)
                .map_or(kind.default_pattern(), String::as_str);
            pattern.push_str(&format!("(?P<{}>{})", name, group_pattern));
            by_index.insert(index, (name.to_string(), kind));
        }
        pattern.push_str(&regex::escape(&format[last..]));
        pattern.push('$');

        if by_index.is_empty() {
            return Err(invalid("format has no ${n<i>} or ${s<i>} groups".into()));
        }
        if let Some(unused) = regex_groups
            .keys()
            .find(|name| !by_index.values().any(|(used, _)| used == *name))
        {
            return Err(invalid(format!("regex group '{}' is not used", unused)));
        }

        let pattern = Regex::new(&pattern).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            format: format.to_string(),
            pattern,
            groups: by_index.into_values().collect(),
            use_requested_ref: false,
        })
    }

    /// Returns a non-empty requested ref verbatim instead of consulting the
    /// catalog.
    pub fn use_requested_ref(mut self, enabled: bool) -> Self {
        self.use_requested_ref = enabled;
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    fn elements(&self, candidate: &str) -> Option<Vec<Element>> {
        let caps = self.pattern.captures(candidate)?;
        self.groups
            .iter()
            .map(|(name, kind)| {
                let value = caps.name(name)?.as_str();
                match kind {
                    VersionElementType::Numeric => match value.parse() {
                        Ok(n) => Some(Element::Numeric(n)),
                        Err(e) => {
                            tracing::debug!("skipping {}: group {} is {}", candidate, name, e);
                            None
                        }
                    },
                    VersionElementType::Alphabetic => {
                        Some(Element::Alphabetic(value.to_string()))
                    }
                }
            })
            .collect()
    }
}

fn parse_group_name(name: &str) -> Option<(VersionElementType, usize)> {
    let kind = match name.chars().next()? {
        'n' => VersionElementType::Numeric,
        's' => VersionElementType::Alphabetic,
        _ => return None,
    };
    let digits = &name[1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((kind, digits.parse().ok()?))
}

#[async_trait]
impl VersionSelector for LatestVersionSelector {
    fn criterion(&self) -> &str {
        &self.format
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

        let mut latest: Option<(Vec<Element>, &String)> = None;
        for candidate in &candidates {
            let Some(elements) = self.elements(candidate) else {
                continue;
            };
            let is_after = latest
                .as_ref()
                .is_none_or(|(current, _)| elements.cmp(current) == Ordering::Greater);
            if is_after {
                latest = Some((elements, candidate));
            }
        }

        match latest {
            Some((_, selected)) => {
                tracing::info!(
                    "selected {} for {} by format '{}'",
                    selected,
                    list.name(),
                    self.format
                );
                Ok(Some(selected.clone()))
            }
            None => {
                tracing::warn!(
                    "version format '{}' didn't match any version of {}",
                    self.format,
                    list.name()
                );
                Ok(None)
            }
        }
    }
}

impl fmt::Display for LatestVersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "latest_version(format = \"{}\")", self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version_list::StaticVersionList;

    fn groups(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    async fn select(format: &str, versions: &[&str]) -> Option<String> {
        let selector = LatestVersionSelector::new(format, &BTreeMap::new()).unwrap();
        let list = StaticVersionList::new("test", versions.iter().copied());
        selector.select(&list, None).await.unwrap()
    }

    #[tokio::test]
    async fn test_numeric_groups_compare_as_numbers() {
        let selected = select(
            "v${n0}.${n1}.${n2}",
            &["v1.0.0", "v1.0.10", "v1.0.9", "v0.99.0", "1.5.0", "v1.0"],
        )
        .await;
        assert_eq!(selected.as_deref(), Some("v1.0.10"));
    }

    #[tokio::test]
    async fn test_group_index_sets_priority() {
        // n0 is compared first even though it appears last in the format
        let selected = select("${n1}-build${n0}", &["9-build1", "1-build2", "5-build2"]).await;
        assert_eq!(selected.as_deref(), Some("5-build2"));
    }

    #[tokio::test]
    async fn test_alphabetic_groups() {
        let selected = select(
            "${n0}.${n1}-${s2}",
            &["1.2-alpha", "1.2-beta", "1.1-rc"],
        )
        .await;
        assert_eq!(selected.as_deref(), Some("1.2-beta"));
    }

    #[tokio::test]
    async fn test_custom_group_pattern() {
        let selector = LatestVersionSelector::new(
            "release-${n0}",
            &groups(&[("n0", "[0-9]{4}")]),
        )
        .unwrap();
        let list = StaticVersionList::new("test", ["release-2023", "release-99999", "release-2024"]);
        let selected = selector.select(&list, None).await.unwrap();
        assert_eq!(selected.as_deref(), Some("release-2024"));
    }

    #[tokio::test]
    async fn test_literal_text_is_escaped() {
        // the '.' must not match arbitrary characters
        assert_eq!(select("${n0}.${n1}", &["1x2"]).await, None);
    }

    #[tokio::test]
    async fn test_no_match() {
        assert_eq!(select("v${n0}", &["main", "latest"]).await, None);
        assert_eq!(select("v${n0}", &[]).await, None);
    }

    #[tokio::test]
    async fn test_requested_ref() {
        let selector = LatestVersionSelector::new("v${n0}", &BTreeMap::new())
            .unwrap()
            .use_requested_ref(true);
        let list = StaticVersionList::new("test", ["v1", "v2"]);
        let selected = selector.select(&list, Some("v7")).await.unwrap();
        assert_eq!(selected.as_deref(), Some("v7"));
        assert_eq!(selector.criterion(), "v${n0}");
    }

    #[test]
    fn test_invalid_formats() {
        let none = BTreeMap::new();
        assert!(LatestVersionSelector::new("v1.0", &none).is_err());
        assert!(LatestVersionSelector::new("v${x0}", &none).is_err());
        assert!(LatestVersionSelector::new("v${n}", &none).is_err());
        assert!(LatestVersionSelector::new("${n0}.${s0}", &none).is_err());
        assert!(LatestVersionSelector::new("${n0}", &groups(&[("n1", "[0-9]+")])).is_err());
        assert!(LatestVersionSelector::new("${n0}", &groups(&[("n0", "[0-9")])).is_err());
    }

    #[test]
    fn test_error_message() {
        let err = LatestVersionSelector::new("v${major}", &BTreeMap::new()).unwrap_err();
        assert!(err.is_configuration());
        insta::assert_snapshot!(
            err.to_string(),
            @"invalid configuration: invalid version format 'v${major}': unsupported group '${major}'"
        );
    }

    #[test]
    fn test_display() {
        let selector = LatestVersionSelector::new("v${n0}", &BTreeMap::new()).unwrap();
        assert_eq!(selector.to_string(), "latest_version(format = \"v${n0}\")");
        assert_eq!(VersionElementType::Numeric.var_name(0), "n0");
        assert_eq!(VersionElementType::Alphabetic.var_name(3), "s3");
    }
}
