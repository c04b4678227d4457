use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Package document returned by `GET {registry}/{package}`.
///
/// Only the parts needed for version listing and tarball lookup are modelled.
///
/// # Examples
///
/// ```
/// use vendorpin_npm::NpmPackageDocument;
///
/// let json = r#"{
///     "name": "left-pad",
///     "dist-tags": {"latest": "1.3.0"},
///     "versions": {
///         "1.3.0": {"dist": {"tarball": "https://registry.npmjs.org/left-pad/-/left-pad-1.3.0.tgz"}}
///     }
/// }"#;
///
/// let doc: NpmPackageDocument = serde_json::from_str(json).unwrap();
/// assert_eq!(doc.dist_tags["latest"], "1.3.0");
/// assert!(doc.tarball("1.3.0").unwrap().ends_with(".tgz"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpmPackageDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub versions: BTreeMap<String, NpmVersionMetadata>,
    #[serde(rename = "dist-tags", default)]
    pub dist_tags: BTreeMap<String, String>,
}

/// Metadata of one published version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpmVersionMetadata {
    #[serde(default)]
    pub dist: Option<NpmDist>,
    #[serde(default)]
    pub deprecated: Option<String>,
}

/// Distribution details of a published version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpmDist {
    #[serde(default)]
    pub tarball: Option<String>,
    #[serde(default)]
    pub shasum: Option<String>,
    #[serde(default)]
    pub integrity: Option<String>,
}

impl NpmPackageDocument {
    /// Tarball URL published for `version`, if any.
    pub fn tarball(&self, version: &str) -> Option<&str> {
        self.versions
            .get(version)?
            .dist
            .as_ref()?
            .tarball
            .as_deref()
    }

    /// Maps a version or dist-tag to a published version.
    pub fn canonical_version<'a>(&'a self, reference: &'a str) -> Option<&'a str> {
        if self.versions.contains_key(reference) {
            return Some(reference);
        }
        self.dist_tags
            .get(reference)
            .map(String::as_str)
            .filter(|version| self.versions.contains_key(*version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> NpmPackageDocument {
        serde_json::from_str(
            r#"{
                "name": "@scope/pkg",
                "dist-tags": {"latest": "1.0.0", "next": "2.0.0-rc.1", "stale": "0.0.1"},
                "versions": {
                    "1.0.0": {"dist": {"tarball": "https://r/pkg-1.0.0.tgz", "shasum": "abc"}},
                    "2.0.0-rc.1": {"deprecated": "use 2.0.0"}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_tarball() {
        let doc = document();
        assert_eq!(doc.tarball("1.0.0"), Some("https://r/pkg-1.0.0.tgz"));
        assert_eq!(doc.tarball("2.0.0-rc.1"), None);
        assert_eq!(doc.tarball("3.0.0"), None);
    }

    #[test]
    fn test_canonical_version() {
        let doc = document();
        assert_eq!(doc.canonical_version("1.0.0"), Some("1.0.0"));
        assert_eq!(doc.canonical_version("next"), Some("2.0.0-rc.1"));
        // a tag pointing at an unpublished version is ignored
        assert_eq!(doc.canonical_version("stale"), None);
        assert_eq!(doc.canonical_version("beta"), None);
    }

    #[test]
    fn test_empty_document() {
        let doc: NpmPackageDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.versions.is_empty());
        assert!(doc.dist_tags.is_empty());
    }
}
