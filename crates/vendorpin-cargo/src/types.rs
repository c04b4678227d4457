use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One line of a sparse index file: a single published version of a crate.
///
/// Only the fields vendorpin consumes are modelled; unknown fields such as
/// `cksum` or `links` are ignored.
///
/// # Examples
///
/// ```
/// use vendorpin_cargo::IndexRecord;
///
/// let line = r#"{"name":"serde","vers":"1.0.1","deps":[],"features":{"derive":["serde_derive"]}}"#;
/// let record: IndexRecord = serde_json::from_str(line).unwrap();
///
/// assert_eq!(record.vers, "1.0.1");
/// assert!(!record.yanked);
/// assert_eq!(record.features["derive"], vec!["serde_derive".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub name: String,
    pub vers: String,
    #[serde(default)]
    pub deps: Vec<IndexDependency>,
    #[serde(default)]
    pub features: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub yanked: bool,
}

/// Dependency entry of an [`IndexRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDependency {
    pub name: String,
    #[serde(default)]
    pub req: Option<String>,
    #[serde(default)]
    pub optional: bool,
    /// `normal`, `dev` or `build`; absent means `normal`.
    #[serde(default)]
    pub kind: Option<String>,
}

impl IndexRecord {
    /// Names of the crates this version depends on.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.deps.iter().map(|dep| dep.name.as_str())
    }
}
