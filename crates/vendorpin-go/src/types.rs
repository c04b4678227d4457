//! Response types of the Go module proxy.

use crate::version::is_pseudo_version;
use serde::{Deserialize, Serialize};

/// Body of `/@v/{ref}.info` and `/@latest`.
///
/// Only `Version` is guaranteed; proxies may omit `Time` and `Origin`.
///
/// # Examples
///
/// ```
/// use vendorpin_go::GoVersionInfo;
///
/// let info: GoVersionInfo =
///     serde_json::from_str(r#"{"Version":"v1.9.1","Time":"2023-07-18T14:30:00Z"}"#).unwrap();
/// assert_eq!(info.version, "v1.9.1");
/// assert!(info.origin.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GoVersionInfo {
    pub version: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub origin: Option<GoOrigin>,
}

/// VCS provenance reported by newer proxies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoOrigin {
    #[serde(rename = "VCS", default)]
    pub vcs: Option<String>,
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
    #[serde(rename = "Ref", default)]
    pub reference: Option<String>,
    #[serde(rename = "Hash", default)]
    pub hash: Option<String>,
}

impl GoVersionInfo {
    pub fn is_pseudo(&self) -> bool {
        is_pseudo_version(&self.version)
    }
}
