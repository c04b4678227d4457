use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// A named set of version strings known to a registry.
///
/// Implementors backed by a remote catalog fetch it at most once per instance
/// and reuse the parsed result for later calls. A failed fetch is returned to
/// the caller as-is and is not retried internally.
///
/// # Examples
///
/// ```
/// use vendorpin_core::{StaticVersionList, VersionList};
///
/// # tokio_test::block_on(async {
/// let list = StaticVersionList::new("demo", ["1.0.0", "1.1.0", "1.0.0"]);
/// let versions = list.list().await.unwrap();
/// assert_eq!(versions.len(), 2);
/// # });
/// ```
#[async_trait]
pub trait VersionList: Send + Sync {
    /// Registry identifier (crate, module or package name) used in messages.
    fn name(&self) -> &str;

    /// Returns every version string in the catalog.
    ///
    /// # Errors
    ///
    /// Returns a fetch-level error carrying the queried URL if the catalog
    /// could not be downloaded or parsed.
    async fn list(&self) -> Result<BTreeSet<String>>;
}

/// In-memory version list supplied directly by the caller.
#[derive(Debug, Clone, Default)]
pub struct StaticVersionList {
    name: String,
    versions: BTreeSet<String>,
}

impl StaticVersionList {
    pub fn new<I, S>(name: impl Into<String>, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            versions: versions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

#[async_trait]
impl VersionList for StaticVersionList {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self) -> Result<BTreeSet<String>> {
        Ok(self.versions.clone())
    }
}
