use crate::error::{CargoError, Result};
use crate::registry::SparseIndexVersionList;
use async_trait::async_trait;
use std::sync::Arc;
use vendorpin_core::{
    Assembler, HttpFetch, Revision, VersionList, VersionResolver, assemble_revision,
};

/// Resolves a ref that must name a published version of a crate.
///
/// The ref is looked up verbatim in the sparse index (yanked versions
/// included) and, when present, substituted into the URL template.
///
/// # Examples
///
/// ```no_run
/// use vendorpin_cargo::CratesIoVersionResolver;
/// use vendorpin_core::{HttpClient, UrlTemplate, VersionResolver};
///
/// # async fn example() -> vendorpin_core::Result<()> {
/// let resolver = CratesIoVersionResolver::new("libc", HttpClient::new().shared())?;
/// let template = UrlTemplate::new("https://static.crates.io/crates/libc/libc-${VERSION}.crate")?;
///
/// let revision = resolver.resolve("0.2.150", &template.assembler()).await?;
/// println!("{}", revision.url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CratesIoVersionResolver {
    list: SparseIndexVersionList,
}

impl CratesIoVersionResolver {
    pub fn new(crate_name: impl Into<String>, http: Arc<dyn HttpFetch>) -> Result<Self> {
        Ok(Self {
            list: SparseIndexVersionList::new(crate_name, http)?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.list = self.list.with_base_url(base_url);
        self
    }

    /// Lets pre-release versions be resolved.
    pub fn include_prereleases(mut self, include: bool) -> Self {
        self.list = self.list.include_prereleases(include);
        self
    }
}

#[async_trait]
impl VersionResolver for CratesIoVersionResolver {
    async fn resolve(
        &self,
        reference: &str,
        assemble: &Assembler,
    ) -> vendorpin_core::Result<Revision> {
        let versions = self.list.list().await?;
        if !versions.contains(reference) {
            tracing::debug!(
                "{} is not among {} listed versions of {}",
                reference,
                versions.len(),
                self.list.crate_name()
            );
            return Err(CargoError::VersionNotFound {
                crate_name: self.list.crate_name().to_string(),
                reference: reference.to_string(),
            }
            .into());
        }

        assemble_revision(reference, reference, assemble)
    }
}
