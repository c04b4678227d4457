use crate::error::{NpmError, Result};
use crate::registry::NpmVersionList;
use async_trait::async_trait;
use std::sync::Arc;
use vendorpin_core::{Assembler, HttpFetch, Revision, VersionResolver, assemble_revision};

/// Resolves a version or dist-tag to the tarball the registry publishes.
///
/// When the registry lists no tarball for the version, the URL template is
/// used instead.
#[derive(Debug)]
pub struct NpmVersionResolver {
    list: NpmVersionList,
}

impl NpmVersionResolver {
    pub fn new(package: impl Into<String>, http: Arc<dyn HttpFetch>) -> Result<Self> {
        Ok(Self {
            list: NpmVersionList::new(package, http)?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.list = self.list.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl VersionResolver for NpmVersionResolver {
    async fn resolve(
        &self,
        reference: &str,
        assemble: &Assembler,
    ) -> vendorpin_core::Result<Revision> {
        let document = self.list.document().await?;
        let version = document
            .canonical_version(reference)
            .ok_or_else(|| NpmError::VersionNotFound {
                package: self.list.package().to_string(),
                reference: reference.to_string(),
            })?;

        match document.tarball(version) {
            Some(tarball) => {
                tracing::info!("resolved {} to {}", reference, tarball);
                Ok(Revision::new(version, tarball))
            }
            None => {
                tracing::debug!(
                    "no tarball published for {}@{}, using the URL template",
                    self.list.package(),
                    version
                );
                assemble_revision(reference, version, assemble)
            }
        }
    }
}
