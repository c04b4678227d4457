use crate::error::Result;
use crate::registry::{GoProxyVersionList, PROXY_BASE};
use crate::version::validate_module_path;
use async_trait::async_trait;
use std::sync::Arc;
use vendorpin_core::{Assembler, Error, HttpFetch, Revision, VersionResolver, assemble_revision};

/// Resolves tags, branches and commits through the proxy's `.info` endpoint.
///
/// The URL template is filled with the canonical version the proxy reports,
/// so a branch name such as `master` becomes a pseudo-version.
///
/// # Examples
///
/// ```no_run
/// use vendorpin_core::{HttpClient, UrlTemplate, VersionResolver};
/// use vendorpin_go::GoProxyVersionResolver;
///
/// # async fn example() -> vendorpin_core::Result<()> {
/// let resolver = GoProxyVersionResolver::new("golang.org/x/mod", HttpClient::new().shared())?;
/// let template = UrlTemplate::new("https://proxy.golang.org/golang.org/x/mod/@v/${VERSION}.zip")?;
///
/// let revision = resolver.resolve("master", &template.assembler()).await?;
/// println!("{} -> {}", revision.version, revision.url);
/// # Ok(())
/// # }
/// ```
pub struct GoProxyVersionResolver {
    module: String,
    base_url: String,
    http: Arc<dyn HttpFetch>,
}

impl GoProxyVersionResolver {
    pub fn new(module: impl Into<String>, http: Arc<dyn HttpFetch>) -> Result<Self> {
        let module = module.into();
        validate_module_path(&module)?;
        Ok(Self {
            module,
            base_url: PROXY_BASE.to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl VersionResolver for GoProxyVersionResolver {
    async fn resolve(
        &self,
        reference: &str,
        assemble: &Assembler,
    ) -> vendorpin_core::Result<Revision> {
        let list = GoProxyVersionList::for_info(&self.module, reference, Arc::clone(&self.http))?
            .with_base_url(&self.base_url);

        let info = match list.get_info(None).await {
            Ok(info) => info,
            Err(e) => {
                return Err(match Error::from(e) {
                    Error::HttpStatus { status, .. } if status == 404 || status == 410 => {
                        Error::CannotResolveRevision {
                            package: self.module.clone(),
                            reference: reference.to_string(),
                            reason: format!("the Go proxy does not know this ref (HTTP {})", status),
                        }
                    }
                    other => other,
                });
            }
        };

        if info.is_pseudo() {
            tracing::info!(
                "ref {} of {} resolved to pseudo-version {}",
                reference,
                self.module,
                info.version
            );
        }

        assemble_revision(reference, &info.version, assemble)
    }
}

impl std::fmt::Debug for GoProxyVersionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoProxyVersionResolver")
            .field("module", &self.module)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
