//! Wiring of version list, selector and resolver into a single import.

use crate::config::{ImportConfig, SourceConfig};
use std::sync::Arc;
use vendorpin_cargo::{CratesIoVersionResolver, SparseIndexVersionList};
use vendorpin_core::{
    Error, HttpClient, HttpFetch, LatestVersionSelector, RequirementSelector, Result, Revision,
    SharedResolver, UrlTemplate, VersionList, VersionSelector,
};
use vendorpin_go::{GoProxyVersionList, GoProxyVersionResolver};
use vendorpin_npm::{NpmVersionList, NpmVersionResolver};

/// An archive pinned through a registry, or a plain versionless archive.
///
/// # Examples
///
/// ```no_run
/// use vendorpin::ArchiveImport;
/// use vendorpin::config::ImportConfig;
///
/// # async fn example() -> vendorpin_core::Result<()> {
/// let config: ImportConfig = serde_json::from_str(r#"{
///     "source": {"kind": "crates_io", "crate_name": "libc"},
///     "url_template": "https://static.crates.io/crates/libc/libc-${VERSION}.crate",
///     "requirement": "0.2"
/// }"#)?;
///
/// let import = ArchiveImport::from_config(&config)?;
/// let revision = import.resolve(None).await?;
/// println!("{}", revision);
/// # Ok(())
/// # }
/// ```
pub struct ArchiveImport {
    template: UrlTemplate,
    versioning: Option<Versioning>,
    resolver: Option<SharedResolver>,
    prefer_requested_ref: bool,
}

struct Versioning {
    list: Box<dyn VersionList>,
    selector: Box<dyn VersionSelector>,
}

impl ArchiveImport {
    /// Builds the import described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the URL template, requirement,
    /// registry identifier or transport settings are invalid, when a
    /// selector is given for a source without a registry, or when both
    /// `requirement` and `latest_version` are set.
    pub fn from_config(config: &ImportConfig) -> Result<Self> {
        let template = UrlTemplate::new(config.url_template.clone())?;
        let http = HttpClient::with_config(&config.http.fetch_config()?)?.shared();
        let base_url = config.registry.base_url.as_deref();

        let requirement = config
            .requirement
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());

        let selector: Option<Box<dyn VersionSelector>> =
            match (requirement, &config.latest_version) {
                (None, None) => None,
                (Some(_), Some(_)) => {
                    return Err(Error::Config(
                        "requirement and latest_version are mutually exclusive".into(),
                    ));
                }
                (Some(requirement), None) => Some(Box::new(
                    RequirementSelector::with_mode(requirement, config.requirement_mode())?
                        .include_prereleases(config.include_prereleases)
                        .use_requested_ref(config.prefers_requested_ref()),
                )),
                (None, Some(latest)) => Some(Box::new(
                    LatestVersionSelector::new(&latest.format, &latest.regex_groups)?
                        .use_requested_ref(config.prefers_requested_ref()),
                )),
            };

        let versioning = match (selector, &config.source) {
            (None, _) => None,
            (Some(selector), SourceConfig::Archive) => {
                return Err(Error::Config(format!(
                    "version selector '{}' needs a registry source",
                    selector.criterion()
                )));
            }
            (Some(selector), source) => {
                let list = build_list(source, config, Arc::clone(&http), base_url)?;
                Some(Versioning { list, selector })
            }
        };

        let resolver = build_resolver(&config.source, config, http, base_url)?;

        Ok(Self {
            template,
            versioning,
            resolver,
            prefer_requested_ref: config.prefers_requested_ref(),
        })
    }

    /// Assembles an import from already built parts.
    pub fn from_parts(
        template: UrlTemplate,
        versioning: Option<(Box<dyn VersionList>, Box<dyn VersionSelector>)>,
        resolver: Option<SharedResolver>,
        prefer_requested_ref: bool,
    ) -> Self {
        Self {
            template,
            versioning: versioning.map(|(list, selector)| Versioning { list, selector }),
            resolver,
            prefer_requested_ref,
        }
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    /// Whether versions are selected at all.
    pub fn is_versioned(&self) -> bool {
        self.versioning.is_some()
    }

    /// Resolves `requested_ref` (or the best match of the requirement) to a
    /// revision.
    ///
    /// # Errors
    ///
    /// - [`Error::NoMatchingVersion`] when the selector finds nothing
    /// - [`Error::Config`] when a requested ref must be resolved but no
    ///   resolver is configured
    /// - any list, selector or resolver error
    pub async fn resolve(&self, requested_ref: Option<&str>) -> Result<Revision> {
        let Some(Versioning { list, selector }) = &self.versioning else {
            tracing::debug!("versionless import of {}", self.template);
            return Ok(Revision::new("", self.template.as_str()));
        };

        let Some(version) = selector.select(list.as_ref(), requested_ref).await? else {
            // the list is memoized, so counting candidates costs no request
            let candidates = list.list().await.map(|versions| versions.len()).unwrap_or(0);
            return Err(Error::NoMatchingVersion {
                package: list.name().to_string(),
                requirement: selector.criterion().to_string(),
                candidates,
            });
        };

        let requested = requested_ref.is_some_and(|r| !r.is_empty());
        if self.prefer_requested_ref && requested {
            let resolver = self.resolver.as_ref().ok_or_else(|| {
                Error::Config(
                    "use_cli_ref or force is set, yet no version resolver was provided".into(),
                )
            })?;
            let assemble = self.template.assembler();
            return resolver.resolve(&version, &assemble).await;
        }

        let url = self.template.fill(&version);
        tracing::info!("resolved {} {} to {}", list.name(), version, url);
        Ok(Revision::new(version, url))
    }
}

impl std::fmt::Debug for ArchiveImport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveImport")
            .field("template", &self.template)
            .field(
                "selector",
                &self.versioning.as_ref().map(|v| v.selector.criterion()),
            )
            .field("has_resolver", &self.resolver.is_some())
            .field("prefer_requested_ref", &self.prefer_requested_ref)
            .finish()
    }
}

fn build_list(
    source: &SourceConfig,
    config: &ImportConfig,
    http: Arc<dyn HttpFetch>,
    base_url: Option<&str>,
) -> Result<Box<dyn VersionList>> {
    Ok(match source {
        SourceConfig::CratesIo { crate_name } => {
            let mut list = SparseIndexVersionList::new(crate_name, http)?
                .include_prereleases(config.include_prereleases)
                .ignore_yanked(config.ignore_yanked);
            if let Some(base_url) = base_url {
                list = list.with_base_url(base_url);
            }
            Box::new(list)
        }
        SourceConfig::GoProxy { module } => {
            let mut list = GoProxyVersionList::new(module, http)?;
            if let Some(base_url) = base_url {
                list = list.with_base_url(base_url);
            }
            Box::new(list)
        }
        SourceConfig::Npm { package } => {
            let mut list =
                NpmVersionList::new(package, http)?.ignore_deprecated(config.ignore_deprecated);
            if let Some(base_url) = base_url {
                list = list.with_base_url(base_url);
            }
            Box::new(list)
        }
        SourceConfig::Archive => {
            return Err(Error::Config("archive sources have no version list".into()));
        }
    })
}

fn build_resolver(
    source: &SourceConfig,
    config: &ImportConfig,
    http: Arc<dyn HttpFetch>,
    base_url: Option<&str>,
) -> Result<Option<SharedResolver>> {
    let resolver: SharedResolver = match source {
        SourceConfig::CratesIo { crate_name } => {
            let mut resolver = CratesIoVersionResolver::new(crate_name, http)?
                .include_prereleases(config.include_prereleases);
            if let Some(base_url) = base_url {
                resolver = resolver.with_base_url(base_url);
            }
            Arc::new(resolver)
        }
        SourceConfig::GoProxy { module } => {
            let mut resolver = GoProxyVersionResolver::new(module, http)?;
            if let Some(base_url) = base_url {
                resolver = resolver.with_base_url(base_url);
            }
            Arc::new(resolver)
        }
        SourceConfig::Npm { package } => {
            let mut resolver = NpmVersionResolver::new(package, http)?;
            if let Some(base_url) = base_url {
                resolver = resolver.with_base_url(base_url);
            }
            Arc::new(resolver)
        }
        SourceConfig::Archive => return Ok(None),
    };
    Ok(Some(resolver))
}
