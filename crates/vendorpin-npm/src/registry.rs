//! npm registry client.
//!
//! Versions are read from the package document at
//! `{registry}/{package}` (<https://registry.npmjs.org> by default), fetched
//! at most once per instance.

use crate::error::{NpmError, Result};
use crate::types::NpmPackageDocument;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use vendorpin_core::{HttpFetch, VersionList};

/// Default npm registry.
pub const REGISTRY_BASE: &str = "https://registry.npmjs.org";

/// npm refuses names longer than this.
const MAX_PACKAGE_NAME_LENGTH: usize = 214;

fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(NpmError::invalid_package_name(name, "package name is empty"));
    }

    if name.len() > MAX_PACKAGE_NAME_LENGTH {
        return Err(NpmError::invalid_package_name(
            name,
            format!(
                "package name exceeds maximum length of {} characters",
                MAX_PACKAGE_NAME_LENGTH
            ),
        ));
    }

    let bare = match name.strip_prefix('@') {
        Some(scoped) => match scoped.split_once('/') {
            Some((scope, bare)) if !scope.is_empty() => bare,
            _ => {
                return Err(NpmError::invalid_package_name(
                    name,
                    "scoped names must look like @scope/name",
                ));
            }
        },
        None => name,
    };

    if bare.is_empty() || bare.starts_with('.') || bare.starts_with('_') {
        return Err(NpmError::invalid_package_name(
            name,
            "name must not be empty or start with '.' or '_'",
        ));
    }

    if name.chars().any(char::is_whitespace) || bare.contains('/') || name.contains("..") {
        return Err(NpmError::invalid_package_name(
            name,
            "name contains invalid characters",
        ));
    }

    Ok(())
}

/// Encodes a package name as a registry path segment.
///
/// Scoped names keep their `@` and have the separating slash encoded.
///
/// # Examples
///
/// ```
/// use vendorpin_npm::package_path;
///
/// assert_eq!(package_path("express"), "express");
/// assert_eq!(package_path("@types/node"), "@types%2Fnode");
/// ```
pub fn package_path(name: &str) -> String {
    match name.strip_prefix('@').and_then(|s| s.split_once('/')) {
        Some((scope, bare)) => format!(
            "@{}%2F{}",
            urlencoding::encode(scope),
            urlencoding::encode(bare)
        ),
        None => urlencoding::encode(name).into_owned(),
    }
}

/// Versions of an npm package, read from its registry document.
pub struct NpmVersionList {
    package: String,
    base_url: String,
    http: Arc<dyn HttpFetch>,
    ignore_deprecated: bool,
    document: OnceCell<NpmPackageDocument>,
}

impl NpmVersionList {
    /// # Errors
    ///
    /// Returns [`NpmError::InvalidPackageName`] for names npm would reject.
    pub fn new(package: impl Into<String>, http: Arc<dyn HttpFetch>) -> Result<Self> {
        let package = package.into();
        validate_package_name(&package)?;

        Ok(Self {
            package,
            base_url: REGISTRY_BASE.to_string(),
            http,
            ignore_deprecated: false,
            document: OnceCell::new(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Leaves deprecated versions out of [`list`](VersionList::list).
    pub fn ignore_deprecated(mut self, ignore: bool) -> Self {
        self.ignore_deprecated = ignore;
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn document_url(&self) -> String {
        format!("{}/{}", self.base_url, package_path(&self.package))
    }

    /// The full package document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a package
    /// document. A failure is not memoized.
    pub async fn document(&self) -> Result<&NpmPackageDocument> {
        self.document
            .get_or_try_init(|| self.fetch_document())
            .await
    }

    async fn fetch_document(&self) -> Result<NpmPackageDocument> {
        let url = self.document_url();
        tracing::debug!("fetching npm package document for {}: {}", self.package, url);

        let data = self.http.fetch(&url).await?;
        serde_json::from_slice(&data).map_err(|e| NpmError::InvalidMetadata { url, source: e })
    }
}

#[async_trait]
impl VersionList for NpmVersionList {
    fn name(&self) -> &str {
        &self.package
    }

    async fn list(&self) -> vendorpin_core::Result<BTreeSet<String>> {
        let document = self.document().await?;

        Ok(document
            .versions
            .iter()
            .filter(|(_, meta)| !(self.ignore_deprecated && meta.deprecated.is_some()))
            .map(|(version, _)| version.clone())
            .collect())
    }
}

impl std::fmt::Debug for NpmVersionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NpmVersionList")
            .field("package", &self.package)
            .field("base_url", &self.base_url)
            .field("ignore_deprecated", &self.ignore_deprecated)
            .finish_non_exhaustive()
    }
}
