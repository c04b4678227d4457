//! Go module proxy client.
//!
//! Provides access to a Go module proxy via:
//! - `/{module}/@v/list` - list all tagged versions
//! - `/{module}/@latest` - latest version info, used when the list is empty
//! - `/{module}/@v/{ref}.info` - metadata for a single version, branch or commit
//!
//! # Examples
//!
//! ```no_run
//! use vendorpin_core::{HttpClient, VersionList};
//! use vendorpin_go::GoProxyVersionList;
//!
//! #[tokio::main]
//! async fn main() {
//!     let list = GoProxyVersionList::new("github.com/gin-gonic/gin", HttpClient::new().shared())
//!         .unwrap();
//!
//!     let versions = list.list().await.unwrap();
//!     println!("gin has {} tagged versions", versions.len());
//! }
//! ```

use crate::error::{GoError, Result};
use crate::types::GoVersionInfo;
use crate::version::{escape_module_path, validate_module_path, validate_ref};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use vendorpin_core::{HttpFetch, VersionList};

/// Default module proxy.
pub const PROXY_BASE: &str = "https://proxy.golang.org";

/// What a [`GoProxyVersionList`] asks the proxy for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Query {
    /// `@v/list`, falling back to `@latest`
    Versions,
    /// `@v/{ref}.info` for one specific ref
    Info(String),
}

/// Versions of a Go module as reported by a module proxy.
///
/// Built with [`new`](Self::new), the list is the proxy's `@v/list`; when that
/// is empty the proxy's `@latest` version is used instead. Built with
/// [`for_info`](Self::for_info), the list holds exactly the canonical version
/// the proxy reports for one ref.
pub struct GoProxyVersionList {
    module: String,
    base_url: String,
    http: Arc<dyn HttpFetch>,
    query: Query,
    versions: OnceCell<BTreeSet<String>>,
}

impl GoProxyVersionList {
    /// Creates a list of every tagged version of `module`.
    ///
    /// # Errors
    ///
    /// Returns [`GoError::InvalidModulePath`] if the path is empty, too long,
    /// or contains empty or `..` segments.
    pub fn new(module: impl Into<String>, http: Arc<dyn HttpFetch>) -> Result<Self> {
        Self::build(module.into(), Query::Versions, http)
    }

    /// Creates a list holding only the version the proxy reports for
    /// `reference` (a tag, branch or commit).
    ///
    /// # Errors
    ///
    /// Returns [`GoError::InvalidModulePath`] or [`GoError::InvalidRef`] when
    /// either input cannot be placed in a proxy URL.
    pub fn for_info(
        module: impl Into<String>,
        reference: impl Into<String>,
        http: Arc<dyn HttpFetch>,
    ) -> Result<Self> {
        let reference = reference.into();
        validate_ref(&reference)?;
        Self::build(module.into(), Query::Info(reference), http)
    }

    fn build(module: String, query: Query, http: Arc<dyn HttpFetch>) -> Result<Self> {
        validate_module_path(&module)?;
        Ok(Self {
            module,
            base_url: PROXY_BASE.to_string(),
            http,
            query,
            versions: OnceCell::new(),
        })
    }

    /// Points the list at an alternative proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    fn module_url(&self) -> String {
        format!("{}/{}", self.base_url, escape_module_path(&self.module))
    }

    pub fn list_url(&self) -> String {
        format!("{}/@v/list", self.module_url())
    }

    pub fn latest_url(&self) -> String {
        format!("{}/@latest", self.module_url())
    }

    pub fn info_url(&self, reference: &str) -> String {
        format!("{}/@v/{}.info", self.module_url(), reference)
    }

    /// Queries version metadata.
    ///
    /// With `Some(reference)` the `.info` of that ref is returned. Without
    /// one, the ref given to [`for_info`](Self::for_info) is used, or the
    /// proxy's `@latest` for a list created with [`new`](Self::new).
    ///
    /// The result is not memoized.
    ///
    /// # Errors
    ///
    /// Returns an error if the ref is invalid, the request fails, or the body
    /// is not a version info object.
    pub async fn get_info(&self, reference: Option<&str>) -> Result<GoVersionInfo> {
        let url = match (reference, &self.query) {
            (Some(reference), _) => {
                validate_ref(reference)?;
                self.info_url(reference)
            }
            (None, Query::Info(reference)) => self.info_url(reference),
            (None, Query::Versions) => self.latest_url(),
        };
        self.fetch_info(&url).await
    }

    async fn fetch_info(&self, url: &str) -> Result<GoVersionInfo> {
        tracing::debug!("querying Go proxy for {}: {}", self.module, url);
        let data = self.http.fetch(url).await?;

        serde_json::from_slice(&data).map_err(|e| GoError::InvalidInfo {
            url: url.to_string(),
            source: e,
        })
    }

    async fn fetch_versions(&self) -> Result<BTreeSet<String>> {
        if let Query::Info(reference) = &self.query {
            let info = self.fetch_info(&self.info_url(reference)).await?;
            return Ok(BTreeSet::from([info.version]));
        }

        let url = self.list_url();
        tracing::debug!("listing Go proxy versions for {}: {}", self.module, url);
        let data = self.http.fetch(&url).await?;
        let versions = parse_version_list(&data, &url)?;
        if !versions.is_empty() {
            return Ok(versions);
        }

        tracing::warn!(
            "Go proxy lists no versions for {}, falling back to @latest",
            self.module
        );
        let info = self.fetch_info(&self.latest_url()).await?;
        Ok(BTreeSet::from([info.version]))
    }
}

/// Parses the newline-separated body of `/@v/list`.
///
/// Blank lines and surrounding whitespace are ignored.
pub fn parse_version_list(data: &[u8], url: &str) -> Result<BTreeSet<String>> {
    let content = std::str::from_utf8(data).map_err(|e| GoError::InvalidUtf8 {
        url: url.to_string(),
        source: e,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

#[async_trait]
impl VersionList for GoProxyVersionList {
    fn name(&self) -> &str {
        &self.module
    }

    async fn list(&self) -> vendorpin_core::Result<BTreeSet<String>> {
        let versions = self
            .versions
            .get_or_try_init(|| self.fetch_versions())
            .await?;
        Ok(versions.clone())
    }
}

impl std::fmt::Debug for GoProxyVersionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoProxyVersionList")
            .field("module", &self.module)
            .field("base_url", &self.base_url)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendorpin_core::{FetchConfig, HttpClient};

    const MODULE: &str = "github.com/Example/Repo";
    const ESCAPED: &str = "/github.com/!example/!repo";

    fn http() -> Arc<dyn HttpFetch> {
        HttpClient::with_config(&FetchConfig::default().with_require_https(false))
            .unwrap()
            .shared()
    }

    fn list(server: &mockito::ServerGuard) -> GoProxyVersionList {
        GoProxyVersionList::new(MODULE, http())
            .unwrap()
            .with_base_url(server.url())
    }

    #[test]
    fn test_parse_version_list() {
        let versions = parse_version_list(b"v1.0.0\nv1.0.1\n\nv2.0.0+incompatible\n", "u").unwrap();
        assert_eq!(
            versions.into_iter().collect::<Vec<_>>(),
            vec!["v1.0.0", "v1.0.1", "v2.0.0+incompatible"]
        );
        assert!(parse_version_list(b"", "u").unwrap().is_empty());
        assert!(parse_version_list(b"\n\n", "u").unwrap().is_empty());
    }

    #[test]
    fn test_parse_version_list_invalid_utf8() {
        let result = parse_version_list(&[0xFF, 0xFE, 0xFD], "u");
        assert!(matches!(result, Err(GoError::InvalidUtf8 { .. })));
    }

    #[test]
    fn test_urls_are_escaped() {
        let list = GoProxyVersionList::new(MODULE, http()).unwrap();
        assert_eq!(
            list.list_url(),
            "https://proxy.golang.org/github.com/!example/!repo/@v/list"
        );
        assert_eq!(
            list.latest_url(),
            "https://proxy.golang.org/github.com/!example/!repo/@latest"
        );
        assert_eq!(
            list.info_url("master"),
            "https://proxy.golang.org/github.com/!example/!repo/@v/master.info"
        );
    }

    #[test]
    fn test_construction_validates_inputs() {
        assert!(GoProxyVersionList::new("", http()).is_err());
        assert!(matches!(
            GoProxyVersionList::for_info(MODULE, "../../etc", http()),
            Err(GoError::InvalidRef { .. })
        ));
    }

    #[tokio::test]
    async fn test_list() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", format!("{}/@v/list", ESCAPED).as_str())
            .with_status(200)
            .with_body("v1.0.0\nv1.1.0\nv1.0.0\n")
            .create_async()
            .await;

        let versions = list(&server).list().await.unwrap();
        assert_eq!(
            versions.into_iter().collect::<Vec<_>>(),
            vec!["v1.0.0", "v1.1.0"]
        );
    }

    #[tokio::test]
    async fn test_empty_list_falls_back_to_latest() {
        let mut server = mockito::Server::new_async().await;
        let _list = server
            .mock("GET", format!("{}/@v/list", ESCAPED).as_str())
            .with_status(200)
            .with_body("")
            .create_async()
            .await;
        let latest = server
            .mock("GET", format!("{}/@latest", ESCAPED).as_str())
            .with_status(200)
            .with_body(r#"{"Version":"v0.0.0-20231001000000-abcdefabcdef","Time":"2023-10-01T00:00:00Z"}"#)
            .create_async()
            .await;

        let versions = list(&server).list().await.unwrap();
        assert_eq!(
            versions.into_iter().collect::<Vec<_>>(),
            vec!["v0.0.0-20231001000000-abcdefabcdef"]
        );
        latest.assert_async().await;
    }

    #[tokio::test]
    async fn test_for_info_lists_single_version() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", format!("{}/@v/master.info", ESCAPED).as_str())
            .with_status(200)
            .with_body(r#"{"Version":"v1.2.4-0.20191109021931-daa7c04131f5"}"#)
            .expect(1)
            .create_async()
            .await;

        let list = GoProxyVersionList::for_info(MODULE, "master", http())
            .unwrap()
            .with_base_url(server.url());
        let first = list.list().await.unwrap();
        let second = list.list().await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(first.contains("v1.2.4-0.20191109021931-daa7c04131f5"));
        assert_eq!(first, second);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_info() {
        let mut server = mockito::Server::new_async().await;
        let _latest = server
            .mock("GET", format!("{}/@latest", ESCAPED).as_str())
            .with_status(200)
            .with_body(r#"{"Version":"v1.1.0"}"#)
            .create_async()
            .await;
        let _info = server
            .mock("GET", format!("{}/@v/v1.0.0.info", ESCAPED).as_str())
            .with_status(200)
            .with_body(
                r#"{"Version":"v1.0.0","Time":"2020-01-01T00:00:00Z","Origin":{"VCS":"git","URL":"https://github.com/Example/Repo","Ref":"refs/tags/v1.0.0","Hash":"0123abcd"}}"#,
            )
            .create_async()
            .await;

        let list = list(&server);

        let latest = list.get_info(None).await.unwrap();
        assert_eq!(latest.version, "v1.1.0");

        let info = list.get_info(Some("v1.0.0")).await.unwrap();
        assert_eq!(info.time.as_deref(), Some("2020-01-01T00:00:00Z"));
        assert_eq!(
            info.origin.and_then(|o| o.reference).as_deref(),
            Some("refs/tags/v1.0.0")
        );

        assert!(list.get_info(Some("a/b")).await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_info_names_url() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", format!("{}/@latest", ESCAPED).as_str())
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = list(&server).get_info(None).await.unwrap_err();
        match err {
            GoError::InvalidInfo { url, .. } => assert!(url.ends_with("/@latest")),
            other => panic!("expected InvalidInfo, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_module() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", format!("{}/@v/list", ESCAPED).as_str())
            .with_status(404)
            .create_async()
            .await;

        let err = list(&server).list().await.unwrap_err();
        assert!(matches!(
            err,
            vendorpin_core::Error::HttpStatus { status: 404, .. }
        ));
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_real_gin_versions() {
        let list =
            GoProxyVersionList::new("github.com/gin-gonic/gin", HttpClient::new().shared()).unwrap();
        let versions = list.list().await.unwrap();

        assert!(!versions.is_empty());
        assert!(versions.iter().any(|v| v.starts_with("v1.")));
    }
}
