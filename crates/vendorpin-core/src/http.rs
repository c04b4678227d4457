use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Default request timeout for registry lookups.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("vendorpin/", env!("CARGO_PKG_VERSION"));

/// Byte-level GET transport shared by the registry adapters.
///
/// Adapters receive an `Arc<dyn HttpFetch>` at construction instead of
/// reaching for a global client, which keeps them testable against a local
/// mock server or an in-memory fake.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use std::sync::Arc;
/// use vendorpin_core::error::Result;
/// use vendorpin_core::http::HttpFetch;
///
/// struct Canned(&'static str);
///
/// #[async_trait]
/// impl HttpFetch for Canned {
///     async fn fetch(&self, _url: &str) -> Result<Arc<Vec<u8>>> {
///         Ok(Arc::new(self.0.as_bytes().to_vec()))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let body = Canned("v1.0.0\n").fetch("https://proxy.golang.org/x/@v/list").await.unwrap();
/// assert_eq!(&**body, b"v1.0.0\n");
/// # });
/// ```
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Performs a GET request and returns the response body.
    ///
    /// # Errors
    ///
    /// - [`Error::Fetch`] when the request cannot be sent or the body read
    /// - [`Error::HttpStatus`] for any non-2xx response
    /// - [`Error::Config`] when the URL scheme is not permitted
    async fn fetch(&self, url: &str) -> Result<Arc<Vec<u8>>>;
}

/// Transport settings for [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
    /// Refuse plain `http://` URLs.
    pub require_https: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            require_https: true,
        }
    }
}

impl FetchConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_require_https(mut self, require_https: bool) -> Self {
        self.require_https = require_https;
        self
    }
}

/// Validates that a URL uses HTTPS when the configuration demands it.
#[inline]
fn ensure_https(url: &str, require_https: bool) -> Result<()> {
    if require_https && !url.starts_with("https://") {
        return Err(Error::Config(format!("URL must use HTTPS: {}", url)));
    }
    Ok(())
}

/// [`HttpFetch`] implementation backed by `reqwest`.
///
/// Responses are not cached across calls; each adapter memoizes its own
/// parsed catalog.
///
/// # Examples
///
/// ```no_run
/// use vendorpin_core::http::{HttpClient, HttpFetch};
///
/// # async fn example() -> vendorpin_core::error::Result<()> {
/// let client = HttpClient::new();
/// let body = client.fetch("https://index.crates.io/se/rd/serde").await?;
/// println!("fetched {} bytes", body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    require_https: bool,
}

impl HttpClient {
    /// Creates a client with the default 30-second timeout and user agent.
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            require_https: true,
        }
    }

    /// Creates a client from explicit transport settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the TLS backend cannot be initialized.
    pub fn with_config(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            require_https: config.require_https,
        })
    }

    /// Wraps the client for injection into registry adapters.
    pub fn shared(self) -> Arc<dyn HttpFetch> {
        Arc::new(self)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpFetch for HttpClient {
    async fn fetch(&self, url: &str) -> Result<Arc<Vec<u8>>> {
        ensure_https(url, self.require_https)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            source: e,
        })?;

        Ok(Arc::new(body.to_vec()))
    }
}
