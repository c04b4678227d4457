use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use vendorpin_core::{FetchConfig, RequirementMode, Result};
use vendorpin_core::http::DEFAULT_USER_AGENT;

/// Root configuration of one archive import.
///
/// Every field has a default, so a configuration only needs to spell out
/// what differs. Without a `requirement` the import is versionless and the
/// URL template is used as is.
///
/// # Examples
///
/// ```
/// use vendorpin::config::{ImportConfig, SourceConfig};
///
/// let json = r#"{
///     "source": {"kind": "crates_io", "crate_name": "serde"},
///     "url_template": "https://static.crates.io/crates/serde/serde-${VERSION}.crate",
///     "requirement": "^1.0"
/// }"#;
///
/// let config: ImportConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.source, SourceConfig::CratesIo { crate_name: "serde".into() });
/// assert!(config.http.require_https);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub url_template: String,
    #[serde(default)]
    pub requirement: Option<String>,
    /// Format-based selection, an alternative to `requirement`.
    #[serde(default)]
    pub latest_version: Option<LatestVersionConfig>,
    /// Parse bare numeric requirements as epoch pins.
    #[serde(default)]
    pub epoch: bool,
    #[serde(default)]
    pub include_prereleases: bool,
    #[serde(default)]
    pub ignore_yanked: bool,
    /// Leave deprecated npm versions out of the catalog.
    #[serde(default)]
    pub ignore_deprecated: bool,
    /// Take the ref given on the command line instead of selecting one.
    #[serde(default)]
    pub use_cli_ref: bool,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl ImportConfig {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](vendorpin_core::Error::Json) for malformed
    /// JSON, unknown source kinds or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        tracing::debug!("loaded import config for {:?}", config.source);
        Ok(config)
    }

    pub fn requirement_mode(&self) -> RequirementMode {
        if self.epoch {
            RequirementMode::Epoch
        } else {
            RequirementMode::Standard
        }
    }

    /// Whether a requested ref bypasses selection.
    pub fn prefers_requested_ref(&self) -> bool {
        self.use_cli_ref || self.force
    }
}

/// Latest-ref selection by a group format such as `v${n0}.${n1}`.
///
/// # Examples
///
/// ```
/// use vendorpin::config::LatestVersionConfig;
///
/// let config: LatestVersionConfig = serde_json::from_str(
///     r#"{"format": "release-${n0}", "regex_groups": {"n0": "[0-9]{4}"}}"#,
/// ).unwrap();
/// assert_eq!(config.regex_groups["n0"], "[0-9]{4}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LatestVersionConfig {
    pub format: String,
    #[serde(default)]
    pub regex_groups: BTreeMap<String, String>,
}

/// Where candidate versions come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// crates.io sparse index
    CratesIo { crate_name: String },
    /// Go module proxy
    GoProxy { module: String },
    /// npm registry
    Npm { package: String },
    /// Plain archive, no registry
    #[default]
    Archive,
}

impl SourceConfig {
    /// Registry identifier used in messages.
    pub fn package(&self) -> Option<&str> {
        match self {
            Self::CratesIo { crate_name } => Some(crate_name),
            Self::GoProxy { module } => Some(module),
            Self::Npm { package } => Some(package),
            Self::Archive => None,
        }
    }
}

/// Registry endpoint override.
///
/// # Defaults
///
/// - `base_url`: `None` (the registry's public endpoint)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Transport settings.
///
/// # Defaults
///
/// - `timeout_secs`: `30`
/// - `user_agent`: `"vendorpin/<version>"`
/// - `require_https`: `true`
///
/// # Examples
///
/// ```
/// use vendorpin::config::HttpConfig;
///
/// let config: HttpConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
/// assert_eq!(config.fetch_config().unwrap().timeout.as_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_true")]
    pub require_https: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            require_https: true,
        }
    }
}

impl HttpConfig {
    /// # Errors
    ///
    /// Returns [`Error::Config`](vendorpin_core::Error::Config) for a zero
    /// timeout or an empty user agent.
    pub fn fetch_config(&self) -> Result<FetchConfig> {
        if self.timeout_secs == 0 {
            return Err(vendorpin_core::Error::Config(
                "http.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(vendorpin_core::Error::Config(
                "http.user_agent must not be empty".into(),
            ));
        }

        Ok(FetchConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
            require_https: self.require_https,
        })
    }
}

// Default value functions
const fn default_true() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
