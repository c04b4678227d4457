use thiserror::Error;

/// Core error types for vendorpin.
///
/// Errors fall into two classes. Configuration errors (malformed versions,
/// requirements or URL templates) are deterministic and detected when the
/// offending object is built. Fetch errors carry the exact URL that was
/// queried and are never retried by this crate.
///
/// # Examples
///
/// ```
/// use vendorpin_core::error::{Error, Result};
///
/// fn check(requirement: &str) -> Result<()> {
///     if requirement.is_empty() {
///         return Err(Error::InvalidVersionRequirement {
///             requirement: requirement.into(),
///             reason: "requirement is empty".into(),
///         });
///     }
///     Ok(())
/// }
///
/// assert!(check("").unwrap_err().is_configuration());
/// ```
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("invalid version requirement '{requirement}': {reason}")]
    InvalidVersionRequirement { requirement: String, reason: String },

    #[error("invalid URL template '{template}': {reason}")]
    InvalidUrlTemplate { template: String, reason: String },

    #[error("invalid package name '{name}': {reason}")]
    InvalidPackageName { name: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("unexpected response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("could not resolve ref '{reference}' for {package}: {reason}")]
    CannotResolveRevision {
        package: String,
        reference: String,
        reason: String,
    },

    #[error(
        "failed to assemble URL with the provided assembly strategy: ref = '{reference}', resolved version = '{version}'"
    )]
    AssemblyFailed { reference: String, version: String },

    #[error(
        "no version of {package} matches requirement '{requirement}' ({candidates} candidates considered)"
    )]
    NoMatchingVersion {
        package: String,
        requirement: String,
        candidates: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` for deterministic errors caused by bad input or
    /// configuration. Retrying the same operation cannot succeed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidVersion { .. }
                | Self::InvalidVersionRequirement { .. }
                | Self::InvalidUrlTemplate { .. }
                | Self::InvalidPackageName { .. }
                | Self::Config(_)
        )
    }

    /// Returns `true` for errors raised by the transport or by an unexpected
    /// remote response. The caller decides whether to retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::HttpStatus { .. } | Self::InvalidResponse { .. }
        )
    }

    /// The URL attempted, for fetch-level errors.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Fetch { url, .. } | Self::HttpStatus { url, .. } | Self::InvalidResponse { url, .. } => {
                Some(url)
            }
            _ => None,
        }
    }

    pub(crate) fn invalid_version(version: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_requirement(
        requirement: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidVersionRequirement {
            requirement: requirement.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_requirement_display() {
        let error = Error::invalid_requirement("foo", "unrecognized requirement");
        insta::assert_snapshot!(
            error.to_string(),
            @"invalid version requirement 'foo': unrecognized requirement"
        );
    }

    #[test]
    fn test_assembly_failed_names_ref_and_version() {
        let error = Error::AssemblyFailed {
            reference: "v0.2".into(),
            version: "0.2.0".into(),
        };
        let msg = error.to_string();
        assert!(msg.contains("'v0.2'"));
        assert!(msg.contains("'0.2.0'"));
    }

    #[test]
    fn test_no_matching_version() {
        let error = Error::NoMatchingVersion {
            package: "libc".into(),
            requirement: "^9".into(),
            candidates: 12,
        };
        assert_eq!(
            error.to_string(),
            "no version of libc matches requirement '^9' (12 candidates considered)"
        );
    }

    #[test]
    fn test_classification() {
        let config = Error::InvalidUrlTemplate {
            template: "${FOO}".into(),
            reason: "unsupported".into(),
        };
        assert!(config.is_configuration());
        assert!(!config.is_transient());
        assert_eq!(config.url(), None);

        let status = Error::HttpStatus {
            url: "https://index.crates.io/li/bc/libc".into(),
            status: 404,
        };
        assert!(status.is_transient());
        assert!(!status.is_configuration());
        assert_eq!(status.url(), Some("https://index.crates.io/li/bc/libc"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_err.into();
        assert!(error.to_string().contains("JSON error"));
    }
}
