//! Errors specific to Go module proxy lookups.

use thiserror::Error;

/// Errors that can occur during Go module proxy operations.
#[derive(Error, Debug)]
pub enum GoError {
    /// Invalid module path
    #[error("Invalid module path '{module}': {reason}")]
    InvalidModulePath { module: String, reason: String },

    /// Ref cannot be used in a proxy URL
    #[error("Invalid ref '{reference}': {reason}")]
    InvalidRef { reference: String, reason: String },

    /// Version list is not valid UTF-8
    #[error("Failed to query Go proxy at {url}: invalid UTF-8: {source}")]
    InvalidUtf8 {
        url: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Failed to deserialize a `.info` or `@latest` response
    #[error("Failed to query Go proxy at {url}: {source}")]
    InvalidInfo {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Transport or core error
    #[error(transparent)]
    Core(#[from] vendorpin_core::Error),
}

/// Result type alias for Go operations.
pub type Result<T> = std::result::Result<T, GoError>;

impl GoError {
    /// Helper for creating invalid module path errors
    pub fn invalid_module_path(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidModulePath {
            module: module.into(),
            reason: reason.into(),
        }
    }

    /// Helper for creating invalid ref errors
    pub fn invalid_ref(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRef {
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}

impl From<GoError> for vendorpin_core::Error {
    fn from(err: GoError) -> Self {
        match err {
            GoError::InvalidModulePath { module, reason } => {
                vendorpin_core::Error::InvalidPackageName {
                    name: module,
                    reason,
                }
            }
            GoError::InvalidRef { reference, reason } => vendorpin_core::Error::InvalidVersion {
                version: reference,
                reason,
            },
            GoError::InvalidUtf8 { url, source } => vendorpin_core::Error::InvalidResponse {
                url,
                reason: format!("invalid UTF-8: {}", source),
            },
            GoError::InvalidInfo { url, source } => vendorpin_core::Error::InvalidResponse {
                url,
                reason: source.to_string(),
            },
            GoError::Core(e) => e,
        }
    }
}
