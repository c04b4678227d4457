//! Errors specific to the crates.io sparse index.

use thiserror::Error;

/// Errors specific to crates.io lookups.
///
/// Every variant converts into [`vendorpin_core::Error`], so adapters can use
/// `?` inside trait implementations that return the core result type.
#[derive(Error, Debug)]
pub enum CargoError {
    /// Crate name is not a valid crates.io name
    #[error("Invalid crate name '{name}': {reason}")]
    InvalidCrateName { name: String, reason: String },

    /// Index file is not valid UTF-8
    #[error("Failed to query crates.io index at {url}: invalid UTF-8: {source}")]
    InvalidUtf8 {
        url: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// A line of the index file is not a valid version record
    #[error("Failed to query crates.io index at {url}: malformed record on line {line}: {source}")]
    MalformedRecord {
        url: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Requested version is absent from the index
    #[error("Could not locate version '{reference}' of crate '{crate_name}' in the crates.io index")]
    VersionNotFound {
        crate_name: String,
        reference: String,
    },

    /// Transport or core error
    #[error(transparent)]
    Core(#[from] vendorpin_core::Error),
}

/// Result type alias for crates.io operations.
pub type Result<T> = std::result::Result<T, CargoError>;

impl CargoError {
    /// Create an invalid crate name error.
    pub fn invalid_crate_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCrateName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Convert to vendorpin_core::Error for interoperability
impl From<CargoError> for vendorpin_core::Error {
    fn from(err: CargoError) -> Self {
        match err {
            CargoError::InvalidCrateName { name, reason } => {
                vendorpin_core::Error::InvalidPackageName { name, reason }
            }
            CargoError::InvalidUtf8 { url, source } => vendorpin_core::Error::InvalidResponse {
                url,
                reason: format!("invalid UTF-8: {}", source),
            },
            CargoError::MalformedRecord { url, line, source } => {
                vendorpin_core::Error::InvalidResponse {
                    url,
                    reason: format!("malformed record on line {}: {}", line, source),
                }
            }
            CargoError::VersionNotFound {
                crate_name,
                reference,
            } => vendorpin_core::Error::CannotResolveRevision {
                package: crate_name,
                reference,
                reason: "version is not listed in the crates.io index".into(),
            },
            CargoError::Core(e) => e,
        }
    }
}
