//! Errors specific to npm registry lookups.

use thiserror::Error;

/// Errors specific to npm registry lookups.
#[derive(Error, Debug)]
pub enum NpmError {
    /// Package name cannot be used in a registry URL
    #[error("Invalid npm package name '{name}': {reason}")]
    InvalidPackageName { name: String, reason: String },

    /// Failed to deserialize the package document
    #[error("Failed to parse npm registry response at {url}: {source}")]
    InvalidMetadata {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Neither a version nor a dist-tag of that name exists
    #[error("Package '{package}' has no version or dist-tag '{reference}'")]
    VersionNotFound { package: String, reference: String },

    /// Transport or core error
    #[error(transparent)]
    Core(#[from] vendorpin_core::Error),
}

/// Result type alias for npm operations.
pub type Result<T> = std::result::Result<T, NpmError>;

impl NpmError {
    pub fn invalid_package_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPackageName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<NpmError> for vendorpin_core::Error {
    fn from(err: NpmError) -> Self {
        match err {
            NpmError::InvalidPackageName { name, reason } => {
                vendorpin_core::Error::InvalidPackageName { name, reason }
            }
            NpmError::InvalidMetadata { url, source } => vendorpin_core::Error::InvalidResponse {
                url,
                reason: source.to_string(),
            },
            NpmError::VersionNotFound { package, reference } => {
                vendorpin_core::Error::CannotResolveRevision {
                    package,
                    reference,
                    reason: "not a published version or dist-tag".into(),
                }
            }
            NpmError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NpmError::VersionNotFound {
            package: "left-pad".into(),
            reference: "next".into(),
        };
        insta::assert_snapshot!(err.to_string(), @"Package 'left-pad' has no version or dist-tag 'next'");
    }

    #[test]
    fn test_conversion() {
        let err: vendorpin_core::Error = NpmError::invalid_package_name("", "empty").into();
        assert!(err.is_configuration());

        let json_err = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err: vendorpin_core::Error = NpmError::InvalidMetadata {
            url: "https://registry.npmjs.org/x".into(),
            source: json_err,
        }
        .into();
        assert_eq!(err.url(), Some("https://registry.npmjs.org/x"));

        let err: vendorpin_core::Error = NpmError::VersionNotFound {
            package: "x".into(),
            reference: "9".into(),
        }
        .into();
        assert!(matches!(err, vendorpin_core::Error::CannotResolveRevision { .. }));
    }
}
