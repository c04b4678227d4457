//! Pin an externally-versioned archive to a concrete version and URL.
//!
//! [`ArchiveImport`] ties together a registry
//! [`VersionList`](vendorpin_core::VersionList), a
//! [`RequirementSelector`](vendorpin_core::RequirementSelector) and a
//! [`VersionResolver`](vendorpin_core::VersionResolver), all built from an
//! [`ImportConfig`](config::ImportConfig).
//!
//! # Examples
//!
//! ```
//! use vendorpin::ArchiveImport;
//! use vendorpin::config::ImportConfig;
//!
//! # tokio_test::block_on(async {
//! let config: ImportConfig = serde_json::from_str(
//!     r#"{"url_template": "https://example.com/archive.tar.gz"}"#,
//! ).unwrap();
//!
//! let import = ArchiveImport::from_config(&config).unwrap();
//! let revision = import.resolve(None).await.unwrap();
//! assert_eq!(revision.version, "");
//! assert_eq!(revision.url, "https://example.com/archive.tar.gz");
//! # });
//! ```

pub mod config;
pub mod import;

// Re-export commonly used types
pub use config::{HttpConfig, ImportConfig, LatestVersionConfig, RegistryConfig, SourceConfig};
pub use import::ArchiveImport;
pub use vendorpin_core::{Error, Result, Revision};
