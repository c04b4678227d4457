//! Core abstractions for vendorpin.
//!
//! This crate provides the version requirement and resolution engine shared
//! by every registry adapter (crates.io, Go module proxy, npm).
//!
//! # Architecture
//!
//! vendorpin-core defines:
//! - **Values**: [`SemanticVersion`], [`VersionRequirement`], [`Revision`], [`UrlTemplate`]
//! - **Selectors**: [`RequirementSelector`], [`LatestVersionSelector`]
//! - **Traits**: [`VersionList`], [`VersionSelector`], [`VersionResolver`], [`HttpFetch`]
//! - **Error Types**: one error enum with configuration/transient classification
//!
//! # Examples
//!
//! Selecting and resolving against an in-memory catalog:
//!
//! ```
//! use vendorpin_core::{
//!     RequirementSelector, StaticVersionList, TemplateResolver, UrlTemplate, VersionResolver,
//!     VersionSelector,
//! };
//!
//! # tokio_test::block_on(async {
//! let list = StaticVersionList::new("foo", ["0.2.3", "0.5.0", "0.5.9", "1.2.3"]);
//! let selector = RequirementSelector::new("0.5").unwrap();
//! let version = selector.select(&list, None).await.unwrap().unwrap();
//!
//! let template = UrlTemplate::new("https://example.com/foo-${VERSION}.tar.gz").unwrap();
//! let revision = TemplateResolver
//!     .resolve(&version, &template.assembler())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(revision.version, "0.5.9");
//! assert_eq!(revision.url, "https://example.com/foo-0.5.9.tar.gz");
//! # });
//! ```

pub mod error;
pub mod http;
pub mod latest;
pub mod requirement;
pub mod resolver;
pub mod selector;
pub mod version;
pub mod version_list;

// Re-export commonly used types
pub use error::{Error, Result};
pub use http::{FetchConfig, HttpClient, HttpFetch};
pub use latest::{LatestVersionSelector, VersionElementType};
pub use requirement::{ComparisonOp, RequirementMode, VersionRequirement};
pub use resolver::{
    Assembler, Revision, SharedResolver, TemplateResolver, UrlTemplate, VersionResolver,
    assemble_revision,
};
pub use selector::{RequirementSelector, VersionSelector};
pub use version::SemanticVersion;
pub use version_list::{StaticVersionList, VersionList};
