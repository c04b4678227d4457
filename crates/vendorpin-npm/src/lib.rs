//! npm registry support for vendorpin.
//!
//! Lists the published versions of a package and resolves versions or
//! dist-tags to the tarball URL recorded by the registry.

pub mod error;
pub mod registry;
pub mod resolver;
pub mod types;

pub use error::{NpmError, Result};
pub use registry::{NpmVersionList, REGISTRY_BASE, package_path};
pub use resolver::NpmVersionResolver;
pub use types::{NpmDist, NpmPackageDocument, NpmVersionMetadata};
