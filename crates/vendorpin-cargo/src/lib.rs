//! crates.io integration for vendorpin.
//!
//! This crate provides a [`VersionList`](vendorpin_core::VersionList) backed
//! by the crates.io sparse index and a
//! [`VersionResolver`](vendorpin_core::VersionResolver) that only accepts
//! versions the index knows about.
//!
//! # Features
//!
//! - Case-insensitive sparse index lookups (`1/`, `2/`, `3/a/`, `ab/cd/` shards)
//! - Optional filtering of pre-release and yanked versions
//! - Access to the full index records (dependencies and feature map)
//!
//! # Examples
//!
//! ```
//! use vendorpin_cargo::{IndexRecord, sparse_index_path};
//!
//! assert_eq!(sparse_index_path("serde"), "se/rd/serde");
//! let _records: Vec<IndexRecord> = vec![];
//! ```

pub mod error;
pub mod registry;
pub mod resolver;
pub mod types;

// Re-export commonly used types
pub use error::{CargoError, Result};
pub use registry::{SPARSE_INDEX_BASE, SparseIndexVersionList, parse_index, sparse_index_path};
pub use resolver::CratesIoVersionResolver;
pub use types::{IndexDependency, IndexRecord};
