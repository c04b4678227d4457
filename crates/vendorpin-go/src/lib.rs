//! Go module proxy support for vendorpin.
//!
//! This crate lists and resolves versions of Go modules through the module
//! proxy protocol (`proxy.golang.org` by default).
//!
//! # Features
//!
//! - Case-encoded module paths (`github.com/User/Repo` → `github.com/!user/!repo`)
//! - `@v/list` listing with `@latest` fallback for modules without tags
//! - `.info` lookups for tags, branches and commits, including `Origin` data
//! - Pseudo-version detection
//!
//! # Example
//!
//! ```
//! use vendorpin_go::{escape_module_path, is_pseudo_version};
//!
//! assert_eq!(escape_module_path("github.com/BurntSushi/toml"), "github.com/!burnt!sushi/toml");
//! assert!(is_pseudo_version("v0.0.0-20191109021931-daa7c04131f5"));
//! ```

pub mod error;
pub mod registry;
pub mod resolver;
pub mod types;
pub mod version;

// Re-export commonly used types
pub use error::{GoError, Result};
pub use registry::{GoProxyVersionList, PROXY_BASE, parse_version_list};
pub use resolver::GoProxyVersionResolver;
pub use types::{GoOrigin, GoVersionInfo};
pub use version::{escape_module_path, is_pseudo_version};
