//! crates.io sparse index client.
//!
//! Version lookups use the sparse index protocol (<https://index.crates.io>):
//! one GET of a newline-delimited JSON file per crate, memoized per instance.
//!
//! # Examples
//!
//! ```no_run
//! use vendorpin_cargo::SparseIndexVersionList;
//! use vendorpin_core::{HttpClient, VersionList};
//!
//! #[tokio::main]
//! async fn main() {
//!     let list = SparseIndexVersionList::new("serde", HttpClient::new().shared()).unwrap();
//!
//!     let versions = list.list().await.unwrap();
//!     println!("serde has {} releases", versions.len());
//! }
//! ```

use crate::error::{CargoError, Result};
use crate::types::IndexRecord;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use vendorpin_core::{HttpFetch, SemanticVersion, VersionList};

/// Default sparse index root.
pub const SPARSE_INDEX_BASE: &str = "https://index.crates.io";

/// crates.io refuses names longer than this.
const MAX_CRATE_NAME_LENGTH: usize = 64;

/// Validates a crate name before it is turned into an index path.
fn validate_crate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CargoError::invalid_crate_name(name, "crate name is empty"));
    }

    if name.len() > MAX_CRATE_NAME_LENGTH {
        return Err(CargoError::invalid_crate_name(
            name,
            format!(
                "crate name exceeds maximum length of {} characters",
                MAX_CRATE_NAME_LENGTH
            ),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CargoError::invalid_crate_name(
            name,
            "only ASCII letters, digits, '-' and '_' are allowed",
        ));
    }

    Ok(())
}

/// Converts a crate name to its sparse index path.
///
/// Based on Cargo RFC 2789 specification:
/// - 1 char: "1/{name}"
/// - 2 chars: "2/{name}"
/// - 3 chars: "3/{first_char}/{name}"
/// - 4+ chars: "{first_2}/{next_2}/{name}"
///
/// The index is case-insensitive, so the path is always lower-cased.
///
/// # Examples
///
/// ```
/// use vendorpin_cargo::sparse_index_path;
///
/// assert_eq!(sparse_index_path("Serde"), "se/rd/serde");
/// assert_eq!(sparse_index_path("abc"), "3/a/abc");
/// ```
pub fn sparse_index_path(name: &str) -> String {
    let name_lower = name.to_ascii_lowercase();
    match name_lower.len() {
        1 => format!("1/{}", name_lower),
        2 => format!("2/{}", name_lower),
        3 => format!("3/{}/{}", &name_lower[0..1], name_lower),
        _ => format!("{}/{}/{}", &name_lower[0..2], &name_lower[2..4], name_lower),
    }
}

/// Parses newline-delimited JSON from the sparse index.
///
/// Blank lines are skipped. Any malformed line fails the whole parse, and the
/// error names `url` and the 1-based line number.
pub fn parse_index(data: &[u8], url: &str) -> Result<Vec<IndexRecord>> {
    let content = std::str::from_utf8(data).map_err(|e| CargoError::InvalidUtf8 {
        url: url.to_string(),
        source: e,
    })?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<IndexRecord>(line).map_err(|e| CargoError::MalformedRecord {
                url: url.to_string(),
                line: index + 1,
                source: e,
            })
        })
        .collect()
}

/// Unparseable version strings are kept; the selector decides what to do with them.
fn is_prerelease(version: &str) -> bool {
    SemanticVersion::parse(version).is_ok_and(|v| v.is_prerelease())
}

/// Version list of a single crate, read from the crates.io sparse index.
///
/// Pre-release versions are excluded unless [`include_prereleases`] is set.
/// Yanked versions are listed unless [`ignore_yanked`] is set.
///
/// [`include_prereleases`]: SparseIndexVersionList::include_prereleases
/// [`ignore_yanked`]: SparseIndexVersionList::ignore_yanked
pub struct SparseIndexVersionList {
    crate_name: String,
    base_url: String,
    http: Arc<dyn HttpFetch>,
    include_prereleases: bool,
    ignore_yanked: bool,
    records: OnceCell<Vec<IndexRecord>>,
}

impl SparseIndexVersionList {
    /// Creates a list for `crate_name` against the public crates.io index.
    ///
    /// # Errors
    ///
    /// Returns [`CargoError::InvalidCrateName`] if the name is empty, too
    /// long, or contains characters crates.io does not allow.
    pub fn new(crate_name: impl Into<String>, http: Arc<dyn HttpFetch>) -> Result<Self> {
        let crate_name = crate_name.into();
        validate_crate_name(&crate_name)?;

        Ok(Self {
            crate_name,
            base_url: SPARSE_INDEX_BASE.to_string(),
            http,
            include_prereleases: false,
            ignore_yanked: false,
            records: OnceCell::new(),
        })
    }

    /// Points the list at an alternative sparse index root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn include_prereleases(mut self, include: bool) -> Self {
        self.include_prereleases = include;
        self
    }

    pub fn ignore_yanked(mut self, ignore: bool) -> Self {
        self.ignore_yanked = ignore;
        self
    }

    pub fn crate_name(&self) -> &str {
        &self.crate_name
    }

    /// Full URL of the index file for this crate.
    pub fn index_url(&self) -> String {
        format!("{}/{}", self.base_url, sparse_index_path(&self.crate_name))
    }

    /// Every record of the index file, including yanked and pre-release
    /// versions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the file cannot be parsed.
    /// A failure is not memoized; the next call fetches again.
    pub async fn records(&self) -> Result<&[IndexRecord]> {
        self.records
            .get_or_try_init(|| self.fetch_records())
            .await
            .map(Vec::as_slice)
    }

    async fn fetch_records(&self) -> Result<Vec<IndexRecord>> {
        let url = self.index_url();
        tracing::debug!("fetching crates.io index for {}: {}", self.crate_name, url);

        let data = self.http.fetch(&url).await?;
        parse_index(&data, &url)
    }
}

#[async_trait]
impl VersionList for SparseIndexVersionList {
    fn name(&self) -> &str {
        &self.crate_name
    }

    async fn list(&self) -> vendorpin_core::Result<BTreeSet<String>> {
        let records = self.records().await?;

        Ok(records
            .iter()
            .filter(|record| !(self.ignore_yanked && record.yanked))
            .filter(|record| self.include_prereleases || !is_prerelease(&record.vers))
            .map(|record| record.vers.clone())
            .collect())
    }
}

impl std::fmt::Debug for SparseIndexVersionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseIndexVersionList")
            .field("crate_name", &self.crate_name)
            .field("base_url", &self.base_url)
            .field("include_prereleases", &self.include_prereleases)
            .field("ignore_yanked", &self.ignore_yanked)
            .finish_non_exhaustive()
    }
}
