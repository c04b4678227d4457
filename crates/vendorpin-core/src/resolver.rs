//! Turning a requested ref into a concrete, URL-templated [`Revision`].

use crate::error::{Error, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Placeholder substituted by [`UrlTemplate`].
pub const VERSION_PLACEHOLDER: &str = "${VERSION}";

static TEMPLATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").expect("valid template token regex"));

/// Builds the archive URL for a version, or `None` when it cannot.
pub type Assembler = dyn Fn(&str) -> Option<String> + Send + Sync;

/// A resolved `{version, url}` pair.
///
/// `version` is empty for versionless imports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision {
    pub version: String,
    pub url: String,
}

impl Revision {
    pub fn new(version: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.url)
        } else {
            write!(f, "{} ({})", self.version, self.url)
        }
    }
}

/// Resolves a ref to a [`Revision`].
///
/// `assemble` builds the archive URL for a version; it returns `None` when
/// no URL can be produced for that version.
#[async_trait]
pub trait VersionResolver: Send + Sync {
    /// # Errors
    ///
    /// - [`Error::CannotResolveRevision`] when the registry does not know the ref
    /// - [`Error::AssemblyFailed`] when `assemble` yields no URL
    /// - fetch-level errors from the registry lookup
    async fn resolve(
        &self,
        reference: &str,
        assemble: &Assembler,
    ) -> Result<Revision>;
}

/// Builds a [`Revision`] from `version`, or fails naming both the original
/// ref and the version that was tried.
pub fn assemble_revision(
    reference: &str,
    version: &str,
    assemble: &Assembler,
) -> Result<Revision> {
    let url = assemble(version).ok_or_else(|| Error::AssemblyFailed {
        reference: reference.to_string(),
        version: version.to_string(),
    })?;
    tracing::info!("resolved {} to {}", reference, url);
    Ok(Revision::new(version, url))
}

/// Archive URL template with at most one `${VERSION}` placeholder.
///
/// # Examples
///
/// ```
/// use vendorpin_core::UrlTemplate;
///
/// let template = UrlTemplate::new("https://example.com/foo-${VERSION}.tar.gz").unwrap();
/// assert_eq!(template.fill("1.2.3"), "https://example.com/foo-1.2.3.tar.gz");
///
/// assert!(UrlTemplate::new("https://example.com/${NAME}.zip").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrlTemplate`] when the template is empty,
    /// contains any `${...}` token other than `${VERSION}`, or repeats the
    /// placeholder.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let invalid = |reason: String| Error::InvalidUrlTemplate {
            template: template.clone(),
            reason,
        };

        if template.trim().is_empty() {
            return Err(invalid("template is empty".into()));
        }

        let mut placeholders = 0;
        for caps in TEMPLATE_TOKEN.captures_iter(&template) {
            match &caps[1] {
                "VERSION" => placeholders += 1,
                other => {
                    return Err(invalid(format!(
                        "unsupported placeholder '${{{}}}', only {} is substituted",
                        other, VERSION_PLACEHOLDER
                    )));
                }
            }
        }
        if placeholders > 1 {
            return Err(invalid(format!(
                "{} may appear at most once",
                VERSION_PLACEHOLDER
            )));
        }

        Ok(Self { template })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Whether the template depends on the version at all.
    pub fn has_placeholder(&self) -> bool {
        self.template.contains(VERSION_PLACEHOLDER)
    }

    /// Substitutes `version` for the placeholder.
    pub fn fill(&self, version: &str) -> String {
        self.template.replace(VERSION_PLACEHOLDER, version)
    }

    /// Returns an assembly function bound to this template.
    pub fn assembler(&self) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
        let template = self.clone();
        move |version| Some(template.fill(version))
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Resolver that takes the ref at face value and only assembles the URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateResolver;

#[async_trait]
impl VersionResolver for TemplateResolver {
    async fn resolve(
        &self,
        reference: &str,
        assemble: &Assembler,
    ) -> Result<Revision> {
        assemble_revision(reference, reference, assemble)
    }
}

/// Shared handle to a resolver.
pub type SharedResolver = Arc<dyn VersionResolver>;
