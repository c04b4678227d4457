//! Module path and version helpers for the Go module proxy protocol.

use crate::error::{GoError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum allowed module path length to prevent DoS
pub(crate) const MAX_MODULE_PATH_LENGTH: usize = 500;

/// Maximum allowed ref length
pub(crate) const MAX_REF_LENGTH: usize = 128;

/// Escapes a Go module path for proxy requests.
///
/// Rules:
/// - Uppercase ASCII letters → `!lowercase` (e.g., `User` → `!user`)
/// - Other characters outside the unreserved set are percent-encoded (RFC 3986)
///
/// # Examples
///
/// ```
/// use vendorpin_go::escape_module_path;
///
/// assert_eq!(
///     escape_module_path("github.com/User/Repo"),
///     "github.com/!user/!repo"
/// );
/// ```
pub fn escape_module_path(path: &str) -> String {
    let mut result = String::with_capacity(path.len() + 10);

    for c in path.chars() {
        if c.is_ascii_uppercase() {
            result.push('!');
            result.push(c.to_ascii_lowercase());
        } else if c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '.' | '_' | '~') {
            result.push(c);
        } else {
            let mut buf = [0u8; 4];
            for &byte in c.encode_utf8(&mut buf).as_bytes() {
                result.push_str(&format!("%{:02X}", byte));
            }
        }
    }

    result
}

/// Checks if a version string is a pseudo-version.
///
/// Pseudo-version format: `vX.Y.Z-yyyymmddhhmmss-abcdefabcdef`
///
/// # Examples
///
/// ```
/// use vendorpin_go::is_pseudo_version;
///
/// assert!(is_pseudo_version("v0.0.0-20191109021931-daa7c04131f5"));
/// assert!(!is_pseudo_version("v1.2.3"));
/// ```
pub fn is_pseudo_version(version: &str) -> bool {
    static PSEUDO_REGEX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^v[0-9]+\.(0\.0-|\d+\.\d+-([^+]*\.)?0\.)\d{14}-[A-Za-z0-9]+(\+.*)?$")
            .expect("valid pseudo-version regex")
    });

    PSEUDO_REGEX.is_match(version)
}

/// Validates a module path for length and basic format.
pub(crate) fn validate_module_path(module_path: &str) -> Result<()> {
    if module_path.is_empty() {
        return Err(GoError::invalid_module_path(
            module_path,
            "module path is empty",
        ));
    }

    if module_path.len() > MAX_MODULE_PATH_LENGTH {
        return Err(GoError::invalid_module_path(
            module_path,
            format!(
                "module path exceeds maximum length of {} characters",
                MAX_MODULE_PATH_LENGTH
            ),
        ));
    }

    if module_path.split('/').any(|segment| segment.is_empty() || segment == "..") {
        return Err(GoError::invalid_module_path(
            module_path,
            "module path has an empty or '..' segment",
        ));
    }

    Ok(())
}

/// Validates a ref before it is placed in a `.info` URL.
pub(crate) fn validate_ref(reference: &str) -> Result<()> {
    if reference.is_empty() {
        return Err(GoError::invalid_ref(reference, "ref is empty"));
    }

    if reference.len() > MAX_REF_LENGTH {
        return Err(GoError::invalid_ref(
            reference,
            format!("ref exceeds maximum length of {} characters", MAX_REF_LENGTH),
        ));
    }

    // Check for path traversal attempts
    if reference.contains("..") || reference.contains('/') || reference.contains('\\') {
        return Err(GoError::invalid_ref(
            reference,
            "ref contains invalid characters",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_module_path() {
        assert_eq!(
            escape_module_path("github.com/User/Repo"),
            "github.com/!user/!repo"
        );
        assert_eq!(
            escape_module_path("github.com/gin-gonic/gin"),
            "github.com/gin-gonic/gin"
        );
        assert_eq!(
            escape_module_path("github.com/MyUser/MyRepo"),
            "github.com/!my!user/!my!repo"
        );
    }

    #[test]
    fn test_escape_module_path_percent_encodes() {
        assert_eq!(escape_module_path("example.com/a b"), "example.com/a%20b");
        assert_eq!(escape_module_path("example.com/é"), "example.com/%C3%A9");
    }

    #[test]
    fn test_is_pseudo_version() {
        assert!(is_pseudo_version("v0.0.0-20191109021931-daa7c04131f5"));
        assert!(is_pseudo_version("v1.2.4-0.20191109021931-daa7c04131f5"));
        assert!(is_pseudo_version(
            "v2.0.1-0.20191109021931-daa7c04131f5+incompatible"
        ));
        assert!(!is_pseudo_version("v1.2.3"));
        assert!(!is_pseudo_version("v1.2.3-beta.1"));
    }

    #[test]
    fn test_validate_module_path() {
        assert!(validate_module_path("github.com/user/repo").is_ok());
        assert!(validate_module_path("").is_err());
        assert!(validate_module_path("github.com//repo").is_err());
        assert!(validate_module_path("github.com/../etc").is_err());

        let long_path = "a".repeat(MAX_MODULE_PATH_LENGTH + 1);
        assert!(matches!(
            validate_module_path(&long_path),
            Err(GoError::InvalidModulePath { .. })
        ));
    }

    #[test]
    fn test_validate_ref() {
        assert!(validate_ref("v1.0.0").is_ok());
        assert!(validate_ref("master").is_ok());
        assert!(validate_ref("v0.0.0-20191109021931-daa7c04131f5").is_ok());

        assert!(validate_ref("").is_err());
        assert!(validate_ref("v1.0.0/../etc/passwd").is_err());
        assert!(validate_ref("v1.0.0\\malicious").is_err());

        let long_ref = "v".to_string() + &"1".repeat(MAX_REF_LENGTH);
        assert!(matches!(
            validate_ref(&long_ref),
            Err(GoError::InvalidRef { .. })
        ));
    }
}
