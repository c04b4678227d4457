//! Common test utilities for integration tests.
//!
//! Builds import configurations that talk to a local mock registry.

use vendorpin::config::{HttpConfig, ImportConfig, RegistryConfig, SourceConfig};

/// Configuration pointing at `server` over plain HTTP.
pub(crate) fn config_for(
    server: &mockito::ServerGuard,
    source: SourceConfig,
    url_template: &str,
    requirement: Option<&str>,
) -> ImportConfig {
    ImportConfig {
        source,
        url_template: url_template.to_string(),
        requirement: requirement.map(str::to_string),
        registry: RegistryConfig {
            base_url: Some(server.url()),
        },
        http: HttpConfig {
            require_https: false,
            ..HttpConfig::default()
        },
        ..ImportConfig::default()
    }
}
