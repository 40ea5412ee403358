//! Integration configuration.
//!
//! An [`IntegrationConfig`] is derived once from the host's plugin metadata
//! (main plugin file and version header) and never mutated afterwards.

use crate::error::{LicenseError, LicenseResult};
use reqwest::Url;
use serde::Serialize;

/// Licensing API used when the integration does not configure its own.
pub const DEFAULT_API_BASE_URL: &str = "https://dist.anystack.sh/v1";

/// Returns true if `slug` is a non-empty run of `[A-Za-z0-9_-]`.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Immutable description of the integration being guarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationConfig {
    plugin_id: String,
    plugin_slug: String,
    plugin_version: String,
    api_base_url: String,
}

impl IntegrationConfig {
    /// Starts a builder from the plugin's main file path and version.
    pub fn builder(plugin_file: impl Into<String>, plugin_version: impl Into<String>) -> IntegrationConfigBuilder {
        IntegrationConfigBuilder {
            plugin_file: plugin_file.into(),
            plugin_version: plugin_version.into(),
            plugin_slug: None,
            api_base_url: None,
        }
    }

    /// Plugin identifier in `<dir>/<file>` form, e.g. `my-plugin/my-plugin.php`.
    #[must_use]
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Short slug, the plugin directory name.
    #[must_use]
    pub fn plugin_slug(&self) -> &str {
        &self.plugin_slug
    }

    #[must_use]
    pub fn plugin_version(&self) -> &str {
        &self.plugin_version
    }

    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

/// Builder for [`IntegrationConfig`] with explicit defaults.
#[derive(Debug, Clone)]
pub struct IntegrationConfigBuilder {
    plugin_file: String,
    plugin_version: String,
    plugin_slug: Option<String>,
    api_base_url: Option<String>,
}

impl IntegrationConfigBuilder {
    /// Overrides the licensing API base URL (default [`DEFAULT_API_BASE_URL`]).
    #[must_use]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Overrides the slug derived from the plugin directory.
    #[must_use]
    pub fn plugin_slug(mut self, slug: impl Into<String>) -> Self {
        self.plugin_slug = Some(slug.into());
        self
    }

    /// Derives the remaining fields and validates the result.
    pub fn build(self) -> LicenseResult<IntegrationConfig> {
        let normalized = self.plugin_file.replace('\\', "/");
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        if segments.len() < 2 {
            return Err(LicenseError::InvalidConfig(format!(
                "plugin file '{}' must live inside a plugin directory",
                self.plugin_file
            )));
        }

        let dir = segments[segments.len() - 2];
        let file = segments[segments.len() - 1];
        let plugin_id = format!("{dir}/{file}");
        let plugin_slug = self.plugin_slug.unwrap_or_else(|| dir.to_string());

        if !is_valid_slug(&plugin_slug) {
            return Err(LicenseError::InvalidConfig(format!(
                "plugin slug '{plugin_slug}' may only contain letters, digits, '-' and '_'"
            )));
        }

        let plugin_version = self.plugin_version.trim().to_string();
        if plugin_version.is_empty() {
            return Err(LicenseError::InvalidConfig("plugin version is empty".to_string()));
        }

        let api_base_url = self
            .api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let parsed = Url::parse(&api_base_url)
            .map_err(|e| LicenseError::InvalidConfig(format!("api base url '{api_base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(LicenseError::InvalidConfig(format!(
                "api base url '{api_base_url}' must use http or https"
            )));
        }

        Ok(IntegrationConfig {
            plugin_id,
            plugin_slug,
            plugin_version,
            api_base_url,
        })
    }
}
