//! HTTP client for the remote licensing API.
//!
//! Every call is a GET against the API base URL with all parameters in the
//! query string. The server answers with JSON; anything else is a
//! [`LicenseError::Protocol`].

use crate::config::IntegrationConfig;
use crate::error::{LicenseError, LicenseResult};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

const MALFORMED_RESPONSE: &str =
    "the query to retrieve the license data returned a malformed response";

/// Ordered query parameters; setting an existing name replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`QueryParams::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Applies `overrides` on top of `self`; overrides win on collision.
    pub fn merge(&mut self, overrides: QueryParams) {
        for (name, value) in overrides.pairs {
            self.set(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Server-reported license metadata.
///
/// Only `license_required`, `license_key` and `message` are interpreted; every
/// other field is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseMetadata {
    fields: Map<String, Value>,
}

impl LicenseMetadata {
    /// Wraps a decoded body. Non-object JSON carries no fields.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// Whether the server says this plugin needs a license.
    #[must_use]
    pub fn license_required(&self) -> bool {
        self.fields.get("license_required").is_some_and(is_truthy)
    }

    /// The activated key, if the server returned a non-null one.
    #[must_use]
    pub fn license_key(&self) -> Option<&Value> {
        self.fields.get("license_key").filter(|v| !v.is_null())
    }

    /// The server's human-readable message, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self.fields.get("message")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Loose truthiness, the way the licensing server's flags are written.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

/// Identity sent with every query: who is asking and with which key.
#[derive(Debug, Clone, Copy)]
pub struct QueryBase<'a> {
    pub plugin_slug: &'a str,
    pub license_key: &'a str,
}

/// Client for the remote licensing API.
#[derive(Debug, Clone)]
pub struct LicenseClient {
    http: Client,
    api_base_url: String,
    domain: String,
    version: String,
}

impl LicenseClient {
    /// Creates a client for the given integration, reporting `domain` as the
    /// installation's server name.
    pub fn new(config: &IntegrationConfig, domain: impl Into<String>) -> LicenseResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| LicenseError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self::with_http_client(config, domain, http))
    }

    /// Creates a client sharing an existing `reqwest` client.
    pub fn with_http_client(config: &IntegrationConfig, domain: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            api_base_url: config.api_base_url().to_string(),
            domain: domain.into(),
            version: config.plugin_version().to_string(),
        }
    }

    /// Base parameter set merged under every query's overrides.
    #[must_use]
    pub fn base_params(&self, base: QueryBase<'_>, action: &str) -> QueryParams {
        QueryParams::new()
            .with("plugin_slug", base.plugin_slug)
            .with("license_key", base.license_key)
            .with("domain", self.domain.as_str())
            .with("version", self.version.as_str())
            .with("action", action)
    }

    /// Builds the full request URL without sending it.
    pub fn request_url(&self, base: QueryBase<'_>, action: &str, overrides: QueryParams) -> LicenseResult<Url> {
        let mut params = self.base_params(base, action);
        params.merge(overrides);

        let mut url = Url::parse(&with_trailing_slash(&self.api_base_url))
            .map_err(|e| LicenseError::InvalidConfig(format!("api base url: {e}")))?;
        url.query_pairs_mut().extend_pairs(params.iter());
        Ok(url)
    }

    /// Sends `action` to the licensing server and decodes the JSON answer.
    ///
    /// Non-2xx statuses are not errors: their bodies are decoded like any other.
    pub async fn query(
        &self,
        base: QueryBase<'_>,
        action: &str,
        overrides: QueryParams,
    ) -> LicenseResult<LicenseMetadata> {
        let url = self.request_url(base, action, overrides)?;
        debug!(action, plugin_slug = base.plugin_slug, "Querying license server");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LicenseError::Network(format!("license server request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LicenseError::Network(format!("failed to read license server response: {e}")))?;

        if !status.is_success() {
            debug!(action, %status, "License server answered with non-success status");
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| LicenseError::Protocol(format!("{MALFORMED_RESPONSE}: {e}")))?;

        Ok(LicenseMetadata::from_value(value))
    }
}

fn with_trailing_slash(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}
