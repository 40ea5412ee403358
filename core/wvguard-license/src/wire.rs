//! Payloads of the local action endpoint shared by the host and the
//! activation form.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// `action` value that activates a license.
pub const ACTIVATE_ACTION: &str = "wv_activate_license";

/// `action` value that deactivates a license.
pub const DEACTIVATE_ACTION: &str = "wv_deactivate_license";

/// Error code attached to failures reported by the licensing flow.
pub const LICENSE_ERROR_CODE: &str = "License";

/// Form-encoded body posted to the local action endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub license_key: String,
    #[serde(default)]
    pub plugin_slug: String,
    #[serde(default)]
    pub nonce: String,
}

/// JSON answer of the local action endpoint.
///
/// Failures carry `data: [{code, message}]`; successes carry an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
}

impl ActionResponse {
    #[must_use]
    pub fn success(data: Value) -> Self {
        Self { success: true, data }
    }

    #[must_use]
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: json!([{ "code": code, "message": message.into() }]),
        }
    }

    /// The message to show next to the form.
    ///
    /// Uses the first entry of a non-empty `data` array, else `data.message`,
    /// else `data` itself when it is a string.
    #[must_use]
    pub fn message(&self) -> String {
        let message = match &self.data {
            Value::Array(items) if !items.is_empty() => items[0].get("message"),
            Value::String(s) => return s.clone(),
            other => other.get("message"),
        };
        match message {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}
