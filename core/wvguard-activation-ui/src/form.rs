//! The activation form and its submit flow.

use crate::error::{UiError, UiResult};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;
use wvguard_license::wire::{ActionRequest, ActionResponse, ACTIVATE_ACTION};

/// What the user currently sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    /// License input and activate button are disabled.
    pub controls_disabled: bool,
    /// Message shown above the input, once one has been received.
    pub message: Option<String>,
    /// The form row is visible.
    pub form_visible: bool,
    /// The page should be reloaded to show the licensed row.
    pub reload_requested: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            controls_disabled: false,
            message: None,
            form_visible: true,
            reload_requested: false,
        }
    }
}

/// One activation form bound to a plugin row.
#[derive(Debug)]
pub struct ActivationForm {
    http: Client,
    ajax_url: String,
    nonce: String,
    plugin_slug: String,
    state: FormState,
}

impl ActivationForm {
    /// Binds a form to the endpoint, using the nonce and slug the page
    /// rendered into the form's data attributes.
    pub fn new(ajax_url: impl Into<String>, nonce: impl Into<String>, plugin_slug: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), ajax_url, nonce, plugin_slug)
    }

    pub fn with_http_client(
        http: Client,
        ajax_url: impl Into<String>,
        nonce: impl Into<String>,
        plugin_slug: impl Into<String>,
    ) -> Self {
        Self {
            http,
            ajax_url: ajax_url.into(),
            nonce: nonce.into(),
            plugin_slug: plugin_slug.into(),
            state: FormState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    #[must_use]
    pub fn plugin_slug(&self) -> &str {
        &self.plugin_slug
    }

    /// Submits `license_key` for activation.
    ///
    /// Rejected with [`UiError::Busy`] while the controls are disabled. On a
    /// decoded response the controls are re-enabled and the message shown; a
    /// successful activation also hides the form and requests a reload.
    pub async fn submit(&mut self, license_key: &str) -> UiResult<ActionResponse> {
        if self.state.controls_disabled {
            return Err(UiError::Busy);
        }
        self.state.controls_disabled = true;

        let request = ActionRequest {
            action: ACTIVATE_ACTION.to_string(),
            license_key: license_key.to_string(),
            plugin_slug: self.plugin_slug.clone(),
            nonce: self.nonce.clone(),
        };

        debug!(plugin_slug = %self.plugin_slug, "Submitting license activation");

        let response = self
            .http
            .post(&self.ajax_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| UiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UiError::Protocol(format!("endpoint answered {status}")));
        }

        let body: ActionResponse = response
            .json()
            .await
            .map_err(|e| UiError::Protocol(e.to_string()))?;

        self.render(&body);
        Ok(body)
    }

    fn render(&mut self, response: &ActionResponse) {
        self.state.controls_disabled = false;
        self.state.message = Some(response.message());

        if response.success {
            self.state.form_visible = false;
            self.state.reload_requested = true;
        }
    }
}
