//! License state orchestration for one integration.
//!
//! The controller is request-scoped: the host builds one per request over the
//! shared config, store and HTTP client. It never re-validates a stored key on
//! its own; only an explicit activation or deactivation changes what is stored.

use crate::client::{LicenseClient, LicenseMetadata, QueryBase, QueryParams};
use crate::config::IntegrationConfig;
use crate::error::{LicenseError, LicenseResult};
use crate::key;
use crate::presentation::{self, LicenseAction, RowDecision, RowMeta};
use crate::store::LicenseStore;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Key sent when asking whether a license is needed at all.
const PLACEHOLDER_LICENSE_KEY: &str = "1";

const FALLBACK_FAILURE_MESSAGE: &str = "The license could not be activated.";

/// License status of the integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseState {
    /// No key stored, or no license required.
    Unlicensed,
    /// The activation form is on screen. Never persisted.
    ActivationPending,
    /// A key is stored and assumed valid.
    Licensed,
}

/// Outcome of an activation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivationResult {
    Success {
        license_key: String,
        metadata: LicenseMetadata,
    },
    Failure {
        message: String,
    },
}

impl ActivationResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Converts a failure into [`LicenseError::Validation`].
    pub fn into_result(self) -> LicenseResult<LicenseMetadata> {
        match self {
            Self::Success { metadata, .. } => Ok(metadata),
            Self::Failure { message } => Err(LicenseError::Validation(message)),
        }
    }
}

/// Drives license requirement checks, activation and deactivation.
#[derive(Debug)]
pub struct LicenseController {
    config: IntegrationConfig,
    plugin_slug: String,
    store: LicenseStore,
    client: LicenseClient,
    active: bool,
}

impl LicenseController {
    pub fn new(config: IntegrationConfig, store: LicenseStore, client: LicenseClient) -> Self {
        let plugin_slug = config.plugin_slug().to_string();
        Self {
            config,
            plugin_slug,
            store,
            client,
            active: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Slug used for storage and queries in this request.
    #[must_use]
    pub fn plugin_slug(&self) -> &str {
        &self.plugin_slug
    }

    /// Whether [`check_requirement`](Self::check_requirement) enabled the
    /// license affordances.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Asks the server whether this plugin requires a license and, if so,
    /// enables the license affordances. Returns the server's answer.
    pub async fn check_requirement(&mut self) -> LicenseResult<bool> {
        let metadata = self
            .client
            .query(
                self.query_base(PLACEHOLDER_LICENSE_KEY),
                "get_metadata",
                QueryParams::new().with("license_key", PLACEHOLDER_LICENSE_KEY),
            )
            .await?;

        let required = metadata.license_required();
        if required {
            self.active = true;
        }
        debug!(plugin_slug = %self.plugin_slug, required, "License requirement checked");
        Ok(required)
    }

    /// Activates `license_key` for `plugin_slug`.
    ///
    /// `plugin_slug` replaces the controller's slug for the rest of this
    /// request and is trusted as given. A server answer without a license key
    /// deletes any stored key. Remote failures become a [`ActivationResult::Failure`]
    /// and leave storage untouched; storage failures are returned as errors.
    pub async fn activate(&mut self, license_key: &str, plugin_slug: &str) -> LicenseResult<ActivationResult> {
        self.plugin_slug = plugin_slug.to_string();

        let response = self
            .client
            .query(
                self.query_base(license_key),
                "activate",
                QueryParams::new()
                    .with("license_key", license_key)
                    .with("plugin_slug", plugin_slug),
            )
            .await;

        let metadata = match response {
            Ok(metadata) => metadata,
            Err(e) if e.is_remote() => {
                debug!(plugin_slug, error = %e, "Activation request failed");
                return Ok(ActivationResult::Failure { message: e.to_string() });
            }
            Err(e) => return Err(e),
        };

        let Some(returned_key) = metadata.license_key() else {
            self.store.delete(&self.plugin_slug)?;
            let message = metadata
                .message()
                .unwrap_or_else(|| FALLBACK_FAILURE_MESSAGE.to_string());
            info!(plugin_slug, "License activation rejected");
            return Ok(ActivationResult::Failure { message });
        };

        let stored = returned_key
            .as_str()
            .map_or_else(|| license_key.to_string(), str::to_string);
        self.store.set(&self.plugin_slug, &stored)?;
        info!(plugin_slug, license = %key::obfuscate(&stored), "License activated");

        Ok(ActivationResult::Success {
            license_key: stored,
            metadata,
        })
    }

    /// Deactivates the stored license.
    ///
    /// Returns `false` without contacting the server when nothing is stored.
    /// The server's answer is not inspected; the local key is deleted once the
    /// call returns. A transport or body error is returned before the delete,
    /// so the key stays.
    pub async fn deactivate(&mut self) -> LicenseResult<bool> {
        let Some(stored) = self.stored_key()? else {
            return Ok(false);
        };

        self.client
            .query(self.query_base(&stored), "deactivate", QueryParams::new())
            .await?;
        self.store.delete(&self.plugin_slug)?;
        info!(plugin_slug = %self.plugin_slug, "License deactivated");

        Ok(true)
    }

    /// True iff a non-empty key is stored for the current slug.
    pub fn status(&self) -> LicenseResult<bool> {
        Ok(self.stored_key()?.is_some())
    }

    /// Current [`LicenseState`]; `form_shown` reports whether the activation
    /// form is on screen.
    pub fn state(&self, form_shown: bool) -> LicenseResult<LicenseState> {
        Ok(match (self.status()?, form_shown) {
            (true, _) => LicenseState::Licensed,
            (false, true) => LicenseState::ActivationPending,
            (false, false) => LicenseState::Unlicensed,
        })
    }

    /// The stored key for display, optionally masked. Empty when none is stored.
    pub fn display_key(&self, obfuscate: bool) -> LicenseResult<String> {
        Ok(self
            .store
            .get(&self.plugin_slug)?
            .map(|stored| key::display_key(&stored, obfuscate))
            .unwrap_or_default())
    }

    /// [`presentation::decide`] for this controller's slug and status.
    pub fn decide(&self, target_slug: &str, action: Option<LicenseAction>) -> LicenseResult<RowDecision> {
        let decision = presentation::decide(target_slug, &self.plugin_slug, action, self.status()?);
        debug!(target_slug, ?action, ?decision, "Listing row decision");
        Ok(decision)
    }

    /// Extra entries for the listing row of `plugin_id`; empty for other plugins.
    pub fn row_meta(&self, plugin_id: &str) -> LicenseResult<Vec<RowMeta>> {
        if plugin_id != self.config.plugin_id() {
            return Ok(Vec::new());
        }

        let slug = self.config.plugin_slug();
        if self.status()? {
            Ok(vec![
                RowMeta::action_link(LicenseAction::Deactivate, slug),
                RowMeta::Text {
                    text: self.display_key(true)?,
                },
            ])
        } else {
            Ok(vec![RowMeta::action_link(LicenseAction::Activate, slug)])
        }
    }

    /// The `get_metadata` URL carrying the stored key, for the update checker.
    pub fn update_metadata_url(&self) -> LicenseResult<Url> {
        let stored = self.stored_key()?.unwrap_or_default();
        self.client.request_url(
            QueryBase {
                plugin_slug: &self.plugin_slug,
                license_key: &stored,
            },
            "get_metadata",
            QueryParams::new(),
        )
    }

    fn stored_key(&self) -> LicenseResult<Option<String>> {
        Ok(self
            .store
            .get(&self.plugin_slug)?
            .filter(|k| !k.is_empty()))
    }

    fn query_base<'a>(&'a self, license_key: &'a str) -> QueryBase<'a> {
        QueryBase {
            plugin_slug: &self.plugin_slug,
            license_key,
        }
    }
}
