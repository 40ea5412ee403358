//! Shared host state and lifecycle hooks.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};
use wvguard_license::{IntegrationConfig, LicenseClient, LicenseController, LicenseResult, LicenseStore};

/// Plugin lifecycle events that re-run the requirement check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    Bootstrap,
    Activate,
    Deactivate,
}

/// State shared by every request.
///
/// Holds only immutable config, the store handle, the HTTP client and the
/// requirement flag; each request builds its own [`LicenseController`].
#[derive(Debug)]
pub struct HostState {
    config: IntegrationConfig,
    store: LicenseStore,
    client: LicenseClient,
    nonce: String,
    license_required: AtomicBool,
}

impl HostState {
    pub fn new(config: IntegrationConfig, store: LicenseStore, client: LicenseClient) -> Self {
        Self {
            config,
            store,
            client,
            nonce: uuid::Uuid::new_v4().simple().to_string(),
            license_required: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Nonce embedded in the activation form and checked by the action endpoint.
    #[must_use]
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Whether the last requirement check enabled the license affordances.
    #[must_use]
    pub fn license_required(&self) -> bool {
        self.license_required.load(Ordering::SeqCst)
    }

    /// A fresh request-scoped controller.
    #[must_use]
    pub fn controller(&self) -> LicenseController {
        LicenseController::new(self.config.clone(), self.store.clone(), self.client.clone())
    }

    /// Runs the requirement check for a lifecycle event and records the answer.
    ///
    /// On failure the previous answer is kept.
    pub async fn on_lifecycle(&self, event: LifecycleEvent) -> LicenseResult<bool> {
        let mut controller = self.controller();
        match controller.check_requirement().await {
            Ok(required) => {
                self.license_required.store(required, Ordering::SeqCst);
                info!(?event, required, plugin = %self.config.plugin_slug(), "License requirement updated");
                Ok(required)
            }
            Err(e) => {
                warn!(?event, error = %e, "License requirement check failed");
                Err(e)
            }
        }
    }
}
