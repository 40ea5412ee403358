//! License activation and remote validation for wvguard integrations.
//!
//! This crate handles:
//! - Asking the licensing server whether an integration needs a license at all
//! - Activating and deactivating a license key against the server
//! - Persisting the single activation key per integration slug
//! - Deciding what the plugin listing page shows for the integration
//!
//! # Design Principles
//!
//! - **Proxy, don't verify**: the remote server is the only authority; a stored
//!   key is trusted until a deactivation or a failed re-activation clears it
//! - **No retries**: every remote call is user-triggered, so the user retries
//! - **Explicit inputs**: request-scoped values (domain, query parameters) are
//!   passed in, never read from ambient state
//!
//! # Storage Key Format
//!
//! Keys are stored under `wv_<plugin_slug>_license_key` in a host-supplied
//! [`OptionStore`].

mod client;
mod config;
mod controller;
mod error;
mod key;
mod presentation;
mod store;
pub mod wire;

pub use client::{LicenseClient, LicenseMetadata, QueryBase, QueryParams};
pub use config::{
    is_valid_slug, IntegrationConfig, IntegrationConfigBuilder, DEFAULT_API_BASE_URL,
};
pub use controller::{ActivationResult, LicenseController, LicenseState};
pub use error::{LicenseError, LicenseResult};
pub use key::{display_key, obfuscate, OBFUSCATED_SEGMENT};
pub use presentation::{decide, LicenseAction, RowDecision, RowMeta};
pub use store::{storage_key, LicenseStore, MemoryOptions, OptionStore};
