//! License key persistence.
//!
//! The host owns the actual persistent key-value mechanism ([`OptionStore`]);
//! [`LicenseStore`] only derives the per-slug key and reads/writes one string.

use crate::error::{LicenseError, LicenseResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const STORAGE_KEY_PREFIX: &str = "wv_";
const STORAGE_KEY_SUFFIX: &str = "_license_key";

/// Returns the option name a slug's license key is stored under.
#[must_use]
pub fn storage_key(plugin_slug: &str) -> String {
    format!("{STORAGE_KEY_PREFIX}{plugin_slug}{STORAGE_KEY_SUFFIX}")
}

/// Host-supplied persistent key-value storage.
pub trait OptionStore: Send + Sync {
    /// Reads an option, `None` if it was never set or has been deleted.
    fn get_option(&self, name: &str) -> LicenseResult<Option<String>>;

    /// Creates or replaces an option.
    fn update_option(&self, name: &str, value: &str) -> LicenseResult<()>;

    /// Removes an option. Removing a missing option is not an error.
    fn delete_option(&self, name: &str) -> LicenseResult<()>;
}

/// In-process [`OptionStore`].
#[derive(Debug, Default)]
pub struct MemoryOptions {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> LicenseResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| LicenseError::Storage("option map lock poisoned".to_string()))
    }
}

impl OptionStore for MemoryOptions {
    fn get_option(&self, name: &str) -> LicenseResult<Option<String>> {
        Ok(self.lock()?.get(name).cloned())
    }

    fn update_option(&self, name: &str, value: &str) -> LicenseResult<()> {
        self.lock()?.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete_option(&self, name: &str) -> LicenseResult<()> {
        self.lock()?.remove(name);
        Ok(())
    }
}

/// Stores at most one license key per integration slug.
#[derive(Clone)]
pub struct LicenseStore {
    options: Arc<dyn OptionStore>,
}

impl LicenseStore {
    pub fn new(options: Arc<dyn OptionStore>) -> Self {
        Self { options }
    }

    pub fn get(&self, plugin_slug: &str) -> LicenseResult<Option<String>> {
        self.options.get_option(&storage_key(plugin_slug))
    }

    /// Last write wins.
    pub fn set(&self, plugin_slug: &str, license_key: &str) -> LicenseResult<()> {
        self.options.update_option(&storage_key(plugin_slug), license_key)
    }

    pub fn delete(&self, plugin_slug: &str) -> LicenseResult<()> {
        self.options.delete_option(&storage_key(plugin_slug))
    }
}

impl std::fmt::Debug for LicenseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseStore").finish_non_exhaustive()
    }
}
