//! Shared test helpers for license tests.

#![allow(dead_code)]

use std::sync::Arc;
use wiremock::MockServer;
use wvguard_license::{
    IntegrationConfig, LicenseClient, LicenseController, LicenseStore, MemoryOptions,
};

pub const PLUGIN_FILE: &str = "/var/www/wp-content/plugins/demo/demo.php";
pub const DOMAIN: &str = "shop.example.com";

/// Config for the `demo` plugin pointed at `api_url`.
pub fn test_config(api_url: &str) -> IntegrationConfig {
    IntegrationConfig::builder(PLUGIN_FILE, "1.4.2")
        .api_base_url(api_url)
        .build()
        .unwrap()
}

/// A controller backed by fresh in-memory options, plus the store it writes to.
pub fn controller_for(server: &MockServer) -> (LicenseController, LicenseStore) {
    controller_with_url(&server.uri())
}

pub fn controller_with_url(api_url: &str) -> (LicenseController, LicenseStore) {
    let config = test_config(api_url);
    let store = LicenseStore::new(Arc::new(MemoryOptions::new()));
    let client = LicenseClient::new(&config, DOMAIN).unwrap();
    (LicenseController::new(config, store.clone(), client), store)
}

/// A base URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/v1")
}
