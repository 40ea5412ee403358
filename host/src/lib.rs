//! Host shim for the wvguard license guard.
//!
//! Stands in for the application that embeds the guard: it owns the option
//! storage, runs the license requirement check at bootstrap and on lifecycle
//! events, dispatches the local action endpoint, and renders the plugin
//! listing row.

mod api;
mod header;
mod render;
mod state;

pub use api::{build_router, AJAX_PATH, LIFECYCLE_PATH, PLUGINS_PATH, UPDATE_METADATA_PATH};
pub use header::{plugin_header_version, read_plugin_version};
pub use render::escape_html;
pub use state::{HostState, LifecycleEvent};
