//! SQLite options table for wvguard.
//!
//! Plays the role of the host application's persistent option storage: a
//! single `options` table mapping option names to string values. License keys
//! end up here through [`wvguard_license::LicenseStore`].

mod error;
mod options;

pub use error::{StorageError, StorageResult};
pub use options::SqliteOptions;
