//! Plugin file header parsing.

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Extracts the `Version:` value from a plugin file's header comment.
///
/// Only the leading comment block is considered, the way the host reads its
/// plugin metadata.
#[must_use]
pub fn plugin_header_version(contents: &str) -> Option<String> {
    contents
        .lines()
        .take(64)
        .map(|line| line.trim_start().trim_start_matches(['/', '*', '#']).trim())
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("version") {
                let value = value.trim();
                (!value.is_empty()).then(|| value.to_string())
            } else {
                None
            }
        })
}

/// Reads the plugin's main file and returns its `Version:` header.
pub fn read_plugin_version(plugin_file: &Path) -> Result<String> {
    let contents = fs::read_to_string(plugin_file)
        .with_context(|| format!("Failed to read plugin file {}", plugin_file.display()))?;
    plugin_header_version(&contents)
        .with_context(|| format!("No Version header in {}", plugin_file.display()))
}
