//! License key display helpers.
//!
//! Keys are opaque to this crate. The only shape it knows about is the common
//! `AAAA-BBBB-CCCC-DDDD` form, which is partially masked for display.

use std::borrow::Cow;

/// Replacement for each masked key segment.
pub const OBFUSCATED_SEGMENT: &str = "****";

/// Masks segments 2-4 of a four-segment dash-delimited key.
///
/// Keys of any other shape are returned unchanged.
#[must_use]
pub fn obfuscate(key: &str) -> String {
    let segments: Vec<&str> = key.split('-').collect();
    if segments.len() != 4 {
        return key.to_string();
    }
    format!(
        "{}-{OBFUSCATED_SEGMENT}-{OBFUSCATED_SEGMENT}-{OBFUSCATED_SEGMENT}",
        segments[0]
    )
}

/// Renders a stored key for display: percent-decoded, optionally masked.
///
/// Never fails; input that does not decode is used as-is.
#[must_use]
pub fn display_key(stored: &str, obfuscated: bool) -> String {
    let decoded = urlencoding::decode(stored).unwrap_or(Cow::Borrowed(stored));
    if obfuscated {
        obfuscate(&decoded)
    } else {
        decoded.into_owned()
    }
}
