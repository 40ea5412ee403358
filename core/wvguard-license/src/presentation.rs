//! What the plugin listing page shows for the guarded integration.
//!
//! Pure decisions over explicit inputs; rendering belongs to the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of the `license_action` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseAction {
    Activate,
    Deactivate,
}

impl LicenseAction {
    /// Parses a raw query value. Unknown or empty values mean no action.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "activate" => Some(Self::Activate),
            "deactivate" => Some(Self::Deactivate),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        }
    }
}

impl fmt::Display for LicenseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extra entry in the integration's listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowMeta {
    Link { label: String, href: String },
    Text { text: String },
}

impl RowMeta {
    /// Link that reloads the listing with `license_action` set for `plugin_slug`.
    #[must_use]
    pub fn action_link(action: LicenseAction, plugin_slug: &str) -> Self {
        let label = match action {
            LicenseAction::Activate => "Activate license",
            LicenseAction::Deactivate => "Deactivate license",
        };
        Self::Link {
            label: label.to_string(),
            href: format!(
                "?license_action={action}&plugin={}",
                urlencoding::encode(plugin_slug)
            ),
        }
    }
}

/// Outcome of [`decide`] for one listing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowDecision {
    /// Show the activation form under the row.
    RenderActivationForm,
    /// Deactivate inline, then send the browser back to the listing.
    PerformDeactivation,
    NoOp,
}

/// Decides what a listing row renders.
///
/// `target_slug` is the row's plugin, either a slug or a `<dir>/<file>` plugin
/// id; only its directory part is compared with `current_slug`, the slug the
/// request asked about. The form is only offered while unlicensed and
/// deactivation only runs while licensed.
#[must_use]
pub fn decide(
    target_slug: &str,
    current_slug: &str,
    action: Option<LicenseAction>,
    licensed: bool,
) -> RowDecision {
    let target = target_slug.split('/').next().unwrap_or(target_slug);
    if target.is_empty() || target != current_slug {
        return RowDecision::NoOp;
    }

    match (action, licensed) {
        (Some(LicenseAction::Activate), false) => RowDecision::RenderActivationForm,
        (Some(LicenseAction::Deactivate), true) => RowDecision::PerformDeactivation,
        _ => RowDecision::NoOp,
    }
}
