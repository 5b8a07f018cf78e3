//! Global auto-update behavior setting

use serde::{Deserialize, Serialize};

/// Global auto-update behavior, applied to plugins without an override
///
/// Exactly one value is active per session and it is persisted with the
/// rest of the auto-update settings. Per-plugin preferences take precedence
/// over this setting during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoUpdateBehavior {
    /// Never take automatic action
    #[default]
    None,
    /// Surface available updates, never apply them
    OnlyNotify,
    /// Apply updates for plugins from the curated main repository only
    UpdateMainRepo,
    /// Apply updates regardless of source
    UpdateAll,
}

impl AutoUpdateBehavior {
    /// Whether this behavior applies automatic updates to plugins from
    /// unvetted third-party sources
    ///
    /// Presentation layers use this to surface a warning before the
    /// setting is committed.
    pub fn updates_third_party(&self) -> bool {
        matches!(self, Self::UpdateAll)
    }
}
