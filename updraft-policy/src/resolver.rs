//! Effective update action resolution
//!
//! Pure decision logic combining the global behavior with per-plugin
//! overrides. `resolve` has no side effects and always produces the same
//! action for the same inputs, so an external updater can re-evaluate it
//! once per plugin per cycle without holding any lock, given a consistent
//! snapshot of the store.

use updraft_api::PluginDescriptor;

use crate::behavior::AutoUpdateBehavior;
use crate::preference::{OptKind, PreferenceStore};

/// Effective action for a single plugin in one update cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// Leave the plugin alone
    DoNothing,
    /// Surface the available update without applying it
    Notify,
    /// Apply the update automatically
    AutoUpdate,
}

/// Resolve the effective update action for one plugin
///
/// An explicit per-plugin override wins over the global behavior: an
/// `AlwaysUpdate` override yields `AutoUpdate` even under the most
/// conservative global setting, and a `NeverUpdate` override yields
/// `DoNothing` unconditionally, with no notification either.
///
/// Any `AutoUpdate` outcome for a plugin that is currently disabled is
/// downgraded to `Notify` unless `update_disabled` is set, so disabled
/// plugins are not silently updated without operator opt-in.
pub fn resolve(
    behavior: AutoUpdateBehavior,
    store: &PreferenceStore,
    plugin: &PluginDescriptor,
    update_disabled: bool,
) -> UpdateAction {
    let action = match store.find(&plugin.id).map(|pref| pref.kind) {
        Some(OptKind::NeverUpdate) => return UpdateAction::DoNothing,
        Some(OptKind::AlwaysUpdate) => UpdateAction::AutoUpdate,
        None => match behavior {
            AutoUpdateBehavior::None => UpdateAction::DoNothing,
            AutoUpdateBehavior::OnlyNotify => UpdateAction::Notify,
            AutoUpdateBehavior::UpdateMainRepo if plugin.from_main_repo => UpdateAction::AutoUpdate,
            AutoUpdateBehavior::UpdateMainRepo => UpdateAction::Notify,
            AutoUpdateBehavior::UpdateAll => UpdateAction::AutoUpdate,
        },
    };

    if action == UpdateAction::AutoUpdate && !plugin.enabled && !update_disabled {
        return UpdateAction::Notify;
    }

    action
}
