//! Session-wide auto-update settings

use updraft_api::PluginDescriptor;

use crate::behavior::AutoUpdateBehavior;
use crate::preference::PreferenceStore;
use crate::resolver::{self, UpdateAction};

/// Complete auto-update configuration for one session
///
/// Loaded once at session start through a `SettingsGateway`, mutated in
/// place during the session, and written back on every mutation. The
/// `check_periodically` and `notify_in_chat` flags are stored here but
/// consumed by the external scheduler and notifier respectively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoUpdateSettings {
    /// Global behavior applied to plugins without an override
    pub behavior: AutoUpdateBehavior,

    /// Apply automatic updates to plugins that are currently disabled
    pub update_disabled_plugins: bool,

    /// Keep checking for updates periodically while the host runs
    pub check_periodically: bool,

    /// Announce available updates through the host's chat channel
    pub notify_in_chat: bool,

    /// Per-plugin overrides, in user-meaningful insertion order
    pub preferences: PreferenceStore,
}

impl AutoUpdateSettings {
    /// Resolve the effective update action for one plugin against this
    /// settings snapshot
    pub fn resolve(&self, plugin: &PluginDescriptor) -> UpdateAction {
        resolver::resolve(
            self.behavior,
            &self.preferences,
            plugin,
            self.update_disabled_plugins,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use updraft_api::PluginId;

    #[test]
    fn test_defaults_are_conservative() {
        let settings = AutoUpdateSettings::default();
        assert_eq!(settings.behavior, AutoUpdateBehavior::None);
        assert!(!settings.update_disabled_plugins);
        assert!(settings.preferences.is_empty());
    }

    #[test]
    fn test_resolve_uses_own_flag() {
        let settings = AutoUpdateSettings {
            behavior: AutoUpdateBehavior::UpdateAll,
            update_disabled_plugins: true,
            ..Default::default()
        };

        let disabled = PluginDescriptor::new(PluginId::new("a")).disabled();
        assert_eq!(settings.resolve(&disabled), UpdateAction::AutoUpdate);
    }
}
