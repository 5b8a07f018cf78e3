//! Session engine owning the live settings
//!
//! Wraps the settings behind a single lock boundary per configuration
//! instance. Every mutation is written back through the gateway before the
//! lock is released, so persisted state always reflects a consistent
//! snapshot even when a periodic update check runs concurrently with user
//! edits in a presentation layer.

use std::sync::{Arc, RwLock};
use thiserror::Error;
use updraft_api::{PluginDescriptor, PluginId, PluginInventory};

use crate::behavior::AutoUpdateBehavior;
use crate::gateway::{GatewayError, SettingsGateway};
use crate::preference::{AutoUpdatePreference, OptKind, PendingEdits, PreferenceError};
use crate::resolver::UpdateAction;
use crate::settings::AutoUpdateSettings;

/// Errors that can occur during engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Preference(#[from] PreferenceError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Live auto-update policy for one session
///
/// Holds the settings loaded at session start and keeps them synchronized
/// with the gateway. Readers take the lock for the duration of a single
/// operation only; `resolve` works on the locked snapshot and performs no
/// I/O.
pub struct AutoUpdateEngine {
    gateway: Arc<dyn SettingsGateway>,
    settings: RwLock<AutoUpdateSettings>,
}

impl AutoUpdateEngine {
    /// Load the persisted settings and start a session
    pub fn load(gateway: Arc<dyn SettingsGateway>) -> Result<Self, EngineError> {
        let settings = gateway.load()?;
        tracing::info!(
            behavior = ?settings.behavior,
            overrides = settings.preferences.len(),
            "Auto-update settings loaded"
        );

        Ok(Self {
            gateway,
            settings: RwLock::new(settings),
        })
    }

    /// Current global behavior
    pub fn behavior(&self) -> AutoUpdateBehavior {
        self.settings.read().unwrap().behavior
    }

    /// Change the global behavior
    pub fn set_behavior(&self, behavior: AutoUpdateBehavior) -> Result<(), EngineError> {
        let mut settings = self.settings.write().unwrap();
        settings.behavior = behavior;
        self.gateway.save(&settings)?;
        tracing::info!(behavior = ?behavior, "Auto-update behavior changed");
        Ok(())
    }

    /// Change whether disabled plugins receive automatic updates
    pub fn set_update_disabled_plugins(&self, value: bool) -> Result<(), EngineError> {
        let mut settings = self.settings.write().unwrap();
        settings.update_disabled_plugins = value;
        self.gateway.save(&settings)?;
        Ok(())
    }

    /// Change whether updates are checked periodically while the host runs
    pub fn set_check_periodically(&self, value: bool) -> Result<(), EngineError> {
        let mut settings = self.settings.write().unwrap();
        settings.check_periodically = value;
        self.gateway.save(&settings)?;
        Ok(())
    }

    /// Change whether available updates are announced in chat
    pub fn set_notify_in_chat(&self, value: bool) -> Result<(), EngineError> {
        let mut settings = self.settings.write().unwrap();
        settings.notify_in_chat = value;
        self.gateway.save(&settings)?;
        Ok(())
    }

    /// Add a preference for a plugin, defaulting to `NeverUpdate`
    ///
    /// Idempotent: adding an identity that already has a preference returns
    /// the existing entry unchanged.
    pub fn add_preference(&self, plugin_id: PluginId) -> Result<AutoUpdatePreference, EngineError> {
        let mut settings = self.settings.write().unwrap();
        let preference = settings.preferences.add(plugin_id)?.clone();
        self.gateway.save(&settings)?;
        tracing::info!(plugin = %preference.plugin_id, "Auto-update preference added");
        Ok(preference)
    }

    /// Remove the preference for a plugin, if any
    pub fn remove_preference(&self, plugin_id: &PluginId) -> Result<bool, EngineError> {
        let mut settings = self.settings.write().unwrap();
        let removed = settings.preferences.remove(plugin_id)?;
        if removed {
            self.gateway.save(&settings)?;
            tracing::info!(plugin = %plugin_id, "Auto-update preference removed");
        }
        Ok(removed)
    }

    /// Change the kind of an existing preference
    pub fn set_preference_kind(
        &self,
        plugin_id: &PluginId,
        kind: OptKind,
    ) -> Result<(), EngineError> {
        let mut settings = self.settings.write().unwrap();
        settings.preferences.set_kind(plugin_id, kind)?;
        self.gateway.save(&settings)?;
        tracing::info!(plugin = %plugin_id, kind = ?kind, "Auto-update preference changed");
        Ok(())
    }

    /// Apply a batch of deferred presentation edits as one atomic mutation
    pub fn apply_edits(&self, edits: PendingEdits) -> Result<(), EngineError> {
        if edits.is_empty() {
            return Ok(());
        }

        let mut settings = self.settings.write().unwrap();
        settings.preferences.apply(edits)?;
        self.gateway.save(&settings)?;
        tracing::info!(
            overrides = settings.preferences.len(),
            "Auto-update preference edits applied"
        );
        Ok(())
    }

    /// Snapshot of the preferences in insertion order
    pub fn preferences(&self) -> Vec<AutoUpdatePreference> {
        self.settings.read().unwrap().preferences.entries().to_vec()
    }

    /// Snapshot of the complete settings
    pub fn settings(&self) -> AutoUpdateSettings {
        self.settings.read().unwrap().clone()
    }

    /// Resolve the effective update action for one plugin
    pub fn resolve(&self, plugin: &PluginDescriptor) -> UpdateAction {
        self.settings.read().unwrap().resolve(plugin)
    }

    /// Resolve every plugin in the inventory against one consistent snapshot
    ///
    /// Called by the external updater once per update cycle.
    pub fn plan(&self, inventory: &dyn PluginInventory) -> Vec<(PluginDescriptor, UpdateAction)> {
        let settings = self.settings.read().unwrap();
        inventory
            .descriptors()
            .into_iter()
            .map(|descriptor| {
                let action = settings.resolve(&descriptor);
                (descriptor, action)
            })
            .collect()
    }
}

impl std::fmt::Debug for AutoUpdateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoUpdateEngine")
            .field("settings", &self.settings.read().unwrap())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemorySettingsGateway;

    fn engine() -> AutoUpdateEngine {
        AutoUpdateEngine::load(Arc::new(MemorySettingsGateway::new())).unwrap()
    }

    #[test]
    fn test_mutations_persist_through_gateway() {
        let gateway = Arc::new(MemorySettingsGateway::new());
        let engine = AutoUpdateEngine::load(gateway.clone()).unwrap();

        engine.set_behavior(AutoUpdateBehavior::OnlyNotify).unwrap();
        engine.add_preference(PluginId::new("a")).unwrap();

        let persisted = gateway.load().unwrap();
        assert_eq!(persisted.behavior, AutoUpdateBehavior::OnlyNotify);
        assert_eq!(persisted.preferences.len(), 1);
    }

    #[test]
    fn test_add_preference_is_idempotent() {
        let engine = engine();
        engine.add_preference(PluginId::new("a")).unwrap();
        engine
            .set_preference_kind(&PluginId::new("a"), OptKind::AlwaysUpdate)
            .unwrap();

        let pref = engine.add_preference(PluginId::new("a")).unwrap();
        assert_eq!(pref.kind, OptKind::AlwaysUpdate);
        assert_eq!(engine.preferences().len(), 1);
    }

    #[test]
    fn test_remove_absent_does_not_save() {
        let gateway = Arc::new(MemorySettingsGateway::new());
        let engine = AutoUpdateEngine::load(gateway.clone()).unwrap();

        assert!(!engine.remove_preference(&PluginId::new("ghost")).unwrap());
        assert!(!gateway.has_saved());
    }

    #[test]
    fn test_empty_identity_rejected() {
        let engine = engine();
        assert!(matches!(
            engine.add_preference(PluginId::new("")),
            Err(EngineError::Preference(PreferenceError::InvalidIdentity))
        ));
    }
}
