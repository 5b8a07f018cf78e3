//! updraft-policy: Plugin auto-update policy engine
//!
//! Decides, for each installed plugin, whether it should be updated
//! automatically, surfaced as a notification, or left alone. A single
//! global `AutoUpdateBehavior` is combined with ordered per-plugin
//! overrides; the resulting `UpdateAction` is handed to an external
//! updater, which performs the actual download and install.
//!
//! The engine performs no network access and no version comparison. It
//! owns the policy state, keeps it synchronized with a `SettingsGateway`,
//! and exposes a pure `resolve` function for the updater to call once per
//! plugin per update cycle.

pub mod behavior;
pub mod engine;
pub mod gateway;
pub mod preference;
pub mod resolver;
pub mod settings;

pub use behavior::AutoUpdateBehavior;
pub use engine::{AutoUpdateEngine, EngineError};
pub use gateway::{
    FileSettingsGateway, GatewayError, MemorySettingsGateway, ReadOnlySettingsGateway,
    SettingsGateway,
};
pub use preference::{
    AutoUpdatePreference, OptKind, PendingEdits, PreferenceError, PreferenceStore,
};
pub use resolver::{resolve, UpdateAction};
pub use settings::AutoUpdateSettings;
pub use updraft_api::{PluginDescriptor, PluginId, PluginInventory};
