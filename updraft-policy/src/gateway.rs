//! Settings persistence
//!
//! Trait-based storage for the auto-update settings so host applications
//! can decide where configuration lives. The persistence format is a
//! versioned JSON document; the policy types themselves never touch disk.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

use crate::behavior::AutoUpdateBehavior;
use crate::preference::{AutoUpdatePreference, PreferenceStore};
use crate::settings::AutoUpdateSettings;

/// Error type for settings persistence
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to read settings: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Settings store is read-only")]
    ReadOnly,
}

/// Trait for loading and saving auto-update settings
///
/// Host applications implement this to embed the settings in their own
/// configuration system. `load` falls back to defaults when nothing is
/// persisted yet; `save` must persist a consistent snapshot.
pub trait SettingsGateway: Send + Sync {
    /// Load persisted settings, or defaults when absent
    fn load(&self) -> Result<AutoUpdateSettings, GatewayError>;

    /// Persist a snapshot of the settings
    fn save(&self, settings: &AutoUpdateSettings) -> Result<(), GatewayError>;
}

/// Persistent file layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFileData {
    version: u32,
    #[serde(default)]
    behavior: AutoUpdateBehavior,
    #[serde(default)]
    update_disabled_plugins: bool,
    #[serde(default)]
    check_periodically: bool,
    #[serde(default)]
    notify_in_chat: bool,
    #[serde(default)]
    preferences: Vec<AutoUpdatePreference>,
}

impl SettingsFileData {
    fn from_settings(settings: &AutoUpdateSettings) -> Self {
        Self {
            version: 1,
            behavior: settings.behavior,
            update_disabled_plugins: settings.update_disabled_plugins,
            check_periodically: settings.check_periodically,
            notify_in_chat: settings.notify_in_chat,
            preferences: settings.preferences.entries().to_vec(),
        }
    }

    fn into_settings(self) -> AutoUpdateSettings {
        AutoUpdateSettings {
            behavior: self.behavior,
            update_disabled_plugins: self.update_disabled_plugins,
            check_periodically: self.check_periodically,
            notify_in_chat: self.notify_in_chat,
            // Drops invalid and duplicate persisted records with a warning.
            preferences: PreferenceStore::from_entries(self.preferences),
        }
    }
}

// ============================================================================
// File-based Settings Gateway
// ============================================================================

/// File-based settings gateway
///
/// Stores the settings in a JSON file at a configurable location.
/// Default: `~/.config/<app>/auto_updates.json`
#[derive(Debug)]
pub struct FileSettingsGateway {
    path: PathBuf,
}

impl FileSettingsGateway {
    /// Create a gateway backed by the specified file
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a gateway in the default location for an application
    pub fn default_for_app(app_name: &str) -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        Self::new(config_dir.join(app_name).join("auto_updates.json"))
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsGateway for FileSettingsGateway {
    fn load(&self) -> Result<AutoUpdateSettings, GatewayError> {
        if !self.path.exists() {
            return Ok(AutoUpdateSettings::default());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let data: SettingsFileData = serde_json::from_reader(reader)?;
        Ok(data.into_settings())
    }

    fn save(&self, settings: &AutoUpdateSettings) -> Result<(), GatewayError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &SettingsFileData::from_settings(settings))?;
        Ok(())
    }
}

// ============================================================================
// In-Memory Settings Gateway
// ============================================================================

/// In-memory settings gateway for testing or session-only configuration
pub struct MemorySettingsGateway {
    data: RwLock<Option<AutoUpdateSettings>>,
}

impl MemorySettingsGateway {
    /// Create an empty in-memory gateway
    pub fn new() -> Self {
        Self {
            data: RwLock::new(None),
        }
    }

    /// Whether a snapshot has been saved
    pub fn has_saved(&self) -> bool {
        self.data.read().unwrap().is_some()
    }
}

impl Default for MemorySettingsGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsGateway for MemorySettingsGateway {
    fn load(&self) -> Result<AutoUpdateSettings, GatewayError> {
        let data = self.data.read().unwrap();
        Ok(data.clone().unwrap_or_default())
    }

    fn save(&self, settings: &AutoUpdateSettings) -> Result<(), GatewayError> {
        let mut data = self.data.write().unwrap();
        *data = Some(settings.clone());
        Ok(())
    }
}

impl std::fmt::Debug for MemorySettingsGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySettingsGateway")
            .field("saved", &self.has_saved())
            .finish()
    }
}

// ============================================================================
// Read-Only Settings Gateway
// ============================================================================

/// Read-only wrapper for any settings gateway
///
/// Useful for CI environments where the configuration is pre-provisioned
/// and must not be modified at runtime.
#[derive(Debug)]
pub struct ReadOnlySettingsGateway<G: SettingsGateway> {
    inner: G,
}

impl<G: SettingsGateway> ReadOnlySettingsGateway<G> {
    /// Create a read-only wrapper
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

impl<G: SettingsGateway> SettingsGateway for ReadOnlySettingsGateway<G> {
    fn load(&self) -> Result<AutoUpdateSettings, GatewayError> {
        self.inner.load()
    }

    fn save(&self, _settings: &AutoUpdateSettings) -> Result<(), GatewayError> {
        Err(GatewayError::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::OptKind;
    use updraft_api::PluginId;

    fn sample_settings() -> AutoUpdateSettings {
        let mut settings = AutoUpdateSettings {
            behavior: AutoUpdateBehavior::UpdateMainRepo,
            update_disabled_plugins: true,
            check_periodically: true,
            notify_in_chat: false,
            ..Default::default()
        };
        settings.preferences.add(PluginId::new("a")).unwrap();
        settings.preferences.add(PluginId::new("b")).unwrap();
        settings
            .preferences
            .set_kind(&PluginId::new("b"), OptKind::AlwaysUpdate)
            .unwrap();
        settings
    }

    #[test]
    fn test_file_gateway_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auto_updates.json");

        let gateway = FileSettingsGateway::new(&path);
        gateway.save(&sample_settings()).unwrap();
        assert!(path.exists());

        let loaded = FileSettingsGateway::new(&path).load().unwrap();
        assert_eq!(loaded, sample_settings());

        let order: Vec<_> = loaded
            .preferences
            .iter()
            .map(|p| p.plugin_id.as_str())
            .collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_file_gateway_defaults_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FileSettingsGateway::new(dir.path().join("missing.json"));

        let loaded = gateway.load().unwrap();
        assert_eq!(loaded, AutoUpdateSettings::default());
    }

    #[test]
    fn test_file_gateway_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config/auto_updates.json");

        let gateway = FileSettingsGateway::new(&path);
        gateway.save(&AutoUpdateSettings::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_gateway_drops_corrupt_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auto_updates.json");
        fs::write(
            &path,
            r#"{
                "version": 1,
                "behavior": "update_all",
                "preferences": [
                    {"plugin_id": "a", "kind": "never_update"},
                    {"plugin_id": "", "kind": "always_update"},
                    {"plugin_id": "a", "kind": "always_update"}
                ]
            }"#,
        )
        .unwrap();

        let loaded = FileSettingsGateway::new(&path).load().unwrap();
        assert_eq!(loaded.behavior, AutoUpdateBehavior::UpdateAll);
        assert_eq!(loaded.preferences.len(), 1);
        assert_eq!(
            loaded.preferences.find(&PluginId::new("a")).unwrap().kind,
            OptKind::NeverUpdate
        );
    }

    #[test]
    fn test_memory_gateway() {
        let gateway = MemorySettingsGateway::new();
        assert!(!gateway.has_saved());
        assert_eq!(gateway.load().unwrap(), AutoUpdateSettings::default());

        gateway.save(&sample_settings()).unwrap();
        assert!(gateway.has_saved());
        assert_eq!(gateway.load().unwrap(), sample_settings());
    }

    #[test]
    fn test_read_only_gateway() {
        let inner = MemorySettingsGateway::new();
        inner.save(&sample_settings()).unwrap();

        let gateway = ReadOnlySettingsGateway::new(inner);
        assert_eq!(gateway.load().unwrap(), sample_settings());
        assert!(matches!(
            gateway.save(&AutoUpdateSettings::default()),
            Err(GatewayError::ReadOnly)
        ));
    }
}
