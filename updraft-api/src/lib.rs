//! updraft-api: Shared inventory types for the updraft policy engine
//!
//! This crate defines the contract between a host application's plugin
//! inventory and the auto-update policy engine. The engine never looks up
//! installed plugins itself; the host hands it `PluginDescriptor` snapshots
//! through the `PluginInventory` trait.

use serde::{Deserialize, Serialize};

/// API version for compatibility checking
pub const API_VERSION: u32 = 1;

/// Stable working identity of an installed plugin
///
/// Correlates a plugin's working instance across sessions, even if the
/// plugin is reinstalled or moved on disk. The identity is opaque to the
/// policy engine; the empty identity is reserved as invalid and is rejected
/// by every policy mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginId(String);

impl PluginId {
    /// Create an identity from an opaque string value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the underlying string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the reserved invalid (empty) identity
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PluginId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of one installed plugin, as reported by the host inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Working identity
    pub id: PluginId,

    /// Whether the plugin is sourced from the curated main repository
    #[serde(default)]
    pub from_main_repo: bool,

    /// Whether the plugin is currently enabled in the host
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl PluginDescriptor {
    /// Create a descriptor for an enabled, third-party plugin
    pub fn new(id: PluginId) -> Self {
        Self {
            id,
            from_main_repo: false,
            enabled: true,
        }
    }

    /// Mark the plugin as sourced from the curated main repository
    pub fn from_main_repo(mut self) -> Self {
        self.from_main_repo = true;
        self
    }

    /// Mark the plugin as currently disabled in the host
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

fn default_enabled() -> bool {
    true
}

/// Trait for plugin inventory sources
///
/// The host application implements this to expose its installed plugins to
/// the policy engine. Descriptors are snapshots; the engine never holds on
/// to them across update cycles.
pub trait PluginInventory: Send + Sync {
    /// Look up one installed plugin by working identity
    fn descriptor(&self, id: &PluginId) -> Option<PluginDescriptor>;

    /// Snapshot of all installed plugins
    fn descriptors(&self) -> Vec<PluginDescriptor>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_empty() {
        assert!(PluginId::new("").is_empty());
        assert!(!PluginId::new("dcff72b7").is_empty());
    }

    #[test]
    fn test_identity_display() {
        let id = PluginId::new("dcff72b7-7cc4-4b1a-8102-45d6d10ad313");
        assert_eq!(id.to_string(), "dcff72b7-7cc4-4b1a-8102-45d6d10ad313");
        assert_eq!(id.as_str(), "dcff72b7-7cc4-4b1a-8102-45d6d10ad313");
    }

    #[test]
    fn test_descriptor_builders() {
        let plugin = PluginDescriptor::new(PluginId::new("a")).from_main_repo();
        assert!(plugin.from_main_repo);
        assert!(plugin.enabled);

        let plugin = PluginDescriptor::new(PluginId::new("b")).disabled();
        assert!(!plugin.from_main_repo);
        assert!(!plugin.enabled);
    }

    #[test]
    fn test_descriptor_deserialize_defaults() {
        let plugin: PluginDescriptor = serde_json::from_str(r#"{"id":"a"}"#).unwrap();
        assert_eq!(plugin.id, PluginId::new("a"));
        assert!(!plugin.from_main_repo);
        assert!(plugin.enabled);
    }
}
