//! Per-plugin override preferences
//!
//! An ordered collection of per-plugin rules that take precedence over the
//! global behavior. The store holds at most one preference per plugin
//! identity and preserves insertion order, which is the order shown to the
//! user.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use updraft_api::PluginId;

/// Error type for preference store operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("Plugin identity is empty")]
    InvalidIdentity,

    #[error("No preference stored for plugin: {0}")]
    NotFound(PluginId),
}

/// Per-plugin override kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptKind {
    /// Never update this plugin, and do not notify about it either
    NeverUpdate,
    /// Always update this plugin, regardless of the global behavior
    AlwaysUpdate,
}

/// A per-plugin auto-update rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoUpdatePreference {
    /// Working identity of the target plugin
    pub plugin_id: PluginId,
    /// What to do with updates for this plugin
    pub kind: OptKind,
}

impl AutoUpdatePreference {
    /// Create a preference with the default opt-out kind
    pub fn new(plugin_id: PluginId) -> Self {
        Self {
            plugin_id,
            kind: OptKind::NeverUpdate,
        }
    }

    /// Set the override kind
    pub fn with_kind(mut self, kind: OptKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Ordered collection of per-plugin preferences
///
/// Lookup is a linear scan; the store is expected to hold tens of entries
/// at most.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceStore {
    entries: Vec<AutoUpdatePreference>,
}

impl PreferenceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted records
    ///
    /// Persisted data is untrusted input: records with an empty identity
    /// and duplicate records are dropped with a warning instead of failing
    /// the load.
    pub fn from_entries(entries: Vec<AutoUpdatePreference>) -> Self {
        let mut store = Self::new();
        for entry in entries {
            if entry.plugin_id.is_empty() {
                tracing::warn!("Dropping persisted auto-update preference with empty identity");
                continue;
            }
            if store.find(&entry.plugin_id).is_some() {
                tracing::warn!(
                    plugin = %entry.plugin_id,
                    "Dropping duplicate persisted auto-update preference"
                );
                continue;
            }
            store.entries.push(entry);
        }
        store
    }

    /// Add a preference for a plugin, defaulting to `NeverUpdate`
    ///
    /// Adding is idempotent: if a preference already exists for the
    /// identity, the existing entry is returned with its kind untouched.
    pub fn add(&mut self, plugin_id: PluginId) -> Result<&AutoUpdatePreference, PreferenceError> {
        Self::validate_identity(&plugin_id)?;

        let pos = match self.position(&plugin_id) {
            Some(pos) => pos,
            None => {
                self.entries.push(AutoUpdatePreference::new(plugin_id));
                self.entries.len() - 1
            }
        };

        Ok(&self.entries[pos])
    }

    /// Remove the preference for a plugin
    ///
    /// Returns whether an entry was removed; removing an absent identity is
    /// a no-op. Resolution for the plugin falls back to the global behavior
    /// afterwards.
    pub fn remove(&mut self, plugin_id: &PluginId) -> Result<bool, PreferenceError> {
        Self::validate_identity(plugin_id)?;

        let before = self.entries.len();
        self.entries.retain(|entry| entry.plugin_id != *plugin_id);
        Ok(self.entries.len() != before)
    }

    /// Change the kind of an existing preference in place
    pub fn set_kind(&mut self, plugin_id: &PluginId, kind: OptKind) -> Result<(), PreferenceError> {
        Self::validate_identity(plugin_id)?;

        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.plugin_id == *plugin_id)
            .ok_or_else(|| PreferenceError::NotFound(plugin_id.clone()))?;

        entry.kind = kind;
        Ok(())
    }

    /// Look up the preference for a plugin
    pub fn find(&self, plugin_id: &PluginId) -> Option<&AutoUpdatePreference> {
        self.entries
            .iter()
            .find(|entry| entry.plugin_id == *plugin_id)
    }

    /// Iterate over preferences in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &AutoUpdatePreference> {
        self.entries.iter()
    }

    /// Read-only view of the entries in insertion order
    pub fn entries(&self) -> &[AutoUpdatePreference] {
        &self.entries
    }

    /// Number of stored preferences
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no preferences
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply a batch of deferred edits as one atomic mutation
    ///
    /// The whole batch is validated before anything is applied: if any edit
    /// is invalid, the store is left untouched. Kind changes are applied
    /// before removals.
    pub fn apply(&mut self, edits: PendingEdits) -> Result<(), PreferenceError> {
        for plugin_id in &edits.removals {
            Self::validate_identity(plugin_id)?;
        }
        for (plugin_id, _) in &edits.kind_changes {
            Self::validate_identity(plugin_id)?;
            if self.find(plugin_id).is_none() {
                return Err(PreferenceError::NotFound(plugin_id.clone()));
            }
        }

        for (plugin_id, kind) in &edits.kind_changes {
            // Validated above, cannot fail.
            self.set_kind(plugin_id, *kind)?;
        }
        for plugin_id in &edits.removals {
            self.entries.retain(|entry| entry.plugin_id != *plugin_id);
        }

        Ok(())
    }

    /// Single choke point validating identities before any mutation
    fn validate_identity(plugin_id: &PluginId) -> Result<(), PreferenceError> {
        if plugin_id.is_empty() {
            return Err(PreferenceError::InvalidIdentity);
        }
        Ok(())
    }

    fn position(&self, plugin_id: &PluginId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.plugin_id == *plugin_id)
    }
}

/// Deferred edits collected during a presentation pass
///
/// A presentation layer iterating the displayed preference list must not
/// mutate the store mid-iteration. It records removals and kind changes
/// here and applies them afterwards through `PreferenceStore::apply` as a
/// single atomic mutation.
#[derive(Debug, Clone, Default)]
pub struct PendingEdits {
    removals: Vec<PluginId>,
    kind_changes: Vec<(PluginId, OptKind)>,
}

impl PendingEdits {
    /// Create an empty edit batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the removal of a plugin's preference
    pub fn mark_removal(&mut self, plugin_id: PluginId) {
        self.removals.push(plugin_id);
    }

    /// Record a kind change for a plugin's preference
    pub fn change_kind(&mut self, plugin_id: PluginId, kind: OptKind) {
        self.kind_changes.push((plugin_id, kind));
    }

    /// Whether the batch holds no edits
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.kind_changes.is_empty()
    }
}
