/// Storage schema for chrome.storage.local
///
/// Layout:
/// - `customModes`: list of custom mode names (never the built-in mode)
/// - `activeFocusMode`: name of the mode the user turned on, if any
/// - `<mode name>`: `{ sites: string[], allowMode: boolean }`

use crate::error::{FocusError, FocusResult};
use crate::mode::{ModeConfig, ModeRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CUSTOM_MODES_KEY: &str = "customModes";
pub const ACTIVE_MODE_KEY: &str = "activeFocusMode";

/// A read view over some or all of the stored keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageSnapshot {
    entries: Map<String, Value>,
}

impl StorageSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anything other than a JSON object reads as an empty store
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(entries) => StorageSnapshot { entries },
            _ => StorageSnapshot::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// The registry, tolerating a missing or malformed `customModes`
    pub fn registry(&self) -> ModeRegistry {
        self.entries
            .get(CUSTOM_MODES_KEY)
            .and_then(|v| serde_json::from_value::<Vec<String>>(v.clone()).ok())
            .map(ModeRegistry::from)
            .unwrap_or_default()
    }

    pub fn active_mode(&self) -> Option<String> {
        self.entries
            .get(ACTIVE_MODE_KEY)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    /// Strictly typed config of a mode: `Ok(None)` when the key is absent,
    /// `MalformedConfig` when it does not have the stored shape
    pub fn mode_config(&self, name: &str) -> FocusResult<Option<ModeConfig>> {
        self.entries
            .get(name)
            .map(|v| {
                serde_json::from_value::<ModeConfig>(v.clone()).map_err(|e| {
                    FocusError::MalformedConfig {
                        mode: name.to_string(),
                        reason: e.to_string(),
                    }
                })
            })
            .transpose()
    }

    /// The stored site list for editing, empty when absent or malformed
    pub fn mode_sites(&self, name: &str) -> Vec<String> {
        self.entries
            .get(name)
            .and_then(|v| v.get("sites"))
            .and_then(|v| serde_json::from_value::<Vec<String>>(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Apply writes, then removals, the same order the host applies them
    pub fn apply(&mut self, patch: &StoragePatch) {
        for (key, value) in &patch.set {
            self.entries.insert(key.clone(), value.clone());
        }
        for key in &patch.remove {
            self.entries.remove(key);
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

/// The writes and removals one operation issues against storage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoragePatch {
    pub set: Map<String, Value>,
    pub remove: Vec<String>,
}

impl StoragePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_registry(mut self, registry: &ModeRegistry) -> Self {
        self.set.insert(
            CUSTOM_MODES_KEY.to_string(),
            Value::from(registry.custom().to_vec()),
        );
        self
    }

    pub fn set_active(mut self, name: &str) -> Self {
        self.set
            .insert(ACTIVE_MODE_KEY.to_string(), Value::from(name.to_string()));
        self
    }

    pub fn clear_active(self) -> Self {
        self.remove_key(ACTIVE_MODE_KEY)
    }

    pub fn set_mode(mut self, name: &str, config: &ModeConfig) -> FocusResult<Self> {
        self.set
            .insert(name.to_string(), serde_json::to_value(config)?);
        Ok(self)
    }

    pub fn remove_key(mut self, key: &str) -> Self {
        self.remove.push(key.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty()
    }
}
