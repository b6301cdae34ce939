use serde::{Deserialize, Serialize};

use crate::errors::ReconError;
use super::schema::SETTINGS_KEY;
use super::store::KeyValueStore;

/// User-editable settings consumed by the scan queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Credential for the subdomain-intelligence provider. Empty disables discovery.
    pub api_key: Option<String>,
    /// Whether navigation events enqueue scans automatically.
    pub auto_scan: bool,
    /// Path to a wordlist file or directory overriding the configured one.
    pub wordlist: Option<String>,
}

impl Settings {
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }

    /// Apply a partial JSON object of changes on top of these settings.
    pub fn merged(&self, patch: &serde_json::Value) -> Result<Self, ReconError> {
        let mut current = serde_json::to_value(self)?;
        if let (Some(target), Some(changes)) = (current.as_object_mut(), patch.as_object()) {
            for (key, value) in changes {
                if !target.contains_key(key) {
                    return Err(ReconError::Config(format!("Unknown setting: {}", key)));
                }
                target.insert(key.clone(), value.clone());
            }
        } else {
            return Err(ReconError::Config("Settings patch must be a JSON object".into()));
        }
        Ok(serde_json::from_value(current)?)
    }
}

pub trait SettingsStore {
    fn load_settings(&self) -> Result<Settings, ReconError>;

    fn save_settings(&self, settings: &Settings) -> Result<(), ReconError>;
}

impl<T: KeyValueStore + ?Sized> SettingsStore for T {
    fn load_settings(&self) -> Result<Settings, ReconError> {
        match self.get(SETTINGS_KEY)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Settings::default()),
        }
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), ReconError> {
        self.set(SETTINGS_KEY, &serde_json::to_string(settings)?)
    }
}
