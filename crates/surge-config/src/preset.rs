//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use surge_core::{ParameterInfo, SurgeSettings};

use crate::error::ConfigError;
use crate::validation::{SettingsValidator, format_param_value};

/// Preset file format for filter settings.
///
/// A preset is a sparse table of settings keyed by parameter string id.
/// Missing keys keep their default, so a preset only needs to name what it
/// changes. Values are strings to support units and names.
///
/// # TOML Format
///
/// ```toml
/// name = "Transport Start"
/// description = "Short fades for play/stop clicks"
/// sample_rate = 48000
///
/// [settings]
/// fadein = "20 ms"
/// fadeout = "30 ms"
/// thr_on = "-60 dB"
/// modein = "Sine"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint (defaults to 48000).
    /// Used by tools that synthesize audio; the filter itself takes the host rate.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Setting values keyed by parameter string id.
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

fn default_sample_rate() -> u32 {
    48000
}

impl Preset {
    /// Create a new empty preset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: 48000,
            settings: BTreeMap::new(),
        }
    }

    /// Capture every value of `settings` into a new preset.
    pub fn from_settings(name: impl Into<String>, settings: &SurgeSettings) -> Self {
        let mut preset = Self::new(name);
        for i in 0..settings.param_count() {
            if let Some(desc) = settings.param_info(i) {
                preset.settings.insert(
                    desc.string_id.to_string(),
                    format_param_value(&desc, settings.get_param(i)),
                );
            }
        }
        preset
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Add a setting to the preset.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Get a setting value.
    pub fn get_setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(|s| s.as_str())
    }

    /// Set a setting value.
    pub fn set_setting(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.settings.insert(key.into(), value.into());
    }

    /// Apply a `key=value` override, validating it first.
    ///
    /// The key is stored under its canonical string id, so `"Fade In Time=5ms"`
    /// replaces an existing `fadein` entry.
    pub fn apply_override(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidOverride(assignment.to_string()))?;
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return Err(ConfigError::InvalidOverride(assignment.to_string()));
        }

        let validator = SettingsValidator::new();
        validator.validate(key, value)?;
        let id = validator
            .descriptor(key)
            .map(|d| d.string_id)
            .unwrap_or(key);
        self.settings.insert(id.to_string(), value.to_string());
        Ok(())
    }

    /// Resolve the preset into filter settings.
    ///
    /// Every entry is validated; any failure rejects the whole preset.
    pub fn to_settings(&self) -> Result<SurgeSettings, ConfigError> {
        let validator = SettingsValidator::new();
        validator.validate_map(&self.settings)?;

        let mut settings = SurgeSettings::default();
        for (key, value) in &self.settings {
            let v = validator.validate(key, value)?;
            if let Some(index) = validator.find_param_index(key) {
                settings.set_param(index, v);
            }
        }
        Ok(settings)
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: Preset = toml::from_str(&content)?;
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Number of settings the preset changes.
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Check if the preset changes nothing.
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Iterate over settings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
