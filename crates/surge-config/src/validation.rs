//! Settings and preset validation.
//!
//! Preset values are strings so they can carry units and names (`"-60 dB"`,
//! `"250ms"`, `"Gaussian"`, `"off"`). This module resolves setting keys
//! against the [`SurgeSettings`] parameter descriptors, parses values and
//! checks them against the declared ranges.
//!
//! # Example
//!
//! ```rust
//! use surge_config::{SettingsValidator, validate_setting};
//!
//! assert_eq!(validate_setting("thr_on", "-60 dB").unwrap(), -60.0);
//! assert!(validate_setting("thr_on", "0 dB").is_err());
//!
//! let validator = SettingsValidator::new();
//! assert_eq!(validator.parse_value("modein", "sine").unwrap(), 2.0);
//! ```

use std::collections::BTreeMap;
use surge_core::{ParamDescriptor, ParamUnit, ParameterInfo, SurgeSettings};
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Key matches no setting.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Resolves keys and values against the filter's parameter table.
#[derive(Debug, Clone, Default)]
pub struct SettingsValidator {
    settings: SurgeSettings,
}

impl SettingsValidator {
    /// Create a validator over the default settings' descriptors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameter index for a key.
    ///
    /// Accepts the stable string id (`thr_on`) or the display name in any
    /// case, with spaces or dashes for underscores (`fade-in time`).
    pub fn find_param_index(&self, key: &str) -> Option<usize> {
        let key = normalize_param_name(key);
        self.settings.find_param_by_string_id(&key).or_else(|| {
            (0..self.settings.param_count()).find(|&i| {
                self.settings
                    .param_info(i)
                    .is_some_and(|d| normalize_param_name(d.name) == key)
            })
        })
    }

    /// Descriptor for a key.
    pub fn descriptor(&self, key: &str) -> Option<ParamDescriptor> {
        self.find_param_index(key)
            .and_then(|i| self.settings.param_info(i))
    }

    /// All string ids in index order.
    pub fn param_ids(&self) -> Vec<&'static str> {
        (0..self.settings.param_count())
            .filter_map(|i| self.settings.param_info(i))
            .map(|d| d.string_id)
            .collect()
    }

    /// Check that a key names a setting.
    pub fn validate_param_name(&self, key: &str) -> ValidationResult<()> {
        self.descriptor(key)
            .map(|_| ())
            .ok_or_else(|| ValidationError::UnknownParameter(key.to_string()))
    }

    /// Check a plain value against the key's declared range.
    pub fn validate_param_value(&self, key: &str, value: f32) -> ValidationResult<()> {
        let desc = self
            .descriptor(key)
            .ok_or_else(|| ValidationError::UnknownParameter(key.to_string()))?;

        if value >= desc.min && value <= desc.max {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                param: key.to_string(),
                value,
                min: desc.min,
                max: desc.max,
            })
        }
    }

    /// Parse a value string for a key.
    ///
    /// Stepped settings accept their value names (`"Gaussian"`, `"On"`) and,
    /// for switches, `true`/`false`/`yes`/`no`. Everything else goes through
    /// [`parse_param_value`].
    pub fn parse_value(&self, key: &str, value_str: &str) -> ValidationResult<f32> {
        let desc = self
            .descriptor(key)
            .ok_or_else(|| ValidationError::UnknownParameter(key.to_string()))?;

        let s = value_str.trim();
        if let Some(i) = desc
            .value_names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(s))
        {
            return Ok(i as f32);
        }
        if desc.value_names == ["Off", "On"] {
            match s.to_ascii_lowercase().as_str() {
                "true" | "yes" => return Ok(1.0),
                "false" | "no" => return Ok(0.0),
                _ => {}
            }
        }
        parse_param_value(key, s)
    }

    /// Parse and range-check a value string for a key.
    pub fn validate(&self, key: &str, value_str: &str) -> ValidationResult<f32> {
        let value = self.parse_value(key, value_str)?;
        self.validate_param_value(key, value)?;
        Ok(value)
    }

    /// Validate every entry of a settings table, collecting all failures.
    pub fn validate_map(&self, settings: &BTreeMap<String, String>) -> ValidationResult<()> {
        let errors = settings
            .iter()
            .filter_map(|(key, value)| self.validate(key, value).err())
            .collect();
        collect_errors(errors)
    }
}

/// Normalize a parameter name for consistent lookup.
///
/// Converts to lowercase and replaces spaces/dashes with underscores.
fn normalize_param_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

fn collect_errors(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Parse a numeric value string in the settings' own units.
///
/// Supports:
/// - Plain numbers: "-72", "10", "0.5"
/// - Decibels: "-60dB", "-60 dB" (kept in dB)
/// - Milliseconds: "250ms" (kept in ms)
/// - Seconds: "1.5s" (converted to ms)
pub fn parse_param_value(param_name: &str, value_str: &str) -> ValidationResult<f32> {
    let s = value_str.trim();
    let invalid = |v: &str| ValidationError::InvalidFormat {
        param: param_name.to_string(),
        reason: format!("cannot parse '{}' as number", v),
    };

    let (number, scale) = if let Some(v) = s.strip_suffix("dB").or_else(|| s.strip_suffix("db")) {
        (v, 1.0)
    } else if let Some(v) = s.strip_suffix("ms") {
        (v, 1.0)
    } else if let Some(v) = s.strip_suffix('s') {
        (v, 1000.0)
    } else {
        (s, 1.0)
    };

    let number = number.trim();
    match number.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v * scale),
        _ => Err(invalid(number)),
    }
}

/// Format a plain value the way presets store it.
///
/// Stepped settings use their value name; the rest carry the unit suffix.
///
/// ```rust
/// use surge_config::format_param_value;
/// use surge_core::{ParameterInfo, SurgeSettings};
///
/// let s = SurgeSettings::default();
/// assert_eq!(format_param_value(&s.param_info(0).unwrap(), 3.0), "Gaussian");
/// assert_eq!(format_param_value(&s.param_info(3).unwrap(), -72.0), "-72 dB");
/// ```
pub fn format_param_value(desc: &ParamDescriptor, value: f32) -> String {
    if let Some(name) = desc.value_name(value) {
        return name.to_string();
    }
    match desc.unit {
        ParamUnit::None => format!("{}", value),
        unit => format!("{}{}", value, unit.suffix()),
    }
}

/// Parse and range-check one setting.
///
/// This is a convenience function that creates a validator internally.
pub fn validate_setting(key: &str, value_str: &str) -> ValidationResult<f32> {
    SettingsValidator::new().validate(key, value_str)
}

/// Validate a preset's settings table.
///
/// # Example
///
/// ```rust,no_run
/// use surge_config::{Preset, validate_preset};
///
/// let preset = Preset::load("my_preset.toml").unwrap();
/// validate_preset(&preset).expect("preset should be valid");
/// ```
pub fn validate_preset(preset: &crate::Preset) -> ValidationResult<()> {
    SettingsValidator::new().validate_map(&preset.settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_string_id_and_name() {
        let validator = SettingsValidator::new();
        assert_eq!(validator.find_param_index("modein"), Some(0));
        assert_eq!(validator.find_param_index("thr_on"), Some(3));
        assert_eq!(validator.find_param_index("THR_OFF"), Some(4));
        assert_eq!(validator.find_param_index("Fade In Time"), Some(6));
        assert_eq!(validator.find_param_index("fade-out-time"), Some(7));
        assert_eq!(validator.find_param_index("ogv_r"), Some(17));
        assert_eq!(validator.find_param_index("drive"), None);
    }

    #[test]
    fn test_validate_param_name() {
        let validator = SettingsValidator::new();
        assert!(validator.validate_param_name("rms").is_ok());
        assert!(matches!(
            validator.validate_param_name("attack"),
            Err(ValidationError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_validate_param_value_in_range() {
        let validator = SettingsValidator::new();
        assert!(validator.validate_param_value("thr_on", -120.0).is_ok());
        assert!(validator.validate_param_value("thr_on", -24.0).is_ok());
        assert!(validator.validate_param_value("fadeout", 500.0).is_ok());

        let result = validator.validate_param_value("thr_on", -10.0);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));

        let result = validator.validate_param_value("rms", 2.0);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_parse_param_value_plain_numbers() {
        assert_eq!(parse_param_value("test", "0.5").unwrap(), 0.5);
        assert_eq!(parse_param_value("test", "20").unwrap(), 20.0);
        assert_eq!(parse_param_value("test", "-72").unwrap(), -72.0);
    }

    #[test]
    fn test_parse_param_value_with_units() {
        assert_eq!(parse_param_value("test", "-6dB").unwrap(), -6.0);
        assert_eq!(parse_param_value("test", "-60 dB").unwrap(), -60.0);
        assert_eq!(parse_param_value("test", "100ms").unwrap(), 100.0);
        assert_eq!(parse_param_value("test", "250 ms").unwrap(), 250.0);
        assert_eq!(parse_param_value("test", "0.5s").unwrap(), 500.0);
    }

    #[test]
    fn test_parse_param_value_invalid() {
        for bad in ["not_a_number", "", "dB", "inf", "NaN"] {
            let result = parse_param_value("test", bad);
            assert!(
                matches!(result, Err(ValidationError::InvalidFormat { .. })),
                "{bad:?} -> {result:?}"
            );
        }
    }

    #[test]
    fn test_parse_value_names() {
        let validator = SettingsValidator::new();
        assert_eq!(validator.parse_value("modein", "Linear").unwrap(), 0.0);
        assert_eq!(validator.parse_value("modeout", "PARABOLIC").unwrap(), 4.0);
        assert_eq!(validator.parse_value("modeout", "2").unwrap(), 2.0);
        assert_eq!(validator.parse_value("bypass", "on").unwrap(), 1.0);
        assert_eq!(validator.parse_value("bypass", "false").unwrap(), 0.0);
        assert_eq!(validator.parse_value("grv", "yes").unwrap(), 1.0);
        assert!(validator.parse_value("modein", "true").is_err());
    }

    #[test]
    fn test_validate_combines_parse_and_range() {
        assert_eq!(validate_setting("fadein", "1s").unwrap(), 1000.0);
        assert!(matches!(
            validate_setting("fadein", "2s"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_setting("modein", "Square"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_map_collects_errors() {
        let validator = SettingsValidator::new();
        let mut map = BTreeMap::new();
        map.insert("thr_on".to_string(), "-60 dB".to_string());
        map.insert("fadein".to_string(), "20 ms".to_string());
        assert!(validator.validate_map(&map).is_ok());

        map.insert("attack".to_string(), "5".to_string());
        assert!(matches!(
            validator.validate_map(&map),
            Err(ValidationError::UnknownParameter(_))
        ));

        map.insert("rms".to_string(), "1000".to_string());
        match validator.validate_map(&map) {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn test_format_param_value() {
        let s = SurgeSettings::default();
        let desc = |i| s.param_info(i).unwrap();
        assert_eq!(format_param_value(&desc(1), 0.0), "Linear");
        assert_eq!(format_param_value(&desc(6), 100.0), "100 ms");
        assert_eq!(format_param_value(&desc(10), -3.5), "-3.5 dB");
        assert_eq!(format_param_value(&desc(13), 1.0), "On");
    }

    #[test]
    fn test_formatted_values_validate() {
        let s = SurgeSettings::default();
        let validator = SettingsValidator::new();
        for i in 0..s.param_count() {
            let desc = s.param_info(i).unwrap();
            let text = format_param_value(&desc, s.get_param(i));
            assert_eq!(
                validator.validate(desc.string_id, &text).unwrap(),
                s.get_param(i),
                "{} = {text}",
                desc.string_id
            );
        }
    }

    #[test]
    fn test_param_ids() {
        let ids = SettingsValidator::new().param_ids();
        assert_eq!(ids.len(), 18);
        assert_eq!(ids[0], "modein");
        assert_eq!(ids[17], "ogv_r");
    }

    #[test]
    fn test_multiple_display() {
        let err = ValidationError::Multiple(vec![
            ValidationError::UnknownParameter("a".to_string()),
            ValidationError::UnknownParameter("b".to_string()),
        ]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: unknown parameter: a; unknown parameter: b"
        );
    }
}
