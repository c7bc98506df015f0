//! Configuration and preset management for the surge anti-pop filter.
//!
//! Presets are TOML files holding a sparse `[settings]` table keyed by the
//! filter's parameter string ids. This crate loads and saves them, validates
//! them against the [`SurgeSettings`] descriptors and resolves them into
//! settings ready for [`SurgeFilter::update_settings`](surge_core::SurgeFilter::update_settings).
//!
//! # Features
//!
//! - **Preset System**: Load and save settings presets from TOML files
//! - **Validation**: Check keys, value formats and parameter ranges
//! - **Overrides**: Apply `key=value` assignments on top of a preset
//! - **Paths**: Platform-specific preset and config directories
//! - **Factory Presets**: Built-in presets for common click sources
//!
//! # Example
//!
//! ```rust,no_run
//! use surge_config::{Preset, user_presets_dir};
//!
//! let mut preset = Preset::new("Tight")
//!     .with_description("Quick fades for punch-ins")
//!     .with_setting("fadein", "5 ms")
//!     .with_setting("fadeout", "10 ms");
//! preset.apply_override("thr_on=-66dB").unwrap();
//!
//! let settings = preset.to_settings().unwrap();
//! assert_eq!(settings.fade_in_ms, 5.0);
//!
//! // Save to user presets directory
//! let path = user_presets_dir().join("tight.toml");
//! preset.save(&path).unwrap();
//! ```

mod error;
mod preset;

/// Platform-specific paths for presets and configuration.
#[cfg(feature = "std")]
pub mod paths;

/// Settings and preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::{ConfigError, IoOp};
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
#[cfg(feature = "std")]
pub use paths::{
    PresetDirs, ensure_user_config_dir, ensure_user_presets_dir, find_preset, list_all_presets,
    list_system_presets, list_user_presets, preset_name_from_path, resolve_preset,
    system_presets_dir, user_config_dir, user_presets_dir,
};
pub use preset::Preset;
pub use validation::{
    SettingsValidator, ValidationError, ValidationResult, format_param_value, parse_param_value,
    validate_preset, validate_setting,
};

/// Re-export the settings types presets resolve to.
pub use surge_core::{ParamDescriptor, ParameterInfo, SurgeSettings};
