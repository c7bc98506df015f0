//! Factory presets bundled with surge.
//!
//! These presets are always available without external files. They cover the
//! usual sources of clicks: transport start/stop, punch-ins, noisy inputs and
//! material that needs a long, smooth release.

use crate::Preset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init",
    "transport",
    "punch_in",
    "slow_swell",
    "noisy_source",
    "long_tail",
];

/// TOML content for factory presets.
///
/// These are embedded at compile time and always available.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("transport", TRANSPORT_PRESET),
    ("punch_in", PUNCH_IN_PRESET),
    ("slow_swell", SLOW_SWELL_PRESET),
    ("noisy_source", NOISY_SOURCE_PRESET),
    ("long_tail", LONG_TAIL_PRESET),
];

/// Default settings.
const INIT_PRESET: &str = r#"
name = "Init"
description = "Default settings - Gaussian fade-in, no fade-out lookahead"
sample_rate = 48000
"#;

/// Play/stop clicks.
const TRANSPORT_PRESET: &str = r#"
name = "Transport"
description = "Short fades for transport start and stop"
sample_rate = 48000

[settings]
modein = "Sine"
modeout = "Sine"
thr_on = "-72 dB"
thr_off = "-78 dB"
rms = "5 ms"
fadein = "20 ms"
fadeout = "20 ms"
fidelay = "5 ms"
fodelay = "5 ms"
"#;

/// Punch-in recording.
const PUNCH_IN_PRESET: &str = r#"
name = "Punch In"
description = "Near-instant fade-in with a minimal release"
sample_rate = 48000

[settings]
modein = "Cubic"
modeout = "Linear"
rms = "4 ms"
fadein = "5 ms"
fadeout = "5 ms"
fidelay = "0 ms"
fodelay = "0 ms"
"#;

/// Gentle swell.
const SLOW_SWELL_PRESET: &str = r#"
name = "Slow Swell"
description = "Long Gaussian fade-in that rounds off sudden starts"
sample_rate = 48000

[settings]
modein = "Gaussian"
fadein = "600 ms"
fidelay = "50 ms"
rms = "20 ms"
"#;

/// Hissy input.
const NOISY_SOURCE_PRESET: &str = r#"
name = "Noisy Source"
description = "Raised thresholds so background noise does not hold the gate open"
sample_rate = 48000

[settings]
thr_on = "-48 dB"
thr_off = "-54 dB"
rms = "30 ms"
fadein = "50 ms"
fadeout = "80 ms"
"#;

/// Long release.
const LONG_TAIL_PRESET: &str = r#"
name = "Long Tail"
description = "Long parabolic fade-out with matching lookahead latency"
sample_rate = 48000

[settings]
modeout = "Parabolic"
fadein = "50 ms"
fadeout = "400 ms"
fodelay = "50 ms"
thr_off = "-84 dB"
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use surge_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {:?}", preset.name, preset.description);
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by name.
///
/// The name can be the internal identifier (e.g., "punch_in") or the
/// display name (e.g., "Punch In"). The lookup is case-insensitive.
///
/// # Example
///
/// ```rust
/// use surge_config::get_factory_preset;
///
/// if let Some(preset) = get_factory_preset("transport") {
///     println!("Found preset: {}", preset.name);
/// }
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    for (preset_name, toml) in FACTORY_PRESETS_TOML {
        if preset_name.to_lowercase() == name_lower {
            return Preset::from_toml(toml).ok();
        }
    }

    // Also try matching against the preset's actual name field
    for (_, toml) in FACTORY_PRESETS_TOML {
        if let Ok(preset) = Preset::from_toml(toml)
            && preset.name.to_lowercase() == name_lower
        {
            return Some(preset);
        }
    }

    None
}

/// Get the names of all factory presets.
///
/// Returns the internal identifiers used for factory presets.
///
/// # Example
///
/// ```rust
/// use surge_config::factory_presets::factory_preset_names;
///
/// let names = factory_preset_names();
/// assert!(names.contains(&"transport"));
/// ```
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a preset name is a factory preset.
///
/// Returns true if the given name matches any factory preset (case-insensitive).
///
/// # Example
///
/// ```rust
/// use surge_config::is_factory_preset;
///
/// assert!(is_factory_preset("long_tail"));
/// assert!(is_factory_preset("Long Tail"));
/// assert!(!is_factory_preset("my_custom_preset"));
/// ```
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
