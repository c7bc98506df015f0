//! Integration tests for surge-config.
//!
//! These tests verify end-to-end functionality across modules.

use surge_config::{
    ConfigError, IoOp, Preset, ValidationError, factory_presets, get_factory_preset, validate_preset,
};
use surge_core::{SurgeFilter, SurgeSettings};
use tempfile::TempDir;

/// Test saving a preset to disk and loading it back.
#[test]
fn test_preset_save_load_roundtrip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("nested").join("roundtrip.toml");

    let original = Preset::new("Round Trip")
        .with_description("Saved and reloaded")
        .with_sample_rate(96000)
        .with_setting("fadein", "25 ms")
        .with_setting("modeout", "Cubic")
        .with_setting("bypass", "Off");

    original.save(&path).expect("should save preset");
    assert!(path.exists());

    let loaded = Preset::load(&path).expect("should load preset");
    assert_eq!(loaded, original);
}

/// Test loading a missing file reports the path.
#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("missing.toml");

    let err = Preset::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { op: IoOp::Read, .. }));
    assert!(err.to_string().contains("missing.toml"));
}

/// Test malformed TOML surfaces as a parse error.
#[test]
fn test_malformed_toml() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "name = \n[settings").unwrap();

    assert!(matches!(
        Preset::load(&path),
        Err(ConfigError::Parse(_))
    ));
}

/// Every factory preset resolves and drives a filter.
#[test]
fn test_factory_presets_drive_filter() {
    for preset in factory_presets() {
        validate_preset(&preset)
            .unwrap_or_else(|e| panic!("factory preset '{}' invalid: {e}", preset.name));

        let settings = preset.to_settings().expect("factory preset should resolve");
        let mut filter = SurgeFilter::stereo(preset.sample_rate as f32).unwrap();
        filter.update_settings(&settings);

        let input: Vec<f32> = (0..4096).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
        let mut out_l = vec![0.0; input.len()];
        let mut out_r = vec![0.0; input.len()];
        filter.process(&[&input, &input], &mut [&mut out_l, &mut out_r]);

        assert!(
            out_l.iter().chain(&out_r).all(|s| s.is_finite()),
            "preset '{}' produced non-finite output",
            preset.name
        );
    }
}

/// The reported latency follows the preset's fade-out time.
#[test]
fn test_long_tail_latency() {
    let settings = get_factory_preset("long_tail")
        .expect("long_tail should exist")
        .to_settings()
        .expect("long_tail should resolve");

    let mut filter = SurgeFilter::mono(48000.0).unwrap();
    filter.update_settings(&settings);
    assert_eq!(filter.latency(), 19200);
}

/// Overrides on top of a factory preset reach the filter settings.
#[test]
fn test_overrides_on_factory_preset() {
    let mut preset = get_factory_preset("transport").expect("transport should exist");
    preset.apply_override("fadein=200ms").unwrap();
    preset.apply_override("Bypass=on").unwrap();

    let settings = preset.to_settings().unwrap();
    assert_eq!(settings.fade_in_ms, 200.0);
    assert!(settings.bypass);
    assert_eq!(settings.rms_ms, 5.0);
}

/// A captured settings record survives a trip through a file.
#[test]
fn test_captured_settings_file_roundtrip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("captured.toml");

    let settings = SurgeSettings {
        input_gain_db: -6.0,
        threshold_on_db: -50.0,
        fade_out_ms: 75.5,
        gain_visible: false,
        ..SurgeSettings::default()
    };
    Preset::from_settings("Captured", &settings)
        .save(&path)
        .unwrap();

    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded.to_settings().unwrap(), settings);
}

/// Validation reports every bad entry at once.
#[test]
fn test_validation_collects_all_errors() {
    let preset = Preset::from_toml(
        r#"
name = "Broken"

[settings]
thr_on = "-10 dB"
modein = "Square"
release = "100 ms"
fadein = "50 ms"
"#,
    )
    .unwrap();

    match validate_preset(&preset) {
        Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 3),
        other => panic!("expected three errors, got {other:?}"),
    }
    assert!(matches!(
        preset.to_settings(),
        Err(ConfigError::Validation(ValidationError::Multiple(_)))
    ));
}
