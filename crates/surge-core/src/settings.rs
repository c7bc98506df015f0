//! Filter settings in user-facing units.
//!
//! [`SurgeSettings`] is the single configuration record of a filter instance.
//! It is built by the host, a preset or the CLI, and handed to
//! [`SurgeFilter::update_settings`](crate::SurgeFilter::update_settings) by
//! reference between blocks. Every field is reachable by index through
//! [`ParameterInfo`], which clamps written values to the declared ranges.
//!
//! | Index | String ID | Control | Range |
//! |-------|-----------|---------|-------|
//! | 0 | `modein` | Fade-in curve | Linear … Parabolic |
//! | 1 | `modeout` | Fade-out curve | Linear … Parabolic |
//! | 2 | `input` | Input gain | −60 … +24 dB |
//! | 3 | `thr_on` | Fade-in threshold | −120 … −24 dB |
//! | 4 | `thr_off` | Fade-out threshold | −120 … −24 dB |
//! | 5 | `rms` | RMS window | 4 … 100 ms |
//! | 6 | `fadein` | Fade-in time | 0 … 1000 ms |
//! | 7 | `fadeout` | Fade-out time | 0 … 500 ms |
//! | 8 | `fidelay` | Fade-in cancel delay | 0 … 100 ms |
//! | 9 | `fodelay` | Fade-out cancel delay | 0 … 100 ms |
//! | 10 | `output` | Output gain | −60 … +24 dB |
//! | 11 | `grv` | Gain graph visible | Off / On |
//! | 12 | `ev` | Envelope graph visible | Off / On |
//! | 13 | `bypass` | Bypass | Off / On |
//! | 14 | `igv_l` | Left (mono) input graph visible | Off / On |
//! | 15 | `ogv_l` | Left (mono) output graph visible | Off / On |
//! | 16 | `igv_r` | Right input graph visible | Off / On |
//! | 17 | `ogv_r` | Right output graph visible | Off / On |

use crate::gate::{
    FADE_IN_MAX_MS, FADE_OUT_MAX_MS, FadeConfig, FadeMode, GateConfig, PAUSE_MAX_MS, RMS_MAX_MS,
    RMS_MIN_MS,
};
use crate::math::db_to_linear;
use crate::param_info::{ParamDescriptor, ParamId, ParamScale, ParameterInfo};
use crate::MAX_CHANNELS;

/// Lowest selectable gate threshold in dB.
pub const THRESHOLD_MIN_DB: f32 = -120.0;
/// Highest selectable gate threshold in dB.
pub const THRESHOLD_MAX_DB: f32 = -24.0;
/// Lowest input/output gain in dB.
pub const GAIN_MIN_DB: f32 = -60.0;
/// Highest input/output gain in dB.
pub const GAIN_MAX_DB: f32 = 24.0;

const PARAMS: [ParamDescriptor; 18] = [
    ParamDescriptor::choice("Fade In Mode", "InMode", FadeMode::NAMES, 3)
        .with_id(ParamId(1), "modein"),
    ParamDescriptor::choice("Fade Out Mode", "OutMode", FadeMode::NAMES, 3)
        .with_id(ParamId(2), "modeout"),
    ParamDescriptor::gain_db("Input Gain", "Input", GAIN_MIN_DB, GAIN_MAX_DB, 0.0)
        .with_id(ParamId(3), "input"),
    ParamDescriptor::gain_db(
        "Fade In Threshold",
        "ThrOn",
        THRESHOLD_MIN_DB,
        THRESHOLD_MAX_DB,
        -72.0,
    )
    .with_id(ParamId(4), "thr_on"),
    ParamDescriptor::gain_db(
        "Fade Out Threshold",
        "ThrOff",
        THRESHOLD_MIN_DB,
        THRESHOLD_MAX_DB,
        -72.0,
    )
    .with_id(ParamId(5), "thr_off"),
    ParamDescriptor::time_ms("RMS Estimation Time", "RMS", RMS_MIN_MS, RMS_MAX_MS, 10.0)
        .with_id(ParamId(6), "rms")
        .with_scale(ParamScale::Logarithmic),
    ParamDescriptor::time_ms("Fade In Time", "FadeIn", 0.0, FADE_IN_MAX_MS, 100.0)
        .with_id(ParamId(7), "fadein"),
    ParamDescriptor::time_ms("Fade Out Time", "FadeOut", 0.0, FADE_OUT_MAX_MS, 0.0)
        .with_id(ParamId(8), "fadeout"),
    ParamDescriptor::time_ms("Fade In Cancel Delay", "InDelay", 0.0, PAUSE_MAX_MS, 10.0)
        .with_id(ParamId(9), "fidelay"),
    ParamDescriptor::time_ms("Fade Out Cancel Delay", "OutDelay", 0.0, PAUSE_MAX_MS, 10.0)
        .with_id(ParamId(10), "fodelay"),
    ParamDescriptor::gain_db("Output Gain", "Output", GAIN_MIN_DB, GAIN_MAX_DB, 0.0)
        .with_id(ParamId(11), "output"),
    ParamDescriptor::toggle("Gain Graph Visible", "GainVis", true).with_id(ParamId(12), "grv"),
    ParamDescriptor::toggle("Envelope Graph Visible", "EnvVis", true).with_id(ParamId(13), "ev"),
    ParamDescriptor::toggle("Bypass", "Bypass", false).with_id(ParamId(14), "bypass"),
    ParamDescriptor::toggle("Input Graph Visible L", "InVisL", true).with_id(ParamId(15), "igv_l"),
    ParamDescriptor::toggle("Output Graph Visible L", "OutVisL", true)
        .with_id(ParamId(16), "ogv_l"),
    ParamDescriptor::toggle("Input Graph Visible R", "InVisR", true).with_id(ParamId(17), "igv_r"),
    ParamDescriptor::toggle("Output Graph Visible R", "OutVisR", true)
        .with_id(ParamId(18), "ogv_r"),
];

/// Complete settings of one filter instance.
///
/// Field values are trusted as written; go through
/// [`ParameterInfo::set_param`] or [`clamped`](Self::clamped) to enforce the
/// declared ranges. The pipeline clamps on every update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurgeSettings {
    /// Fade-in curve.
    pub fade_in_mode: FadeMode,
    /// Fade-out curve.
    pub fade_out_mode: FadeMode,
    /// Gain applied before detection and processing, dB.
    pub input_gain_db: f32,
    /// Envelope level that opens the gate, dB.
    pub threshold_on_db: f32,
    /// Envelope level below which the gate closes, dB.
    pub threshold_off_db: f32,
    /// RMS window, ms.
    pub rms_ms: f32,
    /// Fade-in duration, ms.
    pub fade_in_ms: f32,
    /// Fade-out duration, ms. Also the added latency.
    pub fade_out_ms: f32,
    /// Minimum fade-in run before a fade-out may cancel it, ms.
    pub fade_in_delay_ms: f32,
    /// Minimum fade-out run before a fade-in may cancel it, ms.
    pub fade_out_delay_ms: f32,
    /// Gain applied to the processed signal, dB.
    pub output_gain_db: f32,
    /// Publish the gain-control graph.
    pub gain_visible: bool,
    /// Publish the envelope graph.
    pub envelope_visible: bool,
    /// Pass the latency-aligned input through unprocessed.
    pub bypass: bool,
    /// Publish each channel's input graph.
    pub input_visible: [bool; MAX_CHANNELS],
    /// Publish each channel's output graph.
    pub output_visible: [bool; MAX_CHANNELS],
}

impl Default for SurgeSettings {
    fn default() -> Self {
        Self {
            fade_in_mode: FadeMode::Gaussian,
            fade_out_mode: FadeMode::Gaussian,
            input_gain_db: 0.0,
            threshold_on_db: -72.0,
            threshold_off_db: -72.0,
            rms_ms: 10.0,
            fade_in_ms: 100.0,
            fade_out_ms: 0.0,
            fade_in_delay_ms: 10.0,
            fade_out_delay_ms: 10.0,
            output_gain_db: 0.0,
            gain_visible: true,
            envelope_visible: true,
            bypass: false,
            input_visible: [true; MAX_CHANNELS],
            output_visible: [true; MAX_CHANNELS],
        }
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

impl SurgeSettings {
    /// Copy with every value clamped to its declared range.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for i in 0..out.param_count() {
            let v = out.get_param(i);
            out.set_param(i, v);
        }
        out
    }

    /// Linear input gain.
    pub fn input_gain(&self) -> f32 {
        db_to_linear(self.input_gain_db)
    }

    /// Linear output gain.
    pub fn output_gain(&self) -> f32 {
        db_to_linear(self.output_gain_db)
    }

    /// Gate configuration with thresholds converted to linear amplitude.
    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            fade_in: FadeConfig {
                mode: self.fade_in_mode,
                threshold: db_to_linear(self.threshold_on_db),
                time_ms: self.fade_in_ms,
                delay_ms: self.fade_in_delay_ms,
            },
            fade_out: FadeConfig {
                mode: self.fade_out_mode,
                threshold: db_to_linear(self.threshold_off_db),
                time_ms: self.fade_out_ms,
                delay_ms: self.fade_out_delay_ms,
            },
            rms_ms: self.rms_ms,
        }
    }

    /// Whether anything the pipeline publishes is visible for `channels` channels.
    pub fn any_visible(&self, channels: usize) -> bool {
        let n = channels.min(MAX_CHANNELS);
        self.gain_visible
            || self.envelope_visible
            || self.input_visible[..n].iter().any(|&v| v)
            || self.output_visible[..n].iter().any(|&v| v)
    }
}

impl ParameterInfo for SurgeSettings {
    fn param_count(&self) -> usize {
        PARAMS.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        PARAMS.get(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.fade_in_mode.index() as f32,
            1 => self.fade_out_mode.index() as f32,
            2 => self.input_gain_db,
            3 => self.threshold_on_db,
            4 => self.threshold_off_db,
            5 => self.rms_ms,
            6 => self.fade_in_ms,
            7 => self.fade_out_ms,
            8 => self.fade_in_delay_ms,
            9 => self.fade_out_delay_ms,
            10 => self.output_gain_db,
            11 => flag(self.gain_visible),
            12 => flag(self.envelope_visible),
            13 => flag(self.bypass),
            14 => flag(self.input_visible[0]),
            15 => flag(self.output_visible[0]),
            16 => flag(self.input_visible[1]),
            17 => flag(self.output_visible[1]),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = PARAMS.get(index) else {
            return;
        };
        let v = desc.clamp(value);
        let on = v >= 0.5;
        match index {
            0 => self.fade_in_mode = FadeMode::from_index(v as usize),
            1 => self.fade_out_mode = FadeMode::from_index(v as usize),
            2 => self.input_gain_db = v,
            3 => self.threshold_on_db = v,
            4 => self.threshold_off_db = v,
            5 => self.rms_ms = v,
            6 => self.fade_in_ms = v,
            7 => self.fade_out_ms = v,
            8 => self.fade_in_delay_ms = v,
            9 => self.fade_out_delay_ms = v,
            10 => self.output_gain_db = v,
            11 => self.gain_visible = on,
            12 => self.envelope_visible = on,
            13 => self.bypass = on,
            14 => self.input_visible[0] = on,
            15 => self.output_visible[0] = on,
            16 => self.input_visible[1] = on,
            17 => self.output_visible[1] = on,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_descriptors() {
        let s = SurgeSettings::default();
        for i in 0..s.param_count() {
            let desc = s.param_info(i).unwrap();
            assert_eq!(s.get_param(i), desc.default, "param {} ({})", i, desc.string_id);
        }
    }

    #[test]
    fn string_ids_are_unique() {
        let s = SurgeSettings::default();
        for i in 0..s.param_count() {
            let id = s.param_info(i).unwrap().string_id;
            assert_eq!(s.find_param_by_string_id(id), Some(i), "{id}");
        }
    }

    #[test]
    fn set_param_clamps() {
        let mut s = SurgeSettings::default();
        s.set_param(3, 0.0);
        assert_eq!(s.threshold_on_db, THRESHOLD_MAX_DB);
        s.set_param(5, 1.0);
        assert_eq!(s.rms_ms, RMS_MIN_MS);
        s.set_param(7, 10_000.0);
        assert_eq!(s.fade_out_ms, FADE_OUT_MAX_MS);
        s.set_param(0, 42.0);
        assert_eq!(s.fade_in_mode, FadeMode::Parabolic);
        s.set_param(13, 0.7);
        assert!(s.bypass);
        s.set_param(99, 1.0);
    }

    #[test]
    fn clamped_fixes_raw_fields() {
        let s = SurgeSettings {
            fade_in_ms: -5.0,
            output_gain_db: 90.0,
            rms_ms: f32::NAN,
            ..SurgeSettings::default()
        };
        let c = s.clamped();
        assert_eq!(c.fade_in_ms, 0.0);
        assert_eq!(c.output_gain_db, GAIN_MAX_DB);
        assert_eq!(c.rms_ms, 10.0);
    }

    #[test]
    fn gate_config_converts_units() {
        let s = SurgeSettings {
            threshold_on_db: -40.0,
            threshold_off_db: -60.0,
            fade_out_ms: 20.0,
            fade_out_mode: FadeMode::Sine,
            ..SurgeSettings::default()
        };
        let g = s.gate_config();
        assert!((g.fade_in.threshold - 0.01).abs() < 1e-6);
        assert!((g.fade_out.threshold - 0.001).abs() < 1e-7);
        assert_eq!(g.fade_out.time_ms, 20.0);
        assert_eq!(g.fade_out.mode, FadeMode::Sine);
        assert_eq!(SurgeSettings::default().gate_config(), GateConfig::default());
    }

    #[test]
    fn visibility() {
        let mut s = SurgeSettings {
            gain_visible: false,
            envelope_visible: false,
            input_visible: [false, true],
            output_visible: [false; MAX_CHANNELS],
            ..SurgeSettings::default()
        };
        assert!(!s.any_visible(1));
        assert!(s.any_visible(2));
        s.envelope_visible = true;
        assert!(s.any_visible(1));
    }
}
