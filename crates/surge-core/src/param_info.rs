//! Parameter introspection for the surge filter controls.
//!
//! Hosts, presets and the CLI discover the filter's controls through the
//! [`ParameterInfo`] trait. Each control is described by a [`ParamDescriptor`]
//! carrying its display names, unit, range, default and stable identifiers:
//!
//! - [`ParamId`] - stable numeric ID for automation and preset persistence
//! - `string_id` - stable textual ID used as the preset key (e.g. `"thr_on"`)
//! - [`ParamScale`] - normalization curve (linear, logarithmic)
//! - [`ParamFlags`] - capability flags (automatable, stepped)
//!
//! Switches are exposed as stepped `0.0`/`1.0` parameters and enumerations
//! as stepped indices with a table of value names.
//!
//! # Example
//!
//! ```rust
//! use surge_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct Trim {
//!     gain_db: f32,
//! }
//!
//! impl ParameterInfo for Trim {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::gain_db("Trim", "Trim", -24.0, 24.0, 0.0)
//!                 .with_id(ParamId(1), "trim")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         if index == 0 { self.gain_db } else { 0.0 }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.gain_db = desc.clamp(value);
//!         }
//!     }
//! }
//!
//! let mut trim = Trim { gain_db: 0.0 };
//! trim.set_param(0, 100.0);
//! assert_eq!(trim.get_param(0), 24.0);
//! assert_eq!(trim.find_param_by_string_id("trim"), Some(0));
//! ```

/// Scaling curve for parameter normalization.
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Logarithmic**: `normalized = ln(value/min) / ln(max/min)`, requires `min > 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// More resolution at low values. Used for the RMS window.
    Logarithmic,
}

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// ```rust
/// use surge_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!ParamFlags::NONE.contains(ParamFlags::AUTOMATABLE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter takes integer values only (switches, enumerations).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Unit type for parameter display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels, for gains and thresholds.
    Decibels,
    /// Milliseconds, for fade, delay and window times.
    Milliseconds,
    /// Dimensionless: switches and enumerations.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use surge_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::None => "",
        }
    }
}

/// Trait for processors that expose introspectable parameters.
///
/// Parameters are accessed by zero-based index, stable for the lifetime of
/// the implementor. Implementations clamp written values through the
/// descriptor and ignore out-of-range indices.
pub trait ParameterInfo {
    /// Returns the number of parameters. Valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at `index`, or `None` past the end.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current plain value of the parameter at `index` (0.0 if out of range).
    fn get_param(&self, index: usize) -> f32;

    /// Sets the parameter at `index`, clamping to the descriptor's range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by display name or short name (case-insensitive).
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name) || desc.short_name.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Find a parameter index by its stable string ID (exact match).
    fn find_param_by_string_id(&self, string_id: &str) -> Option<usize> {
        (0..self.param_count())
            .find(|&i| self.param_info(i).is_some_and(|d| d.string_id == string_id))
    }

    /// Returns the stable [`ParamId`] for the parameter at `index`.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Finds a parameter index by its stable [`ParamId`]. O(n), setup paths only.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Fade in time").
    pub name: &'static str,
    /// Short name for compact displays, 8 characters or less.
    pub short_name: &'static str,
    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Value after construction or reset.
    pub default: f32,
    /// Recommended increment for encoder-based control.
    pub step: f32,
    /// Stable numeric ID. Default: `ParamId(0)` (unassigned).
    pub id: ParamId,
    /// Stable textual ID used as the preset key. Default: `""`.
    pub string_id: &'static str,
    /// Normalization curve.
    pub scale: ParamScale,
    /// Capability flags.
    pub flags: ParamFlags,
    /// Display names for stepped enumerations, indexed by value. Empty otherwise.
    pub value_names: &'static [&'static str],
}

impl ParamDescriptor {
    const fn base(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
        step: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
            value_names: &[],
        }
    }

    /// Gain or threshold parameter in decibels.
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(name, short_name, ParamUnit::Decibels, min, max, default, 0.1)
    }

    /// Time parameter in milliseconds.
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(name, short_name, ParamUnit::Milliseconds, min, max, default, 0.5)
    }

    /// On/off switch stored as `0.0` / `1.0`.
    pub const fn toggle(name: &'static str, short_name: &'static str, default_on: bool) -> Self {
        let default = if default_on { 1.0 } else { 0.0 };
        let mut desc = Self::base(name, short_name, ParamUnit::None, 0.0, 1.0, default, 1.0);
        desc.flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
        desc.value_names = &["Off", "On"];
        desc
    }

    /// Enumeration stored as an index into `names`.
    pub const fn choice(
        name: &'static str,
        short_name: &'static str,
        names: &'static [&'static str],
        default: usize,
    ) -> Self {
        let max = if names.is_empty() { 0.0 } else { (names.len() - 1) as f32 };
        let mut desc = Self::base(name, short_name, ParamUnit::None, 0.0, max, default as f32, 1.0);
        desc.flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
        desc.value_names = names;
        desc
    }

    /// Sets the stable parameter ID and string ID.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the normalization scale.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Clamps a value to this parameter's range.
    ///
    /// Stepped parameters are rounded to the nearest integer first; NaN falls
    /// back to the default.
    ///
    /// ```rust
    /// use surge_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("Gain", "Gain", -60.0, 12.0, 0.0);
    /// assert_eq!(desc.clamp(-100.0), -60.0);
    /// assert_eq!(desc.clamp(100.0), 12.0);
    /// assert_eq!(desc.clamp(f32::NAN), 0.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        let value = if self.flags.contains(ParamFlags::STEPPED) {
            libm::roundf(value)
        } else {
            value
        };
        value.clamp(self.min, self.max)
    }

    /// Converts a plain value to the normalized range `0.0..=1.0`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || value <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
        }
    }

    /// Converts a normalized value back to the plain range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                self.min * libm::powf(self.max / self.min, normalized)
            }
        }
    }

    /// Display name of a stepped value, if this descriptor carries value names.
    ///
    /// ```rust
    /// use surge_core::ParamDescriptor;
    ///
    /// let sw = ParamDescriptor::toggle("Bypass", "Bypass", false);
    /// assert_eq!(sw.value_name(1.0), Some("On"));
    /// assert_eq!(sw.value_name(7.0), Some("On"));
    /// ```
    pub fn value_name(&self, value: f32) -> Option<&'static str> {
        if self.value_names.is_empty() {
            return None;
        }
        let index = self.clamp(value) as usize;
        self.value_names.get(index).copied()
    }
}
