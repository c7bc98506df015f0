//! Surge Core - real-time anti-pop filter
//!
//! The surge filter removes the clicks and pops produced when audio starts or
//! stops abruptly (transport start, track arming, signal dropouts). It watches
//! an RMS envelope of the incoming signal, fades the signal in when it
//! appears and fades it out when it disappears, compensating the look-ahead
//! with latency-aligned delay lines on every channel.
//!
//! # Building blocks
//!
//! ## Pipeline
//!
//! - [`SurgeFilter`] - mono or stereo processor, generic over the gate
//! - [`SurgeSettings`] - every control in user units, clamped on update
//! - [`SurgeShared`] - lock-free meters, meshes and redraw requests
//!
//! ## Gate
//!
//! - [`SurgeGate`] - envelope → gain-control strategy with fixed latency
//! - [`Depopper`] - default gate with curve-shaped fades ([`FadeMode`])
//! - [`derive_control`] - control signal from the channel buffers
//!
//! ## Primitives
//!
//! - [`DelayLine`] - fixed-capacity latency compensation
//! - [`BypassCrossfader`] - click-free dry/wet switching
//! - [`MeterGraph`] - decimated level history for displays
//! - [`Mesh`] - single-snapshot publish buffer for UI consumers
//! - [`BufferArena`] - one fallible allocation for all working buffers
//!
//! ## Display
//!
//! - [`InlineRenderer`] - draws the graph state onto a [`Canvas`]
//! - [`PixelCanvas`] - software raster canvas
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (with `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! surge-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use surge_core::{SurgeFilter, SurgeSettings};
//!
//! let mut filter = SurgeFilter::mono(48000.0).unwrap();
//! filter.update_settings(&SurgeSettings {
//!     fade_in_ms: 50.0,
//!     threshold_on_db: -60.0,
//!     ..SurgeSettings::default()
//! });
//!
//! let input = vec![0.25; 4800];
//! let mut output = vec![0.0; 4800];
//! filter.process(&[&input], &mut [&mut output]);
//!
//! // 50 ms fade-in at 48 kHz: fully open after 2400 samples.
//! assert_eq!(output[4799], 0.25);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod arena;
pub mod blink;
pub mod bypass;
pub mod channel;
pub mod control;
pub mod delay;
pub mod error;
pub mod gate;
pub mod math;
pub mod mesh;
pub mod meter_graph;
pub mod param_info;
pub mod pipeline;
pub mod render;
pub mod settings;
pub mod shared;

/// Most channels a filter instance supports.
pub const MAX_CHANNELS: usize = 2;

// Re-export main types at crate root
pub use arena::{ArenaParts, BufferArena};
pub use blink::{BLINK_HOLD_MS, Blink};
pub use bypass::{BYPASS_RAMP_MS, BypassCrossfader};
pub use channel::ChannelPath;
pub use control::derive_control;
pub use delay::DelayLine;
pub use error::SurgeError;
pub use gate::{
    Depopper, FADE_IN_MAX_MS, FADE_OUT_MAX_MS, FadeConfig, FadeMode, GateConfig, PAUSE_MAX_MS,
    RMS_MAX_MS, RMS_MIN_MS, SurgeGate,
};
pub use math::{
    GAIN_AMP_M_144_DB, GAIN_AMP_P_24_DB, abs_max, abs_min, db_to_linear, linear_to_db,
    millis_to_samples, seconds_to_samples,
};
pub use mesh::{Mesh, MeshSnapshot};
pub use meter_graph::{MeterGraph, MeterMethod};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit, ParameterInfo};
pub use pipeline::{CHUNK_SIZE, ChannelView, GraphView, MESH_POINTS, MESH_TIME, SurgeFilter};
pub use render::{Canvas, Color, GOLDEN_RATIO_INV, InlineRenderer, PixelCanvas};
pub use settings::{
    GAIN_MAX_DB, GAIN_MIN_DB, SurgeSettings, THRESHOLD_MAX_DB, THRESHOLD_MIN_DB,
};
pub use shared::{MeshKind, SurgeShared};
