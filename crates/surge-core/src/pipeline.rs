//! The surge filter processing pipeline.
//!
//! [`SurgeFilter`] ties the per-channel paths to one shared gate. Each block
//! is cut into chunks of at most [`CHUNK_SIZE`] samples; per chunk:
//!
//! 1. input gain into each channel's working buffer
//! 2. input graph and input peak meter
//! 3. control signal from the gained buffers ([`derive_control`])
//! 4. gate: control becomes gain-control, envelope is filled
//! 5. gain and envelope meters and graphs
//! 6. per channel: delayed wet × gain × output gain, crossfaded with the
//!    delayed dry input, then output graph and output peak meter
//!
//! After the block the four display meshes are published (when the consumer
//! has released them) and a redraw is requested if anything is visible.
//!
//! Output depends only on the sample sequence: splitting the same signal into
//! different block sizes gives identical results.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::MAX_CHANNELS;
use crate::arena::{ArenaParts, BufferArena};
use crate::blink::Blink;
use crate::channel::ChannelPath;
use crate::control::derive_control;
use crate::error::SurgeError;
use crate::gate::{Depopper, SurgeGate};
use crate::math::{abs_max, abs_min, seconds_to_samples};
use crate::meter_graph::{MeterGraph, MeterMethod};
use crate::settings::SurgeSettings;
use crate::shared::{MeshKind, SurgeShared};

/// Largest number of samples processed in one internal step.
pub const CHUNK_SIZE: usize = 4096;
/// Dots in every display history and mesh row.
pub const MESH_POINTS: usize = 640;
/// Seconds of signal covered by a display history.
pub const MESH_TIME: f32 = 5.0;

/// Anti-pop filter for one mono or stereo stream.
///
/// Generic over the gate; [`Depopper`] is the default.
///
/// # Example
///
/// ```rust
/// use surge_core::{SurgeFilter, SurgeSettings};
///
/// let mut filter = SurgeFilter::stereo(48000.0).unwrap();
/// filter.update_settings(&SurgeSettings {
///     fade_out_ms: 20.0,
///     ..SurgeSettings::default()
/// });
/// assert_eq!(filter.latency(), 960);
///
/// let left = vec![0.0; 512];
/// let right = vec![0.0; 512];
/// let mut out_l = vec![1.0; 512];
/// let mut out_r = vec![1.0; 512];
/// filter.process(&[&left, &right], &mut [&mut out_l, &mut out_r]);
/// assert!(out_l.iter().all(|&x| x == 0.0));
/// ```
#[derive(Debug)]
pub struct SurgeFilter<G: SurgeGate = Depopper> {
    sample_rate: f32,
    gate: G,
    channel_count: usize,
    channels: Vec<ChannelPath>,
    /// `None` when working memory could not be reserved.
    arena: Option<BufferArena>,
    gain_graph: MeterGraph,
    envelope_graph: MeterGraph,
    activity: Blink,
    settings: SurgeSettings,
    input_gain: f32,
    output_gain: f32,
    latency: usize,
    shared: SurgeShared,
}

impl SurgeFilter<Depopper> {
    /// Filter with the default gate for `channels` channels.
    pub fn new(channels: usize, sample_rate: f32) -> Result<Self, SurgeError> {
        Self::with_gate(channels, sample_rate, Depopper::new(sample_rate))
    }

    /// Single-channel filter.
    pub fn mono(sample_rate: f32) -> Result<Self, SurgeError> {
        Self::new(1, sample_rate)
    }

    /// Two-channel filter with a shared gate.
    pub fn stereo(sample_rate: f32) -> Result<Self, SurgeError> {
        Self::new(2, sample_rate)
    }
}

impl<G: SurgeGate> SurgeFilter<G> {
    /// Filter driven by a custom gate.
    ///
    /// Fails only for an unsupported channel count. If working memory, delay
    /// capacity or graph history cannot be reserved the filter is returned
    /// inert: [`is_inert`](Self::is_inert) reports it and every other call
    /// does nothing.
    pub fn with_gate(channels: usize, sample_rate: f32, gate: G) -> Result<Self, SurgeError> {
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(SurgeError::UnsupportedChannels(channels));
        }

        let arena = match BufferArena::try_new(channels, CHUNK_SIZE, MESH_POINTS) {
            Ok(arena) => Some(arena),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(channels, error = %_err, "surge filter is inert");
                None
            }
        };

        let mut filter = Self {
            sample_rate,
            gate,
            channel_count: channels,
            channels: Vec::new(),
            arena,
            gain_graph: MeterGraph::new(MeterMethod::Minimum),
            envelope_graph: MeterGraph::new(MeterMethod::AbsMaximum),
            activity: Blink::new(sample_rate),
            settings: SurgeSettings::default(),
            input_gain: 1.0,
            output_gain: 1.0,
            latency: 0,
            shared: SurgeShared::new(channels),
        };
        if filter.arena.is_some() {
            filter.channels = (0..channels)
                .map(|_| ChannelPath::new(sample_rate, 0))
                .collect();
            filter.set_sample_rate(sample_rate);
        }
        Ok(filter)
    }

    /// Whether reserving working memory, delays or graphs failed.
    pub fn is_inert(&self) -> bool {
        self.arena.is_none()
    }

    /// Channel count.
    pub fn channels(&self) -> usize {
        self.channel_count
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Settings applied by the last [`update_settings`](Self::update_settings), clamped.
    pub fn settings(&self) -> &SurgeSettings {
        &self.settings
    }

    /// The gate.
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Latency in samples added by the gate and mirrored on every delay line.
    pub fn latency(&self) -> usize {
        self.latency
    }

    /// Handle to the lock-free state shared with observers.
    pub fn shared(&self) -> &SurgeShared {
        &self.shared
    }

    /// Per-channel paths.
    pub fn channel_paths(&self) -> &[ChannelPath] {
        &self.channels
    }

    /// Gain-control history (minimum per dot), oldest first.
    pub fn gain_graph(&self) -> &MeterGraph {
        &self.gain_graph
    }

    /// Envelope history (peak per dot), oldest first.
    pub fn envelope_graph(&self) -> &MeterGraph {
        &self.envelope_graph
    }

    /// Reallocate for a new sample rate and reapply the current settings.
    ///
    /// Clears all signal history. Not real-time safe. If the gate, delay or
    /// graph storage cannot be reserved the filter becomes inert.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if self.is_inert() {
            return;
        }
        if let Err(_err) = self.try_set_sample_rate(sample_rate) {
            #[cfg(feature = "tracing")]
            tracing::warn!(sample_rate, error = %_err, "surge filter is inert");
            self.arena = None;
            self.channels.clear();
            self.latency = 0;
            self.shared.set_latency(0);
        }
    }

    fn try_set_sample_rate(&mut self, sample_rate: f32) -> Result<(), SurgeError> {
        self.sample_rate = sample_rate;
        self.gate.set_sample_rate(sample_rate)?;

        let max_latency = self.gate.max_latency();
        let samples_per_dot = seconds_to_samples(sample_rate, MESH_TIME / MESH_POINTS as f32);
        for ch in &mut self.channels {
            ch.set_sample_rate(sample_rate, max_latency, MESH_POINTS, samples_per_dot)?;
        }
        self.gain_graph.try_init(MESH_POINTS, samples_per_dot)?;
        self.envelope_graph.try_init(MESH_POINTS, samples_per_dot)?;
        self.activity.set_sample_rate(sample_rate);

        if let Some(arena) = self.arena.as_mut() {
            let step = MESH_TIME / (MESH_POINTS - 1) as f32;
            for (i, t) in arena.parts().time_points.iter_mut().enumerate() {
                *t = MESH_TIME - i as f32 * step;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, max_latency, samples_per_dot, "surge filter configured");

        let settings = self.settings;
        self.update_settings(&settings);
        Ok(())
    }

    /// Apply a settings record.
    ///
    /// Values are clamped to their declared ranges. The gate is reconfigured
    /// and its latency is set on both delay lines of every channel and
    /// published through [`SurgeShared::latency`] before this returns.
    pub fn update_settings(&mut self, settings: &SurgeSettings) {
        if self.is_inert() {
            return;
        }
        let s = settings.clamped();
        self.settings = s;
        self.input_gain = s.input_gain();
        self.output_gain = s.output_gain();

        self.gate.configure(&s.gate_config());
        self.gate.reconfigure();
        let latency = self.gate.latency().min(self.gate.max_latency());

        for (i, ch) in self.channels.iter_mut().enumerate() {
            ch.set_bypass(s.bypass);
            ch.set_latency(latency);
            ch.set_visibility(s.input_visible[i], s.output_visible[i]);
        }

        if latency != self.latency {
            #[cfg(feature = "tracing")]
            tracing::debug!(from = self.latency, to = latency, "latency changed");
            self.latency = latency;
        }
        self.shared.set_latency(latency);
        self.shared.set_bypassing(s.bypass);
    }

    /// Drop all signal history and return the gate to its closed state.
    pub fn reset(&mut self) {
        if self.is_inert() {
            return;
        }
        self.gate.reset();
        for ch in &mut self.channels {
            ch.clear();
        }
        self.gain_graph.clear();
        self.envelope_graph.clear();
        self.activity.set_sample_rate(self.sample_rate);
    }

    /// Process one block.
    ///
    /// `inputs` and `outputs` hold one buffer per channel. The block length is
    /// the shortest of them; samples past it are left untouched. Never
    /// allocates, never blocks.
    pub fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) {
        let n = self.channel_count;
        let Some(arena) = self.arena.as_mut() else {
            return;
        };
        if inputs.len() < n || outputs.len() < n {
            return;
        }
        let total = inputs[..n]
            .iter()
            .map(|b| b.len())
            .chain(outputs[..n].iter().map(|b| b.len()))
            .min()
            .unwrap_or(0);

        let chunk = arena.chunk();
        let mut offset = 0;
        while offset < total {
            let len = (total - offset).min(chunk);
            let range = offset..offset + len;
            let ArenaParts {
                control,
                envelope,
                channels: bufs,
                ..
            } = arena.parts();
            let control = &mut control[..len];
            let envelope = &mut envelope[..len];

            for (i, (ch, buf)) in self
                .channels
                .iter_mut()
                .zip(bufs.chunks_exact_mut(chunk))
                .enumerate()
            {
                ch.load_input(&mut buf[..len], &inputs[i][range.clone()], self.input_gain);
                self.shared.set_input_meter(i, ch.input_peak());
            }

            derive_control(control, bufs.chunks_exact(chunk).map(|b| &b[..len]));

            self.gate.process(envelope, control);

            self.shared.set_gain_meter(abs_min(control));
            self.shared.set_envelope_meter(abs_max(envelope));
            self.gain_graph.process(control);
            self.envelope_graph.process(envelope);

            self.activity.advance(len);
            if abs_max(control) > 0.0 {
                self.activity.blink();
            }
            self.shared.set_activity(self.activity.value());

            for (i, (ch, buf)) in self
                .channels
                .iter_mut()
                .zip(bufs.chunks_exact_mut(chunk))
                .enumerate()
            {
                ch.render_output(
                    &mut outputs[i][range.clone()],
                    &mut buf[..len],
                    &inputs[i][range.clone()],
                    control,
                    self.output_gain,
                );
                self.shared.set_output_meter(i, ch.output_peak());
            }

            offset += len;
        }

        self.publish_meshes();
        if self.settings.any_visible(n) {
            self.shared.request_redraw();
        }
    }

    fn publish_meshes(&self) {
        let Some(arena) = self.arena.as_ref() else {
            return;
        };
        let time = arena.time_points();

        for (kind, graph, visible) in [
            (MeshKind::Gain, &self.gain_graph, self.settings.gain_visible),
            (
                MeshKind::Envelope,
                &self.envelope_graph,
                self.settings.envelope_visible,
            ),
        ] {
            let mesh = self.shared.mesh(kind);
            if mesh.is_empty() && visible {
                mesh.write_row(0, time);
                mesh.write_row(1, graph.data());
                mesh.commit(2, MESH_POINTS);
            }
        }

        for kind in [MeshKind::Input, MeshKind::Output] {
            let mesh = self.shared.mesh(kind);
            if !mesh.is_empty() {
                continue;
            }
            mesh.write_row(0, time);
            for (i, ch) in self.channels.iter().enumerate() {
                let (visible, graph) = match kind {
                    MeshKind::Input => (ch.input_visible(), ch.input_graph()),
                    _ => (ch.output_visible(), ch.output_graph()),
                };
                if visible {
                    mesh.write_row(i + 1, graph.data());
                } else {
                    mesh.fill_row_zero(i + 1);
                }
            }
            mesh.commit(self.channels.len() + 1, MESH_POINTS);
        }
    }

    /// Borrowed view of the committed graph state for the inline display.
    ///
    /// Series whose visibility switch is off are `None`.
    pub fn graph_view(&self) -> GraphView<'_> {
        let mut view = GraphView {
            bypassing: self.channels.first().is_some_and(|ch| ch.bypass().bypassing()),
            time: self.arena.as_ref().map_or(&[][..], BufferArena::time_points),
            channel_count: self.channels.len(),
            channels: [ChannelView::default(); MAX_CHANNELS],
            envelope: self
                .settings
                .envelope_visible
                .then(|| self.envelope_graph.data()),
            gain: self.settings.gain_visible.then(|| self.gain_graph.data()),
        };
        for (slot, ch) in view.channels.iter_mut().zip(&self.channels) {
            *slot = ChannelView {
                input: ch.input_visible().then(|| ch.input_graph().data()),
                output: ch.output_visible().then(|| ch.output_graph().data()),
            };
        }
        view
    }
}

/// Input and output history of one channel, `None` when hidden.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelView<'a> {
    /// Input history, oldest first.
    pub input: Option<&'a [f32]>,
    /// Output history, oldest first.
    pub output: Option<&'a [f32]>,
}

/// Snapshot of everything the inline display draws.
#[derive(Debug, Clone, Copy)]
pub struct GraphView<'a> {
    /// Bypass target of the first channel.
    pub bypassing: bool,
    /// Time axis in seconds, oldest (largest) first.
    pub time: &'a [f32],
    /// Number of live entries in `channels`.
    pub channel_count: usize,
    /// Per-channel histories.
    pub channels: [ChannelView<'a>; MAX_CHANNELS],
    /// Envelope history when visible.
    pub envelope: Option<&'a [f32]>,
    /// Gain-control history when visible.
    pub gain: Option<&'a [f32]>,
}

impl GraphView<'_> {
    /// Live channel views.
    pub fn channels(&self) -> &[ChannelView<'_>] {
        &self.channels[..self.channel_count.min(MAX_CHANNELS)]
    }
}
