//! Per-channel signal path.
//!
//! Each channel owns two delay lines of equal length (wet and dry), a bypass
//! crossfader and two meter graphs. The chunk-sized working buffer is not
//! owned here; the pipeline lends one out of its arena on every call.

use crate::bypass::BypassCrossfader;
use crate::delay::DelayLine;
use crate::error::SurgeError;
use crate::math::abs_max;
use crate::meter_graph::{MeterGraph, MeterMethod};

/// Delay compensation, bypass and metering for one channel.
#[derive(Debug, Clone)]
pub struct ChannelPath {
    wet_delay: DelayLine,
    dry_delay: DelayLine,
    bypass: BypassCrossfader,
    input_graph: MeterGraph,
    output_graph: MeterGraph,
    input_visible: bool,
    output_visible: bool,
    input_peak: f32,
    output_peak: f32,
}

impl ChannelPath {
    /// Create a channel with delays that can hold up to `max_latency` samples.
    pub fn new(sample_rate: f32, max_latency: usize) -> Self {
        Self {
            wet_delay: DelayLine::new(max_latency),
            dry_delay: DelayLine::new(max_latency),
            bypass: BypassCrossfader::new(sample_rate),
            input_graph: MeterGraph::new(MeterMethod::AbsMaximum),
            output_graph: MeterGraph::new(MeterMethod::AbsMaximum),
            input_visible: true,
            output_visible: true,
            input_peak: 0.0,
            output_peak: 0.0,
        }
    }

    /// Resize delays and graphs for a new sample rate. Clears all history.
    ///
    /// # Errors
    ///
    /// [`SurgeError::Allocation`] if the delay or graph storage cannot be
    /// reserved. The channel must not be processed afterwards.
    pub fn set_sample_rate(
        &mut self,
        sample_rate: f32,
        max_latency: usize,
        points: usize,
        samples_per_dot: usize,
    ) -> Result<(), SurgeError> {
        self.wet_delay = DelayLine::try_new(max_latency)?;
        self.dry_delay = DelayLine::try_new(max_latency)?;
        self.bypass.set_sample_rate(sample_rate);
        self.input_graph.try_init(points, samples_per_dot)?;
        self.output_graph.try_init(points, samples_per_dot)?;
        self.input_peak = 0.0;
        self.output_peak = 0.0;
        Ok(())
    }

    /// Set both delay lengths at once.
    pub fn set_latency(&mut self, samples: usize) {
        self.wet_delay.set_delay(samples);
        self.dry_delay.set_delay(samples);
    }

    /// Current `(wet, dry)` delay lengths.
    pub fn delays(&self) -> (usize, usize) {
        (self.wet_delay.delay(), self.dry_delay.delay())
    }

    /// Select the bypass target.
    pub fn set_bypass(&mut self, bypass: bool) {
        self.bypass.set_bypass(bypass);
    }

    /// Bypass crossfader of this channel.
    pub fn bypass(&self) -> &BypassCrossfader {
        &self.bypass
    }

    /// Set graph visibility.
    pub fn set_visibility(&mut self, input: bool, output: bool) {
        self.input_visible = input;
        self.output_visible = output;
    }

    /// Whether the input graph is published.
    pub fn input_visible(&self) -> bool {
        self.input_visible
    }

    /// Whether the output graph is published.
    pub fn output_visible(&self) -> bool {
        self.output_visible
    }

    /// Input history, oldest first.
    pub fn input_graph(&self) -> &MeterGraph {
        &self.input_graph
    }

    /// Output history, oldest first.
    pub fn output_graph(&self) -> &MeterGraph {
        &self.output_graph
    }

    /// Peak absolute input of the most recent chunk, after input gain.
    pub fn input_peak(&self) -> f32 {
        self.input_peak
    }

    /// Peak absolute output of the most recent chunk.
    pub fn output_peak(&self) -> f32 {
        self.output_peak
    }

    /// Apply input gain into `buf` and meter the result.
    pub fn load_input(&mut self, buf: &mut [f32], input: &[f32], gain: f32) {
        for (b, &x) in buf.iter_mut().zip(input) {
            *b = x * gain;
        }
        self.input_graph.process(buf);
        self.input_peak = abs_max(buf);
    }

    /// Produce the channel output for one chunk.
    ///
    /// `buf` holds the gained input from [`load_input`](Self::load_input) and is
    /// consumed as scratch. `input` is the raw input of the same chunk and
    /// `gain` the gate's gain-control. All slices share one length.
    pub fn render_output(
        &mut self,
        out: &mut [f32],
        buf: &mut [f32],
        input: &[f32],
        gain: &[f32],
        output_gain: f32,
    ) {
        self.wet_delay.process_inplace(buf);
        for (b, &g) in buf.iter_mut().zip(gain) {
            *b *= g * output_gain;
        }
        self.dry_delay.process(out, input);
        self.bypass.process_inplace(out, buf);
        self.output_graph.process(out);
        self.output_peak = abs_max(out);
    }

    /// Drop all delayed samples and graph history.
    pub fn clear(&mut self) {
        self.wet_delay.clear();
        self.dry_delay.clear();
        self.bypass.snap_to_target();
        self.input_graph.clear();
        self.output_graph.clear();
        self.input_peak = 0.0;
        self.output_peak = 0.0;
    }
}
