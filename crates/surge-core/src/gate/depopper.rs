//! Default gate: RMS envelope with curve-shaped fade-in and look-ahead fade-out.

#[cfg(all(test, not(feature = "std")))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use super::{FadeConfig, GateConfig, SurgeGate};
use crate::arena::try_zeroed;
use crate::delay::DelayLine;
use crate::error::SurgeError;
use crate::math::millis_to_samples;

/// Longest fade-in in milliseconds.
pub const FADE_IN_MAX_MS: f32 = 1000.0;
/// Longest fade-out in milliseconds. Also the latency bound.
pub const FADE_OUT_MAX_MS: f32 = 500.0;
/// Longest cancel delay in milliseconds.
pub const PAUSE_MAX_MS: f32 = 100.0;
/// Shortest RMS window in milliseconds.
pub const RMS_MIN_MS: f32 = 4.0;
/// Longest RMS window in milliseconds.
pub const RMS_MAX_MS: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Closed,
    FadeIn,
    Opened,
    FadeOut,
}

/// Fade lengths and thresholds in samples / linear amplitude.
#[derive(Debug, Clone, Copy, Default)]
struct Derived {
    fade_in: usize,
    fade_out: usize,
    fade_in_delay: usize,
    fade_out_delay: usize,
    rms: usize,
    thresh_on: f32,
    thresh_off: f32,
}

/// Anti-pop gate.
///
/// The envelope is the RMS of the control signal over a sliding window. The
/// gate opens with a fade-in when the envelope reaches the fade-in threshold
/// and closes with a fade-out when it drops below the fade-out threshold.
///
/// Fade-outs look ahead: the reported latency equals the fade-out time, so a
/// fade that starts when the signal stops has finished by the time the last
/// delayed sample leaves the pipeline. Opening from the closed state uses the
/// envelope delayed by the same latency, keeping fade-ins aligned with the
/// delayed audio.
///
/// A running fade can be reversed by the opposite threshold once its cancel
/// delay has elapsed. Reversals start from the current gain, so the gain
/// curve never jumps.
///
/// # Example
///
/// ```rust
/// use surge_core::{Depopper, GateConfig, SurgeGate};
///
/// let mut gate = Depopper::new(48000.0);
/// gate.configure(&GateConfig::default());
/// gate.reconfigure();
///
/// let mut env = [0.0; 64];
/// let mut control = [0.0; 64];
/// gate.process(&mut env, &mut control);
/// assert!(control.iter().all(|&g| g == 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Depopper {
    sample_rate: f32,
    config: GateConfig,
    derived: Derived,

    state: State,
    /// Samples spent in the current fade.
    counter: usize,
    /// Gain at the moment the current fade started.
    start_gain: f32,
    gain: f32,

    /// Squared control samples, ring of `rms_capacity + 1`.
    squares: Vec<f32>,
    head: usize,
    /// Running sum of the last `derived.rms` squares.
    sum: f64,

    /// Envelope delayed by the latency, used to open from the closed state.
    late_env: DelayLine,
}

impl Depopper {
    /// Create a closed gate with the default configuration applied.
    ///
    /// If the history for `sample_rate` cannot be reserved the gate stays
    /// closed and outputs zero gain until a later
    /// [`set_sample_rate`](SurgeGate::set_sample_rate) succeeds.
    pub fn new(sample_rate: f32) -> Self {
        let mut gate = Self {
            sample_rate,
            config: GateConfig::default(),
            derived: Derived::default(),
            state: State::Closed,
            counter: 0,
            start_gain: 0.0,
            gain: 0.0,
            squares: Vec::new(),
            head: 0,
            sum: 0.0,
            late_env: DelayLine::new(0),
        };
        if let Err(_err) = gate.set_sample_rate(sample_rate) {
            #[cfg(feature = "tracing")]
            tracing::warn!(sample_rate, error = %_err, "depopper has no history");
        }
        gate
    }

    /// Configuration currently stored.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Gain of the most recent sample.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Whether the gate is letting any signal through.
    pub fn is_open(&self) -> bool {
        self.state != State::Closed
    }

    fn rms_capacity(&self) -> usize {
        self.squares.len().saturating_sub(1)
    }

    fn fade_samples(&self, fade: &FadeConfig, max_ms: f32) -> usize {
        millis_to_samples(self.sample_rate, fade.time_ms.clamp(0.0, max_ms))
    }

    /// Push one control sample and return the current RMS.
    #[inline]
    fn push_square(&mut self, x: f32) -> f32 {
        let len = self.squares.len();
        let sq = x * x;
        let oldest = self.squares[(self.head + len - self.derived.rms) % len];
        self.squares[self.head] = sq;
        self.head = (self.head + 1) % len;
        self.sum += f64::from(sq) - f64::from(oldest);
        if self.sum < 0.0 {
            self.sum = 0.0;
        }
        libm::sqrtf((self.sum / self.derived.rms as f64) as f32)
    }

    fn recompute_sum(&mut self) {
        let len = self.squares.len();
        if len == 0 {
            self.sum = 0.0;
            return;
        }
        self.sum = (1..=self.derived.rms)
            .map(|back| f64::from(self.squares[(self.head + len - back) % len]))
            .sum();
    }

    fn begin(&mut self, state: State) {
        self.state = state;
        self.counter = 0;
        self.start_gain = self.gain;
    }

    /// Advance the state machine by one sample.
    #[inline]
    fn step(&mut self, env: f32, late_env: f32) -> f32 {
        let d = self.derived;

        match self.state {
            State::Closed => {
                if late_env >= d.thresh_on {
                    self.begin(State::FadeIn);
                }
            }
            State::Opened => {
                if env < d.thresh_off {
                    self.begin(State::FadeOut);
                }
            }
            State::FadeIn => {
                if self.counter >= d.fade_in_delay && env < d.thresh_off {
                    self.begin(State::FadeOut);
                }
            }
            State::FadeOut => {
                if self.counter >= d.fade_out_delay && env >= d.thresh_on {
                    self.begin(State::FadeIn);
                }
            }
        }

        match self.state {
            State::Closed => self.gain = 0.0,
            State::Opened => self.gain = 1.0,
            State::FadeIn => {
                self.counter += 1;
                if self.counter >= d.fade_in {
                    self.state = State::Opened;
                    self.gain = 1.0;
                } else {
                    let t = self.counter as f32 / d.fade_in as f32;
                    let shape = self.config.fade_in.mode.curve(t);
                    self.gain = self.start_gain + (1.0 - self.start_gain) * shape;
                }
            }
            State::FadeOut => {
                self.counter += 1;
                if self.counter >= d.fade_out {
                    self.state = State::Closed;
                    self.gain = 0.0;
                } else {
                    let t = self.counter as f32 / d.fade_out as f32;
                    let shape = self.config.fade_out.mode.curve(1.0 - t);
                    self.gain = self.start_gain * shape;
                }
            }
        }
        self.gain
    }
}

impl SurgeGate for Depopper {
    fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), SurgeError> {
        let rms_capacity = millis_to_samples(sample_rate, RMS_MAX_MS).max(1);
        let squares = rms_capacity
            .checked_add(1)
            .ok_or(SurgeError::Allocation(usize::MAX))
            .and_then(try_zeroed)?;
        let late_env = DelayLine::try_new(millis_to_samples(sample_rate, FADE_OUT_MAX_MS))?;

        self.sample_rate = sample_rate;
        self.squares = squares;
        self.late_env = late_env;
        self.reset();
        self.reconfigure();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            rms_capacity,
            max_latency = self.max_latency(),
            "depopper sized"
        );
        Ok(())
    }

    fn configure(&mut self, config: &GateConfig) {
        self.config = *config;
    }

    fn reconfigure(&mut self) {
        let c = self.config;
        let sr = self.sample_rate;
        let rms = millis_to_samples(sr, c.rms_ms.clamp(RMS_MIN_MS, RMS_MAX_MS));

        self.derived = Derived {
            fade_in: self.fade_samples(&c.fade_in, FADE_IN_MAX_MS),
            fade_out: self.fade_samples(&c.fade_out, FADE_OUT_MAX_MS),
            fade_in_delay: millis_to_samples(sr, c.fade_in.delay_ms.clamp(0.0, PAUSE_MAX_MS)),
            fade_out_delay: millis_to_samples(sr, c.fade_out.delay_ms.clamp(0.0, PAUSE_MAX_MS)),
            rms: rms.clamp(1, self.rms_capacity().max(1)),
            thresh_on: c.fade_in.threshold,
            thresh_off: c.fade_out.threshold,
        };
        self.late_env.set_delay(self.latency());
        self.recompute_sum();
    }

    fn latency(&self) -> usize {
        self.derived.fade_out.min(self.max_latency())
    }

    fn max_latency(&self) -> usize {
        millis_to_samples(self.sample_rate, FADE_OUT_MAX_MS)
    }

    fn process(&mut self, envelope: &mut [f32], control: &mut [f32]) {
        if self.squares.is_empty() {
            envelope.fill(0.0);
            control.fill(0.0);
            return;
        }
        for (env_out, c) in envelope.iter_mut().zip(control.iter_mut()) {
            let env = self.push_square(*c);
            let late = self.late_env.process_sample(env);
            *env_out = env;
            *c = self.step(env, late);
        }
    }

    fn reset(&mut self) {
        self.state = State::Closed;
        self.counter = 0;
        self.start_gain = 0.0;
        self.gain = 0.0;
        self.squares.fill(0.0);
        self.head = 0;
        self.sum = 0.0;
        self.late_env.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::FadeMode;

    const SR: f32 = 1000.0;

    fn gate_with(fade_in_ms: f32, fade_out_ms: f32) -> Depopper {
        let mut config = GateConfig::default();
        config.fade_in.mode = FadeMode::Linear;
        config.fade_out.mode = FadeMode::Linear;
        config.fade_in.time_ms = fade_in_ms;
        config.fade_out.time_ms = fade_out_ms;
        config.rms_ms = 4.0;
        let mut gate = Depopper::new(SR);
        gate.configure(&config);
        gate.reconfigure();
        gate
    }

    fn run(gate: &mut Depopper, input: &[f32]) -> (Vec<f32>, Vec<f32>) {
        let mut env = vec![0.0; input.len()];
        let mut control = input.to_vec();
        gate.process(&mut env, &mut control);
        (env, control)
    }

    #[test]
    fn silence_keeps_gate_closed() {
        let mut gate = gate_with(10.0, 0.0);
        let (env, gain) = run(&mut gate, &[0.0; 100]);
        assert!(env.iter().all(|&e| e == 0.0));
        assert!(gain.iter().all(|&g| g == 0.0));
        assert!(!gate.is_open());
    }

    #[test]
    fn linear_fade_in_reaches_unity_after_fade_time() {
        let mut gate = gate_with(10.0, 0.0);
        let (_, gain) = run(&mut gate, &[0.5; 20]);
        assert!((gain[0] - 0.1).abs() < 1e-6, "first step, got {}", gain[0]);
        assert!((gain[4] - 0.5).abs() < 1e-6);
        assert_eq!(gain[9], 1.0);
        assert!(gain[10..].iter().all(|&g| g == 1.0));
    }

    #[test]
    fn envelope_is_windowed_rms() {
        let mut gate = gate_with(0.0, 0.0);
        let (env, _) = run(&mut gate, &[1.0; 6]);
        assert!((env[0] - 0.5).abs() < 1e-6, "1 of 4 samples, got {}", env[0]);
        assert!((env[3] - 1.0).abs() < 1e-6);
        assert!((env[5] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn latency_tracks_fade_out_time() {
        let mut gate = gate_with(10.0, 20.0);
        assert_eq!(gate.latency(), 20);

        let mut config = *gate.config();
        config.fade_out.time_ms = 10_000.0;
        gate.configure(&config);
        gate.reconfigure();
        assert_eq!(gate.latency(), gate.max_latency());
        assert_eq!(gate.max_latency(), 500);
    }

    #[test]
    fn fade_out_starts_when_envelope_drops() {
        let mut gate = gate_with(0.0, 10.0);
        let mut input = vec![0.5; 40];
        input.extend(core::iter::repeat_n(0.0, 40));
        let (_, gain) = run(&mut gate, &input);

        // Opening waits for the delayed envelope.
        assert_eq!(gain[9], 0.0);
        assert_eq!(gain[10], 1.0);
        // The RMS window holds only silence from sample 43, then the fade runs ten samples.
        assert_eq!(gain[42], 1.0);
        assert!((gain[43] - 0.9).abs() < 1e-6, "got {}", gain[43]);
        assert!((gain[51] - 0.1).abs() < 1e-6, "got {}", gain[51]);
        assert!(gain[52..].iter().all(|&g| g == 0.0));
    }

    #[test]
    fn chunking_does_not_change_output() {
        let input: Vec<f32> = (0..300)
            .map(|i| if (50..180).contains(&i) { 0.3 } else { 0.0 })
            .collect();

        let mut whole = gate_with(25.0, 15.0);
        let (env_a, gain_a) = run(&mut whole, &input);

        let mut pieces = gate_with(25.0, 15.0);
        let mut env_b = Vec::new();
        let mut gain_b = Vec::new();
        for chunk in input.chunks(7) {
            let (e, g) = run(&mut pieces, chunk);
            env_b.extend(e);
            gain_b.extend(g);
        }
        assert_eq!(env_a, env_b);
        assert_eq!(gain_a, gain_b);
    }

    #[test]
    fn unreservable_rate_keeps_previous_state() {
        let mut gate = gate_with(10.0, 5.0);
        let err = gate.set_sample_rate(1.0e20).unwrap_err();
        assert!(matches!(err, SurgeError::Allocation(_)));
        assert_eq!(gate.max_latency(), 500);
        assert_eq!(gate.latency(), 5);

        let (_, gain) = run(&mut gate, &[0.5; 40]);
        assert_eq!(gain[39], 1.0);
    }
}
