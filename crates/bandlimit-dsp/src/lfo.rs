//! Lookup-table low-frequency oscillators.
//!
//! An LFO reads one of five precomputed 256-sample shape tables through a
//! 32-bit fixed-point phase accumulator with 8 integer bits, so the integer
//! part is the table index and overflow is the period wrap. The output is
//! linearly interpolated, scaled by a modulatable width, and optionally
//! smoothed by a one-pole lowpass to soften steps in the square and
//! sawtooth shapes.
//!
//! The shape tables are built once, wrapped in an [`Arc`] and shared by all
//! LFO instances; nothing here is global state.

use std::sync::Arc;

use bandlimit_math::{interpolation, Fixed};

use crate::error::{DspError, DspResult};
use crate::modulation::{
    LfoRate, ModulatedParam, ModulationSource, Polarity, UpdateRate, Width,
};
use crate::wavetable::Waveform;

const TABLE_SIZE: usize = 256;

/// 8 integer bits address the 256-entry tables; the remaining 24 bits carry
/// the interpolation fraction.
type Phase = Fixed<32, 8>;

/// Immutable set of guard-padded lookup tables, one per [`Waveform`] shape.
///
/// Each table holds `TABLE_SIZE + 1` samples, the last a copy of the first,
/// so interpolated lookup never wraps an index.
#[derive(Debug)]
pub struct LfoTables {
    tables: [Vec<f64>; 5],
}

impl LfoTables {
    /// Builds all five shape tables.
    pub fn new() -> Self {
        let build = |shape: Waveform| {
            let mut table = shape.generate(TABLE_SIZE);
            table.push(table[0]);
            table
        };
        Self {
            tables: [
                build(Waveform::Sine),
                build(Waveform::Triangle),
                build(Waveform::Sawtooth),
                build(Waveform::Square),
                build(Waveform::Exponential),
            ],
        }
    }

    /// The guard-padded table for `shape`.
    pub fn table(&self, shape: Waveform) -> &[f64] {
        let index = match shape {
            Waveform::Sine => 0,
            Waveform::Triangle => 1,
            Waveform::Sawtooth => 2,
            Waveform::Square => 3,
            Waveform::Exponential => 4,
        };
        &self.tables[index]
    }
}

impl Default for LfoTables {
    fn default() -> Self {
        Self::new()
    }
}

/// A single lookup LFO voice.
///
/// Frequency and width are [`ModulatedParam`]s; external sources push
/// contributions onto [`frequency_input`](Self::frequency_input) and
/// [`width_input`](Self::width_input), and the phase increment is
/// recomputed only when the frequency parameter reports a change. The LFO
/// itself implements [`ModulationSource`] so its output can feed other
/// destinations.
#[derive(Debug, Clone)]
pub struct Lfo {
    tables: Arc<LfoTables>,
    shape: Waveform,
    sample_rate: f64,
    sample_rate_inv: f64,
    phase: Phase,
    phase_inc: Phase,
    start_phase: Phase,
    value: f64,
    frequency: ModulatedParam<LfoRate>,
    width: ModulatedParam<Width>,
    smoothing_time: f64,
    smoothing: f64,
}

impl Lfo {
    /// Creates an LFO over a shared table set.
    pub fn new(
        tables: Arc<LfoTables>,
        shape: Waveform,
        sample_rate: f64,
        frequency: f64,
    ) -> DspResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(DspError::InvalidSampleRate { rate: sample_rate });
        }
        let mut lfo = Self {
            tables,
            shape,
            sample_rate,
            sample_rate_inv: 1.0 / sample_rate,
            phase: Phase::ZERO,
            phase_inc: Phase::ZERO,
            start_phase: Phase::ZERO,
            value: 0.0,
            frequency: ModulatedParam::new(frequency),
            width: ModulatedParam::new(1.0),
            smoothing_time: 0.0,
            smoothing: 1.0,
        };
        lfo.update_phase_inc();
        lfo.frequency.take_change_flag();
        Ok(lfo)
    }

    /// Sets the unmodulated oscillation rate in Hz.
    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency.set_base(frequency);
    }

    /// Sets the unmodulated output scale.
    pub fn set_width(&mut self, width: f64) {
        self.width.set_base(width);
    }

    /// Sets the shape table to read from, keeping the phase.
    pub fn set_shape(&mut self, shape: Waveform) {
        self.shape = shape;
    }

    /// Sets the one-pole smoothing time in seconds; zero disables smoothing.
    pub fn set_smoothing_time(&mut self, seconds: f64) {
        debug_assert!(seconds >= 0.0);
        self.smoothing_time = seconds;
        let exponent = -std::f64::consts::TAU / (seconds * self.sample_rate);
        self.smoothing = 1.0 - exponent.exp();
    }

    /// Sets the normalized phase in [0, 1) that `retrigger` jumps to.
    pub fn set_start_phase(&mut self, normalized: f64) {
        debug_assert!((0.0..1.0).contains(&normalized));
        self.start_phase = Phase::from_f64(normalized * TABLE_SIZE as f64);
    }

    /// Changes the sample rate, rescaling the phase increment and smoothing
    /// coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        debug_assert!(sample_rate > 0.0);
        self.sample_rate = sample_rate;
        self.sample_rate_inv = 1.0 / sample_rate;
        self.set_smoothing_time(self.smoothing_time);
        self.update_phase_inc();
    }

    /// The frequency destination, for connecting modulation sources.
    pub fn frequency_input(&mut self) -> &mut ModulatedParam<LfoRate> {
        &mut self.frequency
    }

    /// The width destination, for connecting modulation sources.
    pub fn width_input(&mut self) -> &mut ModulatedParam<Width> {
        &mut self.width
    }

    /// Advances one sample and returns the new output value.
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        if self.frequency.take_change_flag() {
            self.update_phase_inc();
        }

        let table = self.tables.table(self.shape);
        let index = self.phase.integer() as usize;
        let fraction = self.phase.fractional();
        self.phase += self.phase_inc;

        let current = interpolation::linear(fraction, table[index], table[index + 1]);
        self.value += (current * self.width.value() - self.value) * self.smoothing;
        self.value
    }

    /// Resets the phase to the configured start phase.
    pub fn retrigger(&mut self) {
        self.phase = self.start_phase;
    }

    /// Resets phase and smoothed output.
    pub fn reset(&mut self) {
        self.retrigger();
        self.value = 0.0;
    }

    /// Unmodulated oscillation rate in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency.base()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Smoothing time in seconds.
    pub fn smoothing_time(&self) -> f64 {
        self.smoothing_time
    }

    fn update_phase_inc(&mut self) {
        let inc = self.frequency.value() * TABLE_SIZE as f64 * self.sample_rate_inv;
        self.phase_inc = Phase::from_f64(inc);
    }
}

impl ModulationSource for Lfo {
    fn value(&self) -> f64 {
        self.value
    }

    fn polarity(&self) -> Polarity {
        Polarity::Bipolar
    }

    fn update_rate(&self) -> UpdateRate {
        UpdateRate::PerBlock
    }
}
