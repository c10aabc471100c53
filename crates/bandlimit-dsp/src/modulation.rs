//! Modulation routing primitives.
//!
//! A modulated parameter wraps a base value and accumulates contributions
//! from external modulation sources. How contributions combine with the base
//! and each other, and how the combined result is clamped, is a per
//! destination-type policy: LFO rates add and clamp to their legal range,
//! amplitude widths multiply and stay unclamped.
//!
//! Consumers poll [`ModulatedParam::take_change_flag`] once per processing
//! step and recompute derived state (such as an oscillator's phase delta)
//! only when it fires, instead of redundantly every sample.

use std::marker::PhantomData;

/// How a destination combines and shapes modulation contributions.
///
/// `combine` must be associative and commutative, and [`Self::NEUTRAL`] must
/// be its true identity: combining any value with the neutral element leaves
/// it unchanged, so a parameter with no connected sources reads back its
/// bare (shaped) base value.
pub trait ModulationPolicy {
    /// Identity element of [`Self::combine`].
    const NEUTRAL: f64;

    /// Folds one more contribution into the running combination.
    fn combine(a: f64, b: f64) -> f64;

    /// Clamps or shapes the combined value before it is read.
    fn shape(value: f64) -> f64;
}

/// Additive modulation for an LFO's rate, clamped to [0.01, 400] Hz.
#[derive(Debug, Clone, Copy)]
pub struct LfoRate;

impl ModulationPolicy for LfoRate {
    const NEUTRAL: f64 = 0.0;

    #[inline]
    fn combine(a: f64, b: f64) -> f64 {
        a + b
    }

    #[inline]
    fn shape(value: f64) -> f64 {
        value.clamp(0.01, 400.0)
    }
}

/// Additive modulation for an audio-rate playback frequency, clamped to
/// [0.01, 20 000] Hz.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackFrequency;

impl ModulationPolicy for PlaybackFrequency {
    const NEUTRAL: f64 = 0.0;

    #[inline]
    fn combine(a: f64, b: f64) -> f64 {
        a + b
    }

    #[inline]
    fn shape(value: f64) -> f64 {
        value.clamp(0.01, 20_000.0)
    }
}

/// Multiplicative, unclamped modulation for widths and amplitudes.
#[derive(Debug, Clone, Copy)]
pub struct Width;

impl ModulationPolicy for Width {
    const NEUTRAL: f64 = 1.0;

    #[inline]
    fn combine(a: f64, b: f64) -> f64 {
        a * b
    }

    #[inline]
    fn shape(value: f64) -> f64 {
        value
    }
}

/// Signal range of a modulation source's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Output in [0, 1].
    Unipolar,
    /// Output in [-1, 1].
    Bipolar,
}

/// How often a modulation source produces a fresh value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRate {
    /// One value per processed block.
    PerBlock,
    /// One value per sample.
    PerSample,
}

/// A producer of modulation values, such as an LFO.
pub trait ModulationSource {
    /// The source's most recently computed output.
    fn value(&self) -> f64;

    /// Whether the output is unipolar or bipolar.
    fn polarity(&self) -> Polarity;

    /// Whether the output refreshes per block or per sample.
    fn update_rate(&self) -> UpdateRate;
}

/// A destination parameter: a base value plus accumulated modulation,
/// combined and shaped by policy `P`.
///
/// Contributions are pushed each processing step and cleared before the
/// next; the read value is `P::shape(P::combine(base, accumulated))`. Any
/// write raises an internal change flag that the owner consumes with
/// [`take_change_flag`](Self::take_change_flag).
#[derive(Debug, Clone)]
pub struct ModulatedParam<P: ModulationPolicy> {
    base: f64,
    accumulated: f64,
    changed: bool,
    _policy: PhantomData<P>,
}

impl<P: ModulationPolicy> ModulatedParam<P> {
    /// Creates a parameter with no modulation applied.
    ///
    /// The change flag starts raised so the owner initializes its derived
    /// state on the first poll.
    pub fn new(base: f64) -> Self {
        Self {
            base,
            accumulated: P::NEUTRAL,
            changed: true,
            _policy: PhantomData,
        }
    }

    /// Replaces the base value.
    pub fn set_base(&mut self, base: f64) {
        if base != self.base {
            self.base = base;
            self.changed = true;
        }
    }

    /// The unmodulated base value.
    pub fn base(&self) -> f64 {
        self.base
    }

    /// Folds one source's contribution into the accumulated modulation.
    pub fn push(&mut self, contribution: f64) {
        self.accumulated = P::combine(self.accumulated, contribution);
        self.changed = true;
    }

    /// Drops all accumulated contributions.
    pub fn clear(&mut self) {
        if self.accumulated != P::NEUTRAL {
            self.accumulated = P::NEUTRAL;
            self.changed = true;
        }
    }

    /// The shaped, combined value seen by the consumer.
    #[inline]
    pub fn value(&self) -> f64 {
        P::shape(P::combine(self.base, self.accumulated))
    }

    /// Returns whether the parameter changed since the last call, clearing
    /// the flag.
    pub fn take_change_flag(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}
