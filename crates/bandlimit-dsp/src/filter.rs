//! Resonant filters: a cookbook biquad and a Moog-style ladder.

use std::f64::consts::{FRAC_1_SQRT_2, PI, TAU};

use crate::error::{DspError, DspResult};

/// Biquad response types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Lowpass,
    Highpass,
    /// Constant 0 dB peak gain bandpass.
    Bandpass,
    Notch,
    /// Peaking EQ; boost/cut controlled by the gain parameter.
    Peak,
    LowShelf,
    HighShelf,
    Allpass,
}

/// Direct-form-1 biquad with RBJ cookbook coefficients.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// Changing frequency, Q, gain or type recomputes the coefficients; the
/// delay state is kept so parameter sweeps stay click-free.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    sample_rate: f64,
    sample_rate_inv: f64,
    frequency: f64,
    q: f64,
    gain_db: f64,
    filter_type: FilterType,

    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,

    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadFilter {
    /// Creates a lowpass at `frequency` with Butterworth Q and no gain.
    pub fn new(sample_rate: f64, frequency: f64) -> DspResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(DspError::InvalidSampleRate { rate: sample_rate });
        }
        if !(frequency.is_finite() && frequency > 0.0 && frequency < sample_rate * 0.5) {
            return Err(DspError::InvalidFrequency {
                freq: frequency,
                sample_rate,
            });
        }
        let mut filter = Self {
            sample_rate,
            sample_rate_inv: 1.0 / sample_rate,
            frequency,
            q: FRAC_1_SQRT_2,
            gain_db: 0.0,
            filter_type: FilterType::Lowpass,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        filter.update();
        Ok(filter)
    }

    /// Filters one sample.
    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    /// Clears the delay state.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Sets the center/corner frequency in Hz.
    pub fn set_frequency(&mut self, frequency: f64) {
        debug_assert!(frequency > 0.0 && frequency < self.sample_rate * 0.5);
        self.frequency = frequency;
        self.update();
    }

    /// Sets the quality factor.
    pub fn set_q(&mut self, q: f64) {
        debug_assert!(q > 0.0);
        self.q = q;
        self.update();
    }

    /// Sets the gain in dB; only peak and shelf types use it.
    pub fn set_gain(&mut self, gain_db: f64) {
        self.gain_db = gain_db;
        self.update();
    }

    /// Switches the response type.
    pub fn set_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
        self.update();
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn gain(&self) -> f64 {
        self.gain_db
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    fn update(&mut self) {
        let w0 = TAU * self.frequency * self.sample_rate_inv;
        let cosw = w0.cos();
        let sinw = w0.sin();
        let alpha = sinw / (2.0 * self.q);
        // Amplitude for peak/shelf responses.
        let a = 10.0_f64.powf(self.gain_db * 0.025);

        let (b0, b1, b2, a0, a1, a2) = match self.filter_type {
            FilterType::Lowpass => {
                let b1 = 1.0 - cosw;
                (b1 * 0.5, b1, b1 * 0.5, 1.0 + alpha, -2.0 * cosw, 1.0 - alpha)
            }
            FilterType::Highpass => {
                let b1 = -(1.0 + cosw);
                (-b1 * 0.5, b1, -b1 * 0.5, 1.0 + alpha, -2.0 * cosw, 1.0 - alpha)
            }
            FilterType::Bandpass => {
                (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cosw, 1.0 - alpha)
            }
            FilterType::Notch => {
                (1.0, -2.0 * cosw, 1.0, 1.0 + alpha, -2.0 * cosw, 1.0 - alpha)
            }
            FilterType::Allpass => (
                1.0 - alpha,
                -2.0 * cosw,
                1.0 + alpha,
                1.0 + alpha,
                -2.0 * cosw,
                1.0 - alpha,
            ),
            FilterType::Peak => (
                1.0 + alpha * a,
                -2.0 * cosw,
                1.0 - alpha * a,
                1.0 + alpha / a,
                -2.0 * cosw,
                1.0 - alpha / a,
            ),
            FilterType::LowShelf => {
                let sq = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cosw + sq),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cosw),
                    a * ((a + 1.0) - (a - 1.0) * cosw - sq),
                    (a + 1.0) + (a - 1.0) * cosw + sq,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cosw),
                    (a + 1.0) + (a - 1.0) * cosw - sq,
                )
            }
            FilterType::HighShelf => {
                let sq = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cosw + sq),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cosw),
                    a * ((a + 1.0) + (a - 1.0) * cosw - sq),
                    (a + 1.0) - (a - 1.0) * cosw + sq,
                    2.0 * ((a - 1.0) - (a + 1.0) * cosw),
                    (a + 1.0) - (a - 1.0) * cosw - sq,
                )
            }
        };

        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }
}

/// Moog-style ladder lowpass: four cascaded one-pole stages with resonance
/// feedback from the last stage into the input.
///
/// Cutoff and resonance are normalized to [0, 1]; the tuning polynomial and
/// the sine-based feedback coefficient are empirical.
#[derive(Debug, Clone)]
pub struct MoogFilter {
    sample_rate: f64,
    sample_rate_inv: f64,
    /// Normalized cutoff, `2 * frequency / sample_rate`.
    cutoff: f64,
    resonance: f64,

    p: f64,
    k: f64,
    r: f64,

    y1: f64,
    y2: f64,
    y3: f64,
    y4: f64,
    old_x: f64,
    old_y1: f64,
    old_y2: f64,
    old_y3: f64,
}

impl MoogFilter {
    /// Creates a ladder filter with the cutoff wide open and no resonance.
    pub fn new(sample_rate: f64) -> DspResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(DspError::InvalidSampleRate { rate: sample_rate });
        }
        let mut filter = Self {
            sample_rate,
            sample_rate_inv: 1.0 / sample_rate,
            cutoff: 1.0,
            resonance: 0.0,
            p: 0.0,
            k: 0.0,
            r: 0.0,
            y1: 0.0,
            y2: 0.0,
            y3: 0.0,
            y4: 0.0,
            old_x: 0.0,
            old_y1: 0.0,
            old_y2: 0.0,
            old_y3: 0.0,
        };
        filter.calc();
        Ok(filter)
    }

    /// Sets the cutoff frequency in Hz.
    pub fn set_frequency(&mut self, frequency: f64) {
        debug_assert!(frequency >= 0.0 && frequency <= self.sample_rate * 0.5);
        self.cutoff = 2.0 * frequency * self.sample_rate_inv;
        self.calc();
    }

    /// Sets the resonance amount in [0, 1].
    pub fn set_resonance(&mut self, resonance: f64) {
        debug_assert!((0.0..=1.0).contains(&resonance));
        self.resonance = resonance;
        self.calc();
    }

    /// Filters one sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let x = input - self.r * self.y4;

        // Four cascaded one-pole stages (bilinear transform).
        self.y1 = x * self.p + self.old_x * self.p - self.k * self.y1;
        self.y2 = self.y1 * self.p + self.old_y1 * self.p - self.k * self.y2;
        self.y3 = self.y2 * self.p + self.old_y2 * self.p - self.k * self.y3;
        self.y4 = self.y3 * self.p + self.old_y3 * self.p - self.k * self.y4;

        self.old_x = x;
        self.old_y1 = self.y1;
        self.old_y2 = self.y2;
        self.old_y3 = self.y3;

        self.y4
    }

    /// Clears all stage state.
    pub fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
        self.y3 = 0.0;
        self.y4 = 0.0;
        self.old_x = 0.0;
        self.old_y1 = 0.0;
        self.old_y2 = 0.0;
        self.old_y3 = 0.0;
    }

    /// Normalized cutoff in [0, 1].
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Cutoff frequency in Hz.
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff * self.sample_rate * 0.5
    }

    pub fn resonance(&self) -> f64 {
        self.resonance
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn calc(&mut self) {
        // Empirical tuning.
        self.p = self.cutoff * (1.8 - 0.8 * self.cutoff);
        self.k = 2.0 * (self.cutoff * PI * 0.5).sin() - 1.0;

        let t1 = (1.0 - self.p) * 1.386_249;
        let t2 = 12.0 + t1 * t1;
        self.r = self.resonance * (t2 + 6.0 * t1) / (t2 - 6.0 * t1);
    }
}
