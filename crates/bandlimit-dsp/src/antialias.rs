//! Spectral anti-aliasing: Fourier band-limiting of wavetable material.
//!
//! Playing a table of one waveform period back at frequency `f` stretches its
//! harmonics to multiples of `f`; any harmonic that lands above Nyquist folds
//! back into the audible range. [`antialias_spectrum`] removes exactly the
//! bins that could fold for a given maximum playback frequency, and
//! [`Antialiaser`] drives that truncation over a whole set of target
//! frequencies to build a multi-table collection for
//! [`WavetableOscillator`](crate::oscillator::WavetableOscillator).

use bandlimit_math::FftCalculator;
use num_complex::Complex64;

use crate::error::{DspError, DspResult};
use crate::wavetable::Wavetable;

/// Removes spectral components that would alias when the transformed signal
/// is played back periodically at up to `max_playback_frequency`.
///
/// Operates in place on a frequency-domain frame. The cutoff bin is
/// `floor(nyquist / max_playback_frequency) + 1`; bins from the cutoff
/// through its Hermitian mirror are zeroed, and the DC bin's imaginary part
/// is cleared so the inverse transform stays real. When the cutoff exceeds
/// half the frame length no content could alias and the frame is left
/// untouched.
///
/// Allocation-free and idempotent: applying the same cutoff twice equals
/// applying it once.
pub fn antialias_spectrum(
    spectrum: &mut [Complex64],
    sample_rate: f64,
    max_playback_frequency: f64,
) {
    debug_assert!(sample_rate > 0.0);
    debug_assert!(max_playback_frequency > 0.0);

    let size = spectrum.len();
    let nyquist = sample_rate * 0.5;
    let cutoff = (nyquist / max_playback_frequency).floor() as usize + 1;

    if cutoff > size / 2 {
        return;
    }

    spectrum[0].im = 0.0;
    for bin in &mut spectrum[cutoff..=size - cutoff] {
        *bin = Complex64::new(0.0, 0.0);
    }
}

/// Builds sets of band-limited wavetables from a single source period.
///
/// The source is forward-transformed once; each target frequency then pays
/// one spectral copy, one truncation and one inverse transform. This is the
/// only allocation-heavy part of the toolkit and runs at table-build time,
/// never inside an audio callback.
#[derive(Debug)]
pub struct Antialiaser<'a> {
    sample_rate: f64,
    fft: &'a FftCalculator,
}

impl<'a> Antialiaser<'a> {
    /// Creates a builder for the calculator's transform size.
    pub fn new(sample_rate: f64, fft: &'a FftCalculator) -> DspResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(DspError::InvalidSampleRate { rate: sample_rate });
        }
        Ok(Self { sample_rate, fft })
    }

    /// Band-limits `signal` for each entry of `max_frequencies` and returns
    /// one wavetable per target, tagged with its target frequency.
    ///
    /// `signal` holds one waveform period and must match the calculator's
    /// size. `max_frequencies` must be sorted ascending if the result is to
    /// be used directly as an oscillator collection; the tables come back in
    /// input order.
    pub fn build_tables(&self, signal: &[f64], max_frequencies: &[f64]) -> DspResult<Vec<Wavetable>> {
        let size = self.fft.size();
        if signal.len() != size {
            return Err(DspError::SizeMismatch {
                expected: size,
                found: signal.len(),
            });
        }

        let mut spectrum = vec![Complex64::new(0.0, 0.0); size];
        self.fft.fft_real(signal, &mut spectrum);

        let mut tables = Vec::with_capacity(max_frequencies.len());
        let mut period = vec![0.0; size];
        for &max_frequency in max_frequencies {
            let mut truncated = spectrum.clone();
            antialias_spectrum(&mut truncated, self.sample_rate, max_frequency);
            self.fft.ifft_real(&truncated, &mut period);
            tables.push(Wavetable::new(&period, max_frequency));
        }
        Ok(tables)
    }
}
