//! Band-limited wavetables and standard waveform generation.

use bandlimit_math::interpolation;

/// One period of a band-limited waveform, tagged with the highest frequency
/// at which it can be played back without audible aliasing.
///
/// The sample buffer stores one extra guard entry equal to the first sample,
/// so interpolated lookup never needs a modulo: reading at position
/// `size - epsilon` interpolates between the last sample and the wrapped
/// first one through the guard.
///
/// Tables are created by the anti-aliasing driver (or [`Wavetable::new`] for
/// hand-built material) and are read-only while any oscillator plays from
/// them; oscillators borrow the collection, so the borrow checker enforces
/// that discipline.
#[derive(Debug, Clone)]
pub struct Wavetable {
    /// `size + 1` samples, the last one a copy of the first.
    data: Vec<f64>,
    max_playback_frequency: f64,
}

impl Wavetable {
    /// Creates a table from one period of samples.
    ///
    /// The guard sample is appended internally; pass exactly one period.
    pub fn new(samples: &[f64], max_playback_frequency: f64) -> Self {
        debug_assert!(!samples.is_empty(), "wavetable must not be empty");
        let mut data = Vec::with_capacity(samples.len() + 1);
        data.extend_from_slice(samples);
        data.push(samples[0]);
        Self {
            data,
            max_playback_frequency,
        }
    }

    /// Logical table size (one period, excluding the guard sample).
    pub fn size(&self) -> usize {
        self.data.len() - 1
    }

    /// Highest frequency at which this table plays back alias-free.
    ///
    /// Only meaningful relative to sibling tables in the same collection.
    pub fn max_playback_frequency(&self) -> f64 {
        self.max_playback_frequency
    }

    /// Linearly interpolated lookup at a fractional sample position.
    ///
    /// `position` must lie in `[0, size)`; the guard sample covers the wrap
    /// of the interpolation window.
    #[inline]
    pub fn at(&self, position: f64) -> f64 {
        debug_assert!(
            position >= 0.0 && position < self.size() as f64,
            "position out of range"
        );
        let index = position as usize;
        let offset = position - index as f64;
        interpolation::linear(offset, self.data[index], self.data[index + 1])
    }

    /// The period samples, excluding the guard entry.
    pub fn samples(&self) -> &[f64] {
        &self.data[..self.data.len() - 1]
    }
}

/// Standard waveform shapes.
///
/// A closed set dispatched through [`Waveform::generate`]; the same shapes
/// serve as anti-aliasing source material and as LFO lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// One sine period.
    Sine,
    /// Symmetric triangle starting at 0, rising first.
    Triangle,
    /// Rising sawtooth from -1 to 1.
    Sawtooth,
    /// Square with 50% duty cycle.
    Square,
    /// Exponentially curved bipolar ramp pair.
    Exponential,
}

impl Waveform {
    /// Generates one period of `size` samples in [-1, 1].
    pub fn generate(self, size: usize) -> Vec<f64> {
        debug_assert!(size >= 4, "waveform period too short");
        let n = size as f64;
        match self {
            Waveform::Sine => (0..size)
                .map(|i| (std::f64::consts::TAU * i as f64 / n).sin())
                .collect(),
            Waveform::Triangle => (0..size)
                .map(|i| {
                    let phase = i as f64 / n;
                    if phase < 0.25 {
                        4.0 * phase
                    } else if phase < 0.75 {
                        2.0 - 4.0 * phase
                    } else {
                        4.0 * phase - 4.0
                    }
                })
                .collect(),
            Waveform::Sawtooth => (0..size).map(|i| 2.0 * (i as f64 / n) - 1.0).collect(),
            Waveform::Square => (0..size)
                .map(|i| if i < size / 2 { 1.0 } else { -1.0 })
                .collect(),
            Waveform::Exponential => {
                let half = n / 2.0;
                let e = std::f64::consts::E;
                (0..size)
                    .map(|i| {
                        let x = if i < size / 2 {
                            i as f64
                        } else {
                            n - i as f64
                        };
                        2.0 * (((x / half).exp() - 1.0) / (e - 1.0)) - 1.0
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_guard_sample_duplicates_first() {
        let table = Wavetable::new(&[1.0, 2.0, 3.0, 4.0], 440.0);
        assert_eq!(table.size(), 4);
        assert_eq!(table.samples(), &[1.0, 2.0, 3.0, 4.0]);
        // Reading just below the wrap interpolates towards the first sample.
        let near_wrap = table.at(3.5);
        assert!((near_wrap - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_lookup_interpolates_linearly() {
        let table = Wavetable::new(&[0.0, 1.0, 0.0, -1.0], 100.0);
        assert_eq!(table.at(0.0), 0.0);
        assert_eq!(table.at(1.0), 1.0);
        assert!((table.at(0.25) - 0.25).abs() < 1e-12);
        assert!((table.at(2.5) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_all_shapes_are_bounded_and_full_length() {
        let shapes = [
            Waveform::Sine,
            Waveform::Triangle,
            Waveform::Sawtooth,
            Waveform::Square,
            Waveform::Exponential,
        ];
        for shape in shapes {
            let period = shape.generate(256);
            assert_eq!(period.len(), 256);
            for &sample in &period {
                assert!(sample.is_finite());
                assert!(sample.abs() <= 1.0 + 1e-9, "{:?}: {}", shape, sample);
            }
        }
    }

    #[test]
    fn test_sine_landmarks() {
        let period = Waveform::Sine.generate(256);
        assert!(period[0].abs() < 1e-12);
        assert!((period[64] - 1.0).abs() < 1e-12);
        assert!(period[128].abs() < 1e-9);
        assert!((period[192] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangle_landmarks() {
        let period = Waveform::Triangle.generate(256);
        assert!(period[0].abs() < 1e-12);
        assert!((period[64] - 1.0).abs() < 1e-12);
        assert!(period[128].abs() < 1e-9);
        assert!((period[192] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sawtooth_is_monotonic_ramp() {
        let period = Waveform::Sawtooth.generate(64);
        assert_eq!(period[0], -1.0);
        for pair in period.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!(period[63] < 1.0);
    }

    #[test]
    fn test_square_halves() {
        let period = Waveform::Square.generate(8);
        assert_eq!(&period[..4], &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(&period[4..], &[-1.0, -1.0, -1.0, -1.0]);
    }
}
