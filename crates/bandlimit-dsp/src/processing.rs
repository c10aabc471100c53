//! Scalar signal processing utilities.
//!
//! Plain array-to-array transforms used by pitch detection and by table
//! preparation: peak and RMS measurement, normalization, level-crossing
//! search, discrete differentiation and the average magnitude difference
//! function.

/// Absolute maximum of the signal.
pub fn peak(signal: &[f64]) -> f64 {
    signal.iter().fold(0.0, |max, &v| max.max(v.abs()))
}

/// Root mean square of the signal.
pub fn rms(signal: &[f64]) -> f64 {
    debug_assert!(!signal.is_empty());
    (signal.iter().map(|v| v * v).sum::<f64>() / signal.len() as f64).sqrt()
}

/// Scales the signal in place so its peak equals `target`.
///
/// The signal must contain at least one non-zero sample.
pub fn peak_normalize(signal: &mut [f64], target: f64) {
    let current = peak(signal);
    debug_assert!(current > 0.0, "cannot normalize a silent signal");
    let factor = target / current;
    for sample in signal.iter_mut() {
        *sample *= factor;
    }
}

/// Scales the signal in place so its RMS equals `target`.
///
/// The signal must contain at least one non-zero sample.
pub fn rms_normalize(signal: &mut [f64], target: f64) {
    let current = rms(signal);
    debug_assert!(current > 0.0, "cannot normalize a silent signal");
    let factor = target / current;
    for sample in signal.iter_mut() {
        *sample *= factor;
    }
}

/// Finds the fractional sample positions where the signal crosses `level`.
///
/// Each crossing is located by linear interpolation between the two samples
/// surrounding the sign change; samples exactly at `level` count as below
/// it.
pub fn find_crossings(signal: &[f64], level: f64) -> Vec<f64> {
    let mut crossings = Vec::new();
    let Some(&first) = signal.first() else {
        return crossings;
    };

    let mut is_above = first > level;
    let mut previous = first;
    for (i, &value) in signal.iter().enumerate().skip(1) {
        if (value > level) != is_above {
            is_above = !is_above;
            let dy = value - previous;
            crossings.push((i - 1) as f64 + (level - previous) / dy);
        }
        previous = value;
    }
    crossings
}

/// Discrete difference: `out[i] = signal[i + 1] - signal[i]`.
///
/// `out` must hold exactly one sample less than `signal`.
pub fn differentiate(signal: &[f64], out: &mut [f64]) {
    debug_assert_eq!(out.len() + 1, signal.len());
    for (out, pair) in out.iter_mut().zip(signal.windows(2)) {
        *out = pair[1] - pair[0];
    }
}

/// Average magnitude difference function.
///
/// `out[lag]` sums `|signal[j - lag] - signal[j]|` over the overlapping
/// range; minima mark lags where the signal repeats. `out` must match the
/// signal's length.
pub fn amdf(signal: &[f64], out: &mut [f64]) {
    debug_assert_eq!(out.len(), signal.len());
    let size = signal.len();
    for (lag, out) in out.iter_mut().enumerate() {
        let mut sum = 0.0;
        for j in lag..size {
            sum += (signal[j - lag] - signal[j]).abs();
        }
        *out = sum;
    }
}
