//! AMDF-based pitch detection.
//!
//! The detector locates the minima of the average magnitude difference
//! function, reads period lengths off the spacing between them, converts to
//! frequency and filters outliers. Frequencies are normalized (periods per
//! sample); multiply by the sample rate for Hz.

use crate::processing::{amdf, differentiate, find_crossings, peak, peak_normalize};

/// Result of a successful pitch analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchInfo {
    /// Detected fundamental in periods per sample.
    pub frequency: f64,
    /// Standard deviation of the per-period frequency estimates.
    pub standard_deviation: f64,
    /// Largest deviation of any single estimate from the mean.
    pub max_deviation: f64,
}

/// Tuning knobs for [`detect_pitch`].
#[derive(Debug, Clone, Copy)]
pub struct PitchDetectionParams {
    /// Period finder tolerance. Raising it helps on noisy data but can
    /// reduce accuracy and admit false positives.
    pub tolerance: f64,

    /// Outlier filter: period estimates outside
    /// `[mean - deviation_filter * mean, mean + deviation_filter * mean]`
    /// of the intermediate average are discarded.
    pub deviation_filter: f64,

    /// Constrains the analysis to the first n periods when the pitch of a
    /// long sample drifts.
    pub max_periods_to_average: usize,
}

impl Default for PitchDetectionParams {
    fn default() -> Self {
        Self {
            tolerance: 0.3,
            deviation_filter: 0.3,
            max_periods_to_average: usize::MAX,
        }
    }
}

fn mean_and_standard_deviation(values: &[f64]) -> (f64, f64) {
    debug_assert!(!values.is_empty());
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count;
    (mean, variance.sqrt())
}

/// Estimates the fundamental frequency of `signal`.
///
/// Returns `None` when the signal is too short, has no repeating structure,
/// or every period estimate is rejected by the outlier filter.
pub fn detect_pitch(signal: &[f64], params: &PitchDetectionParams) -> Option<PitchInfo> {
    let size = signal.len();
    if size < 10 {
        return None;
    }

    let mut difference = vec![0.0; size];
    amdf(signal, &mut difference);
    if peak(&difference) == 0.0 {
        // Perfectly constant input carries no pitch.
        return None;
    }
    peak_normalize(&mut difference, 1.0);

    // Extrema of the AMDF are the zero crossings of its derivative.
    let mut slope = vec![0.0; size - 1];
    differentiate(&difference, &mut slope);
    peak_normalize(&mut slope, 1.0);
    let crossings = find_crossings(&slope, 0.0);

    // Keep only the extrema that are minima near zero; the tolerance
    // tightens towards the end of the window where fewer samples overlap.
    let filtered: Vec<f64> = crossings
        .iter()
        .map(|crossing| crossing + 0.5)
        .filter(|&position| {
            let corrected_tolerance = (1.0 - position / size as f64) * params.tolerance;
            difference[position as usize].abs() < corrected_tolerance && position > 3.0
        })
        .collect();
    if filtered.len() < 2 {
        return None;
    }

    // Period lengths are the spacings between consecutive minima.
    let mut values = vec![0.0; filtered.len() - 1];
    differentiate(&filtered, &mut values);
    values.truncate(params.max_periods_to_average.max(1));
    for value in values.iter_mut() {
        *value = 1.0 / *value;
    }

    let (f0, _) = mean_and_standard_deviation(&values);
    values.retain(|f| (f - f0).abs() <= f0 * params.deviation_filter);
    if values.is_empty() {
        return None;
    }

    let (frequency, standard_deviation) = mean_and_standard_deviation(&values);
    let max_deviation = values
        .iter()
        .map(|f| (f - frequency).abs())
        .fold(0.0, f64::max);

    Some(PitchInfo {
        frequency,
        standard_deviation,
        max_deviation,
    })
}
