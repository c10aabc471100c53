//! Wavetable oscillators with frequency-dependent table selection.
//!
//! An oscillator reads from whichever table of an ascending-sorted,
//! band-limited collection is valid for its current frequency, advancing a
//! fractional sample position and interpolating between adjacent samples.
//! Table switches rescale the position so playback phase stays continuous,
//! and selection is lazy: the oscillator caches the frequency interval for
//! which the current table holds and re-scans only when the frequency leaves
//! it.
//!
//! All per-sample work is allocation-free; construction validates the
//! collection and the frequency range up front.

use crate::error::{DspError, DspResult};
use crate::modulation::{ModulatedParam, PlaybackFrequency};
use crate::wavetable::Wavetable;

/// Positions are clamped just below the table size on a switch so the next
/// interpolated read stays in range.
const POSITION_EPSILON: f64 = 1e-7;

/// Single-voice oscillator over a sorted wavetable collection.
///
/// The collection must be non-empty and sorted ascending by maximum playback
/// frequency. The oscillator borrows it for its whole lifetime; rebuild and
/// swap a new collection rather than mutating one that is playing.
///
/// Frequencies above the last table's safe range select that table anyway
/// and accept aliasing; frequencies at or above the sample rate are a
/// precondition violation.
#[derive(Debug, Clone)]
pub struct WavetableOscillator<'a> {
    tables: &'a [Wavetable],
    sample_rate_inv: f64,
    frequency: f64,
    delta: f64,
    position: f64,
    value: f64,
    table_index: usize,
    table_size: usize,
    /// Frequency interval (bottom, top] for which the selected table holds.
    top_freq: f64,
    bottom_freq: f64,
}

impl<'a> WavetableOscillator<'a> {
    /// Creates an oscillator playing `tables` at `frequency`.
    ///
    /// # Arguments
    /// * `tables` - non-empty collection sorted ascending by maximum
    ///   playback frequency
    /// * `sample_rate` - output rate in Hz, finite and positive
    /// * `frequency` - initial playback frequency, `0 <= frequency <
    ///   sample_rate`
    pub fn new(tables: &'a [Wavetable], sample_rate: f64, frequency: f64) -> DspResult<Self> {
        if tables.is_empty() {
            return Err(DspError::EmptyTableSet);
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(DspError::InvalidSampleRate { rate: sample_rate });
        }
        if !(frequency.is_finite() && frequency >= 0.0 && frequency < sample_rate) {
            return Err(DspError::InvalidFrequency {
                freq: frequency,
                sample_rate,
            });
        }

        let mut osc = Self {
            tables,
            sample_rate_inv: 1.0 / sample_rate,
            frequency,
            delta: 0.0,
            position: 0.0,
            value: 0.0,
            table_index: 0,
            table_size: 0,
            top_freq: 0.0,
            bottom_freq: 0.0,
        };
        osc.select_table();
        osc.update_delta();
        Ok(osc)
    }

    /// Changes the playback frequency, reselecting the table if the cached
    /// validity interval no longer covers it.
    ///
    /// `frequency` must stay below the sample rate.
    pub fn set_frequency(&mut self, frequency: f64) {
        debug_assert!(
            frequency * self.sample_rate_inv < 1.0,
            "frequency must be lower than the sample rate"
        );
        self.frequency = frequency;
        self.select_table();
        self.update_delta();
    }

    /// Changes the sample rate, keeping frequency and phase.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        debug_assert!(sample_rate > 0.0);
        self.sample_rate_inv = 1.0 / sample_rate;
        self.set_frequency(self.frequency);
    }

    /// Applies a modulated frequency parameter, recomputing internal state
    /// only when the parameter reports a change since the last call.
    pub fn apply_frequency(&mut self, param: &mut ModulatedParam<PlaybackFrequency>) {
        if param.take_change_flag() {
            self.set_frequency(param.value());
        }
    }

    /// Advances one sample and returns the new current value.
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        self.position += self.delta;
        if self.position >= self.table_size as f64 {
            self.position -= self.table_size as f64;
        }
        self.value = self.tables[self.table_index].at(self.position);
        self.value
    }

    /// The current value without advancing.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Resets the phase to zero and refreshes the current value.
    pub fn retrigger(&mut self) {
        self.position = 0.0;
        self.value = self.tables[self.table_index].at(self.position);
    }

    /// The table currently selected for playback.
    pub fn selected_table(&self) -> &'a Wavetable {
        &self.tables[self.table_index]
    }

    /// Current playback frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        1.0 / self.sample_rate_inv
    }

    fn select_table(&mut self) {
        // Small frequency moves usually stay within the current table's
        // interval; only re-scan when the anti-aliasing condition breaks.
        if self.frequency <= self.top_freq && self.frequency > self.bottom_freq {
            return;
        }

        let index = self
            .tables
            .iter()
            .position(|table| table.max_playback_frequency() >= self.frequency)
            // Past every table's safe range: take the last one and accept
            // aliasing rather than fail.
            .unwrap_or(self.tables.len() - 1);

        let new_size = self.tables[index].size();
        debug_assert!(new_size > 0, "wavetable size may not be zero");
        if self.table_size != 0 {
            // Preserve playback phase across the switch.
            self.position *= new_size as f64 / self.table_size as f64;
            self.position = self
                .position
                .clamp(0.0, new_size as f64 - POSITION_EPSILON);
        }

        self.table_index = index;
        self.table_size = new_size;
        self.value = self.tables[index].at(self.position);

        self.top_freq = self.tables[index].max_playback_frequency();
        self.bottom_freq = if index == 0 {
            0.0
        } else {
            self.tables[index - 1].max_playback_frequency()
        };
    }

    fn update_delta(&mut self) {
        self.delta = self.frequency * self.table_size as f64 * self.sample_rate_inv;
    }
}

/// Blends two independently driven oscillators by a single parameter.
///
/// A blend of 0 plays only the first collection, 1 only the second; the mix
/// is linear and applied per sample, so timbre can sweep continuously
/// between two table sets without precomputing morphed tables.
#[derive(Debug, Clone)]
pub struct MorphingWavetableOscillator<'a> {
    first: WavetableOscillator<'a>,
    second: WavetableOscillator<'a>,
    blend: f64,
}

impl<'a> MorphingWavetableOscillator<'a> {
    /// Creates a morphing pair over two collections, both starting at
    /// `frequency` with a blend of 0.
    pub fn new(
        first: &'a [Wavetable],
        second: &'a [Wavetable],
        sample_rate: f64,
        frequency: f64,
    ) -> DspResult<Self> {
        Ok(Self {
            first: WavetableOscillator::new(first, sample_rate, frequency)?,
            second: WavetableOscillator::new(second, sample_rate, frequency)?,
            blend: 0.0,
        })
    }

    /// Sets the blend position in [0, 1].
    pub fn set_blend(&mut self, blend: f64) {
        debug_assert!((0.0..=1.0).contains(&blend));
        self.blend = blend;
    }

    /// Current blend position.
    pub fn blend(&self) -> f64 {
        self.blend
    }

    /// Sets the playback frequency of both voices.
    pub fn set_frequency(&mut self, frequency: f64) {
        self.first.set_frequency(frequency);
        self.second.set_frequency(frequency);
    }

    /// Sets the sample rate of both voices.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.first.set_sample_rate(sample_rate);
        self.second.set_sample_rate(sample_rate);
    }

    /// Advances both voices one sample and returns the blended value.
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        (1.0 - self.blend) * self.first.next_sample() + self.blend * self.second.next_sample()
    }

    /// The blended current value without advancing.
    #[inline]
    pub fn value(&self) -> f64 {
        (1.0 - self.blend) * self.first.value() + self.blend * self.second.value()
    }

    /// Resets both voices' phases to zero.
    pub fn retrigger(&mut self) {
        self.first.retrigger();
        self.second.retrigger();
    }

    /// Current playback frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.first.frequency()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 44100.0;

    fn ramp_table(size: usize, max_frequency: f64) -> Wavetable {
        let samples: Vec<f64> = (0..size).map(|i| i as f64 / size as f64).collect();
        Wavetable::new(&samples, max_frequency)
    }

    fn three_band_collection() -> Vec<Wavetable> {
        vec![
            ramp_table(8, 100.0),
            ramp_table(8, 1000.0),
            ramp_table(8, 10000.0),
        ]
    }

    #[test]
    fn test_construction_validates_inputs() {
        let tables = three_band_collection();
        assert_eq!(
            WavetableOscillator::new(&[], SAMPLE_RATE, 440.0).unwrap_err(),
            DspError::EmptyTableSet
        );
        assert!(WavetableOscillator::new(&tables, 0.0, 440.0).is_err());
        assert_eq!(
            WavetableOscillator::new(&tables, SAMPLE_RATE, SAMPLE_RATE).unwrap_err(),
            DspError::InvalidFrequency {
                freq: SAMPLE_RATE,
                sample_rate: SAMPLE_RATE,
            }
        );
        assert!(WavetableOscillator::new(&tables, SAMPLE_RATE, 440.0).is_ok());
    }

    #[test]
    fn test_forward_scan_selects_first_safe_table() {
        let tables = three_band_collection();
        for (frequency, expected_tag) in [
            (50.0, 100.0),
            (100.0, 100.0),
            (100.1, 1000.0),
            (500.0, 1000.0),
            (5000.0, 10000.0),
        ] {
            let osc = WavetableOscillator::new(&tables, SAMPLE_RATE, frequency).unwrap();
            assert_eq!(
                osc.selected_table().max_playback_frequency(),
                expected_tag,
                "at {} Hz",
                frequency
            );
        }
    }

    #[test]
    fn test_frequency_above_all_tags_falls_back_to_last_table() {
        let tables = three_band_collection();
        let osc = WavetableOscillator::new(&tables, SAMPLE_RATE, 20000.0).unwrap();
        assert_eq!(osc.selected_table().max_playback_frequency(), 10000.0);
    }

    #[test]
    fn test_advance_reads_interpolated_ramp() {
        let tables = vec![ramp_table(8, 10000.0)];
        // delta = 100 * 8 / 800 = 1.0, one table slot per sample.
        let mut osc = WavetableOscillator::new(&tables, 800.0, 100.0).unwrap();
        assert_eq!(osc.value(), 0.0);
        assert_eq!(osc.next_sample(), 0.125);
        assert_eq!(osc.next_sample(), 0.25);
        for _ in 0..5 {
            osc.next_sample();
        }
        // Eighth advance wraps back to position 0.
        assert_eq!(osc.next_sample(), 0.0);
    }

    #[test]
    fn test_position_stays_in_range_over_many_samples() {
        let tables = three_band_collection();
        let mut osc = WavetableOscillator::new(&tables, SAMPLE_RATE, 439.7).unwrap();
        for _ in 0..10000 {
            let value = osc.next_sample();
            assert!(value.is_finite());
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_table_switch_preserves_phase() {
        // Both tables are normalized ramps, so the output value directly
        // encodes the playback phase regardless of table size.
        let tables = vec![ramp_table(8, 100.0), ramp_table(4, 10000.0)];
        let mut osc = WavetableOscillator::new(&tables, 800.0, 50.0).unwrap();
        for _ in 0..3 {
            osc.next_sample();
        }
        let phase_before = osc.value();

        osc.set_frequency(400.0);
        assert_eq!(osc.selected_table().size(), 4);
        assert!(
            (osc.value() - phase_before).abs() < 1e-9,
            "phase jumped across table switch: {} -> {}",
            phase_before,
            osc.value()
        );
    }

    #[test]
    fn test_selection_is_cached_within_interval() {
        let tables = three_band_collection();
        let mut osc = WavetableOscillator::new(&tables, SAMPLE_RATE, 500.0).unwrap();
        let before = osc.selected_table() as *const Wavetable;
        osc.set_frequency(999.0);
        osc.set_frequency(101.0);
        assert_eq!(osc.selected_table() as *const Wavetable, before);
        osc.set_frequency(100.0);
        assert_ne!(osc.selected_table() as *const Wavetable, before);
    }

    #[test]
    fn test_retrigger_resets_phase() {
        let tables = vec![ramp_table(8, 10000.0)];
        let mut osc = WavetableOscillator::new(&tables, 800.0, 100.0).unwrap();
        for _ in 0..3 {
            osc.next_sample();
        }
        assert!(osc.value() > 0.0);
        osc.retrigger();
        assert_eq!(osc.value(), 0.0);
    }

    #[test]
    fn test_modulated_frequency_is_applied_on_change_only() {
        let tables = three_band_collection();
        let mut osc = WavetableOscillator::new(&tables, SAMPLE_RATE, 440.0).unwrap();
        let mut param = ModulatedParam::<PlaybackFrequency>::new(440.0);

        osc.apply_frequency(&mut param);
        assert_eq!(osc.frequency(), 440.0);

        param.push(60.0);
        osc.apply_frequency(&mut param);
        assert_eq!(osc.frequency(), 500.0);

        // No change: the flag stays low and the oscillator is untouched.
        osc.apply_frequency(&mut param);
        assert_eq!(osc.frequency(), 500.0);
    }

    #[test]
    fn test_morphing_blend_endpoints_and_midpoint() {
        let first = vec![Wavetable::new(&[1.0; 8], 10000.0)];
        let second = vec![Wavetable::new(&[-1.0; 8], 10000.0)];
        let mut osc =
            MorphingWavetableOscillator::new(&first, &second, SAMPLE_RATE, 440.0).unwrap();

        osc.set_blend(0.0);
        assert_eq!(osc.next_sample(), 1.0);
        osc.set_blend(1.0);
        assert_eq!(osc.next_sample(), -1.0);
        osc.set_blend(0.5);
        assert_eq!(osc.next_sample(), 0.0);
    }

    #[test]
    fn test_morphing_drives_both_voices_together() {
        let first = vec![ramp_table(8, 10000.0)];
        let second = vec![ramp_table(8, 10000.0)];
        let mut osc = MorphingWavetableOscillator::new(&first, &second, 800.0, 100.0).unwrap();
        osc.set_blend(0.5);
        // Identical tables at identical phase blend to the plain output.
        assert_eq!(osc.next_sample(), 0.125);
        osc.retrigger();
        assert_eq!(osc.value(), 0.0);
        assert_eq!(osc.frequency(), 100.0);
    }
}
