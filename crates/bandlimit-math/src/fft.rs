//! Radix-2 Cooley-Tukey fast Fourier transform.
//!
//! Both directions use a unitary `1/sqrt(N)` normalization, so
//! `ifft(fft(x)) == x` up to floating-point rounding. The forward transform
//! follows the standard negative-exponent convention; the inverse uses the
//! conjugate twiddle factors and is otherwise identical.
//!
//! Two entry points are provided:
//!
//! - The free functions [`fft`]/[`ifft`] work for any power-of-two length and
//!   compute twiddle factors on the fly.
//! - [`FftCalculator`] precomputes the bit-reversal permutation and the
//!   per-stage twiddle seeds for one fixed size, so that repeated transforms
//!   of that size only pay additions and multiplications. This is the variant
//!   the anti-aliasing table builder uses.
//!
//! Input and output buffers must not alias; the borrow checker enforces this.
//! A non-power-of-two length is a precondition violation: fatal in debug
//! builds, garbage output in release.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::bits::{bit_reverse, log2_of_power_of_two};

/// Runs the `log2(n)` butterfly stages over a bit-reversed working buffer.
///
/// `twiddles` yields one primitive root of unity per stage; successive powers
/// are accumulated multiplicatively so no trigonometric function is evaluated
/// inside the butterfly loop.
fn butterfly_stages(out: &mut [Complex64], twiddles: impl Iterator<Item = Complex64>) {
    let n = out.len();
    for (stage, wm) in twiddles.enumerate() {
        let half = 1usize << stage;
        let span = half << 1;
        let mut w = Complex64::new(1.0, 0.0);
        for j in 0..half {
            let mut k = j;
            while k < n {
                let t = w * out[k + half];
                let u = out[k];
                out[k] = u + t;
                out[k + half] = u - t;
                k += span;
            }
            w *= wm;
        }
    }
}

/// Stage twiddle seed for the forward transform.
#[inline]
fn stage_twiddle(stage: u32) -> Complex64 {
    Complex64::from_polar(1.0, -PI / (1u64 << stage) as f64)
}

fn transform(input: &[Complex64], output: &mut [Complex64], inverse: bool) {
    let n = input.len();
    debug_assert!(n.is_power_of_two(), "input size must be a power of 2");
    debug_assert_eq!(input.len(), output.len(), "buffer sizes must match");

    let log_n = log2_of_power_of_two(n);
    let norm = 1.0 / (n as f64).sqrt();

    if log_n == 0 {
        output[0] = input[0];
        return;
    }
    for (i, out) in output.iter_mut().enumerate() {
        *out = norm * input[bit_reverse(i as u32, log_n) as usize];
    }

    let twiddles = (0..log_n).map(|s| {
        let w = stage_twiddle(s);
        if inverse {
            w.conj()
        } else {
            w
        }
    });
    butterfly_stages(output, twiddles);
}

/// Computes the forward Fourier transform of `input` into `output`.
///
/// The length must be a power of two and both slices must have the same
/// length.
pub fn fft(input: &[Complex64], output: &mut [Complex64]) {
    transform(input, output, false);
}

/// Computes the inverse Fourier transform of `input` into `output`.
///
/// The length must be a power of two and both slices must have the same
/// length.
pub fn ifft(input: &[Complex64], output: &mut [Complex64]) {
    transform(input, output, true);
}

/// FFT calculator for one specific power-of-two size.
///
/// The bit-reversal indices and the per-stage twiddle seeds are precomputed
/// during construction and never mutated afterwards, so a calculator can be
/// built once per size and shared by every transform of that size. The
/// per-transform work is then free of trigonometric evaluations.
#[derive(Debug, Clone)]
pub struct FftCalculator {
    size: usize,
    norm: f64,
    reversed: Vec<usize>,
    /// Forward-direction twiddle seed per stage; the inverse conjugates them.
    twiddles: Vec<Complex64>,
}

impl FftCalculator {
    /// Creates a calculator for transforms of length `size`.
    ///
    /// # Panics
    /// Panics if `size` is not a power of two.
    pub fn new(size: usize) -> Self {
        assert!(size.is_power_of_two(), "transform size must be a power of 2");

        let log_n = log2_of_power_of_two(size);
        let reversed = if log_n == 0 {
            vec![0]
        } else {
            (0..size)
                .map(|i| bit_reverse(i as u32, log_n) as usize)
                .collect()
        };
        let twiddles = (0..log_n).map(stage_twiddle).collect();

        Self {
            size,
            norm: 1.0 / (size as f64).sqrt(),
            reversed,
            twiddles,
        }
    }

    /// Transform size this calculator was built for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Writes the normalized, bit-reversed input into the working buffer.
    fn load(&self, output: &mut [Complex64], get: impl Fn(usize) -> Complex64) {
        for (out, &rev) in output.iter_mut().zip(self.reversed.iter()) {
            *out = self.norm * get(rev);
        }
    }

    fn forward_twiddles(&self) -> impl Iterator<Item = Complex64> + '_ {
        self.twiddles.iter().copied()
    }

    fn inverse_twiddles(&self) -> impl Iterator<Item = Complex64> + '_ {
        self.twiddles.iter().map(|w| w.conj())
    }

    /// Forward transform of a complex signal.
    pub fn fft(&self, input: &[Complex64], output: &mut [Complex64]) {
        debug_assert_eq!(input.len(), self.size);
        debug_assert_eq!(output.len(), self.size);
        self.load(output, |i| input[i]);
        butterfly_stages(output, self.forward_twiddles());
    }

    /// Forward transform of a real signal.
    pub fn fft_real(&self, input: &[f64], output: &mut [Complex64]) {
        debug_assert_eq!(input.len(), self.size);
        debug_assert_eq!(output.len(), self.size);
        self.load(output, |i| Complex64::new(input[i], 0.0));
        butterfly_stages(output, self.forward_twiddles());
    }

    /// Inverse transform of a complex spectrum.
    pub fn ifft(&self, input: &[Complex64], output: &mut [Complex64]) {
        debug_assert_eq!(input.len(), self.size);
        debug_assert_eq!(output.len(), self.size);
        self.load(output, |i| input[i]);
        butterfly_stages(output, self.inverse_twiddles());
    }

    /// Inverse transform that keeps only the real part of the result.
    ///
    /// Valid only when `input` is Hermitian-symmetric (as produced by
    /// transforming a real signal); this is guaranteed by construction in the
    /// anti-aliasing pipeline and not re-validated here. Allocates a scratch
    /// buffer for the complex intermediate values, so it belongs to the
    /// table-build phase, never inside an audio callback.
    pub fn ifft_real(&self, input: &[Complex64], output: &mut [f64]) {
        debug_assert_eq!(input.len(), self.size);
        debug_assert_eq!(output.len(), self.size);

        let mut scratch = vec![Complex64::new(0.0, 0.0); self.size];
        self.load(&mut scratch, |i| input[i]);
        butterfly_stages(&mut scratch, self.inverse_twiddles());
        for (out, value) in output.iter_mut().zip(scratch.iter()) {
            *out = value.re;
        }
    }
}
