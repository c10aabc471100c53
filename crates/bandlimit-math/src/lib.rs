//! Math primitives for band-limited wavetable synthesis.
//!
//! This crate implements the numerical building blocks shared by the DSP
//! components in `bandlimit-dsp`:
//!
//! - [`bits`] - power-of-two predicates, integer log2, bit reversal
//! - [`fft`] - radix-2 Cooley-Tukey FFT with a precomputed [`fft::FftCalculator`]
//! - [`fixed`] - wrapping fixed-point values for phase accumulation
//! - [`interpolation`] - linear, Hermite and cubic interpolation kernels
//! - [`decibel`] - decibel/amplitude conversions
//!
//! All transforms use `f64` samples and `num_complex::Complex64` spectral
//! values. Everything here is pure computation: no allocation happens after
//! construction except where explicitly documented (`ifft_real` scratch),
//! so the hot-path entry points are safe to call from an audio callback.

pub mod bits;
pub mod decibel;
pub mod fft;
pub mod fixed;
pub mod interpolation;

pub use fft::FftCalculator;
pub use fixed::Fixed;
