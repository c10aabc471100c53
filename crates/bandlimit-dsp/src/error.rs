//! Error types for setup-time validation.
//!
//! These errors only surface from construction and table-building APIs.
//! Per-sample code never returns a `Result`: hot-path preconditions are
//! checked with `debug_assert!` and are the caller's responsibility in
//! release builds.

use thiserror::Error;

/// Result type for DSP setup operations.
pub type DspResult<T> = Result<T, DspError>;

/// Errors that can occur while configuring DSP components.
#[derive(Debug, Error, PartialEq)]
pub enum DspError {
    /// A buffer length that must be a power of two is not.
    #[error("buffer length {len} is not a power of 2")]
    NotPowerOfTwo {
        /// The offending length.
        len: usize,
    },

    /// Two buffers that must agree in length do not.
    #[error("buffer length mismatch: expected {expected}, found {found}")]
    SizeMismatch {
        /// Required length.
        expected: usize,
        /// Provided length.
        found: usize,
    },

    /// An oscillator was given no wavetables to play from.
    #[error("wavetable collection is empty")]
    EmptyTableSet,

    /// A frequency outside the representable range.
    #[error("invalid frequency: {freq} Hz (sample rate {sample_rate} Hz)")]
    InvalidFrequency {
        /// The offending frequency.
        freq: f64,
        /// The configured sample rate.
        sample_rate: f64,
    },

    /// A sample rate that is zero, negative or non-finite.
    #[error("invalid sample rate: {rate} Hz")]
    InvalidSampleRate {
        /// The offending sample rate.
        rate: f64,
    },
}
