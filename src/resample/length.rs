//! Output-length, cutoff and delay formulas.
//!
//! Callers size their output buffers with these before invoking
//! [`interpolate`](super::interpolate::interpolate) or
//! [`resample`](super::rational::resample); requesting more than the full
//! length is a contract violation.

use crate::core::rational::Rational;
use crate::core::signal::{convolution_length, ConvolutionKind};

/// Number of output samples produced by interpolating `input_len` samples
/// by `num_phases` with a prototype filter of `filter_len` taps.
pub fn interpol_length(
    input_len: usize,
    filter_len: usize,
    num_phases: usize,
    kind: ConvolutionKind,
) -> usize {
    convolution_length(input_len * num_phases, filter_len, kind)
}

/// Exact output length of resampling `input_len` samples at `ratio`
/// (input rate over output rate).
///
/// The integer part is the number of samples a single call can produce.
///
/// # Panics
/// Panics if `ratio` is zero or `num_phases` is zero.
pub fn resample_length(
    input_len: usize,
    filter_len: usize,
    num_phases: usize,
    ratio: Rational,
    kind: ConvolutionKind,
) -> Rational {
    assert!(num_phases > 0, "number of phases must be positive");
    let supersampled = convolution_length(input_len * num_phases, filter_len, kind);
    Rational::from_integer(supersampled as i64) / ratio / num_phases as i64
}

/// Prototype cutoff for integer interpolation, relative to the
/// supersampled Nyquist frequency.
pub fn interpol_filter_cutoff(num_phases: usize) -> f64 {
    1.0 / num_phases as f64
}

/// Prototype cutoff for resampling at `ratio`, relative to the supersampled
/// Nyquist frequency. Downsampling narrows the band to the output Nyquist.
pub fn resample_filter_cutoff(ratio: Rational, num_phases: usize) -> f64 {
    let base = 1.0 / num_phases as f64;
    if ratio > 1 {
        base * ratio.recip().to_f64()
    } else {
        base
    }
}

/// Group delay of a linear-phase prototype, in output samples.
pub fn resample_delay(filter_len: usize, num_phases: usize, ratio: Rational) -> Rational {
    Rational::new(filter_len.saturating_sub(1) as i64, 2 * num_phases as i64) / ratio
}
