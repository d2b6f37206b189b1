#![forbid(unsafe_code)]
//! Exact polyphase sample-rate conversion.
//!
//! `polyresample` converts between arbitrary rational sample-rate ratios with
//! a polyphase FIR bank. Output positions are tracked as exact rationals, so
//! a stream processed in any number of chunks produces the same samples as a
//! single call over the whole signal, with no positional drift however long
//! it runs.
//!
//! The caller supplies the lowpass prototype filter; this crate only splits
//! it into phases and evaluates it.
//!
//! # Quick Start
//!
//! ```
//! use polyresample::{ConvolutionKind, ResampleParams};
//!
//! // 4 phases, a short triangular prototype
//! let filter: Vec<f32> = (1..=7).chain((1..7).rev()).map(|v| v as f32).collect();
//! let params = ResampleParams::new(44100, 48000).unwrap().with_num_phases(4);
//!
//! let input: Vec<f32> = (0..441).map(|i| (i as f32 * 0.05).sin()).collect();
//! let output =
//!     polyresample::resample_interleaved(&input, &filter, &params, ConvolutionKind::Central)
//!         .unwrap();
//! assert!(output.len() > input.len());
//! ```
//!
//! # Streaming
//!
//! Feed interleaved audio in chunks via [`StreamResampler`]:
//!
//! ```
//! use polyresample::{ResampleParams, StreamResampler};
//!
//! let filter = vec![0.25f64; 16];
//! let params = ResampleParams::new(48000, 32000)
//!     .unwrap()
//!     .with_num_phases(4)
//!     .with_channels(2);
//!
//! let mut resampler = StreamResampler::new(params, &filter).unwrap();
//! let mut output = Vec::new();
//! for chunk in vec![0.0f64; 960].chunks(240) {
//!     output.extend(resampler.process(chunk).unwrap());
//! }
//! output.extend(resampler.flush().unwrap());
//! ```
//!
//! # Continuation tokens
//!
//! The low-level [`resample`] and [`interpolate`] functions write into caller
//! buffers and return a [`ResampleSuspensionPoint`] /
//! [`InterpolSuspensionPoint`]. Slice the input at
//! `first_input_sample` and pass `start_point` back to continue exactly where
//! the previous call stopped.

pub mod core;
pub mod error;
pub mod filter;
pub mod resample;
pub mod stream;

pub use crate::core::kernel::{dot_product_sample, DotKernel, ScalarKernel, UnrolledKernel};
pub use crate::core::rational::Rational;
pub use crate::core::sample::Sample;
pub use crate::core::signal::{
    convolution_length, convolve, convolve_range, decimate, expand, ConvolutionKind,
};
pub use error::{ResampleError, ResampleResult};
pub use filter::polyphase::{
    decompose, try_decompose, PolyphaseFilter, PolyphaseLayout, PolyphaseView, PolyphaseViewMut,
};
pub use resample::interpolate::{interpolate, interpolate_signal, interpolate_to_vec, interpolate_with};
pub use resample::length::{
    interpol_filter_cutoff, interpol_length, resample_delay, resample_filter_cutoff,
    resample_length,
};
pub use resample::params::{ResampleParams, DEFAULT_NUM_PHASES};
pub use resample::rational::{
    resample, resample_central, resample_full, resample_to_vec, resample_with,
};
pub use resample::suspension::{InterpolSuspensionPoint, ResampleSuspensionPoint};
pub use stream::StreamResampler;

/// Deinterleaves multi-channel audio into separate per-channel vectors.
#[inline]
fn deinterleave<T: Sample>(input: &[T], num_channels: usize) -> Vec<Vec<T>> {
    (0..num_channels)
        .map(|ch| {
            input
                .iter()
                .skip(ch)
                .step_by(num_channels)
                .copied()
                .collect()
        })
        .collect()
}

/// Interleaves per-channel vectors into a single buffer, truncating to the shortest channel.
#[inline]
fn interleave<T: Sample>(channels: &[Vec<T>]) -> Vec<T> {
    let min_len = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    (0..min_len)
        .flat_map(|i| channels.iter().map(move |ch| ch[i]))
        .collect()
}

/// Validates that input holds whole frames of finite samples.
///
/// Returns `Ok(false)` if input is empty (caller should return `Ok(vec![])`),
/// `Ok(true)` if input is valid, or `Err` otherwise.
#[inline]
pub(crate) fn validate_input<T: Sample>(input: &[T], num_channels: usize) -> ResampleResult<bool> {
    if num_channels == 0 {
        return Err(ResampleError::InvalidChannels(num_channels));
    }
    if input.len() % num_channels != 0 {
        return Err(ResampleError::InvalidInput(format!(
            "{} samples is not a whole number of {}-channel frames",
            input.len(),
            num_channels
        )));
    }
    if input.is_empty() {
        return Ok(false);
    }
    if input.iter().any(|s| !s.magnitude().is_finite()) {
        return Err(ResampleError::InvalidInput(
            "input contains NaN or infinite samples".to_string(),
        ));
    }
    Ok(true)
}

/// Resamples interleaved audio in one shot.
///
/// Every channel is resampled against one shared decomposition of `filter`,
/// normalized to unity gain per phase if `params.normalize` is set.
///
/// # Errors
///
/// Returns an error if `params` are invalid, the filter is empty or cannot be
/// normalized, or the input is not a whole number of finite frames.
pub fn resample_interleaved<T: Sample>(
    input: &[T],
    filter: &[T],
    params: &ResampleParams,
    kind: ConvolutionKind,
) -> ResampleResult<Vec<T>> {
    params.validate()?;
    let mut polyphase = PolyphaseFilter::new(filter, params.num_phases)?;
    if params.normalize {
        polyphase = polyphase.normalized()?;
    }
    if !validate_input(input, params.channels)? {
        return Ok(vec![]);
    }

    let ratio = params.ratio();
    let outputs: Vec<Vec<T>> = deinterleave(input, params.channels)
        .iter()
        .map(|channel| match kind {
            ConvolutionKind::Full => resample_full(channel, polyphase.view(), ratio),
            ConvolutionKind::Central => resample_central(channel, polyphase.view(), ratio),
        })
        .collect();
    Ok(interleave(&outputs))
}

/// Interpolates interleaved audio by an integer `factor` in one shot.
///
/// The filter is split into `factor` phases and scaled by `factor`; it is not
/// normalized.
///
/// # Errors
///
/// Returns an error if `factor` or `channels` is zero, the filter is empty, or
/// the input is not a whole number of finite frames.
pub fn interpolate_interleaved<T: Sample>(
    input: &[T],
    filter: &[T],
    factor: usize,
    channels: usize,
    kind: ConvolutionKind,
) -> ResampleResult<Vec<T>> {
    let polyphase = PolyphaseFilter::new(filter, factor)?;
    if !validate_input(input, channels)? {
        return Ok(vec![]);
    }

    let outputs: Vec<Vec<T>> = deinterleave(input, channels)
        .iter()
        .map(|channel| interpolate_signal(channel, polyphase.view(), kind))
        .collect();
    Ok(interleave(&outputs))
}
