//! Rational-ratio resampling.
//!
//! Every output coordinate is mapped to an exact input coordinate. Its
//! fractional part selects two neighbouring phases, which are evaluated and
//! blended with integer weights. Only the blend itself is floating point.

use crate::core::kernel::{dot_product_sample, DotKernel, ScalarKernel};
use crate::core::rational::Rational;
use crate::core::sample::Sample;
use crate::core::signal::ConvolutionKind;
use crate::filter::polyphase::PolyphaseView;

use super::length::resample_length;
use super::suspension::{
    find_resample_suspension_point, input_index_to_samples, ResampleSuspensionPoint,
};

/// Resamples `input` at `ratio` (input rate over output rate), writing the
/// output samples whose coordinates are `start_point, start_point + 1, ...`.
///
/// The returned token locates the next sample relative to `input`: pass
/// `&input[token.first_input_sample..]` and `token.start_point` to continue.
///
/// # Panics
/// Panics if `ratio` is not positive, `start_point` is negative, or the
/// requested window extends past [`resample_length`] with
/// [`ConvolutionKind::Full`].
pub fn resample<T: Sample>(
    output: &mut [T],
    input: &[T],
    polyphase: PolyphaseView<'_, T>,
    ratio: Rational,
    start_point: Rational,
) -> ResampleSuspensionPoint {
    resample_with(&ScalarKernel, output, input, polyphase, ratio, start_point)
}

/// [`resample`] evaluated with a caller-chosen dot-product kernel.
pub fn resample_with<T, K>(
    kernel: &K,
    output: &mut [T],
    input: &[T],
    polyphase: PolyphaseView<'_, T>,
    ratio: Rational,
    start_point: Rational,
) -> ResampleSuspensionPoint
where
    T: Sample,
    K: DotKernel,
{
    assert!(ratio > 0, "sample rate ratio must be positive, got {ratio}");
    assert!(start_point >= 0, "start point must not be negative, got {start_point}");

    let num_phases = polyphase.num_phases();
    let filter_len = polyphase.original_len();
    let max_len = resample_length(input.len(), filter_len, num_phases, ratio, ConvolutionKind::Full);
    let end = start_point + output.len() as i64;
    assert!(
        end <= max_len,
        "resampling window {start_point}..{end} exceeds the output length {max_len}"
    );

    let mut position = start_point;
    for out in output.iter_mut() {
        let (first, second) = input_index_to_samples(position * ratio, num_phases);
        let v0 = dot_product_sample(
            kernel,
            input,
            polyphase.phase(first.phase_index),
            first.input_index,
        );
        let v1 = dot_product_sample(
            kernel,
            input,
            polyphase.phase(second.phase_index),
            second.input_index,
        );
        let w0 = T::from_weight(first.weight);
        let w1 = T::from_weight(second.weight);
        *out = (v0 * w0 + v1 * w1) / (w0 + w1);
        position += 1;
    }

    find_resample_suspension_point(position, filter_len, num_phases, ratio)
}

/// Allocating form of [`resample`].
pub fn resample_to_vec<T: Sample>(
    input: &[T],
    polyphase: PolyphaseView<'_, T>,
    ratio: Rational,
    start_point: Rational,
    length: usize,
) -> Vec<T> {
    let mut output = vec![T::zero(); length];
    resample(&mut output, input, polyphase, ratio, start_point);
    output
}

/// Resamples a whole signal, starting at the first output sample that
/// touches the input and ending at the last.
pub fn resample_full<T: Sample>(
    input: &[T],
    polyphase: PolyphaseView<'_, T>,
    ratio: Rational,
) -> Vec<T> {
    if input.is_empty() || polyphase.original_len() == 0 {
        return Vec::new();
    }
    let length = resample_length(
        input.len(),
        polyphase.original_len(),
        polyphase.num_phases(),
        ratio,
        ConvolutionKind::Full,
    );
    resample_to_vec(input, polyphase, ratio, Rational::ZERO, length.floor() as usize)
}

/// Resamples a whole signal, keeping only the outputs where the filter is
/// fully overlapped by input.
pub fn resample_central<T: Sample>(
    input: &[T],
    polyphase: PolyphaseView<'_, T>,
    ratio: Rational,
) -> Vec<T> {
    if input.is_empty() || polyphase.original_len() == 0 {
        return Vec::new();
    }
    let num_phases = polyphase.num_phases();
    let filter_len = polyphase.original_len();
    let overlap = filter_len.min(input.len() * num_phases);
    let start_point = Rational::new(overlap as i64 - 1, num_phases as i64) / ratio;
    let length = resample_length(input.len(), filter_len, num_phases, ratio, ConvolutionKind::Central);
    resample_to_vec(input, polyphase, ratio, start_point, length.floor() as usize)
}
