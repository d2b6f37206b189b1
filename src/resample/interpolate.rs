//! Integer-ratio interpolation.
//!
//! Output sample `n` of the supersampled convolution draws only on phase
//! `n % P`, correlated against the low-rate input ending at `n / P`. The
//! zero-stuffed signal is never materialized.

use crate::core::kernel::{dot_product_sample, DotKernel, ScalarKernel};
use crate::core::sample::Sample;
use crate::core::signal::{central_offset, ConvolutionKind};
use crate::filter::polyphase::PolyphaseView;

use super::length::interpol_length;
use super::suspension::{find_interpol_suspension_point, InterpolSuspensionPoint};

/// Fills `output` with samples `[output_offset, output_offset + output.len())`
/// of the full convolution of `input`, zero-stuffed by the number of
/// phases, with the prototype filter.
///
/// The returned token locates the next sample relative to `input`: pass
/// `&input[token.first_input_sample..]` and `token.start_point` to continue.
///
/// # Panics
/// Panics if the requested window extends past
/// [`interpol_length`] with [`ConvolutionKind::Full`].
pub fn interpolate<T: Sample>(
    output: &mut [T],
    input: &[T],
    polyphase: PolyphaseView<'_, T>,
    output_offset: usize,
) -> InterpolSuspensionPoint {
    interpolate_with(&ScalarKernel, output, input, polyphase, output_offset)
}

/// [`interpolate`] evaluated with a caller-chosen dot-product kernel.
pub fn interpolate_with<T, K>(
    kernel: &K,
    output: &mut [T],
    input: &[T],
    polyphase: PolyphaseView<'_, T>,
    output_offset: usize,
) -> InterpolSuspensionPoint
where
    T: Sample,
    K: DotKernel,
{
    let num_phases = polyphase.num_phases();
    let filter_len = polyphase.original_len();
    let max_len = interpol_length(input.len(), filter_len, num_phases, ConvolutionKind::Full);
    let end = output_offset + output.len();
    assert!(
        end <= max_len,
        "interpolation window {output_offset}..{end} exceeds the output length {max_len}"
    );

    for (n, out) in (output_offset..end).zip(output.iter_mut()) {
        let phase = polyphase.phase(n % num_phases);
        *out = dot_product_sample(kernel, input, phase, n / num_phases);
    }

    find_interpol_suspension_point(end, filter_len, num_phases)
}

/// Allocating form of [`interpolate`].
pub fn interpolate_to_vec<T: Sample>(
    input: &[T],
    polyphase: PolyphaseView<'_, T>,
    output_offset: usize,
    length: usize,
) -> Vec<T> {
    let mut output = vec![T::zero(); length];
    interpolate(&mut output, input, polyphase, output_offset);
    output
}

/// Interpolates a whole signal, keeping either every sample of the
/// convolution or only the fully overlapped ones.
pub fn interpolate_signal<T: Sample>(
    input: &[T],
    polyphase: PolyphaseView<'_, T>,
    kind: ConvolutionKind,
) -> Vec<T> {
    let num_phases = polyphase.num_phases();
    let filter_len = polyphase.original_len();
    let length = interpol_length(input.len(), filter_len, num_phases, kind);
    let offset = match kind {
        ConvolutionKind::Full => 0,
        ConvolutionKind::Central => central_offset(input.len() * num_phases, filter_len),
    };
    interpolate_to_vec(input, polyphase, offset, length)
}
