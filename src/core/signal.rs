//! Whole-signal helpers: zero-stuffing, decimation and direct convolution.
//!
//! Direct convolution here is the plain O(n·m) definition. It is the
//! reference that polyphase evaluation must agree with, not a fast path.

use super::sample::Sample;

/// Convolution output conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvolutionKind {
    /// Every position where the two sequences overlap at all.
    Full,
    /// Only positions where the shorter sequence overlaps the longer one completely.
    Central,
}

/// Length of the convolution of sequences of length `len_u` and `len_v`.
///
/// Zero if either sequence is empty.
pub fn convolution_length(len_u: usize, len_v: usize, kind: ConvolutionKind) -> usize {
    if len_u == 0 || len_v == 0 {
        return 0;
    }
    let (shorter, longer) = if len_u < len_v {
        (len_u, len_v)
    } else {
        (len_v, len_u)
    };
    match kind {
        ConvolutionKind::Full => longer + shorter - 1,
        ConvolutionKind::Central => longer - shorter + 1,
    }
}

/// Index of the first central sample within the full convolution.
#[inline]
pub fn central_offset(len_u: usize, len_v: usize) -> usize {
    len_u.min(len_v).saturating_sub(1)
}

/// Inserts `rate - 1` zeros after every sample.
///
/// # Panics
/// Panics if `output.len() != input.len() * rate`.
pub fn expand_into<T: Sample>(output: &mut [T], input: &[T], rate: usize) {
    assert_eq!(
        output.len(),
        input.len() * rate,
        "expanded output must hold input.len() * rate samples"
    );
    if rate == 0 {
        return;
    }
    for (frame, &x) in output.chunks_exact_mut(rate).zip(input) {
        frame[0] = x;
        for s in &mut frame[1..] {
            *s = T::zero();
        }
    }
}

/// Zero-stuffs `input` by `rate`.
pub fn expand<T: Sample>(input: &[T], rate: usize) -> Vec<T> {
    let mut output = vec![T::zero(); input.len() * rate];
    expand_into(&mut output, input, rate);
    output
}

/// Keeps every `rate`-th sample, starting with the first.
///
/// # Panics
/// Panics if `rate` is zero or `output.len() != ceil(input.len() / rate)`.
pub fn decimate_into<T: Sample>(output: &mut [T], input: &[T], rate: usize) {
    assert!(rate > 0, "decimation rate must be positive");
    assert_eq!(
        output.len(),
        input.len().div_ceil(rate),
        "decimated output must hold ceil(input.len() / rate) samples"
    );
    for (o, &x) in output.iter_mut().zip(input.iter().step_by(rate)) {
        *o = x;
    }
}

/// Keeps every `rate`-th sample of `input`.
///
/// # Panics
/// Panics if `rate` is zero.
pub fn decimate<T: Sample>(input: &[T], rate: usize) -> Vec<T> {
    assert!(rate > 0, "decimation rate must be positive");
    input.iter().step_by(rate).copied().collect()
}

/// Samples `[offset, offset + length)` of the full convolution of `u` and `v`.
///
/// Positions past the end of the full convolution are zero.
pub fn convolve_range<T: Sample>(u: &[T], v: &[T], offset: usize, length: usize) -> Vec<T> {
    let mut output = vec![T::zero(); length];
    if u.is_empty() || v.is_empty() {
        return output;
    }
    for (n, out) in (offset..offset + length).zip(output.iter_mut()) {
        // k ranges over u indices with 0 <= n - k < v.len().
        let k_first = (n + 1).saturating_sub(v.len());
        let k_last = n.min(u.len() - 1);
        let mut acc = T::zero();
        for k in k_first..=k_last {
            acc += u[k] * v[n - k];
        }
        *out = acc;
    }
    output
}

/// Direct convolution of `u` and `v`.
pub fn convolve<T: Sample>(u: &[T], v: &[T], kind: ConvolutionKind) -> Vec<T> {
    let length = convolution_length(u.len(), v.len(), kind);
    let offset = match kind {
        ConvolutionKind::Full => 0,
        ConvolutionKind::Central => central_offset(u.len(), v.len()),
    };
    convolve_range(u, v, offset, length)
}
