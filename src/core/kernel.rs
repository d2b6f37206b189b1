//! Dot-product kernels and the boundary-clamped evaluator built on them.
//!
//! The resampling code only ever asks for "the correlation of one phase with
//! the input, ending at index `i`". How the inner product itself is computed
//! is behind [`DotKernel`], so a vectorized kernel can be swapped in without
//! touching the position bookkeeping.

use super::sample::Sample;

/// Inner product of two equal-length slices.
pub trait DotKernel {
    fn dot<T: Sample>(&self, a: &[T], b: &[T]) -> T;
}

/// Sequential accumulation, one multiply-add per tap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScalarKernel;

impl DotKernel for ScalarKernel {
    #[inline]
    fn dot<T: Sample>(&self, a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        let mut acc = T::zero();
        for (&x, &y) in a.iter().zip(b) {
            acc += x * y;
        }
        acc
    }
}

/// Four independent accumulators, which lets the compiler keep several
/// multiply-adds in flight. Results differ from [`ScalarKernel`] only by
/// floating-point summation order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnrolledKernel;

impl DotKernel for UnrolledKernel {
    #[inline]
    fn dot<T: Sample>(&self, a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        let mut lanes = [T::zero(); 4];
        let a_chunks = a.chunks_exact(4);
        let b_chunks = b.chunks_exact(4);
        let (a_tail, b_tail) = (a_chunks.remainder(), b_chunks.remainder());
        for (ca, cb) in a_chunks.zip(b_chunks) {
            lanes[0] += ca[0] * cb[0];
            lanes[1] += ca[1] * cb[1];
            lanes[2] += ca[2] * cb[2];
            lanes[3] += ca[3] * cb[3];
        }
        let mut acc = (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);
        for (&x, &y) in a_tail.iter().zip(b_tail) {
            acc += x * y;
        }
        acc
    }
}

/// Correlates a reversed-storage filter phase with `input`, ending at
/// `reverse_first`.
///
/// Computes `sum(phase[m] * input[reverse_first + 1 - phase.len() + m])`,
/// i.e. the convolution of `input` with the phase in its natural order,
/// evaluated at `reverse_first`. Input positions outside `0..input.len()`
/// count as zero: the tap range is intersected with the input range up front
/// instead of testing every tap.
#[inline]
pub fn dot_product_sample<T, K>(kernel: &K, input: &[T], phase: &[T], reverse_first: usize) -> T
where
    T: Sample,
    K: DotKernel,
{
    let end = reverse_first + 1;
    // Unclamped window is [end - phase.len(), end).
    let first = end.saturating_sub(phase.len());
    let last = end.min(input.len());
    if last <= first {
        return T::zero();
    }
    let count = last - first;
    let tap_offset = first + phase.len() - end;
    kernel.dot(&input[first..last], &phase[tap_offset..tap_offset + count])
}
