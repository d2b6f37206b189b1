//! Polyphase decomposition of a prototype low-pass filter.
//!
//! A filter of `N` taps is split into `P` interleaved sub-filters: phase `p`
//! holds taps `p, p + P, p + 2P, ...`, scaled by `P` and stored back to front
//! so that it can be used directly as a correlation kernel. Phases are laid
//! out contiguously in one buffer; the first `N mod P` phases carry one tap
//! more than the rest.

use std::ops::Range;

use tracing::debug;

use crate::core::sample::Sample;
use crate::error::{ResampleError, ResampleResult};

/// Where each phase lives inside a decomposed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolyphaseLayout {
    len: usize,
    num_phases: usize,
}

impl PolyphaseLayout {
    /// # Panics
    /// Panics if `num_phases` is zero.
    pub fn new(len: usize, num_phases: usize) -> Self {
        assert!(num_phases > 0, "number of phases must be positive");
        Self { len, num_phases }
    }

    #[inline]
    pub fn num_phases(&self) -> usize {
        self.num_phases
    }

    /// Length of the prototype filter.
    #[inline]
    pub fn original_len(&self) -> usize {
        self.len
    }

    /// Length of the longest phase, `ceil(N / P)`.
    #[inline]
    pub fn max_phase_len(&self) -> usize {
        self.len.div_ceil(self.num_phases)
    }

    #[inline]
    pub fn phase_len(&self, phase: usize) -> usize {
        debug_assert!(phase < self.num_phases);
        self.len / self.num_phases + usize::from(phase < self.len % self.num_phases)
    }

    #[inline]
    pub fn phase_offset(&self, phase: usize) -> usize {
        debug_assert!(phase < self.num_phases);
        (self.len / self.num_phases) * phase + phase.min(self.len % self.num_phases)
    }

    /// Index range of `phase` within the decomposed buffer.
    ///
    /// # Panics
    /// Panics if `phase >= num_phases`.
    #[inline]
    pub fn phase_range(&self, phase: usize) -> Range<usize> {
        assert!(
            phase < self.num_phases,
            "phase index {} out of range for {} phases",
            phase,
            self.num_phases
        );
        let offset = self.phase_offset(phase);
        offset..offset + self.phase_len(phase)
    }
}

/// Read-only view of a decomposed filter. Cheap to copy; borrows the buffer.
#[derive(Debug, Clone, Copy)]
pub struct PolyphaseView<'a, T> {
    taps: &'a [T],
    layout: PolyphaseLayout,
}

impl<'a, T: Sample> PolyphaseView<'a, T> {
    /// Wraps a buffer that already holds decomposed phases.
    ///
    /// # Panics
    /// Panics if `num_phases` is zero.
    pub fn new(taps: &'a [T], num_phases: usize) -> Self {
        Self {
            taps,
            layout: PolyphaseLayout::new(taps.len(), num_phases),
        }
    }

    /// Taps of one phase, in reversed (correlation) order.
    #[inline]
    pub fn phase(&self, phase: usize) -> &'a [T] {
        &self.taps[self.layout.phase_range(phase)]
    }

    #[inline]
    pub fn num_phases(&self) -> usize {
        self.layout.num_phases()
    }

    #[inline]
    pub fn original_len(&self) -> usize {
        self.layout.original_len()
    }

    #[inline]
    pub fn max_phase_len(&self) -> usize {
        self.layout.max_phase_len()
    }

    #[inline]
    pub fn layout(&self) -> PolyphaseLayout {
        self.layout
    }

    /// The whole decomposed buffer.
    #[inline]
    pub fn taps(&self) -> &'a [T] {
        self.taps
    }

    /// Iterates over all phases in index order.
    pub fn phases(&self) -> impl Iterator<Item = &'a [T]> + 'a {
        let view = *self;
        (0..view.num_phases()).map(move |p| view.phase(p))
    }
}

/// Mutable view returned by [`decompose`], used to normalize in place.
#[derive(Debug)]
pub struct PolyphaseViewMut<'a, T> {
    taps: &'a mut [T],
    layout: PolyphaseLayout,
}

impl<'a, T: Sample> PolyphaseViewMut<'a, T> {
    #[inline]
    pub fn phase_mut(&mut self, phase: usize) -> &mut [T] {
        let range = self.layout.phase_range(phase);
        &mut self.taps[range]
    }

    #[inline]
    pub fn view(&self) -> PolyphaseView<'_, T> {
        PolyphaseView {
            taps: &*self.taps,
            layout: self.layout,
        }
    }

    /// Gives up mutable access for a view with the full buffer lifetime.
    #[inline]
    pub fn into_view(self) -> PolyphaseView<'a, T> {
        PolyphaseView {
            taps: self.taps,
            layout: self.layout,
        }
    }

    /// Scales every phase so that its taps sum to one (unity DC gain).
    ///
    /// # Errors
    /// Returns [`ResampleError::DegeneratePhase`] if a phase sums to zero
    /// (including empty phases). The buffer is left untouched in that case.
    pub fn normalize(&mut self) -> ResampleResult<()> {
        normalize_phases(self.taps, self.layout)
    }
}

fn normalize_phases<T: Sample>(taps: &mut [T], layout: PolyphaseLayout) -> ResampleResult<()> {
    let mut gains = Vec::with_capacity(layout.num_phases());
    for phase in 0..layout.num_phases() {
        let sum: T = taps[layout.phase_range(phase)].iter().copied().sum();
        if sum.magnitude() == 0.0 {
            return Err(ResampleError::DegeneratePhase { phase });
        }
        gains.push(sum);
    }
    for (phase, gain) in gains.into_iter().enumerate() {
        for tap in &mut taps[layout.phase_range(phase)] {
            *tap = *tap / gain;
        }
    }
    Ok(())
}

/// Splits `filter` into `num_phases` reversed, `num_phases`-scaled phases,
/// written into `output`.
///
/// In-place decomposition is impossible: `output` and `filter` cannot alias
/// because one is borrowed mutably.
///
/// # Panics
/// Panics if `output.len() != filter.len()` or `num_phases == 0`.
pub fn decompose<'a, T: Sample>(
    output: &'a mut [T],
    filter: &[T],
    num_phases: usize,
) -> PolyphaseViewMut<'a, T> {
    assert_eq!(
        output.len(),
        filter.len(),
        "polyphase output must be as long as the filter"
    );
    let layout = PolyphaseLayout::new(filter.len(), num_phases);
    let gain = T::from_usize(num_phases);
    for phase in 0..num_phases {
        let dst = &mut output[layout.phase_range(phase)];
        let src = filter.iter().skip(phase).step_by(num_phases);
        for (slot, &coeff) in dst.iter_mut().rev().zip(src) {
            *slot = coeff * gain;
        }
    }
    PolyphaseViewMut {
        taps: output,
        layout,
    }
}

/// Fallible form of [`decompose`].
///
/// # Errors
/// Returns [`ResampleError::ZeroPhases`] or [`ResampleError::LengthMismatch`]
/// instead of panicking.
pub fn try_decompose<'a, T: Sample>(
    output: &'a mut [T],
    filter: &[T],
    num_phases: usize,
) -> ResampleResult<PolyphaseViewMut<'a, T>> {
    if num_phases == 0 {
        return Err(ResampleError::ZeroPhases);
    }
    if output.len() != filter.len() {
        return Err(ResampleError::LengthMismatch {
            expected: filter.len(),
            actual: output.len(),
        });
    }
    Ok(decompose(output, filter, num_phases))
}

/// A decomposed filter that owns its buffer.
///
/// Build once and share (e.g. through `Arc`) between any number of
/// resampling streams; it is never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyphaseFilter<T> {
    taps: Vec<T>,
    layout: PolyphaseLayout,
}

impl<T: Sample> PolyphaseFilter<T> {
    /// Decomposes a prototype filter into `num_phases` phases.
    ///
    /// # Errors
    /// Returns [`ResampleError::EmptyFilter`] or [`ResampleError::ZeroPhases`].
    pub fn new(filter: &[T], num_phases: usize) -> ResampleResult<Self> {
        if filter.is_empty() {
            return Err(ResampleError::EmptyFilter);
        }
        if num_phases == 0 {
            return Err(ResampleError::ZeroPhases);
        }
        let mut taps = vec![T::zero(); filter.len()];
        let layout = decompose(&mut taps, filter, num_phases).layout;
        debug!(
            filter_len = filter.len(),
            num_phases,
            max_phase_len = layout.max_phase_len(),
            "decomposed prototype filter"
        );
        Ok(Self { taps, layout })
    }

    /// Rescales each phase to unity DC gain.
    ///
    /// # Errors
    /// Returns [`ResampleError::DegeneratePhase`] if any phase sums to zero.
    pub fn normalized(mut self) -> ResampleResult<Self> {
        normalize_phases(&mut self.taps, self.layout)?;
        debug!(num_phases = self.layout.num_phases(), "normalized polyphase filter");
        Ok(self)
    }

    #[inline]
    pub fn view(&self) -> PolyphaseView<'_, T> {
        PolyphaseView {
            taps: &self.taps,
            layout: self.layout,
        }
    }

    #[inline]
    pub fn phase(&self, phase: usize) -> &[T] {
        &self.taps[self.layout.phase_range(phase)]
    }

    #[inline]
    pub fn num_phases(&self) -> usize {
        self.layout.num_phases()
    }

    #[inline]
    pub fn original_len(&self) -> usize {
        self.layout.original_len()
    }

    #[inline]
    pub fn max_phase_len(&self) -> usize {
        self.layout.max_phase_len()
    }

    #[inline]
    pub fn layout(&self) -> PolyphaseLayout {
        self.layout
    }
}

impl<'a, T: Sample> From<&'a PolyphaseFilter<T>> for PolyphaseView<'a, T> {
    fn from(filter: &'a PolyphaseFilter<T>) -> Self {
        filter.view()
    }
}
