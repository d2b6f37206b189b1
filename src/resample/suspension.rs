//! Continuation tokens and the position arithmetic behind them.
//!
//! A token says which input sample the next call should treat as index 0,
//! and where in the output (relative to that input) generation resumes.
//! Feeding it back reproduces exactly what one uninterrupted call would
//! have produced.

use serde::{Deserialize, Serialize};

use crate::core::rational::Rational;

/// Continuation state for integer-ratio interpolation.
///
/// `first_input_sample` is relative to the input slice of the call that
/// returned it; `start_point` is the output offset to pass to the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InterpolSuspensionPoint {
    pub first_input_sample: usize,
    pub start_point: usize,
}

/// Continuation state for rational-ratio resampling.
///
/// `start_point` is an exact output-domain coordinate, so a stream split into
/// any number of calls accumulates no positional error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResampleSuspensionPoint {
    pub first_input_sample: usize,
    pub start_point: Rational,
}

/// One of the two phase evaluations blended into a resampled output sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PhaseSample {
    pub input_index: usize,
    pub phase_index: usize,
    pub weight: u64,
}

pub(crate) fn find_interpol_suspension_point(
    next_output_sample: usize,
    filter_len: usize,
    num_phases: usize,
) -> InterpolSuspensionPoint {
    let delay = filter_len.saturating_sub(1);
    if next_output_sample < delay {
        return InterpolSuspensionPoint {
            first_input_sample: 0,
            start_point: next_output_sample,
        };
    }
    let first_output_sample = next_output_sample - delay;
    let first_input_sample = first_output_sample / num_phases;
    InterpolSuspensionPoint {
        first_input_sample,
        start_point: first_output_sample - num_phases * first_input_sample + delay,
    }
}

pub(crate) fn find_resample_suspension_point(
    next_output_sample: Rational,
    filter_len: usize,
    num_phases: usize,
    ratio: Rational,
) -> ResampleSuspensionPoint {
    let next_input_sample = next_output_sample * ratio;
    let convolution_offset = Rational::new(filter_len.saturating_sub(1) as i64, num_phases as i64);
    let first_input_sample = next_input_sample - convolution_offset;

    if first_input_sample <= 0 {
        return ResampleSuspensionPoint {
            first_input_sample: 0,
            start_point: next_output_sample,
        };
    }
    let input_start_point = first_input_sample.frac() + convolution_offset;
    ResampleSuspensionPoint {
        first_input_sample: first_input_sample.floor() as usize,
        start_point: input_start_point / ratio,
    }
}

/// Splits a non-negative input coordinate into the two adjacent phases that
/// bracket it, with integer weights summing to the phase-resolution
/// denominator.
pub(crate) fn input_index_to_samples(
    input_index: Rational,
    num_phases: usize,
) -> (PhaseSample, PhaseSample) {
    debug_assert!(input_index >= 0);
    let scaled = input_index.frac() * num_phases as i64;

    let first_phase = scaled.floor() as usize;
    let second_phase = (first_phase + 1) % num_phases;

    let t = scaled.frac();
    let second_weight = t.numerator() as u64;
    let first_weight = (t.denominator() - t.numerator()) as u64;

    let first_index = input_index.floor() as usize;
    let second_index = if second_phase == 0 {
        first_index + 1
    } else {
        first_index
    };

    (
        PhaseSample {
            input_index: first_index,
            phase_index: first_phase,
            weight: first_weight,
        },
        PhaseSample {
            input_index: second_index,
            phase_index: second_phase,
            weight: second_weight,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpol_suspension_initial_point() {
        let sp = find_interpol_suspension_point(0, 31, 6);
        assert_eq!(sp.first_input_sample, 0);
        assert_eq!(sp.start_point, 0);
    }

    #[test]
    fn test_interpol_suspension_inside_delay() {
        let sp = find_interpol_suspension_point(2, 31, 6);
        assert_eq!(sp.first_input_sample, 0);
        assert_eq!(sp.start_point, 2);
    }

    #[test]
    fn test_interpol_suspension_middle_and_far() {
        let sp = find_interpol_suspension_point(36, 31, 6);
        assert_eq!((sp.first_input_sample, sp.start_point), (1, 30));

        let sp = find_interpol_suspension_point(158, 31, 6);
        assert_eq!((sp.first_input_sample, sp.start_point), (21, 32));
    }

    #[test]
    fn test_interpol_suspension_preserves_position() {
        for next in 0..200 {
            let sp = find_interpol_suspension_point(next, 31, 6);
            assert_eq!(sp.first_input_sample * 6 + sp.start_point, next);
        }
    }

    #[test]
    fn test_resample_suspension_before_delay() {
        let ratio = Rational::new(4, 7);
        let sp = find_resample_suspension_point(Rational::ZERO, 31, 6, ratio);
        assert_eq!(sp.first_input_sample, 0);
        assert_eq!(sp.start_point, Rational::ZERO);

        let sp = find_resample_suspension_point(Rational::ONE, 31, 6, ratio);
        assert_eq!(sp.first_input_sample, 0);
        assert_eq!(sp.start_point, Rational::ONE);
    }

    #[test]
    fn test_resample_suspension_middle_point() {
        let ratio = Rational::new(4, 7);
        let next = Rational::new(42, 4);
        let sp = find_resample_suspension_point(next, 31, 6, ratio);
        assert_eq!(sp.first_input_sample, 1);
        assert_eq!(sp.start_point, Rational::new(35, 4));
        assert_eq!(Rational::from_integer(1) / ratio + sp.start_point, next);
    }

    #[test]
    fn test_resample_suspension_far_point() {
        let ratio = Rational::new(4, 7);
        let next = Rational::from_integer(156);
        let sp = find_resample_suspension_point(next, 31, 6, ratio);
        assert_eq!(sp.first_input_sample, 84);
        assert_eq!(sp.start_point, Rational::from_integer(9));
        assert_eq!(
            Rational::from_integer(sp.first_input_sample as i64) / ratio + sp.start_point,
            next
        );
    }

    #[test]
    fn test_input_index_zero_weight() {
        let (first, second) = input_index_to_samples(Rational::new(43, 7), 7);
        assert_eq!(
            first,
            PhaseSample {
                input_index: 6,
                phase_index: 1,
                weight: 1
            }
        );
        assert_eq!(
            second,
            PhaseSample {
                input_index: 6,
                phase_index: 2,
                weight: 0
            }
        );
    }

    #[test]
    fn test_input_index_split_weight() {
        let (first, second) = input_index_to_samples(Rational::new(87, 14), 5);
        assert_eq!((first.input_index, first.phase_index, first.weight), (6, 1, 13));
        assert_eq!((second.input_index, second.phase_index, second.weight), (6, 2, 1));
    }

    #[test]
    fn test_input_index_rollover() {
        let (first, second) = input_index_to_samples(Rational::new(27, 14), 5);
        assert_eq!((first.input_index, first.phase_index, first.weight), (1, 4, 5));
        assert_eq!((second.input_index, second.phase_index, second.weight), (2, 0, 9));
    }

    #[test]
    fn test_input_index_single_phase() {
        let (first, second) = input_index_to_samples(Rational::new(5, 2), 1);
        assert_eq!((first.input_index, first.phase_index, first.weight), (2, 0, 1));
        assert_eq!((second.input_index, second.phase_index, second.weight), (3, 0, 1));
    }

    #[test]
    fn test_tokens_serialize() {
        let token = ResampleSuspensionPoint {
            first_input_sample: 84,
            start_point: Rational::new(35, 4),
        };
        let json = serde_json::to_string(&token).unwrap();
        let back: ResampleSuspensionPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
