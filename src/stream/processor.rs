use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::rational::Rational;
use crate::core::sample::Sample;
use crate::core::signal::ConvolutionKind;
use crate::error::{ResampleError, ResampleResult};
use crate::filter::polyphase::PolyphaseFilter;
use crate::resample::length::{resample_delay, resample_length};
use crate::resample::params::ResampleParams;
use crate::resample::rational::resample;
use crate::resample::suspension::ResampleSuspensionPoint;
use crate::validate_input;

/// Input not yet consumed by one channel, plus where its output resumes.
#[derive(Debug, Clone, Default)]
struct ChannelState<T> {
    pending: Vec<T>,
    token: ResampleSuspensionPoint,
}

/// Streaming chunk-based resampler for interleaved multi-channel audio.
///
/// Each call emits every output sample whose input window is already
/// buffered. The concatenated output of all [`process`](Self::process)
/// calls followed by [`flush`](Self::flush) is identical to resampling the
/// whole signal at once with
/// [`resample_full`](crate::resample::rational::resample_full), however
/// the input was chunked.
pub struct StreamResampler<T> {
    params: ResampleParams,
    ratio: Rational,
    polyphase: Arc<PolyphaseFilter<T>>,
    channels: Vec<ChannelState<T>>,
}

impl<T: Sample> StreamResampler<T> {
    /// Creates a resampler from a prototype lowpass filter.
    ///
    /// The filter is decomposed into `params.num_phases` branches and, if
    /// `params.normalize` is set, every branch is scaled to unity gain.
    pub fn new(params: ResampleParams, filter: &[T]) -> ResampleResult<Self> {
        params.validate()?;
        let mut polyphase = PolyphaseFilter::new(filter, params.num_phases)?;
        if params.normalize {
            polyphase = polyphase.normalized()?;
        }
        Self::with_polyphase(params, Arc::new(polyphase))
    }

    /// Creates a resampler sharing an existing decomposition.
    ///
    /// `params.normalize` is ignored; the decomposition is used as given.
    pub fn with_polyphase(
        params: ResampleParams,
        polyphase: Arc<PolyphaseFilter<T>>,
    ) -> ResampleResult<Self> {
        params.validate()?;
        if polyphase.num_phases() != params.num_phases {
            return Err(ResampleError::InvalidInput(format!(
                "polyphase filter has {} phases, params request {}",
                polyphase.num_phases(),
                params.num_phases
            )));
        }
        let ratio = params.ratio();
        debug!(
            input_rate = params.input_rate,
            output_rate = params.output_rate,
            %ratio,
            channels = params.channels,
            filter_len = polyphase.original_len(),
            num_phases = polyphase.num_phases(),
            "created stream resampler"
        );
        Ok(Self {
            channels: vec![ChannelState::default(); params.channels],
            params,
            ratio,
            polyphase,
        })
    }

    /// Processes a chunk of interleaved samples.
    ///
    /// Returns interleaved output; may be empty while the filter is still
    /// filling up.
    pub fn process(&mut self, input: &[T]) -> ResampleResult<Vec<T>> {
        let num_channels = self.channels.len();
        validate_input(input, num_channels)?;

        for (ch, state) in self.channels.iter_mut().enumerate() {
            state
                .pending
                .extend(input.iter().skip(ch).step_by(num_channels).copied());
        }

        let count = self.ready_outputs();
        trace!(
            frames = input.len() / num_channels,
            pending = self.pending_frames(),
            outputs = count,
            "processed chunk"
        );
        Ok(self.render(count))
    }

    /// Emits the remaining tail of the stream and resets the resampler.
    pub fn flush(&mut self) -> ResampleResult<Vec<T>> {
        let count = match self.channels.first() {
            Some(state) if !state.pending.is_empty() => {
                let remaining = self.full_length(state.pending.len()) - state.token.start_point;
                remaining.floor().max(0) as usize
            }
            _ => 0,
        };
        debug!(outputs = count, "flushing stream resampler");
        let output = self.render(count);
        self.reset();
        Ok(output)
    }

    /// Discards all buffered input and restarts the stream.
    pub fn reset(&mut self) {
        for state in &mut self.channels {
            state.pending.clear();
            state.token = ResampleSuspensionPoint::default();
        }
        debug!("reset stream resampler");
    }

    /// Filter group delay in output samples.
    pub fn delay(&self) -> Rational {
        resample_delay(
            self.polyphase.original_len(),
            self.polyphase.num_phases(),
            self.ratio,
        )
    }

    /// Filter group delay in seconds.
    pub fn delay_secs(&self) -> f64 {
        self.delay().to_f64() / f64::from(self.params.output_rate)
    }

    /// Number of input frames held back for future output.
    pub fn pending_frames(&self) -> usize {
        self.channels.first().map_or(0, |state| state.pending.len())
    }

    /// The parameters this resampler was built with.
    pub fn params(&self) -> &ResampleParams {
        &self.params
    }

    /// The shared polyphase decomposition.
    pub fn polyphase(&self) -> &Arc<PolyphaseFilter<T>> {
        &self.polyphase
    }

    fn full_length(&self, input_len: usize) -> Rational {
        resample_length(
            input_len,
            self.polyphase.original_len(),
            self.polyphase.num_phases(),
            self.ratio,
            ConvolutionKind::Full,
        )
    }

    /// Outputs whose input coordinate is at most the last buffered sample,
    /// capped at what the whole signal would produce if it ended here.
    ///
    /// An output landing exactly on the last sample gives its second phase
    /// zero weight, so it no longer depends on input still to come.
    fn ready_outputs(&self) -> usize {
        let Some(state) = self.channels.first() else {
            return 0;
        };
        let len = state.pending.len();
        if len == 0 {
            return 0;
        }
        let start = state.token.start_point;
        let available = Rational::from_integer(len as i64 - 1) / self.ratio - start;
        if available < Rational::ZERO {
            return 0;
        }
        let bounded = self.full_length(len) - start;
        (available.floor() + 1).min(bounded.floor()).max(0) as usize
    }

    /// Resamples `count` outputs per channel, drops consumed input and
    /// interleaves the result.
    fn render(&mut self, count: usize) -> Vec<T> {
        if count == 0 {
            return Vec::new();
        }
        let num_channels = self.channels.len();
        let mut output = vec![T::zero(); count * num_channels];
        let mut channel_out = vec![T::zero(); count];

        for (ch, state) in self.channels.iter_mut().enumerate() {
            let token = resample(
                &mut channel_out,
                &state.pending,
                self.polyphase.view(),
                self.ratio,
                state.token.start_point,
            );
            let consumed = token.first_input_sample.min(state.pending.len());
            state.pending.drain(..consumed);
            state.token = token;

            for (frame, &s) in output.chunks_exact_mut(num_channels).zip(&channel_out) {
                frame[ch] = s;
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resample::rational::resample_full;

    fn lowpass(len: usize) -> Vec<f64> {
        // Hann-shaped taps; only the streaming bookkeeping is under test here.
        (0..len)
            .map(|i| {
                let x = (i as f64 + 1.0) / (len as f64 + 1.0);
                (std::f64::consts::PI * x).sin().powi(2)
            })
            .collect()
    }

    fn ramp(len: usize) -> Vec<f64> {
        (0..len).map(|i| i as f64 * 0.01 - 1.0).collect()
    }

    fn batch(params: &ResampleParams, filter: &[f64], input: &[f64]) -> Vec<f64> {
        let pf = PolyphaseFilter::new(filter, params.num_phases)
            .unwrap()
            .normalized()
            .unwrap();
        resample_full(input, pf.view(), params.ratio())
    }

    #[test]
    fn test_stream_matches_batch() {
        let params = ResampleParams::new(44100, 48000).unwrap().with_num_phases(8);
        let filter = lowpass(63);
        let signal = ramp(700);
        let expected = batch(&params, &filter, &signal);

        let mut stream = StreamResampler::new(params, &filter).unwrap();
        let mut output = Vec::new();
        for chunk in signal.chunks(37) {
            output.extend(stream.process(chunk).unwrap());
        }
        output.extend(stream.flush().unwrap());

        assert_eq!(output, expected);
    }

    #[test]
    fn test_stream_matches_batch_downsampling() {
        let params = ResampleParams::new(48000, 16000).unwrap().with_num_phases(4);
        let filter = lowpass(9);
        let signal = ramp(301);
        let expected = batch(&params, &filter, &signal);

        let mut stream = StreamResampler::new(params, &filter).unwrap();
        let mut output = Vec::new();
        for chunk in signal.chunks(5) {
            output.extend(stream.process(chunk).unwrap());
        }
        output.extend(stream.flush().unwrap());

        assert_eq!(output, expected);
    }

    #[test]
    fn test_stereo_channels_independent() {
        let params = ResampleParams::new(3, 2)
            .unwrap()
            .with_num_phases(6)
            .with_channels(2);
        let filter = lowpass(25);
        let left = ramp(200);
        let right: Vec<f64> = left.iter().map(|x| -2.0 * x).collect();
        let interleaved: Vec<f64> = left.iter().zip(&right).flat_map(|(&l, &r)| [l, r]).collect();

        let mut stream = StreamResampler::new(params.clone(), &filter).unwrap();
        let mut output = Vec::new();
        for chunk in interleaved.chunks(22) {
            output.extend(stream.process(chunk).unwrap());
        }
        output.extend(stream.flush().unwrap());

        let expected_left = batch(&params, &filter, &left);
        let expected_right = batch(&params, &filter, &right);
        let out_left: Vec<f64> = output.iter().step_by(2).copied().collect();
        let out_right: Vec<f64> = output.iter().skip(1).step_by(2).copied().collect();
        assert_eq!(out_left, expected_left);
        assert_eq!(out_right, expected_right);
    }

    #[test]
    fn test_partial_frame_rejected() {
        let params = ResampleParams::new(1, 2).unwrap().with_channels(2);
        let mut stream = StreamResampler::new(params, &lowpass(64)).unwrap();
        assert!(matches!(
            stream.process(&[0.0, 1.0, 2.0]),
            Err(ResampleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_identity_stream_has_no_lag() {
        let params = ResampleParams::new(1, 1).unwrap().with_num_phases(1);
        let mut stream = StreamResampler::new(params, &[1.0]).unwrap();
        assert_eq!(stream.process(&[1.0, 2.0, 3.0, 4.0]).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stream.pending_frames(), 0);

        // Single frames come straight back out.
        for x in [5.0, 6.0, 7.0] {
            assert_eq!(stream.process(&[x]).unwrap(), vec![x]);
        }
        assert!(stream.flush().unwrap().is_empty());
    }

    #[test]
    fn test_emits_every_ready_output() {
        let params = ResampleParams::new(1, 2).unwrap().with_num_phases(16);
        let filter = lowpass(129);
        let signal = ramp(400);
        let expected = batch(&params, &filter, &signal);

        let mut stream = StreamResampler::new(params, &filter).unwrap();
        let mut output = Vec::new();
        for (i, chunk) in signal.chunks(40).enumerate() {
            output.extend(stream.process(chunk).unwrap());
            // Output 2k sits on input sample k, so 2n - 1 outputs need only n frames.
            let seen = 40 * (i + 1);
            assert_eq!(output.len(), 2 * seen - 1);
        }
        output.extend(stream.flush().unwrap());
        assert_eq!(output, expected);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let params = ResampleParams::new(1, 2).unwrap();
        let mut stream = StreamResampler::new(params, &lowpass(64)).unwrap();
        assert!(matches!(
            stream.process(&[0.0, f64::NAN]),
            Err(ResampleError::InvalidInput(_))
        ));
        assert!(matches!(
            stream.process(&[f64::INFINITY]),
            Err(ResampleError::InvalidInput(_))
        ));
        assert_eq!(stream.pending_frames(), 0);
    }

    #[test]
    fn test_pending_frames_bounded() {
        let params = ResampleParams::new(2, 3).unwrap().with_num_phases(4);
        let filter = lowpass(33);
        let mut stream = StreamResampler::new(params, &filter).unwrap();
        for chunk in ramp(1000).chunks(50) {
            stream.process(chunk).unwrap();
            // Everything older than the filter span is released.
            assert!(stream.pending_frames() <= 33 / 4 + 3);
        }
    }

    #[test]
    fn test_flush_resets() {
        let params = ResampleParams::new(1, 1).unwrap().with_num_phases(2);
        let filter = lowpass(8);
        let mut stream = StreamResampler::new(params.clone(), &filter).unwrap();

        let first: Vec<f64> = stream
            .process(&ramp(20))
            .unwrap()
            .into_iter()
            .chain(stream.flush().unwrap())
            .collect();
        assert_eq!(stream.pending_frames(), 0);

        let second: Vec<f64> = stream
            .process(&ramp(20))
            .unwrap()
            .into_iter()
            .chain(stream.flush().unwrap())
            .collect();
        assert_eq!(first, second);
        assert_eq!(first, batch(&params, &filter, &ramp(20)));
    }

    #[test]
    fn test_flush_without_input_is_empty() {
        let params = ResampleParams::new(1, 3).unwrap();
        let mut stream = StreamResampler::new(params, &lowpass(64)).unwrap();
        assert!(stream.flush().unwrap().is_empty());
        assert!(stream.process(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_reset_discards_pending() {
        let params = ResampleParams::new(1, 2).unwrap().with_num_phases(4);
        let mut stream = StreamResampler::new(params, &lowpass(31)).unwrap();
        stream.process(&ramp(10)).unwrap();
        assert!(stream.pending_frames() > 0);
        stream.reset();
        assert_eq!(stream.pending_frames(), 0);
    }

    #[test]
    fn test_delay() {
        let params = ResampleParams::new(4, 7).unwrap().with_num_phases(6);
        let stream = StreamResampler::new(params.clone(), &lowpass(31)).unwrap();
        assert_eq!(stream.params(), &params);
        assert_eq!(stream.delay(), Rational::new(35, 8));
        assert!((stream.delay_secs() - 35.0 / 8.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_shared_polyphase() {
        let params = ResampleParams::new(2, 5).unwrap().with_num_phases(5);
        let pf = Arc::new(PolyphaseFilter::new(&lowpass(40), 5).unwrap());
        let a = StreamResampler::with_polyphase(params.clone(), Arc::clone(&pf)).unwrap();
        let b = StreamResampler::with_polyphase(params.clone(), Arc::clone(&pf)).unwrap();
        assert!(Arc::ptr_eq(a.polyphase(), b.polyphase()));

        let mismatched = params.with_num_phases(7);
        assert!(StreamResampler::with_polyphase(mismatched, pf).is_err());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = ResampleParams::new(1, 2).unwrap().with_channels(0);
        assert!(matches!(
            StreamResampler::new(params, &lowpass(8)),
            Err(ResampleError::InvalidChannels(0))
        ));
    }
}
