//! User-facing conversion settings, validated before any filter is built.

use serde::{Deserialize, Serialize};

use crate::core::rational::Rational;
use crate::error::{ResampleError, ResampleResult};

use super::length::resample_filter_cutoff;

/// Default phase resolution of the polyphase bank.
pub const DEFAULT_NUM_PHASES: usize = 32;

/// Sample-rate conversion settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResampleParams {
    /// Input sample rate in Hz.
    pub input_rate: u32,
    /// Output sample rate in Hz.
    pub output_rate: u32,
    /// Number of polyphase branches the prototype filter is split into (default: 32).
    pub num_phases: usize,
    /// Number of interleaved channels (default: 1).
    pub channels: usize,
    /// Rescale every phase to unity DC gain (default: true).
    pub normalize: bool,
}

impl ResampleParams {
    /// Creates params converting from `input_rate` to `output_rate`.
    pub fn new(input_rate: u32, output_rate: u32) -> ResampleResult<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(ResampleError::InvalidRatio(format!(
                "sample rates must be positive, got {input_rate} -> {output_rate}"
            )));
        }
        Ok(Self {
            input_rate,
            output_rate,
            num_phases: DEFAULT_NUM_PHASES,
            channels: 1,
            normalize: true,
        })
    }

    /// Set the number of polyphase branches.
    pub fn with_num_phases(mut self, num_phases: usize) -> Self {
        self.num_phases = num_phases;
        self
    }

    /// Set the number of interleaved channels.
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    /// Enable or disable per-phase gain normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Input rate over output rate, reduced.
    ///
    /// # Panics
    /// Panics if either rate is zero. Params from [`ResampleParams::new`]
    /// always have positive rates; deserialized params must pass
    /// [`validate`](Self::validate) first.
    pub fn ratio(&self) -> Rational {
        Rational::new(i64::from(self.input_rate), i64::from(self.output_rate))
    }

    /// Recommended prototype cutoff, relative to the supersampled Nyquist.
    ///
    /// # Panics
    /// Panics under the same conditions as [`ratio`](Self::ratio).
    pub fn filter_cutoff(&self) -> f64 {
        resample_filter_cutoff(self.ratio(), self.num_phases.max(1))
    }

    /// Validates all parameters. Deserialized values are not checked until
    /// this is called.
    pub fn validate(&self) -> ResampleResult<()> {
        if self.input_rate == 0 || self.output_rate == 0 {
            return Err(ResampleError::InvalidRatio(format!(
                "sample rates must be positive, got {} -> {}",
                self.input_rate, self.output_rate
            )));
        }
        if self.num_phases == 0 {
            return Err(ResampleError::ZeroPhases);
        }
        if self.channels == 0 {
            return Err(ResampleError::InvalidChannels(self.channels));
        }
        Ok(())
    }
}
