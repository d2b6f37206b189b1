//! Polyphase interpolation and rational-ratio resampling.

pub mod interpolate;
pub mod length;
pub mod params;
pub mod rational;
pub mod suspension;

pub use interpolate::{interpolate, interpolate_signal, interpolate_to_vec, interpolate_with};
pub use length::{
    interpol_filter_cutoff, interpol_length, resample_delay, resample_filter_cutoff,
    resample_length,
};
pub use params::{ResampleParams, DEFAULT_NUM_PHASES};
pub use rational::{resample, resample_central, resample_full, resample_to_vec, resample_with};
pub use suspension::{InterpolSuspensionPoint, ResampleSuspensionPoint};
