//! Numeric foundations: exact rationals, sample types, dot-product kernels
//! and whole-signal helpers.

pub mod kernel;
pub mod rational;
pub mod sample;
pub mod signal;

pub use kernel::{dot_product_sample, DotKernel, ScalarKernel, UnrolledKernel};
pub use rational::Rational;
pub use sample::Sample;
pub use signal::{convolution_length, convolve, convolve_range, decimate, expand, ConvolutionKind};
