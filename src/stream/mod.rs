//! Buffered streaming front end.

pub mod processor;

pub use processor::StreamResampler;
