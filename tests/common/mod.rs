#![allow(dead_code)]

use std::f64::consts::PI;

use polyresample::{
    resample, PolyphaseFilter, Rational, ResampleSuspensionPoint, Sample, StreamResampler,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

pub fn gen_ramp(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

pub fn gen_sine(freq_hz: f64, sr: u32, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * PI * freq_hz * i as f64 / sr as f64).sin())
        .collect()
}

pub fn gen_noise(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

pub fn gen_triangle(half: usize) -> Vec<f64> {
    (1..=half).chain((1..half).rev()).map(|v| v as f64).collect()
}

/// Zeroth-order modified Bessel function of the first kind.
fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let x_half = x / 2.0;
    for k in 1..30 {
        term *= (x_half / k as f64) * (x_half / k as f64);
        sum += term;
        if term < 1e-15 * sum {
            break;
        }
    }
    sum
}

fn kaiser_window(size: usize, beta: f64) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    let denom = bessel_i0(beta);
    (0..size)
        .map(|i| {
            let x = 2.0 * i as f64 / (size as f64 - 1.0) - 1.0;
            bessel_i0(beta * (1.0 - x * x).max(0.0).sqrt()) / denom
        })
        .collect()
}

/// Kaiser-windowed sinc lowpass. `cutoff` is relative to Nyquist.
pub fn design_lowpass(len: usize, cutoff: f64, beta: f64) -> Vec<f64> {
    let center = (len as f64 - 1.0) / 2.0;
    kaiser_window(len, beta)
        .into_iter()
        .enumerate()
        .map(|(i, w)| {
            let x = cutoff * (i as f64 - center);
            let sinc = if x.abs() < 1e-12 {
                1.0
            } else {
                (PI * x).sin() / (PI * x)
            };
            cutoff * sinc * w
        })
        .collect()
}

/// Resamples `input` through repeated calls of the given sizes (cycled),
/// following each returned continuation token.
pub fn resample_in_chunks<T: Sample>(
    input: &[T],
    polyphase: &PolyphaseFilter<T>,
    ratio: Rational,
    total: usize,
    chunk_sizes: &[usize],
) -> Vec<T> {
    let mut output = Vec::with_capacity(total);
    let mut token = ResampleSuspensionPoint::default();
    let mut offset = 0;
    for &size in chunk_sizes.iter().cycle() {
        if output.len() >= total {
            break;
        }
        let n = size.max(1).min(total - output.len());
        let mut out = vec![T::zero(); n];
        token = resample(&mut out, &input[offset..], polyphase.view(), ratio, token.start_point);
        offset += token.first_input_sample;
        output.extend_from_slice(&out);
    }
    output
}

pub fn stream_resample<T: Sample>(
    resampler: &mut StreamResampler<T>,
    input: &[T],
    chunk_size: usize,
) -> Vec<T> {
    let mut output = Vec::new();
    for chunk in input.chunks(chunk_size.max(1)) {
        output.extend(resampler.process(chunk).expect("process failed"));
    }
    output.extend(resampler.flush().expect("flush failed"));
    output
}

/// Hann-windowed magnitude spectrum of `signal`.
pub fn magnitude_spectrum(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let w = 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos();
            Complex::new(s * w, 0.0)
        })
        .collect();
    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(n).process(&mut buffer);
    buffer[..n / 2].iter().map(|c| c.norm()).collect()
}

/// Cosine similarity of two magnitude spectra.
pub fn spectral_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}

pub fn peak_bin(spectrum: &[f64]) -> usize {
    spectrum
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "length mismatch");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
