use crate::complex::{Complex, FftFloat};
use crate::fft::{FftError, FftResult};
use crate::real::{real_forward_transform, real_inverse_transform};
use num::Zero;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Added to every magnitude before taking the logarithm so silence maps to a
/// finite floor (-180 dB) instead of -inf.
pub const MAGNITUDE_FLOOR: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Rectangular,
    Hann,
    #[default]
    Blackman,
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowKind::Rectangular => "rectangular",
            WindowKind::Hann => "hann",
            WindowKind::Blackman => "blackman",
        }
        .fmt(f)
    }
}

/// Symmetric window of `len` coefficients (a single coefficient is always 1).
pub fn window<T: FftFloat>(kind: WindowKind, len: usize) -> Vec<T> {
    if len == 1 {
        return vec![T::one()];
    }
    let denom = (len.saturating_sub(1)) as f64;
    (0..len)
        .map(|i| {
            let phase = 2.0 * PI * i as f64 / denom;
            let value = match kind {
                WindowKind::Rectangular => 1.0,
                WindowKind::Hann => 0.5 - 0.5 * phase.cos(),
                WindowKind::Blackman => 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos(),
            };
            T::from_f64(value)
        })
        .collect()
}

/// Bin centre frequencies of a length-`n` complex transform, negative
/// frequencies in the upper half.
pub fn fftfreq(n: usize, sample_spacing: f64) -> FftResult<Vec<f64>> {
    validate_frequency_args(n, sample_spacing)?;
    let scale = 1.0 / (n as f64 * sample_spacing);
    let split = n.div_ceil(2);
    Ok((0..n)
        .map(|idx| {
            if idx < split {
                idx as f64 * scale
            } else {
                -((n - idx) as f64) * scale
            }
        })
        .collect())
}

/// Bin centre frequencies of the `n/2 + 1` bins of a real transform.
pub fn rfftfreq(n: usize, sample_spacing: f64) -> FftResult<Vec<f64>> {
    validate_frequency_args(n, sample_spacing)?;
    let scale = 1.0 / (n as f64 * sample_spacing);
    Ok((0..=n / 2).map(|idx| idx as f64 * scale).collect())
}

fn validate_frequency_args(n: usize, sample_spacing: f64) -> FftResult<()> {
    if n == 0 {
        return Err(FftError::InvalidLength {
            len: n,
            reason: "length must be at least 1",
        });
    }
    if !(sample_spacing.is_finite() && sample_spacing > 0.0) {
        return Err(FftError::InvalidSampleSpacing);
    }
    Ok(())
}

/// `20·log10(|X| + floor)` for every bin.
pub fn magnitude_db<T: FftFloat>(spectrum: &[Complex<T>]) -> Vec<T> {
    let floor = T::from_f64(MAGNITUDE_FLOOR);
    let twenty = T::from_f64(20.0);
    spectrum
        .iter()
        .map(|bin| twenty * (bin.norm() + floor).log10())
        .collect()
}

/// Window `samples`, drop every frequency outside `[low, high]` Hz and
/// transform back.
///
/// `window` must have the same length as `samples`.
pub fn band_pass<T: FftFloat>(
    samples: &[T],
    window: &[T],
    sample_rate: f64,
    low: f64,
    high: f64,
) -> FftResult<Vec<T>> {
    if window.len() != samples.len() {
        return Err(FftError::LengthMismatch {
            expected: samples.len(),
            actual: window.len(),
        });
    }
    if !(low <= high && low >= 0.0) {
        return Err(FftError::InvalidBand { low, high });
    }
    let freqs = rfftfreq(samples.len(), 1.0 / sample_rate)?;
    let windowed: Vec<T> = samples.iter().zip(window).map(|(&x, &w)| x * w).collect();
    let mut spectrum = real_forward_transform(&windowed)?;
    for (bin, freq) in spectrum.iter_mut().zip(&freqs) {
        if *freq < low || *freq > high {
            *bin = Complex::zero();
        }
    }
    real_inverse_transform(&spectrum, samples.len())
}
