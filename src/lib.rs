//! # spectra
//!
//! An in-memory discrete Fourier transform engine built around an iterative
//! radix-2 Cooley-Tukey kernel. Lengths that are not a power of two are
//! handled by Bluestein's chirp-z algorithm, which reuses the same kernel.
//!
//! ```
//! use spectra::{forward_transform, inverse_transform, Complex64};
//!
//! let signal = vec![Complex64::new(1.0, 0.0); 4];
//! let spectrum = forward_transform(&signal).unwrap();
//! assert!((spectrum[0].re - 4.0).abs() < 1e-12);
//!
//! let restored = inverse_transform(&spectrum).unwrap();
//! assert!(spectra::slices_approx_eq(&restored, &signal, 1e-12));
//! ```
//!
//! Forward transforms are unnormalized; inverse transforms divide by `N`.
//! Transforms are generic over [`FftFloat`] (`f32` and `f64`). Twiddle tables
//! are cached process-wide per precision and length, see [`TwiddleCache`].
//!
//! With the `parallel` feature the blocks of each butterfly stage are spread
//! over the rayon thread pool for lengths above [`parallel_threshold`].

pub mod analyzer;
pub mod audio;
pub mod bitrev;
pub mod bluestein;
pub mod butterfly;
pub mod complex;
pub mod config;
pub mod fft;
pub mod real;
pub mod spectrum;
pub mod twiddle;

pub use analyzer::{BandLevel, SpectrumAnalyzer, SpectrumReport};
pub use butterfly::{parallel_threshold, set_parallel_threshold};
pub use complex::{approx_eq, slices_approx_eq, Complex, Complex32, Complex64, FftFloat};
pub use fft::{
    forward_transform, forward_transform_in_place, inverse_transform, inverse_transform_in_place,
    Direction, FftError, FftPlan, FftResult, Strategy,
};
pub use real::{real_forward_transform, real_inverse_transform};
pub use spectrum::{band_pass, fftfreq, magnitude_db, rfftfreq, window, WindowKind};
pub use twiddle::{twiddle_cache, TwiddleCache, TwiddleTable};
