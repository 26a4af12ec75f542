use crate::bitrev::bit_reverse_permute;
use crate::bluestein::Bluestein;
use crate::butterfly::radix2_in_place;
use crate::complex::{conjugate_in_place, Complex, FftFloat};
use crate::twiddle::TwiddleTable;
use std::sync::Arc;
use thiserror::Error;

pub type FftResult<T> = Result<T, FftError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FftError {
    #[error("invalid transform length {len}: {reason}")]
    InvalidLength { len: usize, reason: &'static str },
    #[error("buffer length {actual} does not match plan length {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("sample spacing must be finite and greater than zero")]
    InvalidSampleSpacing,
    #[error("invalid pass band {low} Hz..{high} Hz")]
    InvalidBand { low: f64, high: f64 },
}

/// Sign of the exponent in the transform kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `e^{-2πi·k/N}`
    Forward,
    /// `e^{+2πi·k/N}`
    Inverse,
}

impl Direction {
    /// Turn a forward twiddle factor into the one for this direction.
    #[inline]
    pub fn orient<T: FftFloat>(self, factor: Complex<T>) -> Complex<T> {
        match self {
            Direction::Forward => factor,
            Direction::Inverse => factor.conj(),
        }
    }
}

/// How lengths that are not a power of two are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Power-of-two lengths go through radix-2, everything else through Bluestein.
    #[default]
    Auto,
    /// Reject lengths that are not a power of two.
    Radix2Only,
}

#[derive(Debug, Clone)]
enum Algorithm<T> {
    Radix2(Arc<TwiddleTable<T>>),
    Bluestein(Box<Bluestein<T>>),
}

/// A transform prepared for one length.
///
/// The in-place methods mutate the caller's slice and allocate only for the
/// Bluestein scratch buffer; `forward` and `inverse` leave the input untouched
/// and return a new vector. Output is always in natural bin order.
#[derive(Debug, Clone)]
pub struct FftPlan<T> {
    len: usize,
    algorithm: Algorithm<T>,
}

impl<T: FftFloat> FftPlan<T> {
    pub fn new(len: usize) -> FftResult<Self> {
        Self::with_strategy(len, Strategy::Auto)
    }

    pub fn with_strategy(len: usize, strategy: Strategy) -> FftResult<Self> {
        if len == 0 {
            return Err(FftError::InvalidLength {
                len,
                reason: "length must be at least 1",
            });
        }
        let algorithm = if len.is_power_of_two() {
            Algorithm::Radix2(T::twiddle_cache().get(len))
        } else {
            match strategy {
                Strategy::Auto => Algorithm::Bluestein(Box::new(Bluestein::new(len))),
                Strategy::Radix2Only => {
                    return Err(FftError::InvalidLength {
                        len,
                        reason: "radix-2 transform needs a power-of-two length",
                    });
                }
            }
        };
        tracing::debug!(
            len,
            radix2 = matches!(algorithm, Algorithm::Radix2(_)),
            "planned transform"
        );
        Ok(FftPlan { len, algorithm })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this plan runs the radix-2 kernel directly.
    pub fn is_radix2(&self) -> bool {
        matches!(self.algorithm, Algorithm::Radix2(_))
    }

    /// Unnormalized forward DFT of `buf`, in place.
    pub fn forward_in_place(&self, buf: &mut [Complex<T>]) -> FftResult<()> {
        self.check_len(buf)?;
        self.forward_unchecked(buf);
        Ok(())
    }

    /// Inverse DFT of `buf`, in place, scaled by `1/N` so that it undoes
    /// [`forward_in_place`](Self::forward_in_place).
    pub fn inverse_in_place(&self, buf: &mut [Complex<T>]) -> FftResult<()> {
        self.check_len(buf)?;
        conjugate_in_place(buf);
        self.forward_unchecked(buf);
        let scale = T::one() / T::from_usize(self.len);
        for value in buf.iter_mut() {
            *value = Complex::new(value.re * scale, -value.im * scale);
        }
        Ok(())
    }

    pub fn forward(&self, input: &[Complex<T>]) -> FftResult<Vec<Complex<T>>> {
        let mut output = input.to_vec();
        self.forward_in_place(&mut output)?;
        Ok(output)
    }

    pub fn inverse(&self, input: &[Complex<T>]) -> FftResult<Vec<Complex<T>>> {
        let mut output = input.to_vec();
        self.inverse_in_place(&mut output)?;
        Ok(output)
    }

    fn check_len(&self, buf: &[Complex<T>]) -> FftResult<()> {
        if buf.len() != self.len {
            return Err(FftError::LengthMismatch {
                expected: self.len,
                actual: buf.len(),
            });
        }
        Ok(())
    }

    fn forward_unchecked(&self, buf: &mut [Complex<T>]) {
        match &self.algorithm {
            Algorithm::Radix2(table) => {
                bit_reverse_permute(buf);
                radix2_in_place(buf, table, Direction::Forward);
            }
            Algorithm::Bluestein(bluestein) => bluestein.forward_in_place(buf),
        }
    }
}

/// Unnormalized forward DFT of `input` into a new vector.
///
/// Twiddle tables come from the process-wide cache, but a Bluestein length
/// rebuilds its chirp and kernel spectrum on every call. Callers transforming
/// the same non-power-of-two length repeatedly should hold an [`FftPlan`]:
///
/// ```
/// use spectra::{forward_transform, Complex64, FftPlan};
///
/// let plan = FftPlan::<f64>::new(1000)?;
/// let input = vec![Complex64::new(1.0, 0.0); 1000];
/// for _ in 0..3 {
///     assert_eq!(plan.forward(&input)?, forward_transform(&input)?);
/// }
/// # Ok::<(), spectra::FftError>(())
/// ```
pub fn forward_transform<T: FftFloat>(input: &[Complex<T>]) -> FftResult<Vec<Complex<T>>> {
    FftPlan::new(input.len())?.forward(input)
}

/// Unnormalized forward DFT, overwriting `buf`. A rejected call leaves `buf`
/// untouched.
pub fn forward_transform_in_place<T: FftFloat>(buf: &mut [Complex<T>]) -> FftResult<()> {
    FftPlan::new(buf.len())?.forward_in_place(buf)
}

/// Inverse DFT scaled by `1/N` into a new vector.
pub fn inverse_transform<T: FftFloat>(input: &[Complex<T>]) -> FftResult<Vec<Complex<T>>> {
    FftPlan::new(input.len())?.inverse(input)
}

/// Inverse DFT scaled by `1/N`, overwriting `buf`.
pub fn inverse_transform_in_place<T: FftFloat>(buf: &mut [Complex<T>]) -> FftResult<()> {
    FftPlan::new(buf.len())?.inverse_in_place(buf)
}
