use crate::twiddle::TwiddleCache;
use num::traits::FloatConst;
use num::Float;
use std::fmt;
use std::sync::OnceLock;

pub use num::complex::{Complex, Complex32, Complex64};

/// Floating-point types the transforms run on.
///
/// Besides the arithmetic from [`Float`] and the constants from [`FloatConst`],
/// every precision owns its own process-wide [`TwiddleCache`].
pub trait FftFloat:
    Float + FloatConst + Default + Send + Sync + fmt::Debug + fmt::Display + 'static
{
    fn from_usize(value: usize) -> Self;

    fn from_f64(value: f64) -> Self;

    /// The twiddle tables shared by every transform of this precision.
    fn twiddle_cache() -> &'static TwiddleCache<Self>;
}

macro_rules! impl_fft_float {
    ($t:ty) => {
        impl FftFloat for $t {
            #[inline]
            fn from_usize(value: usize) -> Self {
                value as $t
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            fn twiddle_cache() -> &'static TwiddleCache<Self> {
                static CACHE: OnceLock<TwiddleCache<$t>> = OnceLock::new();
                CACHE.get_or_init(TwiddleCache::new)
            }
        }
    };
}

impl_fft_float!(f32);
impl_fft_float!(f64);

/// Compare two complex values with a tolerance that is absolute near zero and
/// relative for large magnitudes.
///
/// Exact equality is meaningless after a transform, so tests and callers should
/// go through this instead of `==`.
pub fn approx_eq<T: FftFloat>(a: Complex<T>, b: Complex<T>, tolerance: T) -> bool {
    let scale = T::one() + a.norm().max(b.norm());
    (a - b).norm() <= tolerance * scale
}

/// [`approx_eq`] applied element-wise; slices of different length never match.
pub fn slices_approx_eq<T: FftFloat>(a: &[Complex<T>], b: &[Complex<T>], tolerance: T) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(lhs, rhs)| approx_eq(*lhs, *rhs, tolerance))
}

pub(crate) fn conjugate_in_place<T: FftFloat>(buf: &mut [Complex<T>]) {
    for value in buf.iter_mut() {
        value.im = -value.im;
    }
}
