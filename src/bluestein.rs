use crate::bitrev::bit_reverse_permute;
use crate::butterfly::radix2_in_place;
use crate::complex::{Complex, FftFloat};
use crate::fft::Direction;
use crate::twiddle::TwiddleTable;
use num::Zero;
use std::f64::consts::PI;
use std::sync::Arc;

/// Chirp-z formulation of an arbitrary-length forward DFT.
///
/// With `w[k] = e^{-iπk²/n}` the DFT becomes
/// `X[k] = w[k] · Σ (x[j]·w[j]) · conj(w[k-j])`, a convolution that is evaluated
/// with radix-2 transforms of length `m ≥ 2n-1`.
#[derive(Debug, Clone)]
pub struct Bluestein<T> {
    len: usize,
    chirp: Vec<Complex<T>>,
    // Spectrum of the conjugate chirp, wrapped for circular convolution and
    // pre-scaled by 1/m so the inner inverse transform needs no normalization.
    kernel: Vec<Complex<T>>,
    table: Arc<TwiddleTable<T>>,
}

impl<T: FftFloat> Bluestein<T> {
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0);
        let inner_len = (2 * len - 1).next_power_of_two();
        let table = T::twiddle_cache().get(inner_len);

        // k² is reduced mod 2n before scaling: e^{-iπk²/n} has period 2n in k²,
        // and the reduction keeps the angle small for large k.
        let period = 2 * len as u128;
        let chirp: Vec<Complex<T>> = (0..len)
            .map(|k| {
                let k = k as u128;
                let angle = -PI * ((k * k) % period) as f64 / len as f64;
                Complex::new(T::from_f64(angle.cos()), T::from_f64(angle.sin()))
            })
            .collect();

        let scale = T::one() / T::from_usize(inner_len);
        let mut kernel = vec![Complex::zero(); inner_len];
        kernel[0] = chirp[0].conj().scale(scale);
        for k in 1..len {
            let value = chirp[k].conj().scale(scale);
            kernel[k] = value;
            kernel[inner_len - k] = value;
        }
        bit_reverse_permute(&mut kernel);
        radix2_in_place(&mut kernel, &table, Direction::Forward);

        Bluestein {
            len,
            chirp,
            kernel,
            table,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of the power-of-two transforms used for the convolution.
    pub fn inner_len(&self) -> usize {
        self.kernel.len()
    }

    /// Forward DFT of `buf` in place. The caller guarantees `buf.len() == len`.
    pub fn forward_in_place(&self, buf: &mut [Complex<T>]) {
        debug_assert_eq!(buf.len(), self.len);
        let mut scratch = vec![Complex::zero(); self.inner_len()];
        for ((slot, x), w) in scratch.iter_mut().zip(buf.iter()).zip(&self.chirp) {
            *slot = x * w;
        }

        bit_reverse_permute(&mut scratch);
        radix2_in_place(&mut scratch, &self.table, Direction::Forward);
        for (value, k) in scratch.iter_mut().zip(&self.kernel) {
            *value = *value * k;
        }
        bit_reverse_permute(&mut scratch);
        radix2_in_place(&mut scratch, &self.table, Direction::Inverse);

        for ((out, value), w) in buf.iter_mut().zip(&scratch).zip(&self.chirp) {
            *out = value * w;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::{slices_approx_eq, Complex32, Complex64};

    fn dft(input: &[Complex64]) -> Vec<Complex64> {
        let n = input.len();
        (0..n)
            .map(|k| {
                input
                    .iter()
                    .enumerate()
                    .map(|(t, x)| {
                        x * Complex64::from_polar(1.0, -2.0 * PI * ((k * t) % n) as f64 / n as f64)
                    })
                    .sum()
            })
            .collect()
    }

    #[test]
    fn inner_length_covers_linear_convolution() {
        assert_eq!(Bluestein::<f64>::new(1).inner_len(), 1);
        assert_eq!(Bluestein::<f64>::new(5).inner_len(), 16);
        assert_eq!(Bluestein::<f64>::new(100).inner_len(), 256);
    }

    #[test]
    fn matches_direct_dft() {
        for n in [1, 2, 3, 5, 6, 7, 12, 17, 31, 100, 243] {
            let input: Vec<Complex64> = (0..n)
                .map(|i| Complex64::new((i as f64).sqrt(), 1.0 / (1.0 + i as f64)))
                .collect();
            let mut buf = input.clone();
            Bluestein::new(n).forward_in_place(&mut buf);
            assert!(slices_approx_eq(&buf, &dft(&input), 1e-10), "n = {n}");
        }
    }

    #[test]
    fn single_precision_is_close() {
        let input: Vec<Complex32> = (0..7).map(|i| Complex32::new(i as f32, 0.0)).collect();
        let mut buf = input.clone();
        Bluestein::new(7).forward_in_place(&mut buf);
        // DC bin is the plain sum.
        assert!((buf[0].re - 21.0).abs() < 1e-4);
        assert!(buf[0].im.abs() < 1e-4);
    }
}
