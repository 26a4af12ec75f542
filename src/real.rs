use crate::complex::{Complex, FftFloat};
use crate::fft::{FftError, FftPlan, FftResult};
use std::f64::consts::PI;

/// Forward transform of real samples, returning the `len/2 + 1` bins from DC
/// up to Nyquist. The remaining bins are the conjugates of these.
///
/// Even lengths pack sample pairs into one complex value and run a transform
/// of half the length; odd lengths fall back to the full complex transform.
pub fn real_forward_transform<T: FftFloat>(input: &[T]) -> FftResult<Vec<Complex<T>>> {
    let len = input.len();
    if len == 0 {
        return Err(FftError::InvalidLength {
            len,
            reason: "length must be at least 1",
        });
    }
    if len % 2 == 1 {
        let mut buf: Vec<Complex<T>> = input.iter().map(|&x| Complex::new(x, T::zero())).collect();
        FftPlan::new(len)?.forward_in_place(&mut buf)?;
        buf.truncate(len / 2 + 1);
        return Ok(buf);
    }

    let half = len / 2;
    let mut packed: Vec<Complex<T>> = input
        .chunks_exact(2)
        .map(|pair| Complex::new(pair[0], pair[1]))
        .collect();
    FftPlan::new(half)?.forward_in_place(&mut packed)?;

    let one_half = T::from_f64(0.5);
    let spectrum = (0..=half)
        .map(|k| {
            let z = packed[k % half];
            let mirror = packed[(half - k) % half].conj();
            let even = (z + mirror).scale(one_half);
            // (z - mirror) / 2i
            let diff = z - mirror;
            let odd = Complex::new(diff.im, -diff.re).scale(one_half);
            let angle = -2.0 * PI * k as f64 / len as f64;
            let twiddle = Complex::new(T::from_f64(angle.cos()), T::from_f64(angle.sin()));
            even + twiddle * odd
        })
        .collect();
    Ok(spectrum)
}

/// Inverse of [`real_forward_transform`]: rebuild `len` real samples from the
/// `len/2 + 1` non-negative-frequency bins, scaled by `1/len`.
///
/// Imaginary parts that a real signal cannot have (DC, and Nyquist for even
/// `len`) are ignored.
pub fn real_inverse_transform<T: FftFloat>(spectrum: &[Complex<T>], len: usize) -> FftResult<Vec<T>> {
    if len == 0 {
        return Err(FftError::InvalidLength {
            len,
            reason: "length must be at least 1",
        });
    }
    let expected = len / 2 + 1;
    if spectrum.len() != expected {
        return Err(FftError::LengthMismatch {
            expected,
            actual: spectrum.len(),
        });
    }

    let mut full = Vec::with_capacity(len);
    full.extend_from_slice(spectrum);
    full.extend((expected..len).map(|k| spectrum[len - k].conj()));
    FftPlan::new(len)?.inverse_in_place(&mut full)?;
    Ok(full.into_iter().map(|value| value.re).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::{slices_approx_eq, Complex64};
    use crate::fft::forward_transform;

    fn samples(len: usize) -> Vec<f64> {
        (0..len).map(|i| (i as f64 * 0.7).sin() + 0.25 * (i as f64).cos()).collect()
    }

    #[test]
    fn matches_complex_transform() {
        for len in [1, 2, 3, 4, 7, 8, 10, 16, 33, 64] {
            let input = samples(len);
            let complex: Vec<Complex64> = input.iter().map(|&x| Complex64::new(x, 0.0)).collect();
            let expected = forward_transform(&complex).unwrap();
            let actual = real_forward_transform(&input).unwrap();
            assert_eq!(actual.len(), len / 2 + 1);
            assert!(
                slices_approx_eq(&actual, &expected[..len / 2 + 1], 1e-12),
                "len = {len}"
            );
        }
    }

    #[test]
    fn round_trip_recovers_samples() {
        for len in [1, 2, 5, 8, 12, 100] {
            let input = samples(len);
            let spectrum = real_forward_transform(&input).unwrap();
            let restored = real_inverse_transform(&spectrum, len).unwrap();
            for (a, b) in input.iter().zip(&restored) {
                assert!((a - b).abs() < 1e-12, "len = {len}");
            }
        }
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(matches!(
            real_forward_transform::<f64>(&[]),
            Err(FftError::InvalidLength { len: 0, .. })
        ));
        let spectrum = vec![Complex64::new(1.0, 0.0); 3];
        assert_eq!(
            real_inverse_transform(&spectrum, 8),
            Err(FftError::LengthMismatch {
                expected: 5,
                actual: 3
            })
        );
    }
}
