use crate::complex::{Complex, FftFloat};
use crate::fft::Direction;
use crate::twiddle::TwiddleTable;
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 14;

static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Smallest transform length whose stages are spread over the rayon pool.
/// Only has an effect with the `parallel` feature.
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

pub fn set_parallel_threshold(len: usize) {
    PARALLEL_THRESHOLD.store(len.max(2), Ordering::Relaxed);
}

/// Iterative radix-2 decimation-in-time transform, in place and unnormalized.
///
/// `buf` must already be in bit-reversed order and have the table's
/// power-of-two length. Stages run in increasing block size; the blocks of one
/// stage are disjoint and may run in any order.
pub fn radix2_in_place<T: FftFloat>(
    buf: &mut [Complex<T>],
    table: &TwiddleTable<T>,
    direction: Direction,
) {
    let n = buf.len();
    debug_assert_eq!(n, table.len(), "buffer and twiddle table lengths differ");
    debug_assert!(n.is_power_of_two(), "length {n} is not a power of two");

    for stage in 1..=table.stages() {
        let block_len = 1usize << stage;
        let stride = table.stride(stage);
        let factors = table.factors();

        #[cfg(feature = "parallel")]
        if n >= parallel_threshold() {
            buf.par_chunks_exact_mut(block_len)
                .for_each(|block| butterfly_block(block, factors, stride, direction));
            continue;
        }

        for block in buf.chunks_exact_mut(block_len) {
            butterfly_block(block, factors, stride, direction);
        }
    }
}

/// Combine the two halves of one block:
/// `lower' = lower + w·upper`, `upper' = lower - w·upper`.
#[inline]
fn butterfly_block<T: FftFloat>(
    block: &mut [Complex<T>],
    factors: &[Complex<T>],
    stride: usize,
    direction: Direction,
) {
    let half = block.len() / 2;
    let (lower, upper) = block.split_at_mut(half);
    for (k, (lo, up)) in lower.iter_mut().zip(upper.iter_mut()).enumerate() {
        let t = direction.orient(factors[k * stride]) * *up;
        *up = *lo - t;
        *lo = *lo + t;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitrev::bit_reverse_permute;
    use crate::complex::{slices_approx_eq, Complex64};
    use std::f64::consts::PI;

    fn dft(input: &[Complex64], sign: f64) -> Vec<Complex64> {
        let n = input.len();
        (0..n)
            .map(|k| {
                input
                    .iter()
                    .enumerate()
                    .map(|(t, x)| {
                        let angle = sign * 2.0 * PI * ((k * t) % n) as f64 / n as f64;
                        x * Complex64::from_polar(1.0, angle)
                    })
                    .sum()
            })
            .collect()
    }

    fn signal(n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|i| Complex64::new((i as f64 * 0.37).sin(), (i as f64 * 1.3).cos()))
            .collect()
    }

    #[test]
    fn matches_direct_dft_both_directions() {
        for bits in 0..9 {
            let n = 1 << bits;
            let table = TwiddleTable::new(n);
            let input = signal(n);
            for (direction, sign) in [(Direction::Forward, -1.0), (Direction::Inverse, 1.0)] {
                let mut buf = input.clone();
                bit_reverse_permute(&mut buf);
                radix2_in_place(&mut buf, &table, direction);
                assert!(slices_approx_eq(&buf, &dft(&input, sign), 1e-12), "n = {n}");
            }
        }
    }

    #[test]
    fn two_point_butterfly() {
        let table = TwiddleTable::new(2);
        let mut buf = [Complex64::new(3.0, 1.0), Complex64::new(1.0, -1.0)];
        radix2_in_place(&mut buf, &table, Direction::Forward);
        assert_eq!(buf, [Complex64::new(4.0, 0.0), Complex64::new(2.0, 2.0)]);
    }

    #[test]
    fn threshold_has_a_floor() {
        let previous = parallel_threshold();
        set_parallel_threshold(0);
        assert_eq!(parallel_threshold(), 2);
        set_parallel_threshold(previous);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_stages_match_sequential_bit_for_bit() {
        let n = 1 << 15;
        let table = TwiddleTable::new(n);
        let mut input = signal(n);
        bit_reverse_permute(&mut input);

        let previous = parallel_threshold();
        set_parallel_threshold(usize::MAX);
        let mut sequential = input.clone();
        radix2_in_place(&mut sequential, &table, Direction::Forward);

        set_parallel_threshold(2);
        let mut parallel = input.clone();
        radix2_in_place(&mut parallel, &table, Direction::Forward);
        let mut again = input;
        radix2_in_place(&mut again, &table, Direction::Forward);
        set_parallel_threshold(previous);

        assert_eq!(sequential, parallel);
        assert_eq!(parallel, again);
    }
}
