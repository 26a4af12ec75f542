/// Reverse the lowest `bits` bits of `index`.
///
/// With `bits == 0` (a length-1 transform) the only valid index is 0, which
/// maps to itself.
#[inline]
pub fn reverse_index(index: usize, bits: u32) -> usize {
    if bits == 0 {
        return index;
    }
    index.reverse_bits() >> (usize::BITS - bits)
}

/// The full permutation for a power-of-two length `n`: entry `i` holds the
/// index that `i` is exchanged with.
pub fn permutation(n: usize) -> Vec<usize> {
    debug_assert!(n.is_power_of_two(), "length {n} is not a power of two");
    let bits = n.trailing_zeros();
    (0..n).map(|i| reverse_index(i, bits)).collect()
}

/// Reorder `buf` into bit-reversed order in a single pass of pairwise swaps.
///
/// `i` is swapped with its reverse only when the reverse is larger, so every
/// element moves at most once. The length must be a power of two; the
/// orchestrator checks that before calling.
pub fn bit_reverse_permute<T>(buf: &mut [T]) {
    let n = buf.len();
    debug_assert!(n.is_power_of_two(), "length {n} is not a power of two");
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = reverse_index(i, bits);
        if j > i {
            buf.swap(i, j);
        }
    }
}
