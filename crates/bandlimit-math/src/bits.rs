//! Bit-manipulation helpers used by the FFT.

/// Returns the base-2 logarithm of a power of two.
///
/// # Panics
/// Debug builds assert that `x` is a power of two; in release builds the
/// result for other inputs is meaningless.
#[inline]
pub fn log2_of_power_of_two(x: usize) -> u32 {
    debug_assert!(x.is_power_of_two(), "input must be a power of 2");
    x.trailing_zeros()
}

/// Reverses the lowest `bits` bits of `x`.
///
/// Used to build the butterfly index permutation of the decimation-in-time
/// FFT: element `i` of the input lands at `bit_reverse(i, log2(n))` in the
/// working buffer.
///
/// # Panics
/// Debug builds assert `0 < bits <= 32`.
#[inline]
pub fn bit_reverse(x: u32, bits: u32) -> u32 {
    debug_assert!(bits > 0 && bits <= 32, "invalid bit count");
    x.reverse_bits() >> (32 - bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log2_of_power_of_two() {
        assert_eq!(log2_of_power_of_two(1), 0);
        assert_eq!(log2_of_power_of_two(2), 1);
        assert_eq!(log2_of_power_of_two(8), 3);
        assert_eq!(log2_of_power_of_two(1024), 10);
    }

    #[test]
    fn test_bit_reverse_three_bits() {
        // 0b001 -> 0b100, 0b011 -> 0b110
        assert_eq!(bit_reverse(0b001, 3), 0b100);
        assert_eq!(bit_reverse(0b011, 3), 0b110);
        assert_eq!(bit_reverse(0b111, 3), 0b111);
        assert_eq!(bit_reverse(0, 3), 0);
    }

    #[test]
    fn test_bit_reverse_is_involution() {
        for bits in [1, 4, 8, 16] {
            for x in 0..(1u32 << bits.min(8)) {
                assert_eq!(bit_reverse(bit_reverse(x, bits), bits), x);
            }
        }
    }

    #[test]
    fn test_bit_reverse_permutes_full_range() {
        let bits = 5;
        let n = 1usize << bits;
        let mut seen = vec![false; n];
        for i in 0..n {
            seen[bit_reverse(i as u32, bits) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
