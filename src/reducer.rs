// 🔢 Numeric Reducer - One digit-reduction routine for every channel
//
// Master numbers (11, 22, 33) are terminal only when the caller asks for
// preservation. Karmic debt is a property of unreduced values.

/// Master numbers, never reduced when preservation is requested
pub const MASTER_NUMBERS: [u32; 3] = [11, 22, 33];

/// Unreduced values that carry a karmic debt tag
pub const KARMIC_DEBT_NUMBERS: [u32; 4] = [13, 14, 16, 19];

pub fn is_master(n: u32) -> bool {
    MASTER_NUMBERS.contains(&n)
}

pub fn is_karmic_debt(n: u32) -> bool {
    KARMIC_DEBT_NUMBERS.contains(&n)
}

/// Sum of the decimal digits of `n` (one pass, no reduction)
pub fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Reduce `n` to a single digit by repeated digit sums.
///
/// With `preserve_masters`, the first master number met along the way is
/// returned as-is (checked before every pass, so `29 → 11` stops at 11).
pub fn reduce(mut n: u32, preserve_masters: bool) -> u32 {
    while n > 9 {
        if preserve_masters && is_master(n) {
            return n;
        }
        n = digit_sum(n);
    }
    n
}

/// Final value for a sum where a master total wins over reduction.
///
/// Returns `(number, reduced, is_master)`:
/// - `number`: `reduce(sum, true)`, so a raw master sum is kept verbatim
/// - `reduced`: `reduce(sum, false)`, always a single digit, for display
/// - `is_master`: `number` is a master number
pub fn settle(sum: u32) -> (u32, u32, bool) {
    let number = reduce(sum, true);
    (number, reduce(sum, false), is_master(number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_master_preservation() {
        assert_eq!(reduce(11, true), 11);
        assert_eq!(reduce(22, true), 22);
        assert_eq!(reduce(33, true), 33);
        assert_eq!(reduce(11, false), 2);
        assert_eq!(reduce(22, false), 4);
        assert_eq!(reduce(33, false), 6);
    }

    #[test]
    fn test_master_found_mid_reduction() {
        // 29 → 11 (master) → stop
        assert_eq!(reduce(29, true), 11);
        assert_eq!(reduce(29, false), 2);
        // 49 → 13 → 4, 13 is not a master
        assert_eq!(reduce(49, true), 4);
    }

    #[test]
    fn test_single_digits_untouched() {
        for n in 0..=9 {
            assert_eq!(reduce(n, true), n);
            assert_eq!(reduce(n, false), n);
        }
    }

    #[test]
    fn test_digit_sum() {
        assert_eq!(digit_sum(1985), 23);
        assert_eq!(digit_sum(2000), 2);
        assert_eq!(digit_sum(0), 0);
    }

    #[test]
    fn test_settle_prefers_raw_master() {
        assert_eq!(settle(11), (11, 2, true));
        assert_eq!(settle(15), (6, 6, false));
        assert_eq!(settle(38), (11, 2, true));
    }

    proptest! {
        #[test]
        fn prop_reduce_idempotent(n in 0u32..100_000, preserve in any::<bool>()) {
            let once = reduce(n, preserve);
            prop_assert_eq!(reduce(once, preserve), once);
        }

        #[test]
        fn prop_reduce_result_is_digit_or_master(n in 0u32..100_000) {
            let r = reduce(n, true);
            prop_assert!(r <= 9 || is_master(r));
            prop_assert!(reduce(n, false) <= 9);
        }
    }
}
