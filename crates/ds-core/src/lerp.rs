//! Integer linear interpolation.

/// Interpolate from `v0` to `v1` as `current` moves from 0 to `max`.
///
/// Saturates at both ends: `current <= 0` yields `v0` and `current >= max`
/// yields `v1`. Inside the range the step is truncated toward zero, so
/// results are bit-reproducible. `max` only needs to be positive when
/// `current` lies strictly between the edges.
#[inline]
pub const fn lerp(v0: i32, v1: i32, current: i32, max: i32) -> i32 {
    if current <= 0 {
        return v0;
    }
    if current >= max {
        return v1;
    }
    let step = (current as i64 * (v1 as i64 - v0 as i64)) / max as i64;
    (v0 as i64 + step) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quarter_steps() {
        assert_eq!(lerp(0, 100, 0, 4), 0);
        assert_eq!(lerp(0, 100, 1, 4), 25);
        assert_eq!(lerp(0, 100, 2, 4), 50);
        assert_eq!(lerp(0, 100, 3, 4), 75);
        assert_eq!(lerp(0, 100, 4, 4), 100);
    }

    #[test]
    fn clamps_outside_range() {
        assert_eq!(lerp(10, 20, -5, 4), 10);
        assert_eq!(lerp(10, 20, 9, 4), 20);
    }

    #[test]
    fn zero_max_hits_edges_only() {
        assert_eq!(lerp(3, 7, 0, 0), 3);
        assert_eq!(lerp(3, 7, 1, 0), 7);
    }

    #[test]
    fn truncates_toward_zero() {
        // 1 * -100 / 3 = -33.33 -> -33
        assert_eq!(lerp(0, -100, 1, 3), -33);
        // 1 * 100 / 3 = 33.33 -> 33
        assert_eq!(lerp(0, 100, 1, 3), 33);
    }

    #[test]
    fn descending_range() {
        assert_eq!(lerp(100, 0, 1, 4), 75);
        assert_eq!(lerp(100, 0, 3, 4), 25);
    }

    proptest! {
        #[test]
        fn monotonic_between_endpoints(
            v0 in -40_000i32..40_000,
            v1 in -40_000i32..40_000,
            max in 1i32..200_000,
        ) {
            let mut previous = lerp(v0, v1, 0, max);
            prop_assert_eq!(previous, v0);
            let step = (max / 64).max(1);
            let mut c = step;
            while c <= max + step {
                let value = lerp(v0, v1, c, max);
                if v1 >= v0 {
                    prop_assert!(value >= previous);
                    prop_assert!(value <= v1);
                } else {
                    prop_assert!(value <= previous);
                    prop_assert!(value >= v1);
                }
                previous = value;
                c += step;
            }
            prop_assert_eq!(lerp(v0, v1, max, max), v1);
        }
    }
}
