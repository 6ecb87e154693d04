// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
bit tricks for texture sizing.

Padded dimensions and 16.16 fixed-point texture coordinates.
*/

/// Largest logical dimension whose 16.16 fixed-point ratio still fits in a `u32`.
pub const MAX_FIXED_DIMENSION: u32 = 1 << 16;

/// `1.0` in 16.16 fixed point.
pub const FIXED_ONE: u32 = 1 << 16;

/**
Returns the smallest power of two that is `>= v`.

`0` maps to `1`, so the result is always a legal texture dimension.
*/
#[inline]
pub fn next_higher_2(v: u32) -> u32 {
    debug_assert!(
        v <= MAX_FIXED_DIMENSION,
        "texture dimension {v} overflows 16.16 texture coordinates"
    );
    if v == 0 {
        return 1;
    }
    let mut k = v - 1;
    k |= k >> 1;
    k |= k >> 2;
    k |= k >> 4;
    k |= k >> 8;
    k |= k >> 16;
    k + 1
}

/**
Returns the GPU-legal size for a requested dimension.

When the device can address non-power-of-two textures the dimension is kept
as-is (but never below 1), otherwise it is rounded up with [next_higher_2].
*/
#[inline]
pub fn padded_dimension(v: u16, npot_supported: bool) -> u32 {
    if npot_supported {
        (v as u32).max(1)
    } else {
        next_higher_2(v as u32)
    }
}

/// `numerator / denominator` as 16.16 fixed point.
///
/// Callers guarantee `numerator <= denominator`, both below [MAX_FIXED_DIMENSION].
#[inline]
pub fn fixed_ratio(numerator: u32, denominator: u32) -> u32 {
    debug_assert!(denominator != 0);
    (((numerator as u64) << 16) / denominator as u64) as u32
}

#[inline]
pub fn fixed_to_f32(fixed: u32) -> f32 {
    fixed as f32 / FIXED_ONE as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_higher_2_covers_texture_range() {
        for n in 0..=65535u32 {
            let p = next_higher_2(n);
            assert!(p >= n);
            assert!(p.is_power_of_two(), "{n} -> {p}");
            if n.is_power_of_two() {
                assert_eq!(p, n);
            }
            //smallest such power
            assert!(p == 1 || p / 2 < n);
        }
        assert_eq!(next_higher_2(0), 1);
        assert_eq!(next_higher_2(65536), 65536);
    }

    #[test]
    fn padded_dimension_respects_npot() {
        assert_eq!(padded_dimension(320, true), 320);
        assert_eq!(padded_dimension(320, false), 512);
        assert_eq!(padded_dimension(200, false), 256);
        assert_eq!(padded_dimension(0, true), 1);
        assert_eq!(padded_dimension(0, false), 1);
        assert_eq!(padded_dimension(u16::MAX, false), 65536);
    }

    #[test]
    fn fixed_ratio_matches_scenario_sizes() {
        assert_eq!(fixed_to_f32(fixed_ratio(320, 512)), 0.625);
        assert_eq!(fixed_to_f32(fixed_ratio(200, 256)), 0.78125);
        assert_eq!(fixed_ratio(512, 512), FIXED_ONE);
        assert_eq!(fixed_ratio(65535, 65536), 65535);
    }
}
