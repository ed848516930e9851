/// Full scale (1.0) in the Q15 domain
///
/// Values are carried in `i32` with `Q15_ONE` representing full scale. Blend factors are carried in `u16` so that
/// `Q15_ONE` itself is representable.
pub const Q15_ONE: i32 = 1 << 15;

/// `mul_q15(a, b)` is the Q15 product of `a` and `b`
///
/// The product is formed in a widened accumulator so squaring full scale can't overflow, then shifted back down.
/// Negative `a` rounds toward negative infinity.
pub fn mul_q15(a: i32, b: u16) -> i32 {
    ((a as i64 * b as i64) >> 15) as i32
}

/// `clamp_q15(v)` is `v` clamped to `[0, Q15_ONE]`
pub fn clamp_q15(v: i32) -> i32 {
    v.clamp(0, Q15_ONE)
}

/// `blend_q15(a, b, t)` is the linear mix of `a` and `b` by factor `t`
///
/// `t == 0` is exactly `a`, `t == Q15_ONE` is exactly `b`.
pub fn blend_q15(a: i32, b: i32, t: u16) -> i32 {
    a + mul_q15(b - a, t)
}

/// `u8_to_q15(v)` is the 8 bit value `v` scaled so that `0` is zero and `255` is exactly `Q15_ONE`
pub fn u8_to_q15(v: u8) -> u16 {
    ((v as u32 * Q15_ONE as u32) / 255) as u16
}
