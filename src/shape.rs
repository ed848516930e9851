use crate::fixed_point::{blend_q15, mul_q15, Q15_ONE};

/// `apply_shape(x, s, a)` is the position `x` in `[0, Q15_ONE]` bent by the shape blend `s`
///
/// # Arguments
///
/// * `linear_pos` - how far through the stage we are as seen by the output, in `[0, Q15_ONE]`. For a decay this
/// runs from full scale down to zero.
///
/// * `shape` - the mix between a straight line (`0`) and the exponential approximation (`Q15_ONE`)
///
/// * `is_attack` - selects the curvature: attacks start slow and finish fast, decays start fast and finish slow
///
/// The exponential is approximated by a square, attack uses `x^2` and decay uses `1 - (1 - x)^2`. Both endpoints are
/// pinned regardless of `shape`.
pub fn apply_shape(linear_pos: i32, shape: u16, is_attack: bool) -> i32 {
    let exp_pos = if is_attack {
        mul_q15(linear_pos, linear_pos as u16)
    } else {
        let inv = Q15_ONE - linear_pos;
        Q15_ONE - mul_q15(inv, inv as u16)
    };

    blend_q15(linear_pos, exp_pos, shape)
}
