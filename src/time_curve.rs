/// The shortest stage time, also used for a knob at zero so that nothing downstream divides by zero
pub const MIN_TIME_US: u32 = 1_000;

/// The longest stage time, a knob at full scale
pub const MAX_TIME_US: u32 = 5_000_000;

/// `pot_to_time_us(p)` is the 8 bit knob value `p` mapped to a stage time in microseconds
///
/// The knob follows a cubic curve between `MIN_TIME_US` and `MAX_TIME_US` so that short times are easy to dial in
/// while the top of the travel still reaches multi-second sweeps. The result is never less than `MIN_TIME_US`.
pub fn pot_to_time_us(pot_value: u8) -> u32 {
    if pot_value == 0 {
        return MIN_TIME_US;
    }
    // 255^3 fits a u32 but the product with the range does not
    let x = pot_value as u64;
    let cubed = x * x * x;
    let max_cubed = 255_u64 * 255 * 255;
    let range = (MAX_TIME_US - MIN_TIME_US) as u64;
    MIN_TIME_US + ((cubed * range) / max_cubed) as u32
}

/// `pot_to_time_secs(p)` is `pot_to_time_us(p)` in seconds, for consumers that work in floating point
pub fn pot_to_time_secs(pot_value: u8) -> f32 {
    pot_to_time_us(pot_value) as f32 / 1_000_000.0_f32
}
